use crate::{
    environment::{EnvStore, USER_PATH},
    path_list::PathList,
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Folder created under the user's application data.
pub const INSTALL_FOLDER: &str = "Ado";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub dir: PathBuf,
    pub path_changed: bool,
}

/// Resolves `%APPDATA%\Ado`.
///
/// # Errors
///
/// Fails when `APPDATA` is not set.
pub fn install_dir(env: &impl EnvStore) -> Result<PathBuf> {
    let app_data = env.process_var("APPDATA").context("APPDATA not set")?;
    Ok(PathBuf::from(app_data).join(INSTALL_FOLDER))
}

/// Copies `exe` into `dir` and adds `dir` to the user's PATH.
///
/// # Errors
///
/// Fails when the directory cannot be created, the copy fails, or the user
/// PATH cannot be updated.
pub fn install(exe: &Path, dir: &Path, env: &mut impl EnvStore) -> Result<InstallReport> {
    let file_name = exe
        .file_name()
        .with_context(|| format!("{} has no file name", exe.display()))?;
    let dest = dir.join(file_name);
    let mut path = read_user_path(env)?;

    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    if is_same_file(exe, &dest) {
        log::debug!("{} is already installed", dest.display());
    } else {
        fs::copy(exe, &dest)
            .with_context(|| format!("copy {} -> {}", exe.display(), dest.display()))?;
        log::debug!("copied {} -> {}", exe.display(), dest.display());
    }

    let path_changed = path.add(&dir.to_string_lossy());
    if path_changed {
        write_user_path(env, &path)?;
    }
    Ok(InstallReport {
        dir: dir.to_path_buf(),
        path_changed,
    })
}

/// Deletes `dir` if present and removes it from the user's PATH. The PATH is
/// read before anything is deleted.
///
/// # Errors
///
/// Fails when the user PATH cannot be read, the directory cannot be deleted,
/// or the user PATH cannot be updated.
pub fn uninstall(dir: &Path, env: &mut impl EnvStore) -> Result<InstallReport> {
    let mut path = read_user_path(env)?;
    let path_changed = path.remove(&dir.to_string_lossy());

    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("remove {}", dir.display()))?;
        log::debug!("removed {}", dir.display());
    }

    if path_changed {
        write_user_path(env, &path)?;
    }
    Ok(InstallReport {
        dir: dir.to_path_buf(),
        path_changed,
    })
}

fn read_user_path(env: &impl EnvStore) -> Result<PathList> {
    let current = env
        .user_var(USER_PATH)
        .context("read user PATH")?
        .unwrap_or_default();
    Ok(PathList::parse(&current))
}

/// Stores `path`, deleting the variable when nothing is left to store.
fn write_user_path(env: &mut impl EnvStore, path: &PathList) -> Result<()> {
    let updated = path.to_string();
    log::debug!("user PATH -> {updated:?}");
    let value = (!updated.is_empty()).then_some(updated.as_str());
    env.set_user_var(USER_PATH, value)
        .context("write user PATH")
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
