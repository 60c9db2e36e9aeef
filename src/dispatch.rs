use crate::{
    cli::{Action, LaunchRequest, ParseError, USAGE},
    environment::EnvStore,
    error::AdoError,
    install,
    launcher::Launcher,
};
use std::{io::Write, path::PathBuf};

/// Capacity, in UTF-16 code units, of the command line built for `-k`.
pub const COMSPEC_COMMAND_LINE_CAPACITY: usize = 520;

/// Builds the interpreter invocation that runs `command` and keeps the
/// window open.
///
/// # Errors
///
/// Returns [`AdoError::CommandLineTooLong`] when the result exceeds
/// [`COMSPEC_COMMAND_LINE_CAPACITY`].
pub fn comspec_command_line(command: &str) -> Result<String, AdoError> {
    let line = format!("/K \"{command}\"");
    if line.encode_utf16().count() > COMSPEC_COMMAND_LINE_CAPACITY {
        return Err(AdoError::CommandLineTooLong);
    }
    Ok(line)
}

/// Runs one [`LaunchRequest`] against a launcher and an environment.
#[derive(Debug)]
pub struct Dispatcher<L, E> {
    launcher: L,
    env: E,
    executable: Option<PathBuf>,
}

impl<L: Launcher, E: EnvStore> Dispatcher<L, E> {
    #[must_use]
    pub fn new(launcher: L, env: E) -> Self {
        Self {
            launcher,
            env,
            executable: None,
        }
    }

    /// Installs `path` instead of the running executable.
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Executes the request's action. Help and status text go to `out`.
    ///
    /// # Errors
    ///
    /// Returns the [`AdoError`] describing why the action failed.
    pub fn dispatch(
        &mut self,
        request: &LaunchRequest,
        out: &mut impl Write,
    ) -> Result<(), AdoError> {
        let action = request.action();
        log::debug!("dispatching {action:?}");

        match action {
            Action::Help => {
                writeln!(out, "\nado {}\n\n{USAGE}", env!("CARGO_PKG_VERSION"))?;
            }
            Action::Install => {
                let report = self.install().map_err(AdoError::Install)?;
                if report.path_changed {
                    writeln!(out, "Added to PATH: {}", report.dir.display())?;
                }
                writeln!(out, "Program installed successfully.")?;
            }
            Action::Uninstall => {
                let report = self.uninstall().map_err(AdoError::Uninstall)?;
                if report.path_changed {
                    writeln!(out, "Removed from PATH: {}", report.dir.display())?;
                }
                writeln!(out, "Program uninstalled successfully.")?;
            }
            Action::Comspec => {
                let program = self
                    .env
                    .process_var("COMSPEC")
                    .ok_or(AdoError::ComspecUndefined)?;
                let args = comspec_command_line(request.command_line())?;
                self.launch(&program, &args, request.wait())?;
            }
            Action::Launch => {
                let program = request
                    .application_name()
                    .ok_or(ParseError::InvalidArguments)?;
                self.launch(program, request.command_line(), request.wait())?;
            }
        }

        Ok(())
    }

    fn install(&mut self) -> anyhow::Result<install::InstallReport> {
        let exe = match &self.executable {
            Some(path) => path.clone(),
            None => std::env::current_exe()?,
        };
        let dir = install::install_dir(&self.env)?;
        log::debug!("installing {} into {}", exe.display(), dir.display());
        install::install(&exe, &dir, &mut self.env)
    }

    fn uninstall(&mut self) -> anyhow::Result<install::InstallReport> {
        let dir = install::install_dir(&self.env)?;
        log::debug!("uninstalling from {}", dir.display());
        install::uninstall(&dir, &mut self.env)
    }

    fn launch(&mut self, program: &str, args: &str, wait: bool) -> Result<(), AdoError> {
        log::debug!("launching {program:?} with {args:?} (wait={wait})");
        match self.launcher.launch_elevated(program, args, wait) {
            Ok(Some(code)) => {
                log::debug!("{program} exited with code {code}");
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(source) => Err(AdoError::Launch {
                program: program.to_owned(),
                source,
            }),
        }
    }
}
