use ado::{
    AdoError, Dispatcher, EnvStore, LaunchError, LaunchRequest, Launcher, MemoryEnv,
    environment::USER_PATH,
};
use std::fs;

#[derive(Debug, Default)]
struct Recorder {
    launched: Vec<(String, String, bool)>,
}

impl Launcher for Recorder {
    fn launch_elevated(
        &mut self,
        program: &str,
        args: &str,
        wait: bool,
    ) -> Result<Option<u32>, LaunchError> {
        self.launched.push((program.to_owned(), args.to_owned(), wait));
        Ok(None)
    }
}

fn dispatch(
    args: &[&str],
    launcher: &mut Recorder,
    env: &mut MemoryEnv,
) -> Result<String, AdoError> {
    let request = LaunchRequest::parse(args.iter().copied())?;
    let mut out = Vec::new();
    Dispatcher::new(launcher, env).dispatch(&request, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn unknown_flag_never_reaches_the_launcher() {
    let mut launcher = Recorder::default();
    let err = dispatch(&["-x", "prog.exe"], &mut launcher, &mut MemoryEnv::new()).unwrap_err();
    assert_eq!(err.to_string(), "unrecognized flag 'x'");
    assert!(launcher.launched.is_empty());
}

#[test]
fn comspec_invocation_waits_when_asked() {
    let mut launcher = Recorder::default();
    let mut env = MemoryEnv::new().with_process_var("COMSPEC", r"C:\Windows\system32\cmd.exe");

    dispatch(&["/WAIT", "/k", "dir", "/s"], &mut launcher, &mut env).unwrap();

    assert_eq!(
        launcher.launched,
        vec![(
            r"C:\Windows\system32\cmd.exe".to_owned(),
            r#"/K "dir /s""#.to_owned(),
            true
        )]
    );
}

#[test]
fn install_uninstall_round_trip_preserves_user_path() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("Ado");
    let original = r"C:\Windows;C:\Tools";
    let mut env = MemoryEnv::new()
        .with_process_var("APPDATA", &tmp.path().to_string_lossy())
        .with_user_var(USER_PATH, original);
    let mut launcher = Recorder::default();

    let installed = dispatch(&["-i"], &mut launcher, &mut env).unwrap();
    assert!(installed.contains(&format!("Added to PATH: {}", dir.display())));
    assert!(fs::read_dir(&dir).unwrap().next().is_some());

    let again = dispatch(&["-i"], &mut launcher, &mut env).unwrap();
    assert!(!again.contains("Added to PATH"));

    dispatch(&["-u"], &mut launcher, &mut env).unwrap();
    assert_eq!(env.user_var(USER_PATH).unwrap().as_deref(), Some(original));
    assert!(!dir.exists());
    assert!(launcher.launched.is_empty());
}

#[test]
fn uninstall_only_touches_the_app_data_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let documents = tmp.path().join("Documents");
    fs::create_dir_all(&documents).unwrap();
    fs::write(documents.join("thesis.docx"), "work").unwrap();
    let mut env = MemoryEnv::new()
        .with_process_var("APPDATA", &tmp.path().join("Roaming").to_string_lossy())
        .with_process_var("ADO_INSTALL_DIR", &documents.to_string_lossy());

    dispatch(&["-u"], &mut Recorder::default(), &mut env).unwrap();

    assert!(documents.join("thesis.docx").exists());
}
