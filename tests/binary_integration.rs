use std::process::{Command, Output};

fn ado(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ado"))
        .args(args)
        .env_remove("COMSPEC")
        .env_remove("ADO_LOG")
        .output()
        .unwrap()
}

#[test]
fn no_arguments_prints_help() {
    let output = ado(&[]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: ado"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_exits_with_one() {
    let output = ado(&["-nope", "prog.exe"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unrecognized flag 'nope'"));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_program_exits_with_one() {
    let output = ado(&["-wait"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid arguments"));
}

#[test]
fn comspec_without_interpreter_exits_with_one() {
    let output = ado(&["-k", "echo", "hello"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("COMSPEC is not defined"));
}

#[cfg(unix)]
fn non_unicode(prefix: &str) -> std::ffi::OsString {
    use std::os::unix::ffi::OsStringExt;

    let mut bytes = prefix.as_bytes().to_vec();
    bytes.push(0xff);
    std::ffi::OsString::from_vec(bytes)
}

#[cfg(windows)]
fn non_unicode(prefix: &str) -> std::ffi::OsString {
    use std::os::windows::ffi::OsStringExt;

    let mut wide = prefix.encode_utf16().collect::<Vec<_>>();
    wide.push(0xD800);
    std::ffi::OsString::from_wide(&wide)
}

#[test]
fn non_unicode_argument_exits_with_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_ado"))
        .arg(non_unicode("p"))
        .env_remove("ADO_LOG")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not valid Unicode"));
}
