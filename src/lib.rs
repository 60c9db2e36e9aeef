//! Runs a program elevated through UAC from the command line.
#![deny(clippy::all, clippy::pedantic)]

pub mod cli;
pub mod dispatch;
pub mod environment;
pub mod error;
pub mod install;
pub mod launcher;
pub mod logging;
pub mod path_list;

#[cfg(windows)]
pub mod windows;

use std::{ffi::OsString, io::Write};

pub use crate::{
    cli::{Action, LaunchRequest, ParseError},
    dispatch::Dispatcher,
    environment::{EnvStore, MemoryEnv},
    error::AdoError,
    launcher::{LaunchError, Launcher},
};

#[cfg(windows)]
pub use crate::windows::{RegistryEnv as SystemEnv, ShellLauncher as SystemLauncher};

#[cfg(not(windows))]
pub use crate::{
    environment::ProcessEnv as SystemEnv, launcher::UnsupportedLauncher as SystemLauncher,
};

/// Parses `args` (program name excluded) and runs the resulting action
/// against the operating system.
///
/// # Errors
///
/// Returns the [`AdoError`] that ended the invocation.
pub fn run<I, S>(args: I, out: &mut impl Write) -> Result<(), AdoError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let request = LaunchRequest::parse(args)?;
    Dispatcher::new(SystemLauncher::default(), SystemEnv::default()).dispatch(&request, out)
}
