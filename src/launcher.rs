use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("The operation was canceled by the user.")]
    Cancelled,

    #[error("{message} (error={code:#010x})")]
    Os { code: i32, message: String },

    #[error("argument contains an interior NUL character")]
    InteriorNul,

    #[error("elevated launch is only supported on Windows")]
    Unsupported,
}

/// Starts a program with administrator rights.
pub trait Launcher {
    /// Requests elevated creation of `program` with `args` as its command
    /// line, showing its window. When `wait` is set, blocks until the child
    /// exits and returns its exit code if the OS reported one.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] when the process could not be started,
    /// including when the user declines the elevation prompt.
    fn launch_elevated(
        &mut self,
        program: &str,
        args: &str,
        wait: bool,
    ) -> Result<Option<u32>, LaunchError>;
}

impl<L: Launcher + ?Sized> Launcher for &mut L {
    fn launch_elevated(
        &mut self,
        program: &str,
        args: &str,
        wait: bool,
    ) -> Result<Option<u32>, LaunchError> {
        (**self).launch_elevated(program, args, wait)
    }
}

/// Stand-in for targets without an elevation mechanism.
#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct UnsupportedLauncher;

#[cfg(not(windows))]
impl Launcher for UnsupportedLauncher {
    fn launch_elevated(&mut self, _: &str, _: &str, _: bool) -> Result<Option<u32>, LaunchError> {
        Err(LaunchError::Unsupported)
    }
}
