use crate::{cli::ParseError, launcher::LaunchError};
use thiserror::Error;

/// Every way an invocation can fail. All of them end the process with exit
/// code 1.
#[derive(Debug, Error)]
pub enum AdoError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("COMSPEC is not defined")]
    ComspecUndefined,

    #[error("creating command line failed")]
    CommandLineTooLong,

    #[error("installation failed: {0:#}")]
    Install(anyhow::Error),

    #[error("uninstallation failed: {0:#}")]
    Uninstall(anyhow::Error),

    #[error("{program} could not be launched: {source}")]
    Launch {
        program: String,
        source: LaunchError,
    },

    #[error("writing output failed: {0}")]
    Output(#[from] std::io::Error),
}
