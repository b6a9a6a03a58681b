use dvdimg_core::ExitStatus;
use dvdimg_lib::ExtractError;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// The run itself failed
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// The log file could not be created
    #[error("Cannot open log file: {0}")]
    Logfile(std::io::Error),

    /// Bad combination of arguments
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Exit status bits for this failure.
    pub(crate) fn status(&self) -> ExitStatus {
        match self {
            Self::Extract(e) => e.status(),
            Self::Logfile(_) | Self::Usage(_) => ExitStatus::USAGE,
        }
    }
}
