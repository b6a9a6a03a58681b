use std::path::PathBuf;

use dvdimg_core::{BlockListError, DiscError, ExitStatus};
use thiserror::Error;

/// Failures that stop a run.
///
/// Everything else (layout mismatches, undecrypted sectors, I/O errors
/// inside one block) is accumulated in the run's [`ExitStatus`] instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The disc or its filesystem could not be opened
    #[error("Cannot open disc {}: {}", .path.display(), .source)]
    OpenDisc { path: PathBuf, source: DiscError },

    /// The output image could not be opened
    #[error("Cannot open image file {}: {}", .path.display(), .source)]
    OpenImage {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The directory used for verification could not be opened
    #[error("Cannot open title files in {}: {}", .path.display(), .source)]
    OpenReader { path: PathBuf, source: DiscError },

    /// Verification was requested without an independent reader
    #[error("Verification needs a VIDEO_TS directory to compare against")]
    MissingReader,

    /// Out of memory while splitting the ordinary regions
    #[error("Resource failure: {0}")]
    Resource(#[from] BlockListError),
}

impl ExtractError {
    /// Status bits this failure maps to.
    pub fn status(&self) -> ExitStatus {
        match self {
            Self::OpenDisc { .. } | Self::OpenImage { .. } | Self::OpenReader { .. } => {
                ExitStatus::OPEN
            }
            Self::MissingReader => ExitStatus::USAGE,
            Self::Resource(_) => ExitStatus::MEM,
        }
    }
}
