use thiserror::Error;

/// Errors raised by disc collaborators (filesystem, sector source, title reader).
#[derive(Debug, Error)]
pub enum DiscError {
    /// I/O error while reading the disc or a title file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The embedded filesystem is malformed
    #[error("Invalid filesystem: {0}")]
    InvalidFilesystem(String),

    /// A sector beyond the end of the medium was requested
    #[error("Sector {0} is beyond the end of the disc")]
    OutOfRange(u64),

    /// No title key could be obtained for a sector
    #[error("No title key for sector {sector}: {reason}")]
    KeyUnavailable { sector: u64, reason: String },

    /// A feature of the medium this reader does not handle
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl DiscError {
    pub fn invalid_filesystem(msg: impl Into<String>) -> Self {
        Self::InvalidFilesystem(msg.into())
    }

    pub fn key_unavailable(sector: u64, reason: impl Into<String>) -> Self {
        Self::KeyUnavailable {
            sector,
            reason: reason.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
