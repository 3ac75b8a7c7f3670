use std::path::PathBuf;
use std::sync::PoisonError;
use thiserror::Error;

/// Error type for report source operations
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading the backing file failed
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload could not be decoded
    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl<T> From<PoisonError<T>> for SourceError {
    fn from(error: PoisonError<T>) -> Self {
        SourceError::Lock(error.to_string())
    }
}
