//! Error types for strata-io

use thiserror::Error;

/// Errors from the image input/output collaborators.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Cancellation was requested before the scan finished.
    #[error("cancellation requested")]
    Cancelled,

    /// The input directory could not be read.
    #[error("failed to read directory: {0}")]
    Io(#[from] std::io::Error),

    /// The composite could not be encoded.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// A decode worker was torn down mid-flight.
    #[error("decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
