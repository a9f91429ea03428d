use strata_flow::StageError;
use thiserror::Error;

/// Errors constructing raster buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Backing store length does not match `width * height`.
    #[error("backing store holds {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors from the composite reduction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositeError {
    /// Cancellation was requested before or during the reduction.
    #[error("cancellation requested")]
    Cancelled,

    /// The frame list was empty; the router's non-empty guard should have
    /// rejected it upstream.
    #[error("no frames to composite")]
    EmptyInput,

    /// The result grid contains a coordinate no source frame covers.
    #[error("no source frame covers ({x}, {y})")]
    CoverageGap { x: u32, y: u32 },
}

impl From<CompositeError> for StageError {
    fn from(err: CompositeError) -> Self {
        match err {
            CompositeError::Cancelled => Self::Cancelled,
            other @ (CompositeError::EmptyInput | CompositeError::CoverageGap { .. }) => {
                Self::InternalInvariantViolation(other.to_string())
            }
        }
    }
}
