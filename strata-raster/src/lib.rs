//! Pixel buffers and the parallel composite reduction.
//!
//! [`Buffer2D`] is the unit the pipeline's reduction stage operates on: a
//! rectangular, row-major grid of 4-channel pixel records. [`composite`]
//! folds a set of them into one averaged buffer, column by column, in
//! parallel, checking the shared [`CancelSignal`](strata_flow::CancelSignal)
//! before each column.

pub mod buffer;
pub mod composite;
pub mod error;

pub use buffer::{Buffer2D, Pixel};
pub use composite::composite;
pub use error::{CompositeError, RasterError};
