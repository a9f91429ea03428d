//! Strata IO
//!
//! The pipeline's file-system collaborators: decoding a directory of
//! images into [`Buffer2D`](strata_raster::Buffer2D) frames, and encoding
//! a finished composite back out as PNG.

#![warn(missing_docs)]

pub mod error;
pub mod loader;

pub use error::LoadError;
pub use loader::{load_frames, save_png};
