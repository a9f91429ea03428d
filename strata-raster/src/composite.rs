//! Column-parallel, cancellable mean reduction over a set of frames.

use rayon::prelude::*;
use strata_flow::CancelSignal;
use tracing::debug;

use crate::buffer::{Buffer2D, Pixel};
use crate::error::CompositeError;

/// Fold equally-positioned frames into one averaged frame.
///
/// The result spans the per-axis maxima of the inputs, in fresh storage.
/// Each output channel is the truncating integer mean of that channel
/// across the frames large enough to cover the coordinate; rounding down
/// is the defined policy and applies to the alpha/weight channel too.
///
/// Columns are the unit of parallel work and of cancellation granularity:
/// the signal is consulted before each column, and a request abandons the
/// remaining columns rather than returning a partially filled buffer.
///
/// # Errors
///
/// [`CompositeError::Cancelled`] if cancellation is requested before or
/// during the reduction, [`CompositeError::EmptyInput`] for an empty
/// frame list, and [`CompositeError::CoverageGap`] if some result
/// coordinate is covered by no frame (possible when the inputs have mixed
/// aspect ratios).
pub fn composite(frames: &[Buffer2D], cancel: &CancelSignal) -> Result<Buffer2D, CompositeError> {
    if frames.is_empty() {
        return Err(CompositeError::EmptyInput);
    }
    if cancel.is_requested() {
        return Err(CompositeError::Cancelled);
    }

    let width = frames.iter().map(Buffer2D::width).max().unwrap_or(0);
    let height = frames.iter().map(Buffer2D::height).max().unwrap_or(0);
    debug!(width, height, frames = frames.len(), "compositing");

    let columns = (0..width)
        .into_par_iter()
        .map(|x| reduce_column(x, height, frames, cancel))
        .collect::<Result<Vec<_>, _>>()?;

    // columns cover disjoint coordinates; a sequential join assembles them
    let mut result = Buffer2D::new(width, height);
    for (x, column) in columns.into_iter().enumerate() {
        for (y, pixel) in column.into_iter().enumerate() {
            result.set(x as u32, y as u32, pixel);
        }
    }
    Ok(result)
}

fn reduce_column(
    x: u32,
    height: u32,
    frames: &[Buffer2D],
    cancel: &CancelSignal,
) -> Result<Vec<Pixel>, CompositeError> {
    if cancel.is_requested() {
        return Err(CompositeError::Cancelled);
    }
    let mut column = Vec::with_capacity(height as usize);
    for y in 0..height {
        let mut sums = [0u32; Pixel::CHANNELS];
        let mut covering = 0u32;
        for frame in frames {
            if let Some(pixel) = frame.get(x, y) {
                covering += 1;
                for (sum, value) in sums.iter_mut().zip(pixel.0) {
                    *sum += u32::from(value);
                }
            }
        }
        if covering == 0 {
            return Err(CompositeError::CoverageGap { x, y });
        }
        let mut channels = [0u8; Pixel::CHANNELS];
        for (channel, sum) in channels.iter_mut().zip(sums) {
            // truncating divide: rounding down is the defined policy
            *channel = (sum / covering) as u8;
        }
        column.push(Pixel(channels));
    }
    Ok(column)
}
