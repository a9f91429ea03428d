//! Rectangular grids of 4-channel pixel records.

use crate::error::RasterError;

/// One pixel record: four independent byte-sized channels.
///
/// Channel 0 is the alpha/weight channel and channels 1-3 are color
/// components. The semantics are opaque to the composite reduction,
/// which treats all four uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel(pub [u8; 4]);

impl Pixel {
    /// Number of channels per pixel record.
    pub const CHANNELS: usize = 4;

    /// Create a pixel from its channel values.
    #[must_use]
    pub const fn new(channels: [u8; 4]) -> Self {
        Self(channels)
    }

    /// Value of one channel.
    #[must_use]
    pub const fn channel(self, index: usize) -> u8 {
        self.0[index]
    }
}

/// A rectangular, row-major grid of [`Pixel`] records.
///
/// The backing store always holds exactly `width * height` records; the
/// invariant is enforced at construction. Flat-offset arithmetic lives
/// behind these accessors rather than scattered through callers.
///
/// A buffer is exclusively owned by whichever stage currently holds it
/// and is never mutated after being handed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer2D {
    width: u32,
    height: u32,
    data: Vec<Pixel>,
}

impl Buffer2D {
    /// Create a zeroed buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![Pixel::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing backing store.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::SizeMismatch`] unless
    /// `data.len() == width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<Pixel>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    const fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Bounds-checked read.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        self.contains(x, y).then(|| self.data[self.offset(x, y)])
    }

    /// Read a pixel the caller knows is in bounds.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        assert!(self.contains(x, y), "pixel read outside the grid");
        self.data[self.offset(x, y)]
    }

    /// Write one pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) {
        assert!(self.contains(x, y), "pixel write outside the grid");
        let index = self.offset(x, y);
        self.data[index] = pixel;
    }

    /// The flat row-major backing store.
    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }
}
