//! Pixel pipeline - fitting, resampling, and half-block encoding
//!
//! Performance notes:
//! - One reusable line buffer per renderer
//! - One write per output line

mod blocks;
mod fit;

pub use blocks::HALF_BLOCK;
pub use fit::fit;

use image::imageops::{self, FilterType};

/// Decoded RGB pixels, alpha discarded
pub type PixelBuffer = image::RgbImage;

/// Interpolation kernel for every resize
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Default capacity for the per-line escape sequence buffer
pub(crate) const LINE_BUFFER_CAPACITY: usize = 16 * 1024;

/// Resample `buffer` to exactly `width` x `height`
///
/// A zero in either axis yields an empty buffer.
pub fn resize(buffer: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    if width == 0 || height == 0 {
        return PixelBuffer::new(0, 0);
    }
    if buffer.dimensions() == (width, height) {
        return buffer.clone();
    }
    imageops::resize(buffer, width, height, RESIZE_FILTER)
}

/// Encodes pixel buffers as colored half-block text
///
/// Holds a pre-allocated line buffer so repeated redraws do not reallocate.
pub struct HalfBlockRenderer {
    pub(super) line_buffer: String,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        HalfBlockRenderer {
            line_buffer: String::with_capacity(LINE_BUFFER_CAPACITY),
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_resize_to_target() {
        let buffer = PixelBuffer::from_pixel(40, 30, Rgb([200, 100, 50]));
        let resized = resize(&buffer, 8, 6);
        assert_eq!(resized.dimensions(), (8, 6));
        // A flat color survives interpolation, give or take rounding
        let px = resized.get_pixel(3, 3).0;
        for (got, want) in px.iter().zip([200u8, 100, 50]) {
            assert!(got.abs_diff(want) <= 1, "{:?}", px);
        }
    }

    #[test]
    fn test_resize_degenerate() {
        let buffer = PixelBuffer::from_pixel(4, 4, Rgb([1, 1, 1]));
        assert_eq!(resize(&buffer, 0, 4).dimensions(), (0, 0));
        assert_eq!(resize(&buffer, 4, 0).dimensions(), (0, 0));
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let buffer = PixelBuffer::from_pixel(5, 7, Rgb([9, 8, 7]));
        assert_eq!(resize(&buffer, 5, 7), buffer);
    }
}
