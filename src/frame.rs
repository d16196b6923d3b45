//! Grayscale frame shared between the coordinator, feature clouds and collaborators.

use ndarray::{ArcArray2, Array2, ArrayView2, s};

use crate::tracker::Rect;
use crate::{Error, Result};

/// 8-bit grayscale frame, indexed `[row, column]`.
///
/// Pixel storage is reference counted: every feature cloud keeps the frame
/// its points were measured on, so cloning must stay cheap.
#[derive(Debug, Clone)]
pub struct GrayFrame {
    pixels: ArcArray2<u8>,
}

impl GrayFrame {
    /// Build a frame from a row-major buffer of `width * height` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidFrame(format!(
                "frame must not be empty, got {}x{}",
                width, height
            )));
        }
        let pixels = Array2::from_shape_vec((height, width), data)
            .map_err(|e| Error::InvalidFrame(format!("{}x{}: {}", width, height, e)))?;
        Ok(Self {
            pixels: pixels.into_shared(),
        })
    }

    /// Uniform frame filled with `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            pixels: ArcArray2::from_elem((height, width), value),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Frame size as `(width, height)`.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Pixels covered by `rect`, clipped to the frame. May be empty.
    pub fn region(&self, rect: &Rect) -> ArrayView2<'_, u8> {
        let (x0, y0, x1, y1) = rect.pixel_window(self.width(), self.height());
        self.pixels.slice(s![y0..y1, x0..x1])
    }
}

impl From<Array2<u8>> for GrayFrame {
    fn from(pixels: Array2<u8>) -> Self {
        Self {
            pixels: pixels.into_shared(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_length() {
        assert!(GrayFrame::new(4, 4, vec![0; 15]).is_err());
        assert!(GrayFrame::new(0, 4, vec![]).is_err());
    }

    #[test]
    fn test_region_is_clipped() {
        let data: Vec<u8> = (0..100).collect();
        let frame = GrayFrame::new(10, 10, data).unwrap();
        assert_eq!(frame.size(), (10, 10));

        let region = frame.region(&Rect::new(8.0, 7.0, 5.0, 5.0));
        assert_eq!(region.dim(), (3, 2));
        assert_eq!(region[[0, 0]], 78);

        let outside = frame.region(&Rect::new(20.0, 20.0, 5.0, 5.0));
        assert_eq!(outside.len(), 0);
    }
}
