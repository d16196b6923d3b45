//! Elliptical seeding mask for feature extraction inside a face region.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::tracker::Rect;

/// Layout of a typical face inside its detection box, as fractions of the box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceMaskConfig {
    /// Vertical position of the ellipse center
    pub ellipse_cy: f32,
    /// Ellipse width; keep at least 0.5 to cover both eyes
    pub ellipse_w: f32,
    /// Ellipse height; controls how tall the mask is
    pub ellipse_h: f32,
}

impl Default for FaceMaskConfig {
    fn default() -> Self {
        Self {
            ellipse_cy: 0.40,
            ellipse_w: 0.50,
            ellipse_h: 0.80,
        }
    }
}

/// Build a `frame_height` x `frame_width` mask that is `true` inside the
/// central face ellipse of `region` and `false` elsewhere.
///
/// Detector implementations use it to keep seed features off the hairline,
/// ears and background.
pub fn face_ellipse_mask(
    frame_width: usize,
    frame_height: usize,
    region: &Rect,
    config: &FaceMaskConfig,
) -> Array2<bool> {
    let mut mask = Array2::from_elem((frame_height, frame_width), false);

    let (cx, _) = region.center();
    let cy = region.y + region.height * config.ellipse_cy;
    let semi_x = region.width * config.ellipse_w / 2.0;
    let semi_y = region.height * config.ellipse_h / 2.0;
    if semi_x <= 0.0 || semi_y <= 0.0 {
        return mask;
    }

    let (x0, y0, x1, y1) = region.pixel_window(frame_width, frame_height);
    for row in y0..y1 {
        for col in x0..x1 {
            let dx = (col as f32 + 0.5 - cx) / semi_x;
            let dy = (row as f32 + 0.5 - cy) / semi_y;
            if dx * dx + dy * dy <= 1.0 {
                mask[[row, col]] = true;
            }
        }
    }
    mask
}
