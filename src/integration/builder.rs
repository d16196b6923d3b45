//! Builder for creating FaceDetection objects from various input formats.

use nalgebra::Point2;

use crate::tracker::{FaceDetection, Rect};

/// Builder for creating `FaceDetection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct FaceDetectionBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    left_eye: Option<Point2<f32>>,
    right_eye: Option<Point2<f32>>,
}

impl FaceDetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Set eye centers, in frame coordinates.
    pub fn eyes(mut self, left: (f32, f32), right: (f32, f32)) -> Self {
        self.left_eye = Some(Point2::new(left.0, left.1));
        self.right_eye = Some(Point2::new(right.0, right.1));
        self
    }

    /// Set eye centers given relative to the face box top-left corner,
    /// as eye detectors running on the face crop report them.
    pub fn eyes_in_face(mut self, left: (f32, f32), right: (f32, f32)) -> Self {
        self.left_eye = Some(Point2::new(self.x1 + left.0, self.y1 + left.1));
        self.right_eye = Some(Point2::new(self.x1 + right.0, self.y1 + right.1));
        self
    }

    /// Build the final `FaceDetection`.
    pub fn build(self) -> FaceDetection {
        FaceDetection {
            region: Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2),
            left_eye: self.left_eye,
            right_eye: self.right_eye,
        }
    }
}
