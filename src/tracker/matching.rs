//! Spatial association between fresh detections and live identities.

use nalgebra::Point2;

use crate::tracker::identity::Identity;
use crate::tracker::rect::Rect;

/// Face region returned by a detector, with optional eye centers.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    /// Face bounding box in frame pixel coordinates
    pub region: Rect,
    /// Left eye center in frame pixel coordinates
    pub left_eye: Option<Point2<f32>>,
    /// Right eye center in frame pixel coordinates
    pub right_eye: Option<Point2<f32>>,
}

impl FaceDetection {
    pub fn new(region: Rect) -> Self {
        Self {
            region,
            left_eye: None,
            right_eye: None,
        }
    }

    pub fn with_eyes(region: Rect, left_eye: Point2<f32>, right_eye: Point2<f32>) -> Self {
        Self {
            region,
            left_eye: Some(left_eye),
            right_eye: Some(right_eye),
        }
    }

    /// Both eye centers, when the detector found both.
    pub fn eyes(&self) -> Option<(Point2<f32>, Point2<f32>)> {
        self.left_eye.zip(self.right_eye)
    }
}

/// Index of the first identity whose bounding box overlaps `region`.
///
/// First match in creation order wins; no overlap maximization.
pub fn first_overlapping(identities: &[Identity], region: &Rect) -> Option<usize> {
    identities.iter().position(|identity| identity.matches_region(region))
}

/// Index of the identity carrying `label`.
pub fn find_by_label(identities: &[Identity], label: &str) -> Option<usize> {
    identities.iter().position(|identity| identity.label() == label)
}
