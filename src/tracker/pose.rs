//! Approximate head translation from the two pupils and a pinhole camera.
//!
//! Only translation is recovered. Rotation stays identity: two points are
//! not enough to solve orientation, and no landmark model is involved.

use nalgebra::{Matrix4, Point2, Translation3, Vector3};
use serde::{Deserialize, Serialize};

/// Left pupil in the head frame (origin ~ head center), millimeters.
pub const LEFT_PUPIL_MM: [f64; 3] = [0.0, 32.0, 100.0];
/// Right pupil in the head frame (origin ~ head center), millimeters.
pub const RIGHT_PUPIL_MM: [f64; 3] = [0.0, -32.0, 100.0];

/// Camera model used for pose estimation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoseConfig {
    /// Assumed focal length, in pixels
    pub focal_length: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self { focal_length: 500.0 }
    }
}

/// Real distance between the pupils, in millimeters.
pub fn interpupillary_distance_mm() -> f64 {
    (Vector3::from(LEFT_PUPIL_MM) - Vector3::from(RIGHT_PUPIL_MM)).norm()
}

/// Estimate the head transform in the camera frame, translation in meters.
///
/// Depth comes from the ratio between the real and the observed pupil
/// separation; lateral offsets from the left eye position relative to the
/// image center. Returns `None` when the eyes coincide or the result is not
/// finite.
pub fn estimate_head_pose(
    frame_size: (usize, usize),
    left_eye: Point2<f32>,
    right_eye: Point2<f32>,
    config: &PoseConfig,
) -> Option<Matrix4<f64>> {
    let left = left_eye.cast::<f64>();
    let right = right_eye.cast::<f64>();
    let observed = (right - left).norm();
    if !(observed > f64::EPSILON) || !(config.focal_length > 0.0) {
        return None;
    }

    let focal = config.focal_length;
    let cx = frame_size.0 as f64 / 2.0;
    let cy = frame_size.1 as f64 / 2.0;

    let z = focal * interpupillary_distance_mm() / observed;
    let x = (left.x - cx) * z / focal;
    let y = (left.y - cy) * z / focal;

    let translation = Vector3::new(x, y, z) / 1000.0;
    if !translation.iter().all(|v| v.is_finite()) {
        return None;
    }
    Some(Translation3::from(translation).to_homogeneous())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix3;

    #[test]
    fn test_interpupillary_distance() {
        assert!((interpupillary_distance_mm() - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_face_depth() {
        // 64 px between the pupils at f = 500 px puts the head 0.5 m away.
        let pose = estimate_head_pose(
            (640, 480),
            Point2::new(320.0, 240.0),
            Point2::new(384.0, 240.0),
            &PoseConfig::default(),
        )
        .unwrap();

        assert!(pose[(0, 3)].abs() < 1e-9);
        assert!(pose[(1, 3)].abs() < 1e-9);
        assert!((pose[(2, 3)] - 0.5).abs() < 1e-9);
        assert_eq!(pose.fixed_view::<3, 3>(0, 0).into_owned(), Matrix3::identity());
        assert_eq!(pose[(3, 3)], 1.0);
    }

    #[test]
    fn test_offset_face_translation() {
        // Eyes twice as close: twice as far. Left eye 100 px right of center.
        let pose = estimate_head_pose(
            (640, 480),
            Point2::new(420.0, 190.0),
            Point2::new(452.0, 190.0),
            &PoseConfig::default(),
        )
        .unwrap();

        assert!((pose[(2, 3)] - 1.0).abs() < 1e-9);
        assert!((pose[(0, 3)] - 0.2).abs() < 1e-9);
        assert!((pose[(1, 3)] + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_eyes() {
        let eye = Point2::new(100.0, 100.0);
        assert!(estimate_head_pose((640, 480), eye, eye, &PoseConfig::default()).is_none());
    }
}
