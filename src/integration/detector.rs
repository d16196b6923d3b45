//! Traits for the detection and optical-flow backends driving the tracker.

use nalgebra::Point2;

use crate::frame::GrayFrame;
use crate::tracker::{FaceDetection, Rect};

/// Face and eye detector.
///
/// Implement this trait to connect any face detection model to the tracker.
///
/// # Example
///
/// ```ignore
/// use facetrack_rs::{FaceDetector, FaceDetection, GrayFrame, Rect};
/// use nalgebra::Point2;
///
/// struct MyDetector {
///     // Your cascade or network here
/// }
///
/// impl FaceDetector for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &GrayFrame) -> Result<Vec<FaceDetection>, Self::Error> {
///         Ok(vec![])
///     }
///
///     fn extract_features(
///         &mut self,
///         frame: &GrayFrame,
///         region: &Rect,
///         max_features: usize,
///     ) -> Result<Vec<Point2<f32>>, Self::Error> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait FaceDetector {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Detect face regions in `frame`. May return no results.
    fn detect(&mut self, frame: &GrayFrame) -> Result<Vec<FaceDetection>, Self::Error>;

    /// Pick up to `max_features` trackable points inside `region`.
    ///
    /// Implementations should seed inside the central face ellipse (see
    /// [`face_ellipse_mask`](crate::integration::face_ellipse_mask)) rather
    /// than on hair, ears or background. May return fewer points, or none.
    fn extract_features(
        &mut self,
        frame: &GrayFrame,
        region: &Rect,
        max_features: usize,
    ) -> Result<Vec<Point2<f32>>, Self::Error>;
}

/// Output of a [`PointTracker`] step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedPoints {
    /// New positions, one per input point
    pub points: Vec<Point2<f32>>,
    /// Whether the correspondence of each point was confidently found
    pub valid: Vec<bool>,
}

impl TrackedPoints {
    /// Points whose correspondence was found, in input order.
    pub fn into_valid(self) -> Vec<Point2<f32>> {
        self.points
            .into_iter()
            .zip(self.valid)
            .filter_map(|(p, ok)| if ok { Some(p) } else { None })
            .collect()
    }
}

/// Sparse optical-flow point tracker.
pub trait PointTracker {
    /// Error type for tracking failures.
    type Error: std::fmt::Display;

    /// Find `points` from `prev` in `next`.
    ///
    /// Must return exactly one position and one validity flag per input point.
    fn track(
        &mut self,
        prev: &GrayFrame,
        points: &[Point2<f32>],
        next: &GrayFrame,
    ) -> Result<TrackedPoints, Self::Error>;
}
