//! Integration module for connecting detection, optical-flow and recognition
//! backends with the face tracker.
//!
//! This module provides the traits the tracker drives, plus helpers for
//! implementing them: a detection builder, the face seeding mask and a
//! template-based recognition oracle.

mod builder;
mod detector;
mod mask;
mod recognition;

pub use builder::FaceDetectionBuilder;
pub use detector::{FaceDetector, PointTracker, TrackedPoints};
pub use mask::{FaceMaskConfig, face_ellipse_mask};
pub use recognition::{Recognition, RecognitionConfig, RecognitionOracle, TemplateRecognizer};
