//! Persistent face identity tracking for video streams.
//!
//! Faces are detected only every few frames; in between, each face is
//! followed by a cloud of feature points advanced with sparse optical flow.
//! Detections are reconciled against live identities by overlap, then
//! against a recognition oracle by appearance, so a face keeps its label
//! after tracking is lost and re-acquired.
//!
//! The detector, point tracker and recognizer are traits in [`integration`];
//! [`TemplateRecognizer`] is a ready-made oracle.
//!
//! # Example
//!
//! ```ignore
//! use facetrack_rs::{GrayFrame, TemplateRecognizer, TrackingCoordinator};
//!
//! let mut coordinator = TrackingCoordinator::with_default_config(
//!     my_detector,
//!     my_flow_tracker,
//!     TemplateRecognizer::default(),
//! );
//!
//! for frame in frames {
//!     for face in coordinator.track(&frame) {
//!         println!("{} {:?} {:?}", face.label, face.state, face.bbox);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod integration;
pub mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use frame::GrayFrame;
pub use integration::{
    FaceDetectionBuilder, FaceDetector, PointTracker, Recognition, RecognitionOracle,
    TemplateRecognizer, TrackedPoints,
};
pub use tracker::{
    FaceDetection, Rect, TrackState, TrackedFace, TrackerConfig, TrackingCoordinator,
};
