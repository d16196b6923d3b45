mod coordinator;
mod feature_cloud;
mod identity;
mod matching;
mod pose;
mod rect;
mod track_state;

pub use coordinator::{TrackerConfig, TrackingCoordinator};
pub use feature_cloud::FeatureCloud;
pub use identity::{Identity, TrackedFace};
pub use matching::{FaceDetection, find_by_label, first_overlapping};
pub use pose::{
    LEFT_PUPIL_MM, PoseConfig, RIGHT_PUPIL_MM, estimate_head_pose, interpupillary_distance_mm,
};
pub use rect::Rect;
pub use track_state::TrackState;
