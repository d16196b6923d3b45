//! One persistently tracked person.

use nalgebra::{Matrix4, Point2, Vector2};

use crate::frame::GrayFrame;
use crate::integration::{FaceDetector, PointTracker, RecognitionOracle};
use crate::tracker::coordinator::TrackerConfig;
use crate::tracker::feature_cloud::FeatureCloud;
use crate::tracker::pose::{self, PoseConfig};
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Read-only copy of an identity, handed out by the coordinator every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedFace {
    pub label: String,
    pub bbox: Rect,
    /// Head transform in the camera frame, translation in meters
    pub pose: Matrix4<f64>,
    pub state: TrackState,
}

/// A tracked face: feature cloud, bounding box, label and lifecycle.
#[derive(Debug, Clone)]
pub struct Identity {
    label: String,
    bbox: Rect,
    /// From the cloud centroid to the bbox top-left, fixed at relocalization
    centroid_offset: Vector2<f32>,
    state: TrackState,
    pose: Matrix4<f64>,
    trained: bool,
    cloud: FeatureCloud,
    features_threshold: usize,
    last_tracked_frame: u64,
}

impl Identity {
    /// Create an identity localized on `region`.
    pub fn new<D: FaceDetector>(
        label: impl Into<String>,
        config: &TrackerConfig,
        frame: &GrayFrame,
        region: Rect,
        detector: &mut D,
        frame_id: u64,
    ) -> Self {
        let mut identity = Self {
            label: label.into(),
            bbox: region,
            centroid_offset: Vector2::zeros(),
            state: TrackState::Tracking,
            pose: Matrix4::identity(),
            trained: false,
            cloud: FeatureCloud::new(config.feature_budget, config.prune_multiplier),
            features_threshold: config.features_threshold,
            last_tracked_frame: frame_id,
        };
        identity.relocalize(frame, region, detector, frame_id);
        identity
    }

    /// True if `region` shares a non-zero area with the current bounding box.
    pub fn matches_region(&self, region: &Rect) -> bool {
        self.bbox.intersection_area(region) > 0.0
    }

    /// Hard reset onto a freshly detected `region`, from any state.
    pub fn relocalize<D: FaceDetector>(
        &mut self,
        frame: &GrayFrame,
        region: Rect,
        detector: &mut D,
        frame_id: u64,
    ) {
        self.bbox = region;

        let seeds = match detector.extract_features(frame, &region, self.cloud.budget()) {
            Ok(seeds) => seeds,
            Err(e) => {
                log::warn!("Feature extraction failed for {}: {}", self.label, e);
                Vec::new()
            }
        };
        if !self.cloud.reset(frame, seeds) {
            log::warn!("No features to track for {}, it will be lost on next update", self.label);
        }

        let (x, y) = region.top_left();
        self.centroid_offset = Point2::new(x, y) - self.cloud.centroid();
        self.state = TrackState::Tracking;
        self.last_tracked_frame = frame_id;
        log::debug!("Relocalized {} at {:?}", self.label, region);
    }

    /// Follow the face into `frame`.
    ///
    /// Lost identities are left untouched until relocalized.
    pub fn update<T: PointTracker, R: RecognitionOracle>(
        &mut self,
        frame: &GrayFrame,
        frame_id: u64,
        tracker: &mut T,
        oracle: &mut R,
    ) {
        if self.state == TrackState::Lost {
            return;
        }

        let points = self.cloud.advance(frame, tracker);
        if points.len() < self.features_threshold {
            log::debug!(
                "Not enough features for {} ({}), going back to detection",
                self.label,
                points.len()
            );
            self.state = TrackState::Lost;
            return;
        }

        let origin = self.cloud.centroid() + self.centroid_offset;
        let (width, height) = frame.size();
        self.bbox = Rect::new(origin.x, origin.y, self.bbox.width, self.bbox.height)
            .clamp_to(width as f32, height as f32);
        self.last_tracked_frame = frame_id;

        if !self.trained {
            self.trained = oracle.submit_sample(frame.region(&self.bbox), &self.label);
            if self.trained {
                log::info!("Recognizer trained for {}", self.label);
            }
        }
    }

    /// Estimate the head translation from both eye centers.
    ///
    /// Keeps the previous pose and returns `None` on a degenerate observation.
    pub fn estimate_pose(
        &mut self,
        frame_size: (usize, usize),
        left_eye: Point2<f32>,
        right_eye: Point2<f32>,
        config: &PoseConfig,
    ) -> Option<Matrix4<f64>> {
        let pose = pose::estimate_head_pose(frame_size, left_eye, right_eye, config)?;
        self.pose = pose;
        Some(pose)
    }

    pub fn snapshot(&self) -> TrackedFace {
        TrackedFace {
            label: self.label.clone(),
            bbox: self.bbox,
            pose: self.pose,
            state: self.state,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    #[inline]
    pub fn state(&self) -> TrackState {
        self.state
    }

    #[inline]
    pub fn pose(&self) -> Matrix4<f64> {
        self.pose
    }

    #[inline]
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Mark the oracle as already holding enough samples of this face.
    pub fn mark_trained(&mut self) {
        self.trained = true;
    }

    pub fn cloud(&self) -> &FeatureCloud {
        &self.cloud
    }

    /// Frame index of the last relocalization or successful update.
    pub fn last_tracked_frame(&self) -> u64 {
        self.last_tracked_frame
    }
}
