//! Per-frame coordination: periodic detection, reconciliation and tracking.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::frame::GrayFrame;
use crate::integration::{FaceDetector, PointTracker, RecognitionOracle};
use crate::tracker::identity::{Identity, TrackedFace};
use crate::tracker::matching::{self, FaceDetection};
use crate::tracker::pose::PoseConfig;
use crate::tracker::track_state::TrackState;

/// Configuration for the TrackingCoordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Features seeded per identity
    pub feature_budget: usize,
    /// Below this many surviving features an identity is lost
    pub features_threshold: usize,
    /// Detection runs on every n-th frame, starting with the first
    pub frames_between_detection: u64,
    /// Features farther than `prune_multiplier * spread` (squared) are dropped
    pub prune_multiplier: f64,
    /// Lost identities are dropped after this many frames without tracking.
    /// `None` keeps them forever.
    pub lost_ttl_frames: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            feature_budget: 10,
            features_threshold: 5,
            frames_between_detection: 50,
            prune_multiplier: 3.0,
            lost_ttl_frames: Some(300),
        }
    }
}

/// Keeps face identities alive across frames.
///
/// Owns the detector, the point tracker and the recognition oracle, and
/// lends them to identities for the duration of each call.
pub struct TrackingCoordinator<D, T, R> {
    detector: D,
    tracker: T,
    oracle: R,
    identities: Vec<Identity>,
    frame_count: u64,
    next_human_id: u64,
    config: TrackerConfig,
    pose_config: PoseConfig,
}

impl<D, T, R> TrackingCoordinator<D, T, R>
where
    D: FaceDetector,
    T: PointTracker,
    R: RecognitionOracle,
{
    pub fn new(detector: D, tracker: T, oracle: R, config: TrackerConfig) -> Self {
        Self {
            detector,
            tracker,
            oracle,
            identities: Vec::new(),
            frame_count: 0,
            next_human_id: 1,
            config,
            pose_config: PoseConfig::default(),
        }
    }

    /// Create a coordinator with default tracker configuration.
    pub fn with_default_config(detector: D, tracker: T, oracle: R) -> Self {
        Self::new(detector, tracker, oracle, TrackerConfig::default())
    }

    /// Create a coordinator from the tracking and pose sections of `config`.
    pub fn from_config(detector: D, tracker: T, oracle: R, config: &Config) -> Self {
        Self::new(detector, tracker, oracle, config.tracking.clone())
            .with_pose_config(config.pose.clone())
    }

    /// Use `pose_config` for head pose estimation.
    pub fn with_pose_config(mut self, pose_config: PoseConfig) -> Self {
        self.pose_config = pose_config;
        self
    }

    /// Process one frame and return a snapshot of every identity, in
    /// creation order.
    pub fn track(&mut self, frame: &GrayFrame) -> Vec<TrackedFace> {
        let frame_id = self.frame_count;
        self.frame_count += 1;

        // Force detection every few frames to pick up new faces.
        if frame_id % self.config.frames_between_detection.max(1) == 0 {
            self.reconcile(frame, frame_id);
        }

        for identity in self.identities.iter_mut() {
            identity.update(frame, frame_id, &mut self.tracker, &mut self.oracle);
        }

        self.evict_lost(frame_id);

        log::debug!(
            "Frame {}: {} identities, {} tracking",
            frame_id,
            self.identities.len(),
            self.identities
                .iter()
                .filter(|i| i.state() == TrackState::Tracking)
                .count()
        );

        self.identities.iter().map(Identity::snapshot).collect()
    }

    /// Match every detected region to an identity, or create one.
    fn reconcile(&mut self, frame: &GrayFrame, frame_id: u64) {
        let detections = match self.detector.detect(frame) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!("Face detection failed on frame {}: {}", frame_id, e);
                return;
            }
        };

        for detection in detections {
            let index = self.associate(frame, frame_id, &detection);
            if let Some((left, right)) = detection.eyes() {
                self.identities[index].estimate_pose(frame.size(), left, right, &self.pose_config);
            }
        }
    }

    /// Relocalize or create the identity for one detection and return its index.
    fn associate(&mut self, frame: &GrayFrame, frame_id: u64, detection: &FaceDetection) -> usize {
        let region = detection.region;

        if let Some(index) = matching::first_overlapping(&self.identities, &region) {
            self.identities[index].relocalize(frame, region, &mut self.detector, frame_id);
            return index;
        }

        let recognized = self
            .oracle
            .identify(frame.region(&region))
            .filter(|guess| !guess.label.is_empty() && guess.confidence > 0.0);
        if let Some(guess) = recognized {
            log::info!(
                "I think this is {} (confidence: {:.2})",
                guess.label,
                guess.confidence
            );
            if let Some(index) = matching::find_by_label(&self.identities, &guess.label) {
                self.identities[index].relocalize(frame, region, &mut self.detector, frame_id);
                return index;
            }

            log::info!("No live identity for {}, resurrecting it", guess.label);
            let mut identity = Identity::new(
                guess.label,
                &self.config,
                frame,
                region,
                &mut self.detector,
                frame_id,
            );
            identity.mark_trained();
            self.identities.push(identity);
            return self.identities.len() - 1;
        }

        let label = format!("human{}", self.next_human_id);
        self.next_human_id += 1;
        log::info!("I do not recognize this face, creating {}", label);
        self.identities.push(Identity::new(
            label,
            &self.config,
            frame,
            region,
            &mut self.detector,
            frame_id,
        ));
        self.identities.len() - 1
    }

    fn evict_lost(&mut self, frame_id: u64) {
        let Some(ttl) = self.config.lost_ttl_frames else {
            return;
        };
        self.identities.retain(|identity| {
            let expired = identity.state() == TrackState::Lost
                && frame_id.saturating_sub(identity.last_tracked_frame()) > ttl;
            if expired {
                log::info!("Forgetting {} after {} frames lost", identity.label(), ttl);
            }
            !expired
        });
    }

    /// Live identities, in creation order.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying point tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Get a mutable reference to the underlying point tracker.
    pub fn tracker_mut(&mut self) -> &mut T {
        &mut self.tracker
    }

    /// Get a reference to the recognition oracle.
    pub fn oracle(&self) -> &R {
        &self.oracle
    }

    /// Get a mutable reference to the recognition oracle.
    pub fn oracle_mut(&mut self) -> &mut R {
        &mut self.oracle
    }
}
