//! Configuration management for the face tracker

use crate::integration::{FaceMaskConfig, RecognitionConfig};
use crate::tracker::{PoseConfig, TrackerConfig};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tracker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Identity tracking and reconciliation
    pub tracking: TrackerConfig,

    /// Camera model for head pose estimation
    pub pose: PoseConfig,

    /// Template recognizer parameters
    pub recognition: RecognitionConfig,

    /// Feature seeding mask layout
    pub face_mask: FaceMaskConfig,
}

impl Config {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let tracking = &self.tracking;
        if tracking.feature_budget == 0 {
            return Err(Error::ConfigError("Feature budget must be greater than 0".to_string()));
        }
        if tracking.features_threshold > tracking.feature_budget {
            return Err(Error::ConfigError(format!(
                "Features threshold ({}) cannot exceed the feature budget ({})",
                tracking.features_threshold, tracking.feature_budget
            )));
        }
        if tracking.frames_between_detection == 0 {
            return Err(Error::ConfigError(
                "Frames between detection must be greater than 0".to_string(),
            ));
        }
        if !(tracking.prune_multiplier > 0.0) {
            return Err(Error::ConfigError("Prune multiplier must be positive".to_string()));
        }

        if !(self.pose.focal_length > 0.0) {
            return Err(Error::ConfigError("Focal length must be positive".to_string()));
        }

        if self.recognition.max_training_images == 0 {
            return Err(Error::ConfigError(
                "Max training images must be greater than 0".to_string(),
            ));
        }
        if self.recognition.template_size == 0 {
            return Err(Error::ConfigError("Template size must be greater than 0".to_string()));
        }
        if !(self.recognition.match_threshold > 0.0) {
            return Err(Error::ConfigError("Match threshold must be positive".to_string()));
        }

        let mask = &self.face_mask;
        for (name, value) in [
            ("ellipse_cy", mask.ellipse_cy),
            ("ellipse_w", mask.ellipse_w),
            ("ellipse_h", mask.ellipse_h),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::ConfigError(format!(
                    "Face mask {} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Tracking Configuration

# Identity tracking
tracking:
  feature_budget: 10
  features_threshold: 5
  frames_between_detection: 50
  prune_multiplier: 3.0
  lost_ttl_frames: 300

# Head pose estimation
pose:
  focal_length: 500.0

# Template recognizer
recognition:
  max_training_images: 10
  template_size: 32
  match_threshold: 0.5

# Feature seeding mask, as fractions of the face box
face_mask:
  ellipse_cy: 0.40
  ellipse_w: 0.50
  ellipse_h: 0.80
"#;
