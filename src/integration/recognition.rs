//! Appearance-based recognition oracle used to re-associate lost identities.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Answer to "whose face is this?".
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Label the face was trained under
    pub label: String,
    /// Match confidence in `(0, 1]`
    pub confidence: f64,
}

/// Recognition capability shared by the coordinator and every identity.
///
/// Implement this trait to swap in any appearance model.
pub trait RecognitionOracle {
    /// Add a training sample for `label`.
    ///
    /// Returns `true` once enough samples exist for `label` and its model is
    /// trained.
    fn submit_sample(&mut self, face: ArrayView2<'_, u8>, label: &str) -> bool;

    /// Identify `face` among trained labels. `None` means no match or not
    /// enough trained data.
    fn identify(&self, face: ArrayView2<'_, u8>) -> Option<Recognition>;
}

/// Configuration for the [`TemplateRecognizer`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Samples collected per label before it counts as trained
    pub max_training_images: usize,
    /// Side length of the normalized template, in pixels
    pub template_size: usize,
    /// Mean squared difference (on normalized templates) accepted as a match
    pub match_threshold: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            max_training_images: 10,
            template_size: 32,
            match_threshold: 0.5,
        }
    }
}

#[derive(Debug, Default)]
struct LabelModel {
    samples: Vec<Array2<f32>>,
    mean: Option<Array2<f32>>,
}

/// Mean-template recognizer over contrast-normalized face crops.
#[derive(Debug)]
pub struct TemplateRecognizer {
    config: RecognitionConfig,
    models: BTreeMap<String, LabelModel>,
}

impl Default for TemplateRecognizer {
    fn default() -> Self {
        Self::new(RecognitionConfig::default())
    }
}

impl TemplateRecognizer {
    pub fn new(config: RecognitionConfig) -> Self {
        Self {
            config,
            models: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    /// Number of samples collected for `label`.
    pub fn sample_count(&self, label: &str) -> usize {
        self.models.get(label).map_or(0, |m| m.samples.len())
    }

    pub fn is_trained(&self, label: &str) -> bool {
        self.models.get(label).is_some_and(|m| m.mean.is_some())
    }

    /// Resample to a square template, zero mean and unit variance.
    fn normalize(&self, face: ArrayView2<'_, u8>) -> Option<Array2<f32>> {
        let (rows, cols) = face.dim();
        let size = self.config.template_size;
        if rows == 0 || cols == 0 || size == 0 {
            return None;
        }

        let mut template = Array2::from_shape_fn((size, size), |(r, c)| {
            f32::from(face[[r * rows / size, c * cols / size]])
        });
        let mean = template.mean()?;
        template.mapv_inplace(|v| v - mean);
        let std = template.mapv(|v| v * v).mean()?.sqrt();
        if std > 1e-6 {
            template.mapv_inplace(|v| v / std);
        }
        Some(template)
    }
}

impl RecognitionOracle for TemplateRecognizer {
    fn submit_sample(&mut self, face: ArrayView2<'_, u8>, label: &str) -> bool {
        let Some(template) = self.normalize(face) else {
            return self.is_trained(label);
        };
        let max_samples = self.config.max_training_images;

        let model = self.models.entry(label.to_string()).or_default();
        if model.mean.is_some() {
            return true;
        }
        model.samples.push(template);
        if model.samples.len() < max_samples {
            return false;
        }

        let size = self.config.template_size;
        let mut mean = Array2::<f32>::zeros((size, size));
        for sample in &model.samples {
            mean += sample;
        }
        mean /= model.samples.len() as f32;
        model.mean = Some(mean);
        log::info!("Model trained for {}, it can now be recognized", label);
        true
    }

    fn identify(&self, face: ArrayView2<'_, u8>) -> Option<Recognition> {
        let template = self.normalize(face)?;
        let threshold = self.config.match_threshold;

        let (label, distance) = self
            .models
            .iter()
            .filter_map(|(label, model)| {
                let mean = model.mean.as_ref()?;
                let distance = (&template - mean).mapv(|v| v * v).mean()?;
                Some((label, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        if distance >= threshold {
            return None;
        }
        Some(Recognition {
            label: label.clone(),
            confidence: f64::from(1.0 - distance / threshold),
        })
    }
}
