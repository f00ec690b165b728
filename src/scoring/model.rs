//! Pretrained regression model scorer
//!
//! The model predicts a confidence on a 1-5 rating scale from the clipped
//! feature vector. The prediction is clipped to [1, 5] and rescaled to
//! [0, 100]. An unavailable model, a failed inference, or a non-finite
//! prediction all mean "no opinion" (`None`), never a numeric default.
//!
//! The model is read-only after loading and can be reused across utterances.
//! Implementations are not required to be `Sync`; callers sharing a scorer
//! across threads must synchronize access themselves.

use super::ConfidenceScorer;
use crate::error::ConfidenceError;
use crate::features::{FeatureVector, NUM_FEATURES};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lowest rating the model can express
pub const MIN_RATING: f32 = 1.0;

/// Highest rating the model can express
pub const MAX_RATING: f32 = 5.0;

/// A regression model over the 5-dimensional feature vector
pub trait RegressionModel {
    /// Predict a rating for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f32, ConfidenceError>;
}

/// Linear regression: `intercept + Σ coefficient_i * feature_i`
///
/// Serialized as JSON:
/// `{"intercept": 3.1, "coefficients": [-0.02, -0.4, -1.1, 0.05, -0.003]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearModel {
    /// Constant term
    pub intercept: f32,
    /// One coefficient per feature, in feature vector order
    pub coefficients: [f32; NUM_FEATURES],
}

impl LinearModel {
    /// Parse a model from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfidenceError> {
        let model: LinearModel = serde_json::from_str(json)
            .map_err(|e| ConfidenceError::ModelError(format!("Linear model: {}", e)))?;
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ConfidenceError::ModelError(
                "Linear model: non-finite parameter".to_string(),
            ));
        }
        Ok(model)
    }

    /// Load a model from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfidenceError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConfidenceError::ModelError(format!("Reading {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f32, ConfidenceError> {
        if !features.is_finite() {
            return Err(ConfidenceError::InvalidInput(format!(
                "Non-finite features: {:?}",
                features.as_array()
            )));
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.as_array().iter())
                .map(|(c, x)| c * x)
                .sum::<f32>())
    }
}

/// Map a 1-5 rating onto 0-100
pub fn rating_to_confidence(prediction: f32) -> f32 {
    let clipped = prediction.clamp(MIN_RATING, MAX_RATING);
    (clipped - MIN_RATING) / (MAX_RATING - MIN_RATING) * 100.0
}

/// Scorer wrapping an optional regression model
pub struct ModelScorer {
    model: Option<Box<dyn RegressionModel>>,
}

impl std::fmt::Debug for ModelScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelScorer")
            .field("available", &self.is_available())
            .finish()
    }
}

impl ModelScorer {
    /// Scorer with no model; always returns `None`
    pub fn unavailable() -> Self {
        Self { model: None }
    }

    /// Scorer backed by a loaded model
    pub fn with_model(model: Box<dyn RegressionModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Load a model by file extension: `.json` (linear) or `.onnx` (requires the `ml` feature)
    ///
    /// Load failures are logged and produce an unavailable scorer.
    pub fn from_path(path: &Path) -> Self {
        match load_model(path) {
            Ok(model) => {
                log::debug!("Loaded confidence model from {}", path.display());
                Self::with_model(model)
            }
            Err(e) => {
                log::warn!("Confidence model unavailable: {}", e);
                Self::unavailable()
            }
        }
    }

    /// True if a model is loaded
    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }
}

fn load_model(path: &Path) -> Result<Box<dyn RegressionModel>, ConfidenceError> {
    if !path.exists() {
        return Err(ConfidenceError::ModelError(format!(
            "Model file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(Box::new(LinearModel::load(path)?)),
        #[cfg(feature = "ml")]
        Some("onnx") => Ok(Box::new(crate::ml::onnx_model::OnnxModel::load(path)?)),
        #[cfg(not(feature = "ml"))]
        Some("onnx") => Err(ConfidenceError::ModelError(
            "ONNX models require the `ml` feature".to_string(),
        )),
        _ => Err(ConfidenceError::ModelError(format!(
            "Unsupported model format: {}",
            path.display()
        ))),
    }
}

impl ConfidenceScorer for ModelScorer {
    fn name(&self) -> &str {
        "model"
    }

    fn score(&self, features: &FeatureVector) -> Option<f32> {
        let model = self.model.as_ref()?;
        match model.predict(features) {
            Ok(prediction) if prediction.is_finite() => {
                let confidence = rating_to_confidence(prediction);
                log::debug!("Model prediction {:.3} -> {:.1}", prediction, confidence);
                Some(confidence)
            }
            Ok(prediction) => {
                log::warn!("Model produced non-finite prediction: {}", prediction);
                None
            }
            Err(e) => {
                log::warn!("Model inference failed: {}", e);
                None
            }
        }
    }
}
