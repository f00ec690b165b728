//! ONNX model loading and inference

use crate::error::ConfidenceError;
use crate::features::{FeatureVector, NUM_FEATURES};
use crate::scoring::model::RegressionModel;
use ort::session::Session;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// ONNX regression model: input `[1, 5]` float tensor, first output is the rating
///
/// Inference needs mutable access to the session. The session sits in a
/// `RefCell`, so the model is usable from one thread at a time only.
pub struct OnnxModel {
    session: RefCell<Session>,
    path: PathBuf,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel").field("path", &self.path).finish()
    }
}

impl OnnxModel {
    /// Load ONNX model from file
    pub fn load(path: &Path) -> Result<Self, ConfidenceError> {
        log::debug!("Loading ONNX model from: {}", path.display());
        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.with_inter_threads(1))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| {
                ConfidenceError::ModelError(format!("Loading {}: {}", path.display(), e))
            })?;

        Ok(Self {
            session: RefCell::new(session),
            path: path.to_path_buf(),
        })
    }

    /// Path the model was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegressionModel for OnnxModel {
    fn predict(&self, features: &FeatureVector) -> Result<f32, ConfidenceError> {
        let mut session = self
            .session
            .try_borrow_mut()
            .map_err(|_| ConfidenceError::ModelError("Session already in use".to_string()))?;

        if !features.is_finite() {
            return Err(ConfidenceError::InvalidInput(format!(
                "Non-finite features: {:?}",
                features.as_array()
            )));
        }

        let input = ort::value::Tensor::from_array(([1usize, NUM_FEATURES], features.as_array().to_vec()))
            .map_err(|e| ConfidenceError::ModelError(format!("input tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| ConfidenceError::ModelError(format!("inference: {}", e)))?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ConfidenceError::ModelError(format!("extract output: {}", e)))?;
        let prediction = data
            .first()
            .copied()
            .ok_or_else(|| ConfidenceError::ModelError("empty model output".to_string()))?;

        Ok(prediction)
    }
}
