//! # Cadence DSP
//!
//! Prosodic confidence scoring for recorded spoken answers. An utterance is
//! reduced to five features describing how it was delivered, which are then
//! combined into a 0-100 confidence score.
//!
//! ## Features
//!
//! - **Voice activity**: energy-based speech/silence classification against a
//!   noise floor calibrated from the opening chunks
//! - **Pausing**: pause frequency and mean pause duration
//! - **Pace**: silence ratio and a speech-rate proxy from speech/silence transitions
//! - **Pitch**: spread of FFT pitch estimates over strongly voiced chunks
//! - **Scoring**: profile-weighted heuristic plus an optional pretrained
//!   regression model (linear JSON, or ONNX with the `ml` feature)
//!
//! ## Quick Start
//!
//! ```no_run
//! use cadence_dsp::{score_utterance, EngineConfig};
//!
//! // Mono f32 samples at 16 kHz
//! let samples: Vec<f32> = vec![]; // Your recording
//!
//! let result = score_utterance(&samples, EngineConfig::default())?;
//! if result.speech_detected {
//!     println!("Confidence: {:.1} ({})", result.heuristic_confidence, result.rating());
//! }
//! # Ok::<(), cadence_dsp::ConfidenceError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Utterance → Chunks → Feature Accumulator → Clipped Features → Heuristic / Model Scorers → ScoreResult
//! ```
//!
//! For repeated scoring, profile switching or a model, build a
//! [`ConfidenceEngine`] once and call [`ConfidenceEngine::score`] per answer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod io;
pub mod scoring;

#[cfg(feature = "ml")]
pub mod ml;

// Re-export main types
pub use analysis::result::{Rating, ScoreResult};
pub use analysis::summary::SessionSummary;
pub use config::{AccumulatorConfig, CalibrationStatistic, EngineConfig};
pub use engine::ConfidenceEngine;
pub use error::ConfidenceError;
pub use features::{FeatureBounds, FeatureName, FeatureVector, FEATURE_NAMES};
pub use scoring::model::{LinearModel, ModelScorer, RegressionModel};
pub use scoring::profile::{ProfileSet, ScoringProfile};

/// Score a single utterance
///
/// Uses the built-in `balanced` profile, no regression model, and the wall
/// clock for pause timing.
///
/// # Arguments
///
/// * `samples` - Mono audio samples at `config.sample_rate`
/// * `config` - Engine configuration
///
/// # Errors
///
/// Returns `ConfidenceError` only for an invalid configuration. Audio
/// without usable speech yields `speech_detected = false`.
///
/// # Example
///
/// ```
/// use cadence_dsp::{score_utterance, EngineConfig};
///
/// let samples = vec![0.0f32; 16000 * 10]; // 10 seconds of silence
/// let result = score_utterance(&samples, EngineConfig::default())?;
/// assert!(!result.speech_detected);
/// # Ok::<(), cadence_dsp::ConfidenceError>(())
/// ```
pub fn score_utterance(samples: &[f32], config: EngineConfig) -> Result<ScoreResult, ConfidenceError> {
    let mut engine = ConfidenceEngine::new(config)?;
    Ok(engine.score(samples))
}
