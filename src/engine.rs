//! Scoring orchestrator
//!
//! Drives one utterance through the pipeline:
//!
//! ```text
//! utterance → chunks → FeatureAccumulator → clipped features → {heuristic, model} → ScoreResult
//! ```
//!
//! Scoring never fails: empty input, insufficient speech, and numerical
//! problems all produce a "no speech" result, and model failures only clear
//! the model confidence.
//!
//! # Example
//!
//! ```
//! use cadence_dsp::{ConfidenceEngine, EngineConfig};
//!
//! let mut engine = ConfidenceEngine::new(EngineConfig::default())?;
//! let result = engine.score(&[0.0f32; 100]);
//! assert!(!result.speech_detected);
//! assert_eq!(result.heuristic_confidence, 0.0);
//! # Ok::<(), cadence_dsp::ConfidenceError>(())
//! ```

use crate::analysis::result::ScoreResult;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::ConfidenceError;
use crate::features::accumulator::FeatureAccumulator;
use crate::io::chunk_utterance;
use crate::scoring::heuristic::HeuristicScorer;
use crate::scoring::model::ModelScorer;
use crate::scoring::profile::{ProfileSet, DEFAULT_PROFILE};
use crate::scoring::ConfidenceScorer;
use std::collections::BTreeMap;

/// Heuristic confidence used if the heuristic scorer returns no opinion
pub const NEUTRAL_CONFIDENCE: f32 = 50.0;

/// Per-utterance confidence scoring engine
///
/// Single-threaded: one utterance is processed start to finish per call.
#[derive(Debug)]
pub struct ConfidenceEngine {
    config: EngineConfig,
    accumulator: FeatureAccumulator,
    heuristic: HeuristicScorer,
    model: ModelScorer,
    profiles: ProfileSet,
}

impl ConfidenceEngine {
    /// Engine with built-in profiles, the `balanced` profile, no model, and a wall clock
    pub fn new(config: EngineConfig) -> Result<Self, ConfidenceError> {
        Self::builder(config).build()
    }

    /// Start configuring an engine
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            profiles: ProfileSet::builtin(),
            profile_name: DEFAULT_PROFILE.to_string(),
            model: ModelScorer::unavailable(),
            clock: Box::new(SystemClock::new()),
        }
    }

    /// Score a complete utterance
    pub fn score(&mut self, audio: &[f32]) -> ScoreResult {
        let duration = audio.len() as f32 / self.config.sample_rate as f32;
        let profile = self.heuristic.profile().name.clone();

        self.accumulator.reset();

        if audio.is_empty() {
            log::debug!("No audio provided");
            return ScoreResult::no_speech(duration, profile);
        }

        log::debug!(
            "Scoring {} samples ({:.1} s) with profile '{}'",
            audio.len(),
            duration,
            profile
        );

        let chunks = chunk_utterance(audio, self.config.sample_rate, self.config.chunk_size());
        let num_chunks = chunks.len();
        for chunk in chunks {
            self.accumulator.process_chunk(&chunk);
        }
        log::debug!("Processed {} chunks", num_chunks);

        if !self.accumulator.is_ready() {
            log::debug!("Insufficient speech for feature extraction");
            return ScoreResult::no_speech(duration, profile);
        }

        let features = match self.accumulator.extract() {
            Ok(features) => features,
            Err(e) => {
                log::warn!("Feature extraction failed: {}", e);
                return ScoreResult::no_speech(duration, profile);
            }
        };

        let heuristic = self.heuristic.score(&features.clipped).unwrap_or_else(|| {
            log::warn!(
                "{} scorer gave no opinion, using neutral {}",
                self.heuristic.name(),
                NEUTRAL_CONFIDENCE
            );
            NEUTRAL_CONFIDENCE
        });
        let model = self.model.score(&features.clipped);

        log::debug!(
            "Scores: heuristic={:.1}, model={:?}",
            heuristic,
            model
        );

        ScoreResult::scored(heuristic, model, &features.raw, duration, profile)
    }

    /// Switch the heuristic scorer to another profile
    ///
    /// Only the weight set changes. An unknown name leaves the current profile active.
    pub fn switch_profile(&mut self, name: &str) -> Result<(), ConfidenceError> {
        let profile = self.profiles.get(name)?.clone();
        log::debug!("Switching profile to '{}'", name);
        self.heuristic.set_profile(profile);
        Ok(())
    }

    /// Name of the active profile
    pub fn profile_name(&self) -> &str {
        &self.heuristic.profile().name
    }

    /// Available profiles: name → description
    pub fn available_profiles(&self) -> BTreeMap<String, String> {
        self.profiles.descriptions()
    }

    /// True if a regression model is loaded
    pub fn model_available(&self) -> bool {
        self.model.is_available()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Builder for [`ConfidenceEngine`]
pub struct EngineBuilder {
    config: EngineConfig,
    profiles: ProfileSet,
    profile_name: String,
    model: ModelScorer,
    clock: Box<dyn Clock>,
}

impl EngineBuilder {
    /// Replace the profile set
    pub fn profiles(mut self, profiles: ProfileSet) -> Self {
        self.profiles = profiles;
        self
    }

    /// Initial profile (default: `balanced`)
    pub fn profile(mut self, name: impl Into<String>) -> Self {
        self.profile_name = name.into();
        self
    }

    /// Model scorer (default: unavailable)
    pub fn model(mut self, model: ModelScorer) -> Self {
        self.model = model;
        self
    }

    /// Time source for pause timing (default: [`SystemClock`])
    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate the configuration and build the engine
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an invalid configuration, `UnknownProfile` if the
    /// initial profile is not in the profile set.
    pub fn build(self) -> Result<ConfidenceEngine, ConfidenceError> {
        self.config.validate()?;
        let profile = self.profiles.get(&self.profile_name)?.clone();

        log::debug!(
            "Initializing engine: profile='{}', model available={}",
            profile.name,
            self.model.is_available()
        );

        Ok(ConfidenceEngine {
            accumulator: FeatureAccumulator::new(&self.config, self.clock),
            heuristic: HeuristicScorer::new(profile, self.config.bounds),
            model: self.model,
            profiles: self.profiles,
            config: self.config,
        })
    }
}
