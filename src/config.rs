//! Configuration parameters for feature extraction and scoring

use crate::error::ConfidenceError;
use crate::features::FeatureBounds;

/// Statistic used to derive the noise floor from the calibration readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatistic {
    /// Quietest calibration chunk (most conservative)
    Minimum,
    /// Median calibration chunk (robust to a few loud chunks)
    Median,
}

/// Thresholds for the feature accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorConfig {
    /// Chunks observed before the noise floor is calibrated (default: 10)
    pub calibration_chunks: usize,

    /// Noise floor statistic (default: Median)
    pub calibration_statistic: CalibrationStatistic,

    /// Also classify the chunk that completes calibration (default: false)
    /// When false that chunk only contributes to the noise floor
    pub classify_calibration_chunk: bool,

    /// A chunk is speech if its energy exceeds the noise floor by more than this (default: 10.0 dB)
    pub speech_margin_db: f32,

    /// Pitch is only estimated above noise floor + this margin (default: 15.0 dB)
    /// Must be larger than `speech_margin_db`
    pub pitch_margin_db: f32,

    /// Shortest silence counted as a pause, in seconds (default: 0.4)
    pub pause_min_duration: f64,

    /// Classified chunks required before features are extracted (default: 8)
    pub min_voiced_chunks: usize,

    /// Pitch samples wanted for a meaningful `pitch_std` (default: 15)
    /// Soft requirement: fewer samples only produce a warning
    pub min_pitch_samples: usize,

    /// Capacity of the pitch history (default: 30)
    pub pitch_history_capacity: usize,

    /// Capacity of the pause history (default: 20)
    pub pause_history_capacity: usize,
}

impl AccumulatorConfig {
    /// Strict calibration policy (the default)
    pub fn strict() -> Self {
        Self {
            calibration_chunks: 10,
            calibration_statistic: CalibrationStatistic::Median,
            classify_calibration_chunk: false,
            speech_margin_db: 10.0,
            pitch_margin_db: 15.0,
            pause_min_duration: 0.4,
            min_voiced_chunks: 8,
            min_pitch_samples: 15,
            pitch_history_capacity: 30,
            pause_history_capacity: 20,
        }
    }

    /// Lenient calibration policy: quick calibration, low thresholds
    ///
    /// Useful for short answers recorded in a quiet room where the strict
    /// margins classify too little as speech. Unlike the strict policy, the
    /// chunk that completes calibration is classified as well.
    pub fn lenient() -> Self {
        Self {
            calibration_chunks: 5,
            calibration_statistic: CalibrationStatistic::Minimum,
            classify_calibration_chunk: true,
            speech_margin_db: 2.0,
            pitch_margin_db: 5.0,
            pause_min_duration: 0.1,
            min_voiced_chunks: 3,
            min_pitch_samples: 2,
            pitch_history_capacity: 30,
            pause_history_capacity: 20,
        }
    }
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self::strict()
    }
}

/// Engine configuration parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Sample rate of incoming utterances in Hz (default: 16000)
    pub sample_rate: u32,

    /// Chunk duration in seconds (default: 0.5)
    pub chunk_duration: f32,

    /// Analysis window in seconds (default: 30.0)
    /// Denominator for per-minute rates; also sizes the voiced history
    pub analysis_window: f32,

    /// Accumulator thresholds (default: strict)
    pub accumulator: AccumulatorConfig,

    /// Feature bounds used for clipping and normalization
    pub bounds: FeatureBounds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            chunk_duration: 0.5,
            analysis_window: 30.0,
            accumulator: AccumulatorConfig::default(),
            bounds: FeatureBounds::default(),
        }
    }
}

impl EngineConfig {
    /// Samples per chunk
    pub fn chunk_size(&self) -> usize {
        (self.sample_rate as f32 * self.chunk_duration).round() as usize
    }

    /// Capacity of the voiced history: chunks in one analysis window
    pub fn voiced_history_capacity(&self) -> usize {
        ((self.analysis_window / self.chunk_duration).floor() as usize).max(1)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfidenceError> {
        if self.sample_rate == 0 {
            return Err(ConfidenceError::InvalidConfig(
                "Sample rate must be > 0".to_string(),
            ));
        }
        if !(self.chunk_duration.is_finite() && self.chunk_duration > 0.0) {
            return Err(ConfidenceError::InvalidConfig(format!(
                "Chunk duration must be > 0, got {}",
                self.chunk_duration
            )));
        }
        if self.chunk_size() == 0 {
            return Err(ConfidenceError::InvalidConfig(format!(
                "Chunk duration {} s is shorter than one sample at {} Hz",
                self.chunk_duration, self.sample_rate
            )));
        }
        if !(self.analysis_window.is_finite() && self.analysis_window >= self.chunk_duration) {
            return Err(ConfidenceError::InvalidConfig(format!(
                "Analysis window must be >= chunk duration, got {}",
                self.analysis_window
            )));
        }

        let acc = &self.accumulator;
        if acc.calibration_chunks == 0 {
            return Err(ConfidenceError::InvalidConfig(
                "Calibration needs at least one chunk".to_string(),
            ));
        }
        if acc.pitch_margin_db <= acc.speech_margin_db {
            return Err(ConfidenceError::InvalidConfig(format!(
                "Pitch margin ({} dB) must exceed speech margin ({} dB)",
                acc.pitch_margin_db, acc.speech_margin_db
            )));
        }
        if !(acc.pause_min_duration.is_finite() && acc.pause_min_duration >= 0.0) {
            return Err(ConfidenceError::InvalidConfig(format!(
                "Invalid minimum pause duration: {}",
                acc.pause_min_duration
            )));
        }
        if acc.min_voiced_chunks == 0 {
            return Err(ConfidenceError::InvalidConfig(
                "Readiness needs at least one classified chunk".to_string(),
            ));
        }
        if acc.pitch_history_capacity == 0 || acc.pause_history_capacity == 0 {
            return Err(ConfidenceError::InvalidConfig(
                "History capacities must be > 0".to_string(),
            ));
        }

        self.bounds.validate()
    }
}
