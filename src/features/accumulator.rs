//! Per-utterance feature accumulator
//!
//! Consumes an utterance chunk by chunk, in order, and maintains bounded
//! rolling histories from which the five prosodic features are extracted.
//!
//! # State machine
//!
//! - **Calibrating**: every chunk's energy is recorded. Once
//!   `calibration_chunks` readings exist, the noise floor is set from them
//!   (minimum or median) and the accumulator becomes **Active**. The chunk
//!   that completes calibration is only classified when
//!   `classify_calibration_chunk` is set (lenient policy).
//! - **Active**: each chunk is classified speaking iff
//!   `energy > noise_floor + speech_margin_db`. Speaking→silent transitions
//!   open a pending pause; silent→speaking transitions close it and record
//!   its duration if it reaches `pause_min_duration`. Strongly voiced chunks
//!   (`energy > noise_floor + pitch_margin_db`) contribute a pitch estimate.
//!
//! The noise floor never changes after calibration until [`FeatureAccumulator::reset`].
//!
//! # Example
//!
//! ```
//! use cadence_dsp::clock::SteppedClock;
//! use cadence_dsp::config::EngineConfig;
//! use cadence_dsp::features::accumulator::FeatureAccumulator;
//! use cadence_dsp::io::chunk_utterance;
//!
//! let config = EngineConfig::default();
//! let mut acc = FeatureAccumulator::new(&config, Box::new(SteppedClock::new(0.0, 0.5)));
//!
//! let silence = vec![0.0f32; 16000 * 10];
//! for chunk in chunk_utterance(&silence, config.sample_rate, config.chunk_size()) {
//!     acc.process_chunk(&chunk);
//! }
//! assert!(acc.noise_floor().is_some());
//! assert!(!acc.is_ready()); // nothing voiced
//! ```

use super::energy::energy_db;
use super::history::RingBuffer;
use super::pitch::estimate_pitch;
use super::{FeatureBounds, FeatureSet, FeatureVector};
use crate::clock::Clock;
use crate::config::{AccumulatorConfig, CalibrationStatistic, EngineConfig};
use crate::error::ConfidenceError;
use crate::io::AudioChunk;

/// Speech-rate divisor: transitions per minute are scaled down by this factor
const SPEECH_RATE_DIVISOR: f32 = 3.0;

/// Accumulator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorPhase {
    /// Noise floor not yet set
    Calibrating,
    /// Noise floor set, chunks are classified
    Active,
}

/// Stateful feature extraction engine for a single utterance
pub struct FeatureAccumulator {
    config: AccumulatorConfig,
    bounds: FeatureBounds,
    analysis_window: f32,

    energy_history: RingBuffer<f32>,
    voiced_history: RingBuffer<bool>,
    pitch_history: RingBuffer<f32>,
    pause_history: RingBuffer<f64>,

    noise_floor: Option<f32>,
    is_speaking: bool,
    pending_pause_start: Option<f64>,
    chunk_count: usize,

    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for FeatureAccumulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureAccumulator")
            .field("noise_floor", &self.noise_floor)
            .field("chunk_count", &self.chunk_count)
            .field("voiced", &self.voiced_history.len())
            .field("pitches", &self.pitch_history.len())
            .field("pauses", &self.pause_history.len())
            .field("is_speaking", &self.is_speaking)
            .field("pending_pause_start", &self.pending_pause_start)
            .finish()
    }
}

impl FeatureAccumulator {
    /// Create an accumulator for the given configuration and time source
    pub fn new(config: &EngineConfig, clock: Box<dyn Clock>) -> Self {
        let acc = &config.accumulator;
        Self {
            config: acc.clone(),
            bounds: config.bounds,
            analysis_window: config.analysis_window,
            energy_history: RingBuffer::new(acc.calibration_chunks),
            voiced_history: RingBuffer::new(config.voiced_history_capacity()),
            pitch_history: RingBuffer::new(acc.pitch_history_capacity),
            pause_history: RingBuffer::new(acc.pause_history_capacity),
            noise_floor: None,
            is_speaking: false,
            pending_pause_start: None,
            chunk_count: 0,
            clock,
        }
    }

    /// Clear all per-utterance state
    pub fn reset(&mut self) {
        self.energy_history.clear();
        self.voiced_history.clear();
        self.pitch_history.clear();
        self.pause_history.clear();
        self.noise_floor = None;
        self.is_speaking = false;
        self.pending_pause_start = None;
        self.chunk_count = 0;
    }

    /// Consume one chunk. Chunks must arrive in utterance order.
    pub fn process_chunk(&mut self, chunk: &AudioChunk<'_>) {
        if chunk.is_empty() {
            return;
        }
        self.chunk_count += 1;

        let energy = energy_db(chunk.samples());

        let noise_floor = match self.noise_floor {
            Some(floor) => floor,
            None => {
                self.energy_history.push(energy);
                if self.energy_history.len() >= self.config.calibration_chunks {
                    let floor = self.calibrate();
                    log::debug!(
                        "Noise floor calibrated after {} chunks: {:.2} dB ({:?})",
                        self.chunk_count,
                        floor,
                        self.config.calibration_statistic
                    );
                    self.noise_floor = Some(floor);
                    if self.config.classify_calibration_chunk {
                        floor
                    } else {
                        return;
                    }
                } else {
                    return;
                }
            }
        };

        let speaking = energy > noise_floor + self.config.speech_margin_db;
        self.voiced_history.push(speaking);

        let now = self.clock.now();
        if self.is_speaking && !speaking {
            self.pending_pause_start = Some(now);
        } else if !self.is_speaking && speaking {
            if let Some(start) = self.pending_pause_start.take() {
                let duration = now - start;
                if duration >= self.config.pause_min_duration {
                    self.pause_history.push(duration);
                    log::debug!("Pause recorded: {:.3} s", duration);
                }
            }
        }
        self.is_speaking = speaking;

        if speaking && energy > noise_floor + self.config.pitch_margin_db {
            let pitch = estimate_pitch(chunk.samples(), chunk.sample_rate());
            if pitch > 0.0 {
                self.pitch_history.push(pitch);
            }
        }
    }

    fn calibrate(&self) -> f32 {
        let readings = self.energy_history.to_vec();
        match self.config.calibration_statistic {
            CalibrationStatistic::Minimum => readings.iter().copied().fold(f32::INFINITY, f32::min),
            CalibrationStatistic::Median => median(readings),
        }
    }

    /// Current phase
    pub fn phase(&self) -> AccumulatorPhase {
        if self.noise_floor.is_some() {
            AccumulatorPhase::Active
        } else {
            AccumulatorPhase::Calibrating
        }
    }

    /// Calibrated noise floor in dB, if set
    pub fn noise_floor(&self) -> Option<f32> {
        self.noise_floor
    }

    /// Chunks processed since the last reset
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Classified chunks in the voiced history
    pub fn voiced_len(&self) -> usize {
        self.voiced_history.len()
    }

    /// Chunks in the voiced history classified as speech
    pub fn voiced_count(&self) -> usize {
        self.voiced_history.iter().filter(|&v| v).count()
    }

    /// Recorded pauses
    pub fn pause_count(&self) -> usize {
        self.pause_history.len()
    }

    /// Recorded pitch estimates
    pub fn pitch_sample_count(&self) -> usize {
        self.pitch_history.len()
    }

    /// True if features can be extracted
    ///
    /// Requires a calibrated noise floor, at least `min_voiced_chunks`
    /// classified chunks, and at least one of them voiced. Too few pitch
    /// samples is logged but does not block extraction.
    pub fn is_ready(&self) -> bool {
        if self.noise_floor.is_none() {
            log::debug!("Not ready: noise floor not calibrated");
            return false;
        }
        if self.voiced_history.len() < self.config.min_voiced_chunks {
            log::debug!(
                "Not ready: {}/{} classified chunks",
                self.voiced_history.len(),
                self.config.min_voiced_chunks
            );
            return false;
        }
        if self.voiced_count() == 0 {
            log::debug!("Not ready: no voiced chunks");
            return false;
        }
        if self.pitch_history.len() < self.config.min_pitch_samples {
            log::warn!(
                "Only {} pitch samples (wanted {}), pitch_std may be unreliable",
                self.pitch_history.len(),
                self.config.min_pitch_samples
            );
        }
        true
    }

    /// Extract raw and clipped feature vectors
    ///
    /// Empty histories yield 0.0 for the features that depend on them.
    ///
    /// # Errors
    ///
    /// Returns `NumericalError` if any raw feature is non-finite.
    pub fn extract(&self) -> Result<FeatureSet, ConfidenceError> {
        let pauses = self.pause_history.to_vec();
        let voiced = self.voiced_history.to_vec();
        let pitches = self.pitch_history.to_vec();

        let pause_freq = if pauses.is_empty() {
            0.0
        } else {
            pauses.len() as f32 * 60.0 / self.analysis_window
        };

        let avg_pause = if pauses.is_empty() {
            0.0
        } else {
            (pauses.iter().sum::<f64>() / pauses.len() as f64) as f32
        };

        let silence_ratio = if voiced.is_empty() {
            0.0
        } else {
            let speaking = voiced.iter().filter(|&&v| v).count();
            1.0 - speaking as f32 / voiced.len() as f32
        };

        let speech_rate = if voiced.len() < 2 {
            0.0
        } else {
            let transitions = voiced.windows(2).filter(|w| w[0] != w[1]).count();
            transitions as f32 * 60.0 / self.analysis_window / SPEECH_RATE_DIVISOR
        };

        let pitch_std = if pitches.len() < 2 { 0.0 } else { std_dev(&pitches) };

        let raw = FeatureVector::new([pause_freq, avg_pause, silence_ratio, speech_rate, pitch_std]);
        if !raw.is_finite() {
            return Err(ConfidenceError::NumericalError(format!(
                "Non-finite feature vector: {:?}",
                raw.as_array()
            )));
        }

        let clipped = self.bounds.clip(&raw);
        log::debug!(
            "Extracted features: raw={:?} clipped={:?}",
            raw.as_array(),
            clipped.as_array()
        );

        Ok(FeatureSet { raw, clipped })
    }
}

fn median(mut values: Vec<f32>) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Population standard deviation
fn std_dev(values: &[f32]) -> f32 {
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|&v| (v - mean).powi(2)).sum::<f32>() / n;
    variance.sqrt()
}
