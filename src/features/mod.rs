//! Prosodic feature extraction
//!
//! This module contains the per-chunk estimators and the per-utterance
//! accumulator that turns a chunk sequence into a 5-dimensional feature vector:
//! - Energy (RMS level in dB)
//! - Pitch (dominant spectral peak in the voice band)
//! - Feature accumulation (noise floor, voice activity, pauses, pitch spread)

pub mod accumulator;
pub mod energy;
pub mod history;
pub mod pitch;

use crate::error::ConfidenceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of features in a [`FeatureVector`]
pub const NUM_FEATURES: usize = 5;

/// Feature names in vector order
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "pause_freq",
    "avg_pause",
    "silence_ratio",
    "speech_rate",
    "pitch_std",
];

/// One of the five prosodic features
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    /// Pauses per minute of analysis window
    PauseFreq,
    /// Mean pause duration in seconds
    AvgPause,
    /// Fraction of classified chunks that were silent (0.0-1.0)
    SilenceRatio,
    /// Speech/silence transitions per minute, divided by 3
    SpeechRate,
    /// Standard deviation of voiced pitch estimates in Hz
    PitchStd,
}

impl FeatureName {
    /// All feature names in vector order
    pub const ALL: [FeatureName; NUM_FEATURES] = [
        FeatureName::PauseFreq,
        FeatureName::AvgPause,
        FeatureName::SilenceRatio,
        FeatureName::SpeechRate,
        FeatureName::PitchStd,
    ];

    /// Position of this feature in a [`FeatureVector`]
    pub fn index(self) -> usize {
        match self {
            FeatureName::PauseFreq => 0,
            FeatureName::AvgPause => 1,
            FeatureName::SilenceRatio => 2,
            FeatureName::SpeechRate => 3,
            FeatureName::PitchStd => 4,
        }
    }

    /// Canonical snake_case name
    pub fn as_str(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-order 5-dimensional feature vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector(pub [f32; NUM_FEATURES]);

impl FeatureVector {
    /// Build a vector from values in [`FEATURE_NAMES`] order
    pub fn new(values: [f32; NUM_FEATURES]) -> Self {
        Self(values)
    }

    /// Value of a single feature
    pub fn get(&self, name: FeatureName) -> f32 {
        self.0[name.index()]
    }

    /// Values in vector order
    pub fn as_array(&self) -> &[f32; NUM_FEATURES] {
        &self.0
    }

    /// (name, value) pairs in vector order
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f32)> + '_ {
        FeatureName::ALL.iter().map(move |&name| (name, self.get(name)))
    }

    /// Named map of the values
    pub fn to_map(&self) -> BTreeMap<FeatureName, f32> {
        self.iter().collect()
    }

    /// True if every value is finite
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

/// Declared `[min, max]` range per feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureBounds {
    ranges: [(f32, f32); NUM_FEATURES],
}

impl Default for FeatureBounds {
    fn default() -> Self {
        Self {
            ranges: [
                (0.0, 30.0),  // pause_freq (pauses/min)
                (0.0, 3.0),   // avg_pause (s)
                (0.0, 1.0),   // silence_ratio
                (0.0, 20.0),  // speech_rate
                (0.0, 100.0), // pitch_std (Hz)
            ],
        }
    }
}

impl FeatureBounds {
    /// Build bounds from ranges in vector order
    pub fn new(ranges: [(f32, f32); NUM_FEATURES]) -> Result<Self, ConfidenceError> {
        let bounds = Self { ranges };
        bounds.validate()?;
        Ok(bounds)
    }

    /// `(min, max)` for a feature
    pub fn range(&self, name: FeatureName) -> (f32, f32) {
        self.ranges[name.index()]
    }

    /// Check every range is finite with `min < max`
    pub fn validate(&self) -> Result<(), ConfidenceError> {
        for name in FeatureName::ALL {
            let (min, max) = self.range(name);
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(ConfidenceError::InvalidConfig(format!(
                    "Invalid bounds for {}: [{}, {}]",
                    name, min, max
                )));
            }
        }
        Ok(())
    }

    /// Clip each value into its declared range (inclusive)
    pub fn clip(&self, raw: &FeatureVector) -> FeatureVector {
        let mut out = [0.0f32; NUM_FEATURES];
        for name in FeatureName::ALL {
            let (min, max) = self.range(name);
            out[name.index()] = raw.get(name).max(min).min(max);
        }
        FeatureVector(out)
    }
}

/// Raw and clipped feature vectors from one extraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Unclipped values
    pub raw: FeatureVector,
    /// Values clipped to [`FeatureBounds`]
    pub clipped: FeatureVector,
}
