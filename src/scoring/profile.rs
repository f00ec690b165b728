//! Scoring profiles
//!
//! A profile is a named set of five signed feature weights. Only the weight
//! magnitudes enter the heuristic score; the sign documents whether the
//! profile author considers the feature a penalty (negative) or a reward
//! (positive), but the direction of each feature is fixed by the scorer.
//!
//! Profiles load from JSON, keyed by profile name:
//!
//! ```
//! use cadence_dsp::scoring::profile::ProfileSet;
//!
//! let json = r#"{
//!     "steady": {
//!         "description": "Rewards even pacing",
//!         "weights": {
//!             "pause_freq": -1.0, "avg_pause": -1.0, "silence_ratio": -0.5,
//!             "speech_rate": 1.0, "pitch_std": -0.5
//!         }
//!     }
//! }"#;
//! let profiles = ProfileSet::from_json(json)?;
//! assert!(profiles.get("steady").is_ok());
//! # Ok::<(), cadence_dsp::ConfidenceError>(())
//! ```

use crate::error::ConfidenceError;
use crate::features::{FeatureName, NUM_FEATURES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the profile used when none is specified
pub const DEFAULT_PROFILE: &str = "balanced";

/// Signed weight per feature. Every key is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileWeights {
    /// Weight for pauses per minute
    pub pause_freq: f32,
    /// Weight for mean pause duration
    pub avg_pause: f32,
    /// Weight for silence ratio
    pub silence_ratio: f32,
    /// Weight for speech rate
    pub speech_rate: f32,
    /// Weight for pitch spread
    pub pitch_std: f32,
}

impl ProfileWeights {
    /// Weights in feature vector order
    pub fn as_array(&self) -> [f32; NUM_FEATURES] {
        [
            self.pause_freq,
            self.avg_pause,
            self.silence_ratio,
            self.speech_rate,
            self.pitch_std,
        ]
    }

    /// Weight for one feature
    pub fn get(&self, name: FeatureName) -> f32 {
        self.as_array()[name.index()]
    }

    fn validate(&self, profile: &str) -> Result<(), ConfidenceError> {
        for name in FeatureName::ALL {
            let w = self.get(name);
            if !w.is_finite() {
                return Err(ConfidenceError::InvalidConfig(format!(
                    "Profile '{}': weight for {} is not finite ({})",
                    profile, name, w
                )));
            }
        }
        Ok(())
    }
}

/// A named weight set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringProfile {
    /// Profile name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Feature weights
    pub weights: ProfileWeights,
}

impl ScoringProfile {
    /// Build a profile, rejecting non-finite weights
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        weights: ProfileWeights,
    ) -> Result<Self, ConfidenceError> {
        let name = name.into();
        weights.validate(&name)?;
        Ok(Self {
            name,
            description: description.into(),
            weights,
        })
    }
}

/// On-disk form of a profile; the name is the map key
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileEntry {
    #[serde(default)]
    description: String,
    weights: ProfileWeights,
}

/// Collection of profiles addressable by name
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    profiles: BTreeMap<String, ScoringProfile>,
}

impl ProfileSet {
    /// Built-in profiles: `balanced`, `fluency`, `composure`
    pub fn builtin() -> Self {
        let entries = [
            (
                "balanced",
                "Equal emphasis on pausing, pace and vocal steadiness",
                ProfileWeights {
                    pause_freq: -1.0,
                    avg_pause: -1.0,
                    silence_ratio: -1.0,
                    speech_rate: 1.0,
                    pitch_std: -1.0,
                },
            ),
            (
                "fluency",
                "Rewards continuous delivery with few, short pauses",
                ProfileWeights {
                    pause_freq: -2.0,
                    avg_pause: -1.5,
                    silence_ratio: -1.0,
                    speech_rate: 1.5,
                    pitch_std: -0.25,
                },
            ),
            (
                "composure",
                "Rewards a steady, controlled voice over speed",
                ProfileWeights {
                    pause_freq: -0.5,
                    avg_pause: -1.0,
                    silence_ratio: -0.5,
                    speech_rate: 0.5,
                    pitch_std: -2.0,
                },
            ),
        ];

        let profiles = entries
            .into_iter()
            .map(|(name, description, weights)| {
                (
                    name.to_string(),
                    ScoringProfile {
                        name: name.to_string(),
                        description: description.to_string(),
                        weights,
                    },
                )
            })
            .collect();
        Self { profiles }
    }

    /// Parse profiles from a JSON object keyed by profile name
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed JSON, a missing or unknown weight
    /// key, a non-finite weight, or an empty profile set.
    pub fn from_json(json: &str) -> Result<Self, ConfidenceError> {
        let entries: BTreeMap<String, ProfileEntry> = serde_json::from_str(json)
            .map_err(|e| ConfidenceError::InvalidConfig(format!("Scoring profiles: {}", e)))?;

        if entries.is_empty() {
            return Err(ConfidenceError::InvalidConfig(
                "Scoring profiles: no profiles defined".to_string(),
            ));
        }

        let mut profiles = BTreeMap::new();
        for (name, entry) in entries {
            let profile = ScoringProfile::new(name.clone(), entry.description, entry.weights)?;
            profiles.insert(name, profile);
        }

        log::debug!("Loaded {} scoring profiles", profiles.len());
        Ok(Self { profiles })
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Result<&ScoringProfile, ConfidenceError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfidenceError::UnknownProfile(name.to_string()))
    }

    /// Add or replace a profile
    pub fn insert(&mut self, profile: ScoringProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Profile names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(|k| k.as_str())
    }

    /// Name → description listing
    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.profiles
            .iter()
            .map(|(name, p)| (name.clone(), p.description.clone()))
            .collect()
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True if there are no profiles
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::builtin()
    }
}
