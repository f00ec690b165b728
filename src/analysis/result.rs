//! Score result types

use crate::features::{FeatureName, FeatureVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coarse rating band for a 0-100 confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    /// Below 55
    Fair,
    /// 55 and above
    Good,
    /// 70 and above
    VeryGood,
    /// 85 and above
    Excellent,
}

impl Rating {
    /// Band for a confidence score
    ///
    /// # Example
    ///
    /// ```
    /// use cadence_dsp::Rating;
    ///
    /// assert_eq!(Rating::from_score(91.0), Rating::Excellent);
    /// assert_eq!(Rating::from_score(70.0), Rating::VeryGood);
    /// assert_eq!(Rating::from_score(54.9), Rating::Fair);
    /// ```
    pub fn from_score(score: f32) -> Self {
        if score >= 85.0 {
            Rating::Excellent
        } else if score >= 70.0 {
            Rating::VeryGood
        } else if score >= 55.0 {
            Rating::Good
        } else {
            Rating::Fair
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "EXCELLENT",
            Rating::VeryGood => "VERY GOOD",
            Rating::Good => "GOOD",
            Rating::Fair => "FAIR",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of scoring one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Heuristic confidence (0-100); 0.0 when no speech was detected
    pub heuristic_confidence: f32,

    /// Model confidence (0-100), absent if no model or inference failed
    pub model_confidence: Option<f32>,

    /// Raw (unclipped) features by name, absent when no speech was detected
    pub features: Option<BTreeMap<FeatureName, f32>>,

    /// Whether the utterance contained enough speech to score
    pub speech_detected: bool,

    /// Utterance duration in seconds
    pub duration_seconds: f32,

    /// Scoring profile used for the heuristic confidence
    pub profile: String,
}

impl ScoreResult {
    /// Result for an utterance without usable speech
    pub fn no_speech(duration_seconds: f32, profile: impl Into<String>) -> Self {
        Self {
            heuristic_confidence: 0.0,
            model_confidence: None,
            features: None,
            speech_detected: false,
            duration_seconds,
            profile: profile.into(),
        }
    }

    /// Result for a scored utterance
    pub fn scored(
        heuristic_confidence: f32,
        model_confidence: Option<f32>,
        raw_features: &FeatureVector,
        duration_seconds: f32,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            heuristic_confidence,
            model_confidence,
            features: Some(raw_features.to_map()),
            speech_detected: true,
            duration_seconds,
            profile: profile.into(),
        }
    }

    /// Rating band of the heuristic confidence
    pub fn rating(&self) -> Rating {
        Rating::from_score(self.heuristic_confidence)
    }

    /// Raw value of one feature, if features were extracted
    pub fn feature(&self, name: FeatureName) -> Option<f32> {
        self.features.as_ref().and_then(|f| f.get(&name).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bands() {
        assert_eq!(Rating::from_score(100.0), Rating::Excellent);
        assert_eq!(Rating::from_score(85.0), Rating::Excellent);
        assert_eq!(Rating::from_score(84.99), Rating::VeryGood);
        assert_eq!(Rating::from_score(55.0), Rating::Good);
        assert_eq!(Rating::from_score(0.0), Rating::Fair);
        assert!(Rating::Excellent > Rating::Good);
        assert_eq!(Rating::VeryGood.to_string(), "VERY GOOD");
    }

    #[test]
    fn test_no_speech_result() {
        let r = ScoreResult::no_speech(1.25, "balanced");
        assert!(!r.speech_detected);
        assert_eq!(r.heuristic_confidence, 0.0);
        assert_eq!(r.model_confidence, None);
        assert_eq!(r.feature(FeatureName::PauseFreq), None);
        assert_eq!(r.rating(), Rating::Fair);
    }

    #[test]
    fn test_scored_result_serializes() {
        let raw = FeatureVector::new([6.0, 0.5, 0.25, 4.0, 12.0]);
        let r = ScoreResult::scored(72.5, None, &raw, 10.0, "fluency");
        assert_eq!(r.feature(FeatureName::AvgPause), Some(0.5));

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["model_confidence"], serde_json::Value::Null);
        assert_eq!(json["features"]["speech_rate"], 4.0);
        assert_eq!(json["speech_detected"], true);

        let back: ScoreResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
