//! Profile-weighted heuristic scorer
//!
//! # Algorithm
//!
//! 1. Normalize each clipped feature to [0, 1]: `(value - min) / (max - min)`
//! 2. Orient it so that 1.0 is favourable: pausing, silence and pitch spread
//!    are "lower is better" (`1 - normalized`), speech rate is "higher is
//!    better" (`normalized`)
//! 3. Weighted mean with `|weight|`, scaled to 0-100 and clipped
//!
//! An all-zero weight set scores 0.0.

use super::profile::ScoringProfile;
use super::ConfidenceScorer;
use crate::features::{FeatureBounds, FeatureName, FeatureVector};

/// Whether a higher value of the feature indicates more confidence
fn higher_is_better(name: FeatureName) -> bool {
    matches!(name, FeatureName::SpeechRate)
}

/// Weighted heuristic scorer for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicScorer {
    profile: ScoringProfile,
    bounds: FeatureBounds,
}

impl HeuristicScorer {
    /// Create a scorer for a profile and feature bounds
    pub fn new(profile: ScoringProfile, bounds: FeatureBounds) -> Self {
        Self { profile, bounds }
    }

    /// Active profile
    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Replace the profile; bounds are unchanged
    pub fn set_profile(&mut self, profile: ScoringProfile) {
        self.profile = profile;
    }

    /// Per-feature contribution in [0, 1], 1.0 being most favourable
    pub fn contributions(&self, features: &FeatureVector) -> [f32; 5] {
        let mut out = [0.0f32; 5];
        for name in FeatureName::ALL {
            let (min, max) = self.bounds.range(name);
            let span = max - min;
            let normalized = if span > 0.0 {
                ((features.get(name) - min) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            // NaN input collapses to the least favourable end
            let normalized = if normalized.is_nan() { 0.0 } else { normalized };
            out[name.index()] = if higher_is_better(name) {
                normalized
            } else {
                1.0 - normalized
            };
        }
        out
    }

    /// Confidence in [0, 100]
    ///
    /// NaN if the weighted sums overflow, e.g. for weights near `f32::MAX`.
    pub fn confidence(&self, features: &FeatureVector) -> f32 {
        let contributions = self.contributions(features);
        let weights = self.profile.weights.as_array();

        let total_weight: f32 = weights.iter().map(|w| w.abs()).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }

        let weighted: f32 = contributions
            .iter()
            .zip(weights.iter())
            .map(|(c, w)| c * w.abs())
            .sum();

        (weighted / total_weight * 100.0).clamp(0.0, 100.0)
    }
}

impl ConfidenceScorer for HeuristicScorer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn score(&self, features: &FeatureVector) -> Option<f32> {
        let confidence = self.confidence(features);
        if !confidence.is_finite() {
            log::warn!(
                "Heuristic score ({}) is not finite: {}",
                self.profile.name,
                confidence
            );
            return None;
        }
        log::debug!(
            "Heuristic score ({}): {:.1}",
            self.profile.name,
            confidence
        );
        Some(confidence)
    }
}
