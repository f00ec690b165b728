//! Confidence scorers
//!
//! Two strategies map a clipped feature vector to a 0-100 confidence:
//! - [`heuristic::HeuristicScorer`]: weighted combination under a [`profile::ScoringProfile`]
//! - [`model::ModelScorer`]: optional pretrained regression model
//!
//! Both implement [`ConfidenceScorer`], so the engine drives them the same way.

pub mod heuristic;
pub mod model;
pub mod profile;

use crate::features::FeatureVector;

/// A strategy that maps clipped features to a 0-100 confidence
pub trait ConfidenceScorer {
    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Confidence in [0, 100], or `None` if the scorer has no opinion
    fn score(&self, features: &FeatureVector) -> Option<f32>;
}
