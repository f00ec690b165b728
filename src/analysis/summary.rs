//! Aggregate statistics over several scored answers

use super::result::{Rating, ScoreResult};
use serde::{Deserialize, Serialize};

/// Summary of heuristic confidences across a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of results summarized
    pub count: usize,
    /// Results with detected speech
    pub speech_detected: usize,
    /// Mean heuristic confidence
    pub average_confidence: f32,
    /// Lowest heuristic confidence
    pub min_confidence: f32,
    /// Highest heuristic confidence
    pub max_confidence: f32,
    /// Mean model confidence over results that have one
    pub average_model_confidence: Option<f32>,
    /// Rating band of the average
    pub rating: Rating,
}

impl SessionSummary {
    /// Summarize results; `None` if the slice is empty
    pub fn from_results(results: &[ScoreResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let scores: Vec<f32> = results.iter().map(|r| r.heuristic_confidence).collect();
        let average = scores.iter().sum::<f32>() / scores.len() as f32;
        let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let model_scores: Vec<f32> = results.iter().filter_map(|r| r.model_confidence).collect();
        let average_model_confidence = if model_scores.is_empty() {
            None
        } else {
            Some(model_scores.iter().sum::<f32>() / model_scores.len() as f32)
        };

        Some(Self {
            count: results.len(),
            speech_detected: results.iter().filter(|r| r.speech_detected).count(),
            average_confidence: average,
            min_confidence: min,
            max_confidence: max,
            average_model_confidence,
            rating: Rating::from_score(average),
        })
    }
}
