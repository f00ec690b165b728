//! Short-term energy estimation
//!
//! `energy_db = 20 * log10(rms + EPSILON)`. Total and deterministic: an empty
//! or all-zero chunk maps to the floor value `20 * log10(EPSILON)` (-200 dB).

/// Numerical stability epsilon, keeps the logarithm finite on digital silence
pub const EPSILON: f32 = 1e-10;

/// Root-mean-square amplitude of a chunk (0.0 for an empty chunk)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&x| x * x).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Short-term loudness of a chunk in dB
pub fn energy_db(samples: &[f32]) -> f32 {
    20.0 * (rms(samples) + EPSILON).log10()
}
