//! Integration tests for the confidence scoring engine

use cadence_dsp::clock::SteppedClock;
use cadence_dsp::features::accumulator::FeatureAccumulator;
use cadence_dsp::io::chunk_utterance;
use cadence_dsp::{
    score_utterance, AccumulatorConfig, ConfidenceEngine, ConfidenceError, EngineConfig,
    FeatureName, FeatureVector, LinearModel, ModelScorer, ProfileSet, RegressionModel,
    SessionSummary,
};
use std::path::PathBuf;

const SAMPLE_RATE: u32 = 16_000;

/// Voiced segment: a 160 Hz tone with a second harmonic
fn voiced(seconds: f32) -> Vec<f32> {
    let len = (seconds * SAMPLE_RATE as f32) as usize;
    (0..len)
        .map(|i| {
            let t = (i % 8000) as f32 / SAMPLE_RATE as f32;
            0.4 * (2.0 * std::f32::consts::PI * 160.0 * t).sin()
                + 0.1 * (2.0 * std::f32::consts::PI * 320.0 * t).sin()
        })
        .collect()
}

fn quiet(seconds: f32) -> Vec<f32> {
    vec![0.0; (seconds * SAMPLE_RATE as f32) as usize]
}

/// 5 s room tone, then `gaps` pauses of `gap` seconds between 1 s speech bursts
fn utterance(gaps: usize, gap: f32) -> Vec<f32> {
    let mut audio = quiet(5.0);
    for _ in 0..gaps {
        audio.extend(voiced(1.0));
        audio.extend(quiet(gap));
    }
    audio.extend(voiced(1.0));
    audio
}

fn deterministic_engine() -> ConfidenceEngine {
    ConfidenceEngine::builder(EngineConfig::default())
        .clock(Box::new(SteppedClock::new(0.0, 0.5)))
        .build()
        .unwrap()
}

fn write_wav(path: &PathBuf, samples: &[f32]) -> Result<(), Box<dyn std::error::Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn read_wav(path: &PathBuf) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let max_value = (1 << (spec.bits_per_sample - 1)) as f32;
    let samples = reader
        .samples::<i32>()
        .map(|s| s.map(|s| s as f32 / max_value))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_shorter_than_one_chunk() {
        let result = score_utterance(&voiced(0.4), EngineConfig::default()).unwrap();
        assert!(!result.speech_detected);
        assert_eq!(result.heuristic_confidence, 0.0);
        assert!(result.features.is_none());
    }

    #[test]
    fn test_silence_never_detects_speech() {
        let config = EngineConfig::default();
        let samples = quiet(20.0);

        let mut acc = FeatureAccumulator::new(&config, Box::new(SteppedClock::new(0.0, 0.5)));
        for chunk in chunk_utterance(&samples, config.sample_rate, config.chunk_size()) {
            acc.process_chunk(&chunk);
        }
        let floor = acc.noise_floor().expect("noise floor calibrated");
        assert!((floor + 200.0).abs() < 1e-3, "floor at digital silence, got {}", floor);

        let result = score_utterance(&samples, config).unwrap();
        assert!(!result.speech_detected);
        assert_eq!(result.heuristic_confidence, 0.0);
        assert_eq!(result.model_confidence, None);
    }

    #[test]
    fn test_three_pauses_in_thirty_second_window() {
        let mut engine = deterministic_engine();
        let result = engine.score(&utterance(3, 0.5));

        assert!(result.speech_detected);
        assert_eq!(result.feature(FeatureName::PauseFreq), Some(6.0));
        assert_eq!(result.feature(FeatureName::AvgPause), Some(0.5));
        assert!((0.0..=100.0).contains(&result.heuristic_confidence));
    }

    #[test]
    fn test_longer_pauses_lower_confidence() {
        let mut engine = deterministic_engine();
        let fluent = engine.score(&utterance(3, 0.5));
        let halting = engine.score(&utterance(3, 2.5));

        assert!(halting.feature(FeatureName::AvgPause).unwrap() > fluent.feature(FeatureName::AvgPause).unwrap());
        assert!(
            halting.heuristic_confidence < fluent.heuristic_confidence,
            "halting {} vs fluent {}",
            halting.heuristic_confidence,
            fluent.heuristic_confidence
        );
    }

    #[test]
    fn test_idempotent_rescoring() {
        let mut engine = deterministic_engine();
        let audio = utterance(4, 1.0);
        let a = engine.score(&audio);
        let b = engine.score(&audio);
        assert_eq!(a, b);

        // A fresh engine with the same clock sequence agrees too
        let mut other = deterministic_engine();
        assert_eq!(other.score(&audio), a);
    }

    #[test]
    fn test_all_zero_profile_scores_zero() {
        let json = r#"{
            "mute": {
                "description": "ignores everything",
                "weights": {
                    "pause_freq": 0.0, "avg_pause": 0.0, "silence_ratio": 0.0,
                    "speech_rate": 0.0, "pitch_std": 0.0
                }
            }
        }"#;
        let mut engine = ConfidenceEngine::builder(EngineConfig::default())
            .profiles(ProfileSet::from_json(json).unwrap())
            .profile("mute")
            .clock(Box::new(SteppedClock::new(0.0, 0.5)))
            .build()
            .unwrap();

        let result = engine.score(&utterance(3, 0.5));
        assert!(result.speech_detected);
        assert_eq!(result.heuristic_confidence, 0.0);
    }

    #[test]
    fn test_profile_switch_keeps_features() {
        let mut engine = deterministic_engine();
        let audio = utterance(3, 1.5);
        let balanced = engine.score(&audio);

        engine.switch_profile("fluency").unwrap();
        let fluency = engine.score(&audio);

        assert_eq!(balanced.features, fluency.features);
        assert_eq!(fluency.profile, "fluency");
        assert!(matches!(
            engine.switch_profile("nonexistent"),
            Err(ConfidenceError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_model_scorer_endpoints() {
        struct Fixed(f32);
        impl RegressionModel for Fixed {
            fn predict(&self, _: &FeatureVector) -> Result<f32, ConfidenceError> {
                Ok(self.0)
            }
        }

        for (prediction, expected) in [(1.0, 0.0), (5.0, 100.0), (0.0, 0.0), (7.0, 100.0)] {
            let mut engine = ConfidenceEngine::builder(EngineConfig::default())
                .model(ModelScorer::with_model(Box::new(Fixed(prediction))))
                .clock(Box::new(SteppedClock::new(0.0, 0.5)))
                .build()
                .unwrap();
            let result = engine.score(&utterance(2, 0.5));
            assert_eq!(result.model_confidence, Some(expected));
        }
    }

    #[test]
    fn test_no_model_means_absent_model_score() {
        let mut engine = deterministic_engine();
        assert!(!engine.model_available());
        for audio in [utterance(3, 0.5), quiet(10.0), Vec::new()] {
            assert_eq!(engine.score(&audio).model_confidence, None);
        }
    }

    #[test]
    fn test_linear_model_from_json_file() {
        let path = std::env::temp_dir().join(format!("cadence_it_model_{}.json", std::process::id()));
        let model = LinearModel {
            intercept: 4.0,
            coefficients: [-0.05, -0.5, -1.0, 0.1, -0.01],
        };
        std::fs::write(&path, serde_json::to_string(&model).unwrap()).unwrap();

        let mut engine = ConfidenceEngine::builder(EngineConfig::default())
            .model(ModelScorer::from_path(&path))
            .clock(Box::new(SteppedClock::new(0.0, 0.5)))
            .build()
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert!(engine.model_available());
        let result = engine.score(&utterance(3, 0.5));
        let model_score = result.model_confidence.expect("model score present");
        assert!((0.0..=100.0).contains(&model_score));
    }

    #[test]
    fn test_lenient_policy_accepts_short_answer() {
        // 2.5 s room tone + 1.5 s speech: too short for strict readiness
        let mut audio = quiet(2.5);
        audio.extend(voiced(1.5));

        let mut strict = deterministic_engine();
        assert!(!strict.score(&audio).speech_detected);

        let config = EngineConfig {
            accumulator: AccumulatorConfig::lenient(),
            ..EngineConfig::default()
        };
        let mut lenient = ConfidenceEngine::builder(config)
            .clock(Box::new(SteppedClock::new(0.0, 0.5)))
            .build()
            .unwrap();
        assert!(lenient.score(&audio).speech_detected);
    }

    #[test]
    fn test_session_summary() {
        let mut engine = deterministic_engine();
        let results = vec![
            engine.score(&utterance(3, 0.5)),
            engine.score(&utterance(3, 2.0)),
            engine.score(&quiet(6.0)),
        ];
        let summary = SessionSummary::from_results(&results).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.speech_detected, 2);
        assert_eq!(summary.min_confidence, 0.0);
        assert!(summary.max_confidence >= summary.average_confidence);
    }

    #[test]
    fn test_wav_roundtrip_scores_like_memory() {
        let path = std::env::temp_dir().join(format!("cadence_it_{}.wav", std::process::id()));
        let audio = utterance(3, 0.5);
        write_wav(&path, &audio).unwrap();
        let (samples, sample_rate) = read_wav(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(sample_rate, SAMPLE_RATE);
        assert_eq!(samples.len(), audio.len());

        let mut engine = deterministic_engine();
        let from_wav = engine.score(&samples);
        assert!(from_wav.speech_detected);
        assert_eq!(from_wav.feature(FeatureName::PauseFreq), Some(6.0));
        assert!((from_wav.duration_seconds - audio.len() as f32 / SAMPLE_RATE as f32).abs() < 1e-6);
    }
}
