//! Example: Score a recorded answer
//!
//! Usage: `cargo run --example score_wav -- answer.wav [profile] [model.json|model.onnx]`
//!
//! Reads a WAV file, mixes it to mono, scores it and prints the result as JSON.
//! The file's sample rate is used as the engine sample rate.

use cadence_dsp::{ConfidenceEngine, EngineConfig, ModelScorer};
use std::path::Path;

/// Load a WAV file and return mono samples and the sample rate
fn load_wav(path: &str) -> Result<(Vec<f32>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec.sample_rate))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let wav_path = args.next().ok_or("usage: score_wav <answer.wav> [profile] [model]")?;
    let profile = args.next().unwrap_or_else(|| "balanced".to_string());
    let model = match args.next() {
        Some(path) => ModelScorer::from_path(Path::new(&path)),
        None => ModelScorer::unavailable(),
    };

    let (samples, sample_rate) = load_wav(&wav_path)?;
    let config = EngineConfig {
        sample_rate,
        ..EngineConfig::default()
    };

    let mut engine = ConfidenceEngine::builder(config)
        .profile(profile)
        .model(model)
        .build()?;

    let result = engine.score(&samples);

    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.speech_detected {
        eprintln!(
            "Confidence: {:.1}/100 ({}){}",
            result.heuristic_confidence,
            result.rating(),
            result
                .model_confidence
                .map(|m| format!(", model: {:.1}/100", m))
                .unwrap_or_default()
        );
    } else {
        eprintln!("No speech detected ({:.1} s)", result.duration_seconds);
    }

    Ok(())
}
