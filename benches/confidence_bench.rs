//! Performance benchmarks for confidence scoring

use cadence_dsp::{ConfidenceEngine, EngineConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// 30 s of alternating 1 s speech bursts and 0.5 s gaps at 16 kHz
fn synthetic_answer() -> Vec<f32> {
    let sample_rate = 16_000usize;
    (0..sample_rate * 30)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            if t % 1.5 < 1.0 {
                0.4 * (2.0 * std::f32::consts::PI * 150.0 * t).sin()
            } else {
                0.0
            }
        })
        .collect()
}

fn bench_score_utterance(c: &mut Criterion) {
    let samples = synthetic_answer();
    let mut engine = ConfidenceEngine::new(EngineConfig::default()).expect("default config is valid");

    c.bench_function("score_utterance_30s", |b| {
        b.iter(|| {
            let _ = engine.score(black_box(&samples));
        });
    });
}

fn bench_pitch_estimate(c: &mut Criterion) {
    let chunk: Vec<f32> = (0..8000)
        .map(|i| 0.4 * (2.0 * std::f32::consts::PI * 150.0 * i as f32 / 16000.0).sin())
        .collect();

    c.bench_function("pitch_estimate_500ms", |b| {
        b.iter(|| cadence_dsp::features::pitch::estimate_pitch(black_box(&chunk), black_box(16000)));
    });
}

criterion_group!(benches, bench_score_utterance, bench_pitch_estimate);
criterion_main!(benches);
