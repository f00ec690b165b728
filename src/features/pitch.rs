//! Pitch estimation
//!
//! Frequency-domain estimate of the dominant periodic component of a chunk.
//!
//! # Algorithm
//!
//! 1. Apply a Hann window and zero-pad to the next power of two
//! 2. FFT and take the magnitude spectrum
//! 3. Find the strongest bin inside the voice band (`MIN_PITCH_HZ..=MAX_PITCH_HZ`)
//! 4. Reject the peak unless it stands out from the band average
//!    (`PEAK_TO_MEAN_RATIO`), which filters out silence and broadband noise
//! 5. Move down to half the peak frequency while a component there reaches
//!    `SUBHARMONIC_RATIO` of the peak, so a dominant 2nd harmonic does not
//!    mask a weaker fundamental
//! 6. Refine the peak position with parabolic interpolation
//!
//! The estimate is still a spectral peak, not a true f0 tracker: a voice
//! whose fundamental is below `SUBHARMONIC_RATIO` of its strongest harmonic,
//! or whose strongest harmonic is the 3rd, is reported at that harmonic.
//!
//! Returns 0.0 whenever no reliable pitch is found.
//!
//! # Example
//!
//! ```
//! use cadence_dsp::features::pitch::estimate_pitch;
//!
//! let samples: Vec<f32> = (0..8000)
//!     .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / 16000.0).sin())
//!     .collect();
//! let hz = estimate_pitch(&samples, 16000);
//! assert!((hz - 220.0).abs() < 3.0);
//! ```

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Lowest fundamental considered (Hz)
pub const MIN_PITCH_HZ: f32 = 70.0;

/// Highest fundamental considered (Hz)
pub const MAX_PITCH_HZ: f32 = 400.0;

/// Peak magnitude must exceed the band mean by this factor
pub const PEAK_TO_MEAN_RATIO: f32 = 4.0;

/// A component at half the peak frequency this strong (relative to the
/// peak) is taken as the fundamental
pub const SUBHARMONIC_RATIO: f32 = 0.25;

/// Chunks quieter than this RMS are treated as unvoiced
const MIN_RMS: f32 = 1e-6;

const EPSILON: f32 = 1e-10;

/// Estimate the fundamental frequency of a chunk in Hz, or 0.0 if unreliable
///
/// # Arguments
///
/// * `samples` - Mono chunk samples
/// * `sample_rate` - Sample rate in Hz
pub fn estimate_pitch(samples: &[f32], sample_rate: u32) -> f32 {
    if samples.len() < 2 || sample_rate == 0 {
        return 0.0;
    }

    let rms = super::energy::rms(samples);
    if !rms.is_finite() || rms < MIN_RMS {
        return 0.0;
    }

    let n = samples.len();
    let fft_size = n.next_power_of_two();
    let sr = sample_rate as f32;

    // Hann window, zero-padded
    let mut buffer: Vec<Complex<f32>> = samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let w = 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / (n - 1) as f32).cos();
            Complex::new(x * w, 0.0)
        })
        .collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    let nyquist_bin = fft_size / 2;
    let magnitudes: Vec<f32> = buffer[..=nyquist_bin].iter().map(|c| c.norm()).collect();

    let bin_hz = sr / fft_size as f32;
    let lo = ((MIN_PITCH_HZ / bin_hz).ceil() as usize).max(1);
    let hi = ((MAX_PITCH_HZ / bin_hz).floor() as usize).min(nyquist_bin - 1);
    if hi <= lo + 1 {
        log::debug!(
            "Chunk too short for pitch band: {} samples at {} Hz",
            n,
            sample_rate
        );
        return 0.0;
    }

    let band = &magnitudes[lo..=hi];
    let (peak_offset, peak_mag) = band
        .iter()
        .copied()
        .enumerate()
        .fold((0usize, 0.0f32), |best, (i, m)| if m > best.1 { (i, m) } else { best });

    let band_mean = band.iter().sum::<f32>() / band.len() as f32;
    if !peak_mag.is_finite() || band_mean < EPSILON || peak_mag < PEAK_TO_MEAN_RATIO * band_mean {
        return 0.0;
    }

    let mut peak_bin = lo + peak_offset;
    loop {
        let half = (peak_bin as f32 / 2.0).round() as usize;
        if half < lo + 1 {
            break;
        }
        let (sub_bin, sub_mag) = (half - 1..=(half + 1).min(hi))
            .map(|b| (b, magnitudes[b]))
            .fold((0usize, 0.0f32), |best, (b, m)| if m > best.1 { (b, m) } else { best });
        if sub_mag < SUBHARMONIC_RATIO * peak_mag || sub_mag < PEAK_TO_MEAN_RATIO * band_mean {
            break;
        }
        peak_bin = sub_bin;
    }

    let alpha = magnitudes[peak_bin - 1];
    let beta = magnitudes[peak_bin];
    let gamma = magnitudes[peak_bin + 1];
    let denom = alpha - 2.0 * beta + gamma;
    let delta = if denom.abs() > EPSILON {
        (0.5 * (alpha - gamma) / denom).clamp(-0.5, 0.5)
    } else {
        0.0
    };

    let hz = (peak_bin as f32 + delta) * bin_hz;
    if hz.is_finite() && hz > 0.0 {
        hz
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amplitude: f32, len: usize, sample_rate: f32) -> Vec<f32> {
        (0..len)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    /// Deterministic white noise in [-amplitude, amplitude]
    fn lcg_noise(len: usize, amplitude: f32) -> Vec<f32> {
        let mut state: u32 = 0x1234_5678;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ((state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0) * amplitude
            })
            .collect()
    }

    #[test]
    fn test_pure_tone_in_voice_band() {
        for freq in [110.0, 200.0, 330.0] {
            let samples = sine(freq, 0.5, 8000, 16000.0);
            let hz = estimate_pitch(&samples, 16000);
            assert!(
                (hz - freq).abs() < 3.0,
                "expected ~{} Hz, got {}",
                freq,
                hz
            );
        }
    }

    #[test]
    fn test_weak_fundamental_under_strong_harmonic() {
        for f0 in [120.0, 125.0, 130.0, 140.0] {
            let samples: Vec<f32> = sine(f0, 0.15, 8000, 16000.0)
                .iter()
                .zip(sine(2.0 * f0, 0.5, 8000, 16000.0))
                .zip(sine(3.0 * f0, 0.3, 8000, 16000.0))
                .map(|((a, b), c)| a + b + c)
                .collect();
            let hz = estimate_pitch(&samples, 16000);
            assert!((hz - f0).abs() < 3.0, "expected ~{} Hz, got {}", f0, hz);
        }
    }

    #[test]
    fn test_silence_returns_zero() {
        assert_eq!(estimate_pitch(&vec![0.0; 8000], 16000), 0.0);
    }

    #[test]
    fn test_broadband_noise_returns_zero() {
        let samples = lcg_noise(8000, 0.3);
        assert_eq!(estimate_pitch(&samples, 16000), 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(estimate_pitch(&[], 16000), 0.0);
        assert_eq!(estimate_pitch(&[0.5], 16000), 0.0);
        assert_eq!(estimate_pitch(&sine(200.0, 0.5, 8000, 16000.0), 0), 0.0);
        // Too short to resolve the voice band
        assert_eq!(estimate_pitch(&sine(200.0, 0.5, 16, 16000.0), 16000), 0.0);
    }

    #[test]
    fn test_non_finite_input_returns_zero() {
        let mut samples = sine(200.0, 0.5, 8000, 16000.0);
        samples[100] = f32::NAN;
        assert_eq!(estimate_pitch(&samples, 16000), 0.0);
    }
}
