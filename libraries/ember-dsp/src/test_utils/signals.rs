//! Test signal generation
//!
//! All generators produce interleaved stereo, matching what the source
//! layer delivers to the DSP core.

use std::f32::consts::PI;

/// Full scale of 32-bit signed PCM (2^31)
const PCM_SCALE: f32 = 2_147_483_648.0;

/// Generate a stereo sine wave as normalized floats
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Duration in seconds
/// * `amplitude` - Peak amplitude (0.0 to 1.0)
///
/// # Returns
/// Stereo interleaved samples (L, R, L, R, ...)
pub fn generate_sine_wave(
    frequency: f32,
    sample_rate: u32,
    duration: f32,
    amplitude: f32,
) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration) as usize;
    let mut samples = Vec::with_capacity(num_samples * 2);

    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * PI * frequency * t).sin() * amplitude;
        samples.push(sample); // Left
        samples.push(sample); // Right
    }

    samples
}

/// Generate a stereo unit impulse followed by silence
pub fn generate_impulse(frames: usize, amplitude: f32) -> Vec<f32> {
    let mut samples = vec![0.0; frames * 2];
    if frames > 0 {
        samples[0] = amplitude;
        samples[1] = amplitude;
    }
    samples
}

/// Convert normalized floats to the 32-bit PCM the core consumes
pub fn to_pcm(samples: &[f32]) -> Vec<i32> {
    samples
        .iter()
        .map(|s| (s * PCM_SCALE).clamp(-2_147_483_648.0, 2_147_483_520.0) as i32)
        .collect()
}

/// Convert 32-bit PCM back to normalized floats for analysis
pub fn from_pcm(samples: &[i32]) -> Vec<f32> {
    samples.iter().map(|s| *s as f32 / PCM_SCALE).collect()
}
