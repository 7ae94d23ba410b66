//! Audio analysis helpers for verification
//!
//! Level measurement used to check filter gain against analytic
//! expectations in the integration tests.

/// Calculate RMS (Root Mean Square) level
///
/// # Arguments
/// * `samples` - Audio samples (mono or stereo interleaved)
///
/// # Returns
/// RMS value (0.0 to 1.0 for normalized audio)
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Calculate peak level (absolute maximum sample value)
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Convert linear amplitude to dB
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -100.0 // Silence
    } else {
        20.0 * linear.log10()
    }
}

/// Convert dB to linear amplitude
pub fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Measured gain of `output` relative to `input`, in dB
pub fn gain_db(input: &[f32], output: &[f32]) -> f32 {
    linear_to_db(calculate_rms(output)) - linear_to_db(calculate_rms(input))
}
