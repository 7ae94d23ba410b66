/// Core traits shared between the DSP core and the playback layer
use crate::types::AudioFormat;

/// In-place processor for interleaved stereo PCM buffers
///
/// Implemented by the DSP chain and consumed by the platform render loop.
///
/// # Real-Time Constraints
/// - `process` must not allocate
/// - `process` must not block
/// - Deterministic execution time per frame
pub trait PcmEffect: Send {
    /// Process `frame_count` interleaved stereo frames in place
    ///
    /// `buffer` holds 32-bit signed PCM as (L, R, L, R, ...); it must hold
    /// at least `frame_count * 2` samples.
    fn process(&mut self, buffer: &mut [i32], frame_count: usize);

    /// Reset internal state (e.g. when seeking or changing tracks)
    fn reset(&mut self);

    /// Enable/disable the effect (disabled means pass-through)
    fn set_enabled(&mut self, enabled: bool);

    /// Check if the effect is enabled
    fn is_enabled(&self) -> bool;

    /// The format the effect is currently configured for
    fn format(&self) -> AudioFormat;

    /// Get effect name (for debugging)
    fn name(&self) -> &str;
}
