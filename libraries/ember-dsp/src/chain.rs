//! The live filter cascade
//!
//! Owns the active biquads and runs the whole per-buffer signal path:
//! fixed-point to float conversion, the filter cascade, the soft limiter,
//! and the clamped conversion back. The filter array has fixed capacity
//! sized to the hardware cap, so the render path never touches the heap.
//!
//! Control operations (preset load, format update, bypass) mutate the
//! chain between buffers; see `pipeline` for how that is kept off the
//! render path.

use ember_core::traits::PcmEffect;
use ember_core::types::AudioFormat;
use ember_core::Result;
use tracing::debug;

use crate::biquad::{BiquadFilter, BiquadParams};
use crate::budget::HARDWARE_MAX_FILTERS;
use crate::limiter::soft_limit;
use crate::presets::{Preset, PresetId};

/// Full scale of 32-bit signed PCM (2^31)
const PCM_SCALE: f32 = 2_147_483_648.0;
const INV_PCM_SCALE: f32 = 1.0 / PCM_SCALE;

/// Clamp rails for the float-to-PCM conversion. Floating-point rounding
/// can overshoot full scale slightly; the upper rail is the largest f32
/// strictly below 2^31 so the cast back to i32 can never wrap.
const PCM_MIN_F: f32 = -2_147_483_648.0;
const PCM_MAX_F: f32 = 2_147_483_520.0;

/// Processing statistics, updated on the render path
#[derive(Debug, Clone, Copy, Default)]
pub struct DspStats {
    /// Stereo frames that went through the cascade
    pub frames_processed: u64,
    /// Buffers that went through the cascade
    pub buffers_processed: u64,
    /// Largest post-limiter magnitude observed since the last reset
    pub peak_level: f32,
}

/// Cascade of active biquad filters plus the surrounding sample path
pub struct DspChain {
    filters: [BiquadFilter; HARDWARE_MAX_FILTERS],
    active_filters: usize,
    preset: PresetId,
    bypass: bool,
    crossfeed: bool,
    format: AudioFormat,
    initialized: bool,
    stats: DspStats,
}

impl DspChain {
    /// Create an uninitialized chain; `process` is a no-op until
    /// [`initialize`](Self::initialize) succeeds
    pub fn new() -> Self {
        Self {
            filters: std::array::from_fn(|_| BiquadFilter::identity()),
            active_filters: 0,
            preset: PresetId::Flat,
            bypass: false,
            crossfeed: false,
            format: AudioFormat::cd_quality(),
            initialized: false,
            stats: DspStats::default(),
        }
    }

    /// Clear all state, select the flat preset, disable bypass
    pub fn initialize(&mut self, format: AudioFormat) -> Result<()> {
        format.validate()?;

        self.format = format;
        for filter in &mut self.filters {
            *filter = BiquadFilter::identity();
        }
        self.active_filters = 0;
        self.preset = PresetId::Flat;
        self.bypass = false;
        self.crossfeed = false;
        self.stats = DspStats::default();
        self.initialized = true;

        debug!(
            sample_rate = format.sample_rate.as_hz(),
            bits = format.bits_per_sample,
            "dsp chain initialized"
        );
        Ok(())
    }

    /// Load a catalog preset into the cascade
    ///
    /// Every filter slot is designed from parameters at load time with the
    /// chain's current sample rate stamped in; nothing is served from a
    /// pre-baked coefficient cache. Safe to call repeatedly; loading the
    /// same preset twice lands in the same configuration.
    ///
    /// Returns false (and changes nothing) before `initialize`.
    pub fn load_preset(&mut self, id: PresetId) -> bool {
        if !self.initialized {
            return false;
        }

        let preset = Preset::lookup(id);
        let count = preset.filters.len().min(HARDWARE_MAX_FILTERS);
        let sample_rate_hz = self.format.sample_rate.as_hz() as f32;

        for (slot, spec) in self.filters.iter_mut().zip(&preset.filters[..count]) {
            slot.configure(&BiquadParams {
                kind: spec.kind,
                frequency_hz: spec.frequency_hz,
                gain_db: spec.gain_db,
                q: spec.q,
                sample_rate_hz,
            });
        }
        for slot in self.filters.iter_mut().skip(count) {
            *slot = BiquadFilter::identity();
        }

        self.active_filters = count;
        self.preset = id;
        self.crossfeed = preset.crossfeed;

        debug!(preset = preset.name, filters = count, "preset loaded");
        true
    }

    /// Process `frame_count` interleaved stereo frames in place
    ///
    /// Bypass and the zero-filter case return before any conversion work;
    /// that early-out is the cheapest path through this function. The
    /// single-filter case runs a dedicated loop purely for throughput; it
    /// is functionally identical to the general cascade.
    pub fn process(&mut self, buffer: &mut [i32], frame_count: usize) {
        if !self.initialized || self.bypass || self.active_filters == 0 {
            return;
        }

        let frames = frame_count.min(buffer.len() / 2);
        let samples = &mut buffer[..frames * 2];
        let mut peak = self.stats.peak_level;

        if self.active_filters == 1 {
            let filter = &mut self.filters[0];
            for frame in samples.chunks_exact_mut(2) {
                let l = frame[0] as f32 * INV_PCM_SCALE;
                let r = frame[1] as f32 * INV_PCM_SCALE;

                let (l, r) = filter.process_frame(l, r);
                let l = soft_limit(l);
                let r = soft_limit(r);

                peak = peak.max(l.abs()).max(r.abs());
                frame[0] = (l * PCM_SCALE).clamp(PCM_MIN_F, PCM_MAX_F) as i32;
                frame[1] = (r * PCM_SCALE).clamp(PCM_MIN_F, PCM_MAX_F) as i32;
            }
        } else {
            let active = &mut self.filters[..self.active_filters];
            for frame in samples.chunks_exact_mut(2) {
                let mut l = frame[0] as f32 * INV_PCM_SCALE;
                let mut r = frame[1] as f32 * INV_PCM_SCALE;

                for filter in active.iter_mut() {
                    let (fl, fr) = filter.process_frame(l, r);
                    l = fl;
                    r = fr;
                }
                let l = soft_limit(l);
                let r = soft_limit(r);

                peak = peak.max(l.abs()).max(r.abs());
                frame[0] = (l * PCM_SCALE).clamp(PCM_MIN_F, PCM_MAX_F) as i32;
                frame[1] = (r * PCM_SCALE).clamp(PCM_MIN_F, PCM_MAX_F) as i32;
            }
        }

        self.stats.peak_level = peak;
        self.stats.frames_processed += frames as u64;
        self.stats.buffers_processed += 1;
    }

    /// Toggle pass-through; filter history is deliberately kept so
    /// disengaging bypass resumes without a transient
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    /// Whether the chain is currently passing audio through untouched
    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    /// Store a new format, redesign the current preset for it and clear
    /// all filter state
    ///
    /// The one operation that both reconfigures and clears state, as a
    /// single step from the caller's view; stale history at a new sample
    /// rate would be audible.
    pub fn update_format(&mut self, format: AudioFormat) -> Result<()> {
        format.validate()?;

        self.format = format;
        if self.initialized {
            // Redesign from parameters at the new rate, never rescale
            let current = self.preset;
            self.load_preset(current);
            self.reset();
        }

        debug!(
            sample_rate = format.sample_rate.as_hz(),
            bits = format.bits_per_sample,
            "format updated"
        );
        Ok(())
    }

    /// Clear the histories of the active filters; coefficients and preset
    /// selection are untouched
    pub fn reset(&mut self) {
        for filter in &mut self.filters[..self.active_filters] {
            filter.reset();
        }
    }

    /// Current audio format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Number of filters currently in the cascade
    pub fn active_filters(&self) -> usize {
        self.active_filters
    }

    /// Currently loaded preset
    pub fn preset(&self) -> PresetId {
        self.preset
    }

    /// Whether the loaded preset reserves crossfeed (data only, unwired)
    pub fn crossfeed_reserved(&self) -> bool {
        self.crossfeed
    }

    /// Whether `initialize` has succeeded
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Render-path statistics
    pub fn stats(&self) -> DspStats {
        self.stats
    }
}

impl Default for DspChain {
    fn default() -> Self {
        Self::new()
    }
}

impl PcmEffect for DspChain {
    fn process(&mut self, buffer: &mut [i32], frame_count: usize) {
        DspChain::process(self, buffer, frame_count);
    }

    fn reset(&mut self) {
        DspChain::reset(self);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.set_bypass(!enabled);
    }

    fn is_enabled(&self) -> bool {
        !self.is_bypassed()
    }

    fn format(&self) -> AudioFormat {
        self.format
    }

    fn name(&self) -> &str {
        "EQ chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::types::SampleRate;

    fn format_48k() -> AudioFormat {
        AudioFormat::stereo(SampleRate::DVD_QUALITY, 24)
    }

    fn initialized_chain() -> DspChain {
        let mut chain = DspChain::new();
        chain.initialize(format_48k()).unwrap();
        chain
    }

    /// A deterministic signal with quiet, loud and full-scale regions
    fn test_buffer(frames: usize) -> Vec<i32> {
        (0..frames * 2)
            .map(|i| match i % 7 {
                0 => 0,
                1 => 1 << 20,
                2 => -(1 << 24),
                3 => i32::MAX,
                4 => i32::MIN,
                5 => 12_345_678,
                _ => -98_765,
            })
            .collect()
    }

    #[test]
    fn initialize_selects_flat() {
        let chain = initialized_chain();
        assert!(chain.is_initialized());
        assert_eq!(chain.preset(), PresetId::Flat);
        assert_eq!(chain.active_filters(), 0);
        assert!(!chain.is_bypassed());
    }

    #[test]
    fn initialize_rejects_bad_format() {
        let mut chain = DspChain::new();
        let mut format = format_48k();
        format.channels = 6;
        assert!(chain.initialize(format).is_err());
        assert!(!chain.is_initialized());
    }

    #[test]
    fn uninitialized_process_is_pass_through() {
        let mut chain = DspChain::new();
        let mut buffer = test_buffer(64);
        let original = buffer.clone();
        chain.process(&mut buffer, 64);
        assert_eq!(buffer, original);
        assert_eq!(chain.stats().buffers_processed, 0);
    }

    #[test]
    fn zero_filters_is_exact_identity() {
        let mut chain = initialized_chain();
        assert_eq!(chain.active_filters(), 0);

        let mut buffer = test_buffer(128);
        let original = buffer.clone();
        chain.process(&mut buffer, 128);
        assert_eq!(buffer, original);
    }

    #[test]
    fn bypass_is_byte_identical() {
        let mut chain = initialized_chain();
        assert!(chain.load_preset(PresetId::BassBoost));
        chain.set_bypass(true);

        let mut buffer = test_buffer(128);
        let original = buffer.clone();
        chain.process(&mut buffer, 128);
        assert_eq!(buffer, original);
    }

    #[test]
    fn load_preset_sets_filter_count() {
        let mut chain = initialized_chain();

        assert!(chain.load_preset(PresetId::Rock));
        assert_eq!(chain.active_filters(), 1);
        assert_eq!(chain.preset(), PresetId::Rock);

        assert!(chain.load_preset(PresetId::Jazz));
        assert_eq!(chain.active_filters(), 3);

        assert!(chain.load_preset(PresetId::Flat));
        assert_eq!(chain.active_filters(), 0);
    }

    #[test]
    fn load_preset_before_initialize_is_refused() {
        let mut chain = DspChain::new();
        assert!(!chain.load_preset(PresetId::Rock));
        assert_eq!(chain.active_filters(), 0);
    }

    #[test]
    fn load_preset_is_idempotent() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Jazz);
        let first = chain.filters[0].coefficients();

        chain.load_preset(PresetId::Jazz);
        assert_eq!(chain.filters[0].coefficients(), first);
        assert_eq!(chain.active_filters(), 3);
    }

    #[test]
    fn crossfeed_flag_follows_preset() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Headphone);
        assert!(chain.crossfeed_reserved());
        chain.load_preset(PresetId::Rock);
        assert!(!chain.crossfeed_reserved());
    }

    #[test]
    fn single_filter_path_matches_reference_cascade() {
        // The dedicated one-filter loop must be functionally identical to
        // running the same section through the definitional sample path.
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Rock);

        let mut reference = BiquadFilter::identity();
        let spec = Preset::lookup(PresetId::Rock).filters[0];
        reference.configure(&BiquadParams {
            kind: spec.kind,
            frequency_hz: spec.frequency_hz,
            gain_db: spec.gain_db,
            q: spec.q,
            sample_rate_hz: 48_000.0,
        });

        let mut buffer = test_buffer(256);
        let input = buffer.clone();
        chain.process(&mut buffer, 256);

        for (frame, out) in input.chunks_exact(2).zip(buffer.chunks_exact(2)) {
            let l = frame[0] as f32 * INV_PCM_SCALE;
            let r = frame[1] as f32 * INV_PCM_SCALE;
            let (l, r) = reference.process_frame(l, r);
            let expect_l = (soft_limit(l) * PCM_SCALE).clamp(PCM_MIN_F, PCM_MAX_F) as i32;
            let expect_r = (soft_limit(r) * PCM_SCALE).clamp(PCM_MIN_F, PCM_MAX_F) as i32;
            assert_eq!(out[0], expect_l);
            assert_eq!(out[1], expect_r);
        }
    }

    #[test]
    fn full_scale_input_never_wraps() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::BassBoost);

        // Sustained full-scale low-frequency square drives the +8 dB shelf
        // well past 1.0 before the limiter
        let mut buffer: Vec<i32> = (0..2048)
            .map(|i| if (i / 200) % 2 == 0 { i32::MAX } else { i32::MIN })
            .collect();
        chain.process(&mut buffer, 1024);

        // Limiter keeps everything at or under full scale
        assert!(chain.stats().peak_level <= 1.0);
    }

    #[test]
    fn update_format_resets_filter_state() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Jazz);

        // Inject an impulse so every section holds non-zero state
        let mut buffer = vec![0i32; 64];
        buffer[0] = i32::MAX;
        buffer[1] = i32::MAX;
        chain.process(&mut buffer, 32);
        assert!(chain.filters[..chain.active_filters()]
            .iter()
            .any(|f| !f.state_is_zero()));

        chain
            .update_format(AudioFormat::stereo(SampleRate::CD_QUALITY, 16))
            .unwrap();

        // Zero residual response: all state registers cleared
        assert!(chain.filters[..chain.active_filters()]
            .iter()
            .all(|f| f.state_is_zero()));
        assert_eq!(chain.preset(), PresetId::Jazz);
        assert_eq!(chain.format().sample_rate, SampleRate::CD_QUALITY);
    }

    #[test]
    fn update_format_redesigns_coefficients() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Rock);
        let at_48k = chain.filters[0].coefficients();

        chain
            .update_format(AudioFormat::stereo(SampleRate::HIGH_RES_96, 24))
            .unwrap();
        assert_ne!(chain.filters[0].coefficients(), at_48k);
    }

    #[test]
    fn update_format_rejects_bad_format_and_keeps_old() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Rock);

        let bad = AudioFormat::stereo(SampleRate::new(1_000), 24);
        assert!(chain.update_format(bad).is_err());
        assert_eq!(chain.format(), format_48k());
        assert_eq!(chain.active_filters(), 1);
    }

    #[test]
    fn reset_keeps_coefficients_and_preset() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Rock);
        let coeffs = chain.filters[0].coefficients();

        let mut buffer = test_buffer(64);
        chain.process(&mut buffer, 64);

        chain.reset();
        assert!(chain.filters[0].state_is_zero());
        assert_eq!(chain.filters[0].coefficients(), coeffs);
        assert_eq!(chain.preset(), PresetId::Rock);
    }

    #[test]
    fn bypass_keeps_filter_history() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Rock);

        let mut buffer = test_buffer(64);
        chain.process(&mut buffer, 64);
        assert!(!chain.filters[0].state_is_zero());

        chain.set_bypass(true);
        assert!(!chain.filters[0].state_is_zero());
    }

    #[test]
    fn stats_accumulate_per_buffer() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Rock);

        let mut buffer = test_buffer(128);
        chain.process(&mut buffer, 128);
        chain.process(&mut buffer, 128);

        let stats = chain.stats();
        assert_eq!(stats.buffers_processed, 2);
        assert_eq!(stats.frames_processed, 256);
        assert!(stats.peak_level > 0.0);
    }

    #[test]
    fn short_buffer_caps_frame_count() {
        let mut chain = initialized_chain();
        chain.load_preset(PresetId::Rock);

        // Caller claims more frames than the buffer holds
        let mut buffer = test_buffer(16);
        chain.process(&mut buffer, 1_000);
        assert_eq!(chain.stats().frames_processed, 16);
    }

    #[test]
    fn pcm_effect_enabled_maps_to_bypass() {
        let mut chain = initialized_chain();
        PcmEffect::set_enabled(&mut chain, false);
        assert!(chain.is_bypassed());
        assert!(!PcmEffect::is_enabled(&chain));
        PcmEffect::set_enabled(&mut chain, true);
        assert!(!chain.is_bypassed());
    }
}
