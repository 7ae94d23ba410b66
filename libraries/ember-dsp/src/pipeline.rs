//! Pipeline facade around the DSP chain
//!
//! The platform creates exactly one `EqPipeline` and hands it to the audio
//! task; there is no hidden global. The facade exposes the control surface
//! (init, preset switch, enable, format update, stats, budget queries) and
//! forwards buffers to the chain.
//!
//! # Threading
//!
//! The original firmware let the control path write filter state while the
//! render path was reading it and tolerated the race. Here the race does
//! not exist: cross-thread callers go through an [`EqController`], whose
//! commands are queued and drained at the top of [`EqPipeline::process`]
//! on the render thread. Reconfiguration therefore always lands at a
//! buffer boundary, and no lock is ever held while samples are being
//! processed. The direct methods remain for platforms that own the
//! pipeline from a single thread.

use std::sync::mpsc::{self, Receiver, Sender};

use ember_core::types::{AudioFormat, SampleRate};
use ember_core::Result;
use tracing::{debug, warn};

use crate::budget::CpuBudget;
use crate::chain::DspChain;
use crate::presets::PresetId;

/// Control mutation applied between buffers on the render thread
#[derive(Debug, Clone, Copy)]
pub enum EqCommand {
    /// Switch to a catalog preset
    SetPreset(PresetId),
    /// Enable or bypass the chain
    SetEnabled(bool),
    /// Reconfigure for a new audio format
    UpdateFormat(AudioFormat),
    /// Clear filter histories
    Reset,
}

/// Cloneable control handle for threads that do not own the pipeline
#[derive(Debug, Clone)]
pub struct EqController {
    sender: Sender<EqCommand>,
}

impl EqController {
    /// Queue a preset switch; false when the pipeline is gone
    pub fn set_preset(&self, id: PresetId) -> bool {
        self.send(EqCommand::SetPreset(id))
    }

    /// Queue a preset switch by raw wire index
    ///
    /// An unknown index is rejected here, before anything reaches the
    /// render thread.
    pub fn set_preset_index(&self, index: u8) -> bool {
        match PresetId::from_index(index) {
            Some(id) => self.set_preset(id),
            None => {
                warn!(index, "rejected unknown preset index");
                false
            }
        }
    }

    /// Queue an enable/bypass toggle
    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.send(EqCommand::SetEnabled(enabled))
    }

    /// Queue a format change
    pub fn update_format(&self, format: AudioFormat) -> bool {
        self.send(EqCommand::UpdateFormat(format))
    }

    /// Queue a state reset
    pub fn reset(&self) -> bool {
        self.send(EqCommand::Reset)
    }

    fn send(&self, command: EqCommand) -> bool {
        self.sender.send(command).is_ok()
    }
}

/// Snapshot returned by [`EqPipeline::get_stats`]
#[derive(Debug, Clone, Copy)]
pub struct PipelineStats {
    /// Estimated CPU usage of the current configuration
    pub cpu_usage_percent: f32,
    /// Filters currently active
    pub active_filter_count: usize,
    /// Currently loaded preset
    pub preset: PresetId,
    /// Whether the chain is processing (not bypassed)
    pub enabled: bool,
    /// Stereo frames processed so far
    pub frames_processed: u64,
    /// Buffers processed so far
    pub buffers_processed: u64,
    /// Largest post-limiter magnitude observed
    pub peak_level: f32,
}

/// Lifecycle wrapper exposing the DSP chain to the platform
pub struct EqPipeline {
    chain: DspChain,
    commands: Receiver<EqCommand>,
    handle: Sender<EqCommand>,
}

impl EqPipeline {
    /// Create an uninitialized pipeline
    pub fn new() -> Self {
        let (handle, commands) = mpsc::channel();
        Self {
            chain: DspChain::new(),
            commands,
            handle,
        }
    }

    /// Initialize for a stereo stream
    pub fn init(&mut self, sample_rate_hz: u32, bits_per_sample: u16) -> Result<()> {
        let format = AudioFormat::stereo(SampleRate::new(sample_rate_hz), bits_per_sample);
        self.chain.initialize(format)?;
        debug!(sample_rate_hz, bits_per_sample, "pipeline initialized");
        Ok(())
    }

    /// Hand out a control handle for other threads
    pub fn controller(&self) -> EqController {
        EqController {
            sender: self.handle.clone(),
        }
    }

    /// Switch preset immediately (single-threaded callers)
    pub fn set_preset(&mut self, id: PresetId) -> bool {
        self.chain.load_preset(id)
    }

    /// Switch preset by raw wire index; unknown index is an explicit failure
    pub fn set_preset_index(&mut self, index: u8) -> bool {
        match PresetId::from_index(index) {
            Some(id) => self.set_preset(id),
            None => false,
        }
    }

    /// Currently loaded preset
    pub fn get_preset(&self) -> PresetId {
        self.chain.preset()
    }

    /// Enable or bypass the chain
    pub fn set_enabled(&mut self, enabled: bool) {
        self.chain.set_bypass(!enabled);
    }

    /// Whether the chain is processing
    pub fn is_enabled(&self) -> bool {
        !self.chain.is_bypassed()
    }

    /// Reconfigure for a new stream format immediately
    pub fn update_format(&mut self, sample_rate_hz: u32, bits_per_sample: u16) -> Result<()> {
        let format = AudioFormat::stereo(SampleRate::new(sample_rate_hz), bits_per_sample);
        self.chain.update_format(format)
    }

    /// Clear filter histories
    pub fn reset(&mut self) {
        self.chain.reset();
    }

    /// Render-path entry point: drain queued control commands, then run
    /// the chain over the buffer in place
    ///
    /// A no-op pass-through before `init`.
    pub fn process(&mut self, buffer: &mut [i32], frame_count: usize) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }
        self.chain.process(buffer, frame_count);
    }

    fn apply(&mut self, command: EqCommand) {
        match command {
            EqCommand::SetPreset(id) => {
                if !self.chain.load_preset(id) {
                    warn!(?id, "preset command ignored: chain not initialized");
                }
            }
            EqCommand::SetEnabled(enabled) => self.chain.set_bypass(!enabled),
            EqCommand::UpdateFormat(format) => {
                if let Err(err) = self.chain.update_format(format) {
                    warn!(%err, "format command rejected");
                }
            }
            EqCommand::Reset => self.chain.reset(),
        }
    }

    /// Statistics snapshot for the UI layer
    pub fn get_stats(&self) -> PipelineStats {
        let stats = self.chain.stats();
        let budget = CpuBudget::for_chain(&self.chain);
        PipelineStats {
            cpu_usage_percent: budget.cpu_usage_percent(),
            active_filter_count: self.chain.active_filters(),
            preset: self.chain.preset(),
            enabled: !self.chain.is_bypassed(),
            frames_processed: stats.frames_processed,
            buffers_processed: stats.buffers_processed,
            peak_level: stats.peak_level,
        }
    }

    /// Current budget snapshot
    pub fn budget(&self) -> CpuBudget {
        CpuBudget::for_chain(&self.chain)
    }

    /// Whether `n` more filters would still meet the deadline
    pub fn can_add_filters(&self, n: usize) -> bool {
        self.budget().can_add_filters(n)
    }

    /// Pre-flight check for a preset switch
    pub fn validate_preset(&self, id: PresetId) -> bool {
        self.budget().validate_preset(id)
    }

    /// Filter budget for a hypothetical zero-filter stereo chain at `rate`
    pub fn max_filters_for_rate(rate: SampleRate) -> usize {
        CpuBudget::max_filters_for_rate(rate)
    }
}

impl Default for EqPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_then_flat_and_enabled() {
        let mut pipeline = EqPipeline::new();
        pipeline.init(48_000, 24).unwrap();
        assert_eq!(pipeline.get_preset(), PresetId::Flat);
        assert!(pipeline.is_enabled());
    }

    #[test]
    fn init_rejects_unsupported_depth() {
        let mut pipeline = EqPipeline::new();
        assert!(pipeline.init(48_000, 12).is_err());
    }

    #[test]
    fn process_before_init_is_noop() {
        let mut pipeline = EqPipeline::new();
        let mut buffer = vec![42i32; 128];
        let original = buffer.clone();
        pipeline.process(&mut buffer, 64);
        assert_eq!(buffer, original);
    }

    #[test]
    fn unknown_preset_index_fails_explicitly() {
        let mut pipeline = EqPipeline::new();
        pipeline.init(48_000, 24).unwrap();
        assert!(!pipeline.set_preset_index(200));
        // The failed switch changed nothing
        assert_eq!(pipeline.get_preset(), PresetId::Flat);
        assert!(pipeline.set_preset_index(PresetId::Rock.index()));
        assert_eq!(pipeline.get_preset(), PresetId::Rock);
    }

    #[test]
    fn controller_commands_apply_at_buffer_boundary() {
        let mut pipeline = EqPipeline::new();
        pipeline.init(48_000, 24).unwrap();
        let controller = pipeline.controller();

        assert!(controller.set_preset(PresetId::Jazz));
        assert!(controller.set_enabled(false));
        // Nothing applied until the render thread runs a buffer
        assert_eq!(pipeline.get_preset(), PresetId::Flat);

        let mut buffer = vec![0i32; 64];
        pipeline.process(&mut buffer, 32);
        assert_eq!(pipeline.get_preset(), PresetId::Jazz);
        assert!(!pipeline.is_enabled());
    }

    #[test]
    fn controller_rejects_unknown_index_before_queueing() {
        let mut pipeline = EqPipeline::new();
        pipeline.init(48_000, 24).unwrap();
        let controller = pipeline.controller();

        assert!(!controller.set_preset_index(99));
        let mut buffer = vec![0i32; 8];
        pipeline.process(&mut buffer, 4);
        assert_eq!(pipeline.get_preset(), PresetId::Flat);
    }

    #[test]
    fn controller_format_update_applies_on_render_thread() {
        let mut pipeline = EqPipeline::new();
        pipeline.init(48_000, 24).unwrap();
        pipeline.set_preset(PresetId::Rock);
        let controller = pipeline.controller();

        let format = AudioFormat::stereo(SampleRate::HIGH_RES_96, 24);
        assert!(controller.update_format(format));

        let mut buffer = vec![0i32; 8];
        pipeline.process(&mut buffer, 4);
        let stats = pipeline.get_stats();
        assert_eq!(stats.preset, PresetId::Rock);
        assert_eq!(pipeline.budget().sample_rate, SampleRate::HIGH_RES_96);
    }

    #[test]
    fn stats_reflect_configuration() {
        let mut pipeline = EqPipeline::new();
        pipeline.init(48_000, 24).unwrap();
        pipeline.set_preset(PresetId::Jazz);

        let stats = pipeline.get_stats();
        assert_eq!(stats.active_filter_count, 3);
        assert_eq!(stats.preset, PresetId::Jazz);
        assert!(stats.enabled);
        assert!(stats.cpu_usage_percent > 0.0);
    }

    #[test]
    fn budget_queries_through_facade() {
        let mut pipeline = EqPipeline::new();
        pipeline.init(48_000, 24).unwrap();

        let max = pipeline.budget().filters_max;
        assert!(pipeline.can_add_filters(max));
        assert!(!pipeline.can_add_filters(max + 1));
        assert!(pipeline.validate_preset(PresetId::Rock));
        assert_eq!(
            EqPipeline::max_filters_for_rate(SampleRate::DVD_QUALITY),
            max
        );
    }
}
