//! Ember Player DSP
//!
//! Real-time equalizer core for the Ember embedded audio player:
//! a cascade of biquad filters with named presets, bypass, dynamic
//! sample-rate reconfiguration, a soft saturation limiter and a
//! closed-form CPU cycle budget.
//!
//! The platform render loop delivers fixed-size interleaved-stereo 32-bit
//! PCM buffers at a steady cadence; the chain converts to float, runs the
//! cascade, limits, and converts back in place. Everything on that path is
//! allocation-free and non-blocking; the caller enforces the real-time
//! deadline.
//!
//! # Example
//!
//! ```rust
//! use ember_dsp::pipeline::EqPipeline;
//! use ember_dsp::presets::PresetId;
//!
//! # fn example() -> ember_core::Result<()> {
//! let mut pipeline = EqPipeline::new();
//! pipeline.init(48_000, 24)?;
//! pipeline.set_preset(PresetId::Rock);
//!
//! let mut buffer = vec![0i32; 1024]; // 512 stereo frames
//! pipeline.process(&mut buffer, 512);
//!
//! let stats = pipeline.get_stats();
//! assert_eq!(stats.active_filter_count, 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod biquad;
pub mod budget;
pub mod chain;
pub mod limiter;
pub mod pipeline;
pub mod presets;
pub mod test_utils;

pub use biquad::{BiquadFilter, BiquadParams, Coefficients, FilterKind};
pub use budget::{CpuBudget, HARDWARE_MAX_FILTERS, SOFT_FILTER_LIMIT};
pub use chain::{DspChain, DspStats};
pub use limiter::{soft_limit, SOFT_LIMIT_THRESHOLD};
pub use pipeline::{EqCommand, EqController, EqPipeline, PipelineStats};
pub use presets::{FilterSpec, Preset, PresetId, PRESET_MAX_FILTERS};
