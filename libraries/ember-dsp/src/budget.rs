//! Closed-form CPU cycle budget for the DSP chain
//!
//! The player runs on a fixed-clock processor; every sample that arrives
//! must be fully processed before the next one or the output driver
//! underruns. This model answers, from calibrated per-operation cycle
//! estimates, how many biquads fit at a given sample rate.
//!
//! Everything here is advisory. The figures are estimates, nothing in the
//! core refuses a preset or format that blows the budget; exceeding it
//! degrades real-time behavior (audible glitches) rather than raising an
//! error.

use ember_core::types::{AudioFormat, SampleRate};

use crate::chain::DspChain;
use crate::presets::{Preset, PresetId};

/// Processor clock of the playback SoC
pub const CPU_CLOCK_HZ: f32 = 240_000_000.0;

/// Share of the cycle budget the DSP chain may claim; the rest is headroom
/// for scheduling jitter and the other firmware tasks
pub const SAFETY_MARGIN: f32 = 0.85;

/// Cycles per sample for conversion, limiting and clamping
pub const FIXED_OVERHEAD_CYCLES: f32 = 60.0;

/// Cycles per sample for one biquad section
pub const PER_FILTER_CYCLES: f32 = 180.0;

/// Cycles per sample for crossfeed. Dead figure until a crossfeed
/// algorithm is wired into the signal path; kept so budgets stay honest
/// for presets that reserve the flag.
pub const CROSSFEED_CYCLES: f32 = 140.0;

/// User-facing cap on simultaneously active filters
pub const SOFT_FILTER_LIMIT: usize = 10;

/// Hard cap baked into the chain's pre-allocated filter array
pub const HARDWARE_MAX_FILTERS: usize = 12;

/// How many filters fit into the remaining cycle budget
///
/// Kept as a free function over its inputs so the cost-model properties
/// are testable without fabricating whole chains.
fn filters_that_fit(cycles_available: f32, overhead_cycles: f32, per_filter_cycles: f32) -> usize {
    let remaining = cycles_available - overhead_cycles;
    if remaining <= 0.0 || per_filter_cycles <= 0.0 {
        return 0;
    }
    (remaining / per_filter_cycles).floor() as usize
}

/// Derived, non-persisted snapshot of the cycle budget
///
/// Computed on demand from a chain or a hypothetical format; never stored.
#[derive(Debug, Clone, Copy)]
pub struct CpuBudget {
    /// Sample rate the snapshot was computed for
    pub sample_rate: SampleRate,
    /// Raw cycles between two samples of one channel pair
    pub cycles_per_sample: f32,
    /// Cycles the chain may actually claim (after the safety margin)
    pub cycles_available: f32,
    /// Estimated cycles the current configuration consumes per sample
    pub cycles_used: f32,
    /// Most filters this configuration could run, all caps applied
    pub filters_max: usize,
    /// Filters currently active in the chain
    pub active_filters: usize,
    /// Whether the crossfeed reservation is counted
    pub crossfeed: bool,
}

impl CpuBudget {
    /// Snapshot the budget for a live chain
    pub fn for_chain(chain: &DspChain) -> Self {
        Self::for_format(
            &chain.format(),
            chain.active_filters(),
            chain.crossfeed_reserved(),
        )
    }

    /// Compute the budget for an arbitrary configuration
    pub fn for_format(format: &AudioFormat, active_filters: usize, crossfeed: bool) -> Self {
        let channels = f32::from(format.channels.max(1));
        let cycles_per_sample = CPU_CLOCK_HZ / (format.sample_rate.as_hz() as f32 * channels);
        let cycles_available = cycles_per_sample * SAFETY_MARGIN;

        let mut overhead = FIXED_OVERHEAD_CYCLES;
        if crossfeed {
            overhead += CROSSFEED_CYCLES;
        }

        let fit = filters_that_fit(cycles_available, overhead, PER_FILTER_CYCLES);
        let filters_max = fit.min(SOFT_FILTER_LIMIT).min(HARDWARE_MAX_FILTERS);

        let cycles_used = overhead + active_filters as f32 * PER_FILTER_CYCLES;

        Self {
            sample_rate: format.sample_rate,
            cycles_per_sample,
            cycles_available,
            cycles_used,
            filters_max,
            active_filters,
            crossfeed,
        }
    }

    /// Budget for a hypothetical zero-filter stereo chain at `rate`
    ///
    /// Used to validate a format change before it is applied.
    pub fn max_filters_for_rate(rate: SampleRate) -> usize {
        let format = AudioFormat::stereo(rate, 32);
        Self::for_format(&format, 0, false).filters_max
    }

    /// Whether `n` more filters would still meet the deadline
    ///
    /// Two independent checks: the filter-count cap and the cycle-cost cap
    /// can diverge at extreme sample rates, so passing one never implies
    /// the other.
    pub fn can_add_filters(&self, n: usize) -> bool {
        let prospective = self.active_filters + n;
        if prospective > self.filters_max {
            return false;
        }
        let mut overhead = FIXED_OVERHEAD_CYCLES;
        if self.crossfeed {
            overhead += CROSSFEED_CYCLES;
        }
        let prospective_cycles = overhead + prospective as f32 * PER_FILTER_CYCLES;
        prospective_cycles <= self.cycles_available
    }

    /// Pre-flight check for a preset switch; mutates nothing
    ///
    /// Applies the same two checks to the prospective preset's filter count
    /// and cost, counting its crossfeed reservation.
    pub fn validate_preset(&self, id: PresetId) -> bool {
        let preset = Preset::lookup(id);
        let count = preset.filters.len().min(HARDWARE_MAX_FILTERS);

        let format = AudioFormat::stereo(self.sample_rate, 32);
        let prospective = Self::for_format(&format, count, preset.crossfeed);

        count <= prospective.filters_max && prospective.cycles_used <= prospective.cycles_available
    }

    /// Estimated share of the raw per-sample budget in use, as a percentage
    pub fn cpu_usage_percent(&self) -> f32 {
        if self.cycles_per_sample <= 0.0 {
            return 0.0;
        }
        (self.cycles_used / self.cycles_per_sample * 100.0).min(100.0)
    }
}
