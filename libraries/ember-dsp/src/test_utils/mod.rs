//! Test utilities for DSP verification
//!
//! Signal generation and analysis helpers used by the integration tests
//! and benchmarks. Not part of the firmware signal path.

pub mod analysis;
pub mod signals;

pub use analysis::*;
pub use signals::*;
