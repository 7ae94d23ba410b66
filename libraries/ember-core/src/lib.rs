//! Ember Player Core
//!
//! Platform-agnostic types, traits, and error handling for Ember Player.
//!
//! The core crate defines:
//! - **Audio Types**: `SampleRate`, `AudioFormat`
//! - **Core Traits**: `PcmEffect`
//! - **Error Handling**: Unified `EmberError` and `Result` types
//!
//! The hardware output driver, source selection and the UI layer live in
//! their own crates and only exchange these types with the DSP core.

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EmberError, Result};
pub use traits::PcmEffect;
pub use types::{AudioFormat, SampleRate};
