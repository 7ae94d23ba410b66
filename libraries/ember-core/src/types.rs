/// Audio-related types
use serde::{Deserialize, Serialize};

use crate::error::{EmberError, Result};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);
    pub const HIGH_RES_88: Self = Self(88_200);
    pub const HIGH_RES_96: Self = Self(96_000);
    pub const HIGH_RES_176: Self = Self(176_400);
    pub const HIGH_RES_192: Self = Self(192_000);

    /// Lowest rate the output hardware supports
    pub const MIN: Self = Self(8_000);
    /// Highest rate the output hardware supports
    pub const MAX: Self = Self(192_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }

    /// Nyquist frequency (half the sample rate) in Hz
    pub fn nyquist_hz(&self) -> f32 {
        self.0 as f32 / 2.0
    }
}

/// Audio format information
///
/// The playback hardware is stereo-only; `channels` is carried for
/// completeness but validation rejects anything other than 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (fixed at 2 in the current hardware)
    pub channels: u16,

    /// Bits per sample
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Create a new stereo audio format
    pub fn stereo(sample_rate: SampleRate, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels: 2,
            bits_per_sample,
        }
    }

    /// Create CD quality stereo format (44.1kHz, 16-bit, stereo)
    pub fn cd_quality() -> Self {
        Self::stereo(SampleRate::CD_QUALITY, 16)
    }

    /// Validate against the capabilities of the playback hardware
    ///
    /// Rejects non-stereo layouts, unsupported bit depths and sample rates
    /// outside the hardware range.
    pub fn validate(&self) -> Result<()> {
        if self.channels != 2 {
            return Err(EmberError::invalid_format(format!(
                "only stereo is supported, got {} channels",
                self.channels
            )));
        }
        if !matches!(self.bits_per_sample, 16 | 24 | 32) {
            return Err(EmberError::invalid_format(format!(
                "unsupported bit depth: {}",
                self.bits_per_sample
            )));
        }
        let hz = self.sample_rate.as_hz();
        if hz < SampleRate::MIN.as_hz() || hz > SampleRate::MAX.as_hz() {
            return Err(EmberError::invalid_format(format!(
                "sample rate {} Hz outside supported range",
                hz
            )));
        }
        Ok(())
    }

    /// Calculate the byte rate (bytes per second)
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.as_hz() * u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_common_values() {
        assert_eq!(SampleRate::CD_QUALITY.as_hz(), 44_100);
        assert_eq!(SampleRate::DVD_QUALITY.as_hz(), 48_000);
    }

    #[test]
    fn nyquist_is_half_rate() {
        assert_eq!(SampleRate::DVD_QUALITY.nyquist_hz(), 24_000.0);
    }

    #[test]
    fn stereo_format_validates() {
        let format = AudioFormat::stereo(SampleRate::DVD_QUALITY, 24);
        assert!(format.validate().is_ok());
    }

    #[test]
    fn mono_format_rejected() {
        let mut format = AudioFormat::cd_quality();
        format.channels = 1;
        assert!(format.validate().is_err());
    }

    #[test]
    fn odd_bit_depth_rejected() {
        let format = AudioFormat::stereo(SampleRate::CD_QUALITY, 20);
        assert!(format.validate().is_err());
    }

    #[test]
    fn out_of_range_rate_rejected() {
        let format = AudioFormat::stereo(SampleRate::new(4_000), 16);
        assert!(format.validate().is_err());
        let format = AudioFormat::stereo(SampleRate::new(384_000), 16);
        assert!(format.validate().is_err());
    }

    #[test]
    fn audio_format_byte_rate() {
        let format = AudioFormat::cd_quality();
        // 44100 Hz * 2 channels * 16 bits / 8 = 176,400 bytes/sec
        assert_eq!(format.byte_rate(), 176_400);
    }
}
