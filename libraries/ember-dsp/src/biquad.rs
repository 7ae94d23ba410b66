//! Second-order IIR filter section (biquad)
//!
//! Coefficient design follows the RBJ audio-EQ cookbook (bilinear transform).
//! Filters run as Direct Form I with independent state per channel, which
//! keeps input and output history explicit and makes a state reset trivially
//! complete.
//!
//! All arithmetic is single precision. Degenerate design parameters never
//! fail: they produce the identity pass-through so a misconfigured band
//! stays silent instead of corrupting the signal.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Biquad filter topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Passes frequencies below the cutoff
    Lowpass,
    /// Passes frequencies above the cutoff
    Highpass,
    /// Passes a band around the center frequency (0 dB peak gain)
    Bandpass,
    /// Rejects a band around the center frequency
    Notch,
    /// Boosts/cuts around the center frequency with Q bandwidth
    Peak,
    /// Boosts/cuts below the corner frequency
    LowShelf,
    /// Boosts/cuts above the corner frequency
    HighShelf,
    /// Flat magnitude, frequency-dependent phase shift
    Allpass,
}

impl FilterKind {
    /// Map a raw wire identifier (remote control protocol) to a filter kind
    ///
    /// Unknown identifiers are an explicit `None`; callers that must keep
    /// the audio path alive fall back to the identity filter.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Lowpass),
            1 => Some(Self::Highpass),
            2 => Some(Self::Bandpass),
            3 => Some(Self::Notch),
            4 => Some(Self::Peak),
            5 => Some(Self::LowShelf),
            6 => Some(Self::HighShelf),
            7 => Some(Self::Allpass),
            _ => None,
        }
    }

    /// Whether this kind uses the gain parameter
    pub fn uses_gain(&self) -> bool {
        matches!(self, Self::Peak | Self::LowShelf | Self::HighShelf)
    }
}

/// Full parameter set for designing one biquad section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadParams {
    /// Filter topology
    pub kind: FilterKind,
    /// Center/corner frequency in Hz
    pub frequency_hz: f32,
    /// Gain in dB (shelf and peak kinds only, ignored otherwise)
    pub gain_db: f32,
    /// Q factor
    pub q: f32,
    /// Sample rate in Hz
    pub sample_rate_hz: f32,
}

impl BiquadParams {
    /// Design parameters are usable when the frequency sits strictly inside
    /// (0, Nyquist), Q is positive and the sample rate is sane.
    ///
    /// The Q floor keeps alpha = sin(w)/(2Q) representable; below it the
    /// section is degenerate anyway.
    fn is_designable(&self) -> bool {
        self.sample_rate_hz >= 1.0
            && self.q >= 1e-3
            && self.frequency_hz > 0.0
            && self.frequency_hz < self.sample_rate_hz / 2.0
            && self.frequency_hz.is_finite()
            && self.gain_db.is_finite()
    }
}

/// Normalized biquad coefficients (a0 divided out)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl Coefficients {
    /// Identity pass-through (y[n] = x[n])
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Compute coefficients for the given parameters
    ///
    /// RBJ cookbook design: w = 2*pi*f/fs, alpha = sin(w)/(2Q),
    /// A = 10^(gain/40); each kind has its own closed form, normalized by
    /// a0 on the way out. Degenerate parameters yield `IDENTITY`.
    pub fn design(params: &BiquadParams) -> Self {
        if !params.is_designable() {
            return Self::IDENTITY;
        }

        let omega = 2.0 * PI * params.frequency_hz / params.sample_rate_hz;
        let sin_w = omega.sin();
        let cos_w = omega.cos();
        let alpha = sin_w / (2.0 * params.q);
        let a = 10.0_f32.powf(params.gain_db / 40.0);

        let (b0, b1, b2, a0, a1, a2) = match params.kind {
            FilterKind::Lowpass => (
                (1.0 - cos_w) / 2.0,
                1.0 - cos_w,
                (1.0 - cos_w) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w,
                1.0 - alpha,
            ),
            FilterKind::Highpass => (
                (1.0 + cos_w) / 2.0,
                -(1.0 + cos_w),
                (1.0 + cos_w) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w,
                1.0 - alpha,
            ),
            FilterKind::Bandpass => {
                // Constant 0 dB peak gain variant
                (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w, 1.0 - alpha)
            }
            FilterKind::Notch => (
                1.0,
                -2.0 * cos_w,
                1.0,
                1.0 + alpha,
                -2.0 * cos_w,
                1.0 - alpha,
            ),
            FilterKind::Peak => (
                1.0 + alpha * a,
                -2.0 * cos_w,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * cos_w,
                1.0 - alpha / a,
            ),
            FilterKind::LowShelf => {
                let alpha_s =
                    sin_w / 2.0 * ((a + 1.0 / a) * (1.0 / params.q - 1.0) + 2.0).max(0.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha_s;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w + beta),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w),
                    a * ((a + 1.0) - (a - 1.0) * cos_w - beta),
                    (a + 1.0) + (a - 1.0) * cos_w + beta,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w),
                    (a + 1.0) + (a - 1.0) * cos_w - beta,
                )
            }
            FilterKind::HighShelf => {
                let alpha_s =
                    sin_w / 2.0 * ((a + 1.0 / a) * (1.0 / params.q - 1.0) + 2.0).max(0.0).sqrt();
                let beta = 2.0 * a.sqrt() * alpha_s;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w + beta),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w),
                    a * ((a + 1.0) + (a - 1.0) * cos_w - beta),
                    (a + 1.0) - (a - 1.0) * cos_w + beta,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w),
                    (a + 1.0) - (a - 1.0) * cos_w - beta,
                )
            }
            FilterKind::Allpass => (
                1.0 - alpha,
                -2.0 * cos_w,
                1.0 + alpha,
                1.0 + alpha,
                -2.0 * cos_w,
                1.0 - alpha,
            ),
        };

        if a0.abs() < f32::EPSILON {
            return Self::IDENTITY;
        }

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Direct Form I state for one channel
#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl ChannelState {
    #[inline]
    fn run(&mut self, c: &Coefficients, x: f32) -> f32 {
        let y = c.b0 * x + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One stereo biquad section: coefficients plus per-channel DF-I state
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coeffs: Coefficients,
    left: ChannelState,
    right: ChannelState,
}

impl BiquadFilter {
    /// Create a pass-through section
    pub fn identity() -> Self {
        Self {
            coeffs: Coefficients::IDENTITY,
            left: ChannelState::default(),
            right: ChannelState::default(),
        }
    }

    /// Recompute all coefficients from parameters and clear state
    ///
    /// Coefficients are always replaced as a full set, never patched
    /// incrementally. State is cleared because a topology change with stale
    /// history produces an audible transient.
    pub fn configure(&mut self, params: &BiquadParams) {
        self.coeffs = Coefficients::design(params);
        self.reset();
    }

    /// Zero the state registers of both channels; coefficients untouched
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    /// Current coefficients
    pub fn coefficients(&self) -> Coefficients {
        self.coeffs
    }

    /// True when every state register is zero
    pub fn state_is_zero(&self) -> bool {
        let l = &self.left;
        let r = &self.right;
        l.x1 == 0.0
            && l.x2 == 0.0
            && l.y1 == 0.0
            && l.y2 == 0.0
            && r.x1 == 0.0
            && r.x2 == 0.0
            && r.y1 == 0.0
            && r.y2 == 0.0
    }

    /// Run one stereo frame through the section
    ///
    /// Real-time path: no allocation, no branching beyond the arithmetic.
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        let c = self.coeffs;
        (self.left.run(&c, left), self.right.run(&c, right))
    }
}

impl Default for BiquadFilter {
    fn default() -> Self {
        Self::identity()
    }
}
