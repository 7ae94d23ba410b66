//! Soft saturation limiter
//!
//! Hard digital clipping folds the overshoot into odd harmonics that are
//! immediately audible. Instead, everything above the 0.95 threshold is
//! squeezed through a tanh curve that stays continuous at the breakpoint
//! and strictly inside (-1, 1).
//!
//! The `hard-clip` cargo feature swaps in a plain clamp at build time for
//! targets without a fast tanh; there is no runtime switch.

/// Samples at or below this magnitude pass through untouched
pub const SOFT_LIMIT_THRESHOLD: f32 = 0.95;

/// Width of the saturation region above the threshold
const KNEE: f32 = 0.05;

/// Limit one sample
///
/// Identity for |x| <= 0.95, then sign(x) * (0.95 + 0.05 * tanh((|x| - 0.95) / 0.05)).
/// Monotonic, continuous at the breakpoint, output strictly within (-1, 1).
#[cfg(not(feature = "hard-clip"))]
#[inline]
pub fn soft_limit(x: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude <= SOFT_LIMIT_THRESHOLD {
        return x;
    }
    let limited = SOFT_LIMIT_THRESHOLD + KNEE * ((magnitude - SOFT_LIMIT_THRESHOLD) / KNEE).tanh();
    limited.copysign(x)
}

/// Limit one sample (hard clamp build)
#[cfg(feature = "hard-clip")]
#[inline]
pub fn soft_limit(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}
