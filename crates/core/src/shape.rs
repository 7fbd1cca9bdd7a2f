//! Wave phase and the shaping functions that turn phase into intensity.
//!
//! A traveling wave is reduced to a phase in [0, 1) per sample point; the
//! configured [`WaveShape`] maps that phase to an intensity in [0, 1].
//! All functions here are total: out-of-range or non-finite input yields a
//! value in [0, 1], never NaN.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Phase above which a breaking wave collapses to zero.
pub const BREAK_THRESHOLD: f64 = 0.99;

/// Smallest rise fraction a peak/trough wave accepts; avoids dividing by 0.
const MIN_STEEPNESS: f64 = 1e-6;

/// The shaping function a configuration uses. One per configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveShape {
    /// `0.5 + 0.5 sin(2π phase)`.
    #[default]
    Sine,
    /// Linear sawtooth ramp: intensity equals phase.
    Ramp,
    /// Rise over `steepness`, hold over `peak_softness`, fall over the rest.
    PeakTrough,
    /// Power curve `phase^(2 + 8 convexity)` with a hard drop past
    /// [`BREAK_THRESHOLD`].
    Breaking,
    /// Layered noise sampled at the warped, wind-advected coordinate. Phase
    /// is not used.
    Noise,
}

impl WaveShape {
    pub const ALL: [WaveShape; 5] = [
        WaveShape::Sine,
        WaveShape::Ramp,
        WaveShape::PeakTrough,
        WaveShape::Breaking,
        WaveShape::Noise,
    ];

    /// Stable snake_case name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            WaveShape::Sine => "sine",
            WaveShape::Ramp => "ramp",
            WaveShape::PeakTrough => "peak_trough",
            WaveShape::Breaking => "breaking",
            WaveShape::Noise => "noise",
        }
    }

    /// Looks a shape up by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

/// Phase of a traveling wave at coordinate `coord`, in [0, 1).
///
/// `mod(coord * frequency - time * speed, 2π) / 2π`. Non-finite input gives 0.
#[inline]
pub fn wave_phase(coord: f64, frequency: f64, time: f64, speed: f64) -> f64 {
    let phase = (coord * frequency - time * speed).rem_euclid(TAU) / TAU;
    // rem_euclid can round up to exactly TAU for tiny negative arguments.
    if phase.is_finite() && phase < 1.0 {
        phase
    } else {
        0.0
    }
}

#[inline]
pub fn sine(phase: f64) -> f64 {
    0.5 + 0.5 * (phase * TAU).sin()
}

#[inline]
pub fn ramp(phase: f64) -> f64 {
    phase.clamp(0.0, 1.0)
}

/// Piecewise peak/trough ramp.
///
/// Rises linearly to 1 over `[0, steepness)`, holds 1 for `peak_softness`,
/// then falls linearly back to 0 by the end of the period.
pub fn peak_trough(phase: f64, steepness: f64, peak_softness: f64) -> f64 {
    let rise = steepness.clamp(MIN_STEEPNESS, 1.0);
    let hold = peak_softness.clamp(0.0, 1.0 - rise);
    let fall_start = rise + hold;
    let fall = 1.0 - fall_start;

    let v = if phase < rise {
        phase / rise
    } else if phase < fall_start || fall <= 0.0 {
        1.0
    } else {
        1.0 - (phase - fall_start) / fall
    };
    v.clamp(0.0, 1.0)
}

/// Breaking-wave power curve with the cutoff past [`BREAK_THRESHOLD`].
pub fn breaking(phase: f64, convexity: f64) -> f64 {
    if phase > BREAK_THRESHOLD {
        return 0.0;
    }
    let exponent = 2.0 + 8.0 * convexity.clamp(0.0, 1.0);
    phase.clamp(0.0, 1.0).powf(exponent)
}
