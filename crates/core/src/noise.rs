//! Noise kernel: the scalar noise primitives the field composer builds on.
//!
//! Two independent families are available, because different presets want
//! different textures:
//!
//! - [`NoiseFamily::Gradient`]: smooth Perlin gradient noise (via the `noise`
//!   crate), range [-1, 1].
//! - [`NoiseFamily::Lattice`]: hashed value noise. Each integer lattice corner
//!   gets a pseudo-random value from [`crate::hash`], and samples between
//!   corners are cosine-eased bilinear blends. Range [0, 1].
//!
//! Everything here runs once per grid point per tick, so no call allocates.
//! Same seed and same inputs always give bit-identical results.

use std::f64::consts::PI;
use std::fmt;

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::hash::lattice_value;

/// Frequency multiplier between successive octaves of layered noise.
pub const LACUNARITY: f64 = 2.0;

/// Upper bound on octaves; anything beyond is invisible at grid resolution.
pub const MAX_OCTAVES: u32 = 16;

/// Per-unit-time drift of the layered noise domain.
const TIME_DRIFT_X: f64 = 1.0;
const TIME_DRIFT_Y: f64 = 0.7;

/// Offset between octaves so they do not share lattice alignment.
const OCTAVE_OFFSET: f64 = 17.31;

/// Which base noise a configuration samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseFamily {
    /// Perlin gradient noise.
    #[default]
    Gradient,
    /// Hashed lattice (value) noise with cosine easing.
    Lattice,
}

impl NoiseFamily {
    /// All families, in declaration order.
    pub const ALL: [NoiseFamily; 2] = [NoiseFamily::Gradient, NoiseFamily::Lattice];

    /// Stable lowercase name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            NoiseFamily::Gradient => "gradient",
            NoiseFamily::Lattice => "lattice",
        }
    }

    /// Looks a family up by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// Converts a raw (possibly fractional or invalid) octave count to a usable one.
///
/// Floors the value; anything below 1, NaN or infinite becomes 1, and the
/// result is capped at [`MAX_OCTAVES`].
pub fn octave_count(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    (raw.floor() as u32).min(MAX_OCTAVES)
}

/// Seeded noise primitives. Build once, sample many times.
pub struct NoiseKernel {
    perlin: Perlin,
    seed: u32,
}

impl NoiseKernel {
    /// Creates a kernel whose gradient and lattice noise both derive from `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// The seed this kernel was built with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Perlin gradient noise at `(x, y)`, in [-1, 1].
    ///
    /// Non-finite results (from non-finite input) come back as 0.
    #[inline]
    pub fn gradient(&self, x: f64, y: f64) -> f64 {
        let v = self.perlin.get([x, y]);
        if v.is_finite() {
            v.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Hashed lattice noise at `(x, y)`, in [0, 1].
    ///
    /// Non-finite input returns the midpoint 0.5.
    #[inline]
    pub fn lattice(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.5;
        }
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = cosine_ease(x - x0);
        let ty = cosine_ease(y - y0);
        let ix = x0 as i64;
        let iy = y0 as i64;
        let ix1 = ix.wrapping_add(1);
        let iy1 = iy.wrapping_add(1);

        let v00 = lattice_value(ix, iy, self.seed);
        let v10 = lattice_value(ix1, iy, self.seed);
        let v01 = lattice_value(ix, iy1, self.seed);
        let v11 = lattice_value(ix1, iy1, self.seed);

        lerp(lerp(v00, v10, tx), lerp(v01, v11, tx), ty)
    }

    /// Single-octave sample of `family`, remapped to [-1, 1].
    #[inline]
    pub fn sample(&self, family: NoiseFamily, x: f64, y: f64) -> f64 {
        match family {
            NoiseFamily::Gradient => self.gradient(x, y),
            NoiseFamily::Lattice => self.lattice(x, y) * 2.0 - 1.0,
        }
    }

    /// Layered (fractal) noise: a raw, un-normalized sum of octaves.
    ///
    /// Octave `i` samples at `base_frequency * LACUNARITY^i` with amplitude
    /// `persistence^i`. `time` drifts the sampling domain so the pattern
    /// moves. `octaves` goes through [`octave_count`] first.
    #[allow(clippy::too_many_arguments)]
    pub fn layered(
        &self,
        family: NoiseFamily,
        x: f64,
        y: f64,
        time: f64,
        octaves: f64,
        persistence: f64,
        base_frequency: f64,
    ) -> f64 {
        let drift_x = time * TIME_DRIFT_X;
        let drift_y = time * TIME_DRIFT_Y;
        let (sum, _, _) = (0..octave_count(octaves)).fold(
            (0.0, 1.0, base_frequency),
            |(sum, amp, freq), octave| {
                let offset = f64::from(octave) * OCTAVE_OFFSET;
                let sx = x * freq + drift_x + offset;
                let sy = y * freq + drift_y + offset;
                (
                    sum + self.sample(family, sx, sy) * amp,
                    amp * persistence,
                    freq * LACUNARITY,
                )
            },
        );
        sum
    }
}

impl Clone for NoiseKernel {
    fn clone(&self) -> Self {
        Self::new(self.seed)
    }
}

impl fmt::Debug for NoiseKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseKernel")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Cosine easing of `t` in [0, 1]: zero slope at both ends, so neighbouring
/// lattice cells meet without a visible crease.
#[inline]
fn cosine_ease(t: f64) -> f64 {
    (1.0 - (t * PI).cos()) * 0.5
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel() -> NoiseKernel {
        NoiseKernel::new(42)
    }

    // -- octave_count --

    #[test]
    fn octave_count_floors_fractional_values() {
        assert_eq!(octave_count(3.9), 3);
        assert_eq!(octave_count(1.0), 1);
    }

    #[test]
    fn octave_count_clamps_small_and_invalid_values_to_one() {
        assert_eq!(octave_count(0.0), 1);
        assert_eq!(octave_count(0.5), 1);
        assert_eq!(octave_count(-4.0), 1);
        assert_eq!(octave_count(f64::NAN), 1);
        assert_eq!(octave_count(f64::INFINITY), 1);
    }

    #[test]
    fn octave_count_caps_at_maximum() {
        assert_eq!(octave_count(1e9), MAX_OCTAVES);
    }

    // -- gradient --

    #[test]
    fn gradient_is_deterministic() {
        let k = kernel();
        let a = k.gradient(1.3, 2.7);
        let b = k.gradient(1.3, 2.7);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn gradient_matches_across_kernels_with_same_seed() {
        let a = NoiseKernel::new(7);
        let b = NoiseKernel::new(7);
        for i in 0..100 {
            let x = i as f64 * 0.37;
            let y = i as f64 * -0.11;
            assert_eq!(a.gradient(x, y).to_bits(), b.gradient(x, y).to_bits());
        }
    }

    #[test]
    fn gradient_is_continuous() {
        let k = kernel();
        for i in 0..200 {
            let x = i as f64 * 0.173;
            let y = i as f64 * 0.091;
            let delta = (k.gradient(x + 1e-6, y) - k.gradient(x, y)).abs();
            assert!(delta < 1e-3, "jump of {delta} at ({x}, {y})");
        }
    }

    #[test]
    fn gradient_of_non_finite_input_is_zero() {
        let k = kernel();
        assert_eq!(k.gradient(f64::NAN, 1.0), 0.0);
    }

    // -- lattice --

    #[test]
    fn lattice_at_integer_corner_equals_hashed_value() {
        let k = kernel();
        let expected = lattice_value(3, -2, 42);
        assert!((k.lattice(3.0, -2.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn lattice_has_no_seam_at_cell_boundaries() {
        let k = kernel();
        for i in -10..10 {
            let edge = i as f64;
            let below = k.lattice(edge - 1e-9, 0.37);
            let above = k.lattice(edge + 1e-9, 0.37);
            assert!(
                (below - above).abs() < 1e-6,
                "seam at x={edge}: {below} vs {above}"
            );
        }
    }

    #[test]
    fn lattice_of_non_finite_input_is_midpoint() {
        let k = kernel();
        assert_eq!(k.lattice(f64::INFINITY, 0.0), 0.5);
    }

    #[test]
    fn sample_remaps_lattice_to_signed_range() {
        let k = kernel();
        let raw = k.lattice(0.4, 0.6);
        let signed = k.sample(NoiseFamily::Lattice, 0.4, 0.6);
        assert!((signed - (raw * 2.0 - 1.0)).abs() < 1e-12);
    }

    // -- layered --

    #[test]
    fn layered_with_one_octave_matches_base_sample() {
        let k = kernel();
        let layered = k.layered(NoiseFamily::Gradient, 1.0, 2.0, 0.0, 1.0, 0.5, 0.25);
        let base = k.sample(NoiseFamily::Gradient, 0.25, 0.5);
        assert!((layered - base).abs() < 1e-12);
    }

    #[test]
    fn layered_with_zero_persistence_keeps_only_first_octave() {
        let k = kernel();
        let one = k.layered(NoiseFamily::Lattice, 3.3, 1.1, 0.5, 1.0, 0.0, 0.1);
        let many = k.layered(NoiseFamily::Lattice, 3.3, 1.1, 0.5, 6.0, 0.0, 0.1);
        assert!((one - many).abs() < 1e-12);
    }

    #[test]
    fn layered_fractional_octaves_floor() {
        let k = kernel();
        let three = k.layered(NoiseFamily::Gradient, 0.3, 0.9, 1.0, 3.0, 0.5, 0.2);
        let fractional = k.layered(NoiseFamily::Gradient, 0.3, 0.9, 1.0, 3.7, 0.5, 0.2);
        assert_eq!(three.to_bits(), fractional.to_bits());
    }

    #[test]
    fn layered_sum_is_bounded_by_amplitude_series() {
        let k = kernel();
        // 1 + 0.5 + 0.25 + 0.125
        let bound = 1.875;
        for i in 0..500 {
            let x = i as f64 * 0.77;
            let v = k.layered(NoiseFamily::Gradient, x, -x, i as f64, 4.0, 0.5, 0.05);
            assert!(v.abs() <= bound + 1e-9, "layered value {v} exceeds {bound}");
        }
    }

    #[test]
    fn family_names_round_trip() {
        for family in NoiseFamily::ALL {
            assert_eq!(NoiseFamily::from_name(family.name()), Some(family));
        }
        assert_eq!(NoiseFamily::from_name("LATTICE"), Some(NoiseFamily::Lattice));
        assert_eq!(NoiseFamily::from_name("worley"), None);
    }

    #[test]
    fn cloned_kernel_produces_identical_noise() {
        let a = kernel();
        let b = a.clone();
        assert_eq!(b.seed(), 42);
        assert_eq!(a.gradient(0.3, 0.8).to_bits(), b.gradient(0.3, 0.8).to_bits());
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_coord() -> impl Strategy<Value = f64> {
            -1e4_f64..1e4
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(10_000))]

            #[test]
            fn gradient_in_range_and_deterministic(x in any_coord(), y in any_coord()) {
                let k = NoiseKernel::new(42);
                let a = k.gradient(x, y);
                let b = k.gradient(x, y);
                prop_assert_eq!(a.to_bits(), b.to_bits());
                prop_assert!((-1.2..=1.2).contains(&a), "gradient({x}, {y}) = {a}");
            }
        }

        proptest! {
            #[test]
            fn lattice_in_unit_interval(x in any_coord(), y in any_coord(), seed: u32) {
                let v = NoiseKernel::new(seed).lattice(x, y);
                prop_assert!((0.0..=1.0).contains(&v), "lattice({x}, {y}) = {v}");
            }

            #[test]
            fn layered_is_finite(
                x in any_coord(),
                y in any_coord(),
                t in 0.0_f64..1e4,
                octaves in -3.0_f64..20.0,
                persistence in 0.0_f64..1.0,
            ) {
                let k = NoiseKernel::new(1);
                for family in NoiseFamily::ALL {
                    let v = k.layered(family, x, y, t, octaves, persistence, 0.05);
                    prop_assert!(v.is_finite(), "{family:?} layered = {v}");
                }
            }
        }
    }
}
