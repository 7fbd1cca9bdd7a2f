//! Named starting configurations.
//!
//! Every visual variant of the wave field is the same composer pipeline with
//! different knobs. A preset is just a [`FieldConfig`]; hosts load one and let
//! the user tweak from there.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::config::FieldConfig;
use crate::error::WaveError;
use crate::noise::NoiseFamily;
use crate::params::{ColorId, ParamId};
use crate::shape::WaveShape;

/// All preset names, in [`Preset::ALL`] order.
const PRESET_NAMES: &[&str] = &[
    "classic", "ramp", "swell", "breaking", "drift", "lattice", "storm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Sine pulse across unit-spaced dots.
    #[default]
    Classic,
    /// Sawtooth ramp sweeping across the grid.
    Ramp,
    /// Rise, plateau and fall of a peak/trough swell.
    Swell,
    /// Power-curve wave that collapses at the crest.
    Breaking,
    /// Gradient noise blown along by wind.
    Drift,
    /// Hashed lattice noise.
    Lattice,
    /// Breaking wave under heavy curvature warp and froth.
    Storm,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Classic,
        Preset::Ramp,
        Preset::Swell,
        Preset::Breaking,
        Preset::Drift,
        Preset::Lattice,
        Preset::Storm,
    ];

    pub fn name(self) -> &'static str {
        PRESET_NAMES[self as usize]
    }

    /// Looks a preset up by name (case-insensitive).
    ///
    /// Returns `WaveError::UnknownPreset` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, WaveError> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| WaveError::UnknownPreset(name.to_owned()))
    }

    /// Returns a slice of all recognized preset names.
    pub fn list_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Classic => "sine pulse across unit-spaced dots",
            Preset::Ramp => "sawtooth ramp sweeping across the grid",
            Preset::Swell => "peak/trough swell with a soft plateau",
            Preset::Breaking => "power-curve wave collapsing at the crest",
            Preset::Drift => "gradient noise advected by wind",
            Preset::Lattice => "hashed lattice noise",
            Preset::Storm => "breaking wave with curvature warp and froth",
        }
    }

    /// The configuration this preset starts from.
    pub fn config(self) -> FieldConfig {
        let base = FieldConfig::default();
        match self {
            // Base size 0.5 seen from z = 50 (x6), pulsing by +/-50%.
            Preset::Classic => base
                .with(ParamId::MinSize, 1.5)
                .with(ParamId::MaxSize, 4.5),
            Preset::Ramp => base
                .with_shape(WaveShape::Ramp)
                .with(ParamId::Spacing, 2.0)
                .with(ParamId::Frequency, 0.2)
                .with(ParamId::MaxSize, 5.0),
            Preset::Swell => base
                .with_shape(WaveShape::PeakTrough)
                .with(ParamId::Spacing, 2.0)
                .with(ParamId::Frequency, 0.1)
                .with(ParamId::Angle, 30.0)
                .with(ParamId::Steepness, 0.3)
                .with(ParamId::PeakSoftness, 0.2)
                .with(ParamId::MaxSize, 6.0),
            Preset::Breaking => base
                .with_shape(WaveShape::Breaking)
                .with(ParamId::Spacing, 2.0)
                .with(ParamId::Frequency, 0.15)
                .with(ParamId::Convexity, 0.5)
                .with(ParamId::MaxSize, 6.0),
            Preset::Drift => base
                .with_shape(WaveShape::Noise)
                .with(ParamId::Spacing, 2.0)
                .with(ParamId::WindSpeed, 1.5)
                .with(ParamId::NoiseScale, 0.08)
                .with(ParamId::NoiseIntensity, 1.2)
                .with(ParamId::Octaves, 4.0)
                .with(ParamId::MaxSize, 5.0),
            Preset::Lattice => base
                .with_shape(WaveShape::Noise)
                .with_noise_family(NoiseFamily::Lattice)
                .with(ParamId::Spacing, 2.0)
                .with(ParamId::NoiseScale, 0.12)
                .with(ParamId::TimeModulation, 0.4)
                .with(ParamId::MaxSize, 5.0),
            Preset::Storm => base
                .with_shape(WaveShape::Breaking)
                .with(ParamId::Spacing, 2.0)
                .with(ParamId::Speed, 1.5)
                .with(ParamId::Frequency, 0.2)
                .with(ParamId::Angle, 20.0)
                .with(ParamId::Convexity, 0.7)
                .with(ParamId::CurvatureStrength, 12.0)
                .with(ParamId::CurvatureScale, 80.0)
                .with(ParamId::TimeModulation, 0.3)
                .with(ParamId::FrothStrength, 1.5)
                .with(ParamId::FrothScale, 0.6)
                .with(ParamId::MaxSize, 8.0)
                .with_color(ColorId::Dot, Srgb::new(0.55, 0.65, 0.8))
                .with_color(ColorId::Peak, Srgb::WHITE),
        }
    }
}
