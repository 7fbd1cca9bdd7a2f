//! Parameter identifiers and their declared ranges.
//!
//! Every tunable knob is a [`ParamId`] (numeric) or [`ColorId`] (color). Each
//! carries a static spec with its group, range and default, which is what the
//! control panel renders and what evaluation clamps against.
//!
//! Name lookup ignores case and `_`/`-`/space separators, so a GUI that
//! says `minSize` and a JSON file that says `min_size` reach the same knob.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::color::Srgb;

/// Logical grouping of parameters, as laid out in the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamGroup {
    Camera,
    Grid,
    WaveMovement,
    WaveGeometry,
    Chaos,
    Color,
}

impl ParamGroup {
    pub const ALL: [ParamGroup; 6] = [
        ParamGroup::Camera,
        ParamGroup::Grid,
        ParamGroup::WaveMovement,
        ParamGroup::WaveGeometry,
        ParamGroup::Chaos,
        ParamGroup::Color,
    ];

    /// Stable snake_case name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            ParamGroup::Camera => "camera",
            ParamGroup::Grid => "grid",
            ParamGroup::WaveMovement => "wave_movement",
            ParamGroup::WaveGeometry => "wave_geometry",
            ParamGroup::Chaos => "chaos",
            ParamGroup::Color => "color",
        }
    }
}

/// Numeric parameter identifiers.
///
/// The discriminant doubles as the index into [`FieldConfig`](crate::config::FieldConfig)
/// storage, so the order here must match [`ParamId::ALL`] and the spec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamId {
    CameraZ,
    FieldOfView,
    Spacing,
    Speed,
    Frequency,
    Angle,
    WindSpeed,
    Steepness,
    PeakSoftness,
    Convexity,
    MinSize,
    MaxSize,
    NoiseScale,
    NoiseIntensity,
    Octaves,
    Persistence,
    CurvatureStrength,
    CurvatureScale,
    TimeModulation,
    FrothStrength,
    FrothScale,
}

/// Declared metadata for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub id: ParamId,
    pub name: &'static str,
    pub group: ParamGroup,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub description: &'static str,
}

impl ParamSpec {
    /// Control-panel schema entry for this parameter.
    pub fn to_json(&self) -> Value {
        json!({
            "type": "number",
            "default": self.default,
            "min": self.min,
            "max": self.max,
            "description": self.description,
        })
    }
}

const fn spec(
    id: ParamId,
    name: &'static str,
    group: ParamGroup,
    min: f64,
    max: f64,
    default: f64,
    description: &'static str,
) -> ParamSpec {
    ParamSpec {
        id,
        name,
        group,
        min,
        max,
        default,
        description,
    }
}

#[rustfmt::skip]
static PARAM_SPECS: [ParamSpec; ParamId::COUNT] = [
    spec(ParamId::CameraZ, "camera_z", ParamGroup::Camera, 1.0, 500.0, 50.0,
        "Camera distance from the grid plane"),
    spec(ParamId::FieldOfView, "field_of_view", ParamGroup::Camera, 10.0, 150.0, 75.0,
        "Vertical field of view in degrees"),
    spec(ParamId::Spacing, "spacing", ParamGroup::Grid, 0.5, 20.0, 1.0,
        "Distance between neighbouring grid points"),
    spec(ParamId::Speed, "speed", ParamGroup::WaveMovement, 0.0, 5.0, 1.0,
        "Wave travel speed; also scales the per-tick time step"),
    spec(ParamId::Frequency, "frequency", ParamGroup::WaveMovement, 0.001, 5.0, 1.0,
        "Spatial frequency of the traveling wave"),
    spec(ParamId::Angle, "angle", ParamGroup::WaveMovement, 0.0, 360.0, 0.0,
        "Direction of wave travel in degrees"),
    spec(ParamId::WindSpeed, "wind_speed", ParamGroup::WaveMovement, 0.0, 10.0, 0.0,
        "Advection of the noise field along the wave direction"),
    spec(ParamId::Steepness, "steepness", ParamGroup::WaveGeometry, 0.01, 0.99, 0.3,
        "Fraction of the period spent rising to the peak"),
    spec(ParamId::PeakSoftness, "peak_softness", ParamGroup::WaveGeometry, 0.0, 0.98, 0.2,
        "Fraction of the period the peak plateau lasts"),
    spec(ParamId::Convexity, "convexity", ParamGroup::WaveGeometry, 0.0, 1.0, 0.5,
        "Curvature of the breaking wave face"),
    spec(ParamId::MinSize, "min_size", ParamGroup::WaveGeometry, 0.1, 2.0, 1.0,
        "Dot size at zero intensity"),
    spec(ParamId::MaxSize, "max_size", ParamGroup::WaveGeometry, 1.0, 50.0, 4.0,
        "Dot size at full intensity"),
    spec(ParamId::NoiseScale, "noise_scale", ParamGroup::Chaos, 0.001, 2.0, 0.05,
        "Base frequency of the noise field"),
    spec(ParamId::NoiseIntensity, "noise_intensity", ParamGroup::Chaos, 0.0, 4.0, 1.0,
        "Gain applied to the layered noise sum"),
    spec(ParamId::Octaves, "octaves", ParamGroup::Chaos, 1.0, 8.0, 3.0,
        "Number of layered noise octaves"),
    spec(ParamId::Persistence, "persistence", ParamGroup::Chaos, 0.0, 1.0, 0.5,
        "Amplitude falloff between octaves"),
    spec(ParamId::CurvatureStrength, "curvature_strength", ParamGroup::Chaos, 0.0, 100.0, 0.0,
        "Amount of large-scale slow domain warping"),
    spec(ParamId::CurvatureScale, "curvature_scale", ParamGroup::Chaos, 0.0, 1000.0, 100.0,
        "Feature size of the curvature warp"),
    spec(ParamId::TimeModulation, "time_modulation", ParamGroup::Chaos, 0.0, 2.0, 0.1,
        "How fast the warp and noise fields evolve"),
    spec(ParamId::FrothStrength, "froth_strength", ParamGroup::Chaos, 0.0, 10.0, 0.0,
        "Amount of small-scale static jitter"),
    spec(ParamId::FrothScale, "froth_scale", ParamGroup::Chaos, 0.0, 5.0, 0.5,
        "Frequency of the froth jitter"),
];

impl ParamId {
    pub const COUNT: usize = 21;

    pub const ALL: [ParamId; ParamId::COUNT] = [
        ParamId::CameraZ,
        ParamId::FieldOfView,
        ParamId::Spacing,
        ParamId::Speed,
        ParamId::Frequency,
        ParamId::Angle,
        ParamId::WindSpeed,
        ParamId::Steepness,
        ParamId::PeakSoftness,
        ParamId::Convexity,
        ParamId::MinSize,
        ParamId::MaxSize,
        ParamId::NoiseScale,
        ParamId::NoiseIntensity,
        ParamId::Octaves,
        ParamId::Persistence,
        ParamId::CurvatureStrength,
        ParamId::CurvatureScale,
        ParamId::TimeModulation,
        ParamId::FrothStrength,
        ParamId::FrothScale,
    ];

    /// Storage index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn spec(self) -> &'static ParamSpec {
        &PARAM_SPECS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn group(self) -> ParamGroup {
        self.spec().group
    }

    pub fn default_value(self) -> f64 {
        self.spec().default
    }

    /// Looks a parameter up by name, ignoring case and separators.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| names_match(id.name(), name))
    }

    /// Clamps `value` into the declared range. NaN becomes the default.
    #[inline]
    pub fn clamp(self, value: f64) -> f64 {
        let spec = self.spec();
        if value.is_nan() {
            spec.default
        } else {
            value.clamp(spec.min, spec.max)
        }
    }

    /// Whether changing this parameter invalidates the grid lattice.
    pub fn affects_grid(self) -> bool {
        matches!(self, ParamId::Spacing)
    }
}

/// Color parameter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorId {
    /// Dot color at zero intensity.
    Dot,
    /// Dot color at full intensity.
    Peak,
    Background,
}

impl ColorId {
    pub const COUNT: usize = 3;

    pub const ALL: [ColorId; ColorId::COUNT] = [ColorId::Dot, ColorId::Peak, ColorId::Background];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorId::Dot => "dot_color",
            ColorId::Peak => "peak_color",
            ColorId::Background => "background_color",
        }
    }

    pub fn default_value(self) -> Srgb {
        match self {
            ColorId::Dot | ColorId::Peak => Srgb::WHITE,
            ColorId::Background => Srgb::BLACK,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ColorId::Dot => "Dot color at zero intensity",
            ColorId::Peak => "Dot color at full intensity",
            ColorId::Background => "Clear color behind the grid",
        }
    }

    /// Looks a color up by name, ignoring case and separators.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| names_match(id.name(), name))
    }

    /// Control-panel schema entry for this color.
    pub fn to_json(self) -> Value {
        json!({
            "type": "color",
            "default": self.default_value().to_hex(),
            "description": self.description(),
        })
    }
}

/// Case- and separator-insensitive name comparison.
fn names_match(canonical: &str, candidate: &str) -> bool {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect::<String>()
    };
    normalize(canonical) == normalize(candidate)
}

/// JSON type name of `value`, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
