//! `FieldConfig`: one complete snapshot of every parameter.
//!
//! Numeric values are stored already clamped into their declared ranges, so
//! whatever path a value arrives by (GUI, JSON override, preset) evaluation
//! never sees an out-of-range or NaN knob.

use serde_json::{Map, Value};

use crate::color::Srgb;
use crate::error::WaveError;
use crate::noise::NoiseFamily;
use crate::params::{json_type_name, ColorId, ParamId};
use crate::shape::WaveShape;

/// JSON key selecting the wave shape.
pub const SHAPE_KEY: &str = "shape";
/// JSON key selecting the noise family.
pub const NOISE_KEY: &str = "noise";

/// Every parameter value plus the two design-time variant choices.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    values: [f64; ParamId::COUNT],
    colors: [Srgb; ColorId::COUNT],
    shape: WaveShape,
    noise: NoiseFamily,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            values: ParamId::ALL.map(ParamId::default_value),
            colors: ColorId::ALL.map(ColorId::default_value),
            shape: WaveShape::default(),
            noise: NoiseFamily::default(),
        }
    }
}

impl FieldConfig {
    #[inline]
    pub fn get(&self, id: ParamId) -> f64 {
        self.values[id.index()]
    }

    /// Stores `value` clamped into the declared range and returns what was stored.
    pub fn set(&mut self, id: ParamId, value: f64) -> f64 {
        let clamped = id.clamp(value);
        self.values[id.index()] = clamped;
        clamped
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, id: ParamId, value: f64) -> Self {
        self.set(id, value);
        self
    }

    pub fn color(&self, id: ColorId) -> Srgb {
        self.colors[id.index()]
    }

    pub fn set_color(&mut self, id: ColorId, color: Srgb) {
        self.colors[id.index()] = color;
    }

    pub fn with_color(mut self, id: ColorId, color: Srgb) -> Self {
        self.set_color(id, color);
        self
    }

    pub fn shape(&self) -> WaveShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: WaveShape) {
        self.shape = shape;
    }

    pub fn with_shape(mut self, shape: WaveShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn noise_family(&self) -> NoiseFamily {
        self.noise
    }

    pub fn set_noise_family(&mut self, family: NoiseFamily) {
        self.noise = family;
    }

    pub fn with_noise_family(mut self, family: NoiseFamily) -> Self {
        self.noise = family;
        self
    }

    /// Dot tint for a normalized intensity: OKLab blend from dot to peak color.
    pub fn tint(&self, intensity: f64) -> Srgb {
        self.color(ColorId::Dot)
            .mix(self.color(ColorId::Peak), intensity)
    }

    /// Flat JSON object of every value, keyed by canonical name.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for id in ParamId::ALL {
            map.insert(id.name().to_owned(), Value::from(self.get(id)));
        }
        for id in ColorId::ALL {
            map.insert(id.name().to_owned(), Value::from(self.color(id).to_hex()));
        }
        map.insert(SHAPE_KEY.to_owned(), Value::from(self.shape.name()));
        map.insert(NOISE_KEY.to_owned(), Value::from(self.noise.name()));
        Value::Object(map)
    }

    /// Applies a JSON object of overrides.
    ///
    /// Keys may be any parameter or color name (any casing), `shape`, or
    /// `noise`. The update is all-or-nothing: on the first bad key or value
    /// the error is returned and `self` is left untouched.
    pub fn apply_json(&mut self, overrides: &Value) -> Result<(), WaveError> {
        let entries = overrides
            .as_object()
            .ok_or_else(|| WaveError::ParamTypeMismatch {
                name: "params".into(),
                expected: "object".into(),
                got: json_type_name(overrides).into(),
            })?;

        let mut next = self.clone();
        for (name, value) in entries {
            next.apply_entry(name, value)?;
        }
        *self = next;
        Ok(())
    }

    /// Builds a config from `base` with JSON `overrides` layered on top.
    pub fn from_json(base: &FieldConfig, overrides: &Value) -> Result<Self, WaveError> {
        let mut next = base.clone();
        next.apply_json(overrides)?;
        Ok(next)
    }

    /// Applies one `name = value` pair.
    pub(crate) fn apply_entry(&mut self, name: &str, value: &Value) -> Result<(), WaveError> {
        if name.eq_ignore_ascii_case(SHAPE_KEY) {
            self.shape = value
                .as_str()
                .and_then(WaveShape::from_name)
                .ok_or_else(|| mismatch(name, "wave shape name", value))?;
            return Ok(());
        }
        if name.eq_ignore_ascii_case(NOISE_KEY) {
            self.noise = value
                .as_str()
                .and_then(NoiseFamily::from_name)
                .ok_or_else(|| mismatch(name, "noise family name", value))?;
            return Ok(());
        }
        if let Some(id) = ParamId::from_name(name) {
            let number = value
                .as_f64()
                .ok_or_else(|| mismatch(name, "number", value))?;
            self.set(id, number);
            return Ok(());
        }
        if let Some(id) = ColorId::from_name(name) {
            let hex = value
                .as_str()
                .ok_or_else(|| mismatch(name, "hex color string", value))?;
            self.set_color(id, Srgb::from_hex(hex)?);
            return Ok(());
        }
        Err(WaveError::UnknownParameter(name.to_owned()))
    }
}

fn mismatch(name: &str, expected: &str, got: &Value) -> WaveError {
    WaveError::ParamTypeMismatch {
        name: name.to_owned(),
        expected: expected.to_owned(),
        got: match got {
            Value::String(s) => format!("\"{s}\""),
            other => json_type_name(other).to_owned(),
        },
    }
}
