//! `ParameterStore`: the single source of truth for every live parameter.
//!
//! Writes are clamped, stored and then pushed synchronously to at most one
//! observer per parameter. The string-keyed [`ParameterStore::apply`] is the
//! entry point for GUIs and JSON; typed [`ParamId`] calls are for Rust hosts.

use std::fmt;

use log::{debug, warn};
use serde_json::{json, Map, Value};

use crate::color::Srgb;
use crate::config::{FieldConfig, NOISE_KEY, SHAPE_KEY};
use crate::error::WaveError;
use crate::noise::NoiseFamily;
use crate::params::{json_type_name, ColorId, ParamGroup, ParamId};
use crate::shape::WaveShape;

type Observer = Box<dyn FnMut(f64)>;
type ColorObserver = Box<dyn FnMut(Srgb)>;

/// Live parameter values plus their change observers.
pub struct ParameterStore {
    config: FieldConfig,
    observers: [Option<Observer>; ParamId::COUNT],
    color_observers: [Option<ColorObserver>; ColorId::COUNT],
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observed = self.observers.iter().filter(|o| o.is_some()).count()
            + self.color_observers.iter().filter(|o| o.is_some()).count();
        f.debug_struct("ParameterStore")
            .field("config", &self.config)
            .field("observed", &observed)
            .finish()
    }
}

impl ParameterStore {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            observers: std::array::from_fn(|_| None),
            color_observers: std::array::from_fn(|_| None),
        }
    }

    /// The current configuration snapshot.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn get(&self, id: ParamId) -> f64 {
        self.config.get(id)
    }

    /// Clamps and stores `value`, notifies the observer for `id`, and returns
    /// the stored value.
    pub fn set(&mut self, id: ParamId, value: f64) -> f64 {
        let stored = self.config.set(id, value);
        if let Some(observer) = self.observers[id.index()].as_mut() {
            observer(stored);
        }
        stored
    }

    /// Registers the observer for `id`, replacing any previous one.
    pub fn observe<F>(&mut self, id: ParamId, observer: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.observers[id.index()] = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self, id: ParamId) {
        self.observers[id.index()] = None;
    }

    pub fn color(&self, id: ColorId) -> Srgb {
        self.config.color(id)
    }

    pub fn set_color(&mut self, id: ColorId, color: Srgb) {
        self.config.set_color(id, color);
        if let Some(observer) = self.color_observers[id.index()].as_mut() {
            observer(color);
        }
    }

    /// Registers the observer for color `id`, replacing any previous one.
    pub fn observe_color<F>(&mut self, id: ColorId, observer: F)
    where
        F: FnMut(Srgb) + 'static,
    {
        self.color_observers[id.index()] = Some(Box::new(observer));
    }

    pub fn clear_color_observer(&mut self, id: ColorId) {
        self.color_observers[id.index()] = None;
    }

    pub fn set_shape(&mut self, shape: WaveShape) {
        self.config.set_shape(shape);
    }

    pub fn set_noise_family(&mut self, family: NoiseFamily) {
        self.config.set_noise_family(family);
    }

    /// Applies one named value.
    ///
    /// Numbers go to numeric parameters, hex strings to colors, names to the
    /// `shape` and `noise` selectors. Unknown names are logged and rejected
    /// with the store unchanged.
    pub fn apply(&mut self, name: &str, value: &Value) -> Result<(), WaveError> {
        let result = self.apply_inner(name, value);
        if let Err(err) = &result {
            warn!("ignoring parameter update: {err}");
        }
        result
    }

    fn apply_inner(&mut self, name: &str, value: &Value) -> Result<(), WaveError> {
        if let Some(id) = ParamId::from_name(name) {
            let number = value.as_f64().ok_or_else(|| WaveError::ParamTypeMismatch {
                name: name.to_owned(),
                expected: "number".into(),
                got: json_type_name(value).into(),
            })?;
            let stored = self.set(id, number);
            debug!("{} = {stored}", id.name());
            return Ok(());
        }
        if let Some(id) = ColorId::from_name(name) {
            let hex = value.as_str().ok_or_else(|| WaveError::ParamTypeMismatch {
                name: name.to_owned(),
                expected: "hex color string".into(),
                got: json_type_name(value).into(),
            })?;
            self.set_color(id, Srgb::from_hex(hex)?);
            return Ok(());
        }
        // Shape, noise family and unknown names.
        self.config.apply_entry(name, value)
    }

    /// Applies every entry of a JSON object. All-or-nothing: the whole object
    /// is validated before anything is stored or any observer runs.
    pub fn apply_all(&mut self, overrides: &Value) -> Result<(), WaveError> {
        if let Err(err) = FieldConfig::from_json(&self.config, overrides) {
            warn!("ignoring parameter update: {err}");
            return Err(err);
        }
        if let Some(entries) = overrides.as_object() {
            for (name, value) in entries {
                self.apply_inner(name, value)?;
            }
        }
        Ok(())
    }

    /// Replaces the whole configuration and notifies every observer.
    pub fn load(&mut self, config: FieldConfig) {
        self.config = config;
        for id in ParamId::ALL {
            let value = self.config.get(id);
            if let Some(observer) = self.observers[id.index()].as_mut() {
                observer(value);
            }
        }
        for id in ColorId::ALL {
            let color = self.config.color(id);
            if let Some(observer) = self.color_observers[id.index()].as_mut() {
                observer(color);
            }
        }
    }

    /// Current values as a flat JSON object.
    pub fn values(&self) -> Value {
        self.config.to_json()
    }

    /// Control-panel schema, grouped by category:
    /// `{group: {name: {type, default, min, max, description}}}`.
    pub fn schema() -> Value {
        let mut groups = Map::new();
        for group in ParamGroup::ALL {
            let mut entries = Map::new();
            for id in ParamId::ALL.into_iter().filter(|id| id.group() == group) {
                entries.insert(id.name().to_owned(), id.spec().to_json());
            }
            if group == ParamGroup::Color {
                for id in ColorId::ALL {
                    entries.insert(id.name().to_owned(), id.to_json());
                }
            }
            groups.insert(group.name().to_owned(), Value::Object(entries));
        }

        let shapes: Vec<&str> = WaveShape::ALL.iter().map(|s| s.name()).collect();
        let families: Vec<&str> = NoiseFamily::ALL.iter().map(|f| f.name()).collect();
        insert_choice(
            &mut groups,
            ParamGroup::WaveGeometry,
            SHAPE_KEY,
            json!({
                "type": "choice",
                "default": WaveShape::default().name(),
                "options": shapes,
                "description": "Function mapping wave phase to intensity",
            }),
        );
        insert_choice(
            &mut groups,
            ParamGroup::Chaos,
            NOISE_KEY,
            json!({
                "type": "choice",
                "default": NoiseFamily::default().name(),
                "options": families,
                "description": "Base noise sampled by warps and the noise shape",
            }),
        );
        Value::Object(groups)
    }
}

fn insert_choice(groups: &mut Map<String, Value>, group: ParamGroup, key: &str, entry: Value) {
    if let Some(Value::Object(entries)) = groups.get_mut(group.name()) {
        entries.insert(key.to_owned(), entry);
    }
}
