#![deny(unsafe_code)]
//! Browser bindings for the wavegrid engine.
//!
//! JavaScript owns the render loop and the GPU buffers. Each animation frame
//! it calls [`WaveGrid::tick`], then reads the size (and optionally tint)
//! buffers; it re-uploads positions only when [`WaveGrid::position_version`]
//! changes.

use log::warn;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wavegrid_core::params::{ColorId, ParamId};
use wavegrid_core::{
    AnimationDriver, BufferSink, FieldConfig, ParameterStore, Preset, ViewportAdapter, WaveError,
};

/// A live wave-field grid driven from JavaScript.
#[wasm_bindgen]
pub struct WaveGrid {
    driver: AnimationDriver<BufferSink>,
}

impl WaveGrid {
    fn build(width: f64, height: f64, preset: &str, seed: u32) -> Result<WaveGrid, WaveError> {
        let config = Preset::from_name(preset)?.config();
        Ok(Self::from_config(config, width, height, seed))
    }

    fn from_config(config: FieldConfig, width: f64, height: f64, seed: u32) -> WaveGrid {
        let mut driver = AnimationDriver::new(config, width, height, seed, BufferSink::new());
        driver.start();
        WaveGrid { driver }
    }

    fn apply_str(&mut self, json: &str) -> Result<(), WaveError> {
        let overrides: Value = serde_json::from_str(json)
            .map_err(|e| WaveError::InvalidRunSpec(format!("invalid params JSON: {e}")))?;
        self.driver.apply_all(&overrides)
    }
}

fn js_error(err: WaveError) -> JsError {
    JsError::new(&err.to_string())
}

#[wasm_bindgen]
impl WaveGrid {
    /// Creates a running grid for a `width` x `height` viewport from a preset.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, preset: &str, seed: u32) -> Result<WaveGrid, JsError> {
        Self::build(width, height, preset, seed).map_err(js_error)
    }

    /// Advances one tick and refreshes the size and intensity buffers.
    pub fn tick(&mut self) {
        self.driver.tick();
    }

    /// Current animation time.
    pub fn time(&self) -> f64 {
        self.driver.time()
    }

    pub fn point_count(&self) -> u32 {
        self.driver.grid().len() as u32
    }

    /// Bumped every time the grid is regenerated.
    pub fn position_version(&self) -> u32 {
        self.driver.sink().position_uploads() as u32
    }

    /// xyz triples of the current grid.
    pub fn positions(&self) -> Vec<f32> {
        self.driver.sink().positions().to_vec()
    }

    /// Dot sizes from the latest tick.
    pub fn sizes(&self) -> Vec<f32> {
        self.driver.sink().sizes().to_vec()
    }

    /// rgb triples blending dot to peak color by intensity.
    pub fn tints(&self) -> Vec<f32> {
        let config = self.driver.config();
        self.driver
            .sink()
            .intensities()
            .iter()
            .flat_map(|&i| config.tint(f64::from(i)).to_f32_array())
            .collect()
    }

    /// Background clear color as `#rrggbb`.
    pub fn background(&self) -> String {
        self.driver.config().color(ColorId::Background).to_hex()
    }

    /// Sets a numeric parameter by name, clamped into its range. Returns
    /// `false` for an unknown name.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match ParamId::from_name(name) {
            Some(id) => {
                self.driver.set(id, value);
                true
            }
            None => {
                warn!("ignoring unknown parameter {name:?}");
                false
            }
        }
    }

    /// Sets a color (or the `shape`/`noise` selector) by name.
    pub fn set_str(&mut self, name: &str, value: &str) -> bool {
        self.driver.apply(name, &Value::from(value)).is_ok()
    }

    /// Applies a JSON object of overrides, all or nothing.
    pub fn apply_json(&mut self, json: &str) -> Result<(), JsError> {
        self.apply_str(json).map_err(js_error)
    }

    pub fn load_preset(&mut self, name: &str) -> Result<(), JsError> {
        let preset = Preset::from_name(name).map_err(js_error)?;
        self.driver.load_preset(preset);
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.driver.resize(width, height);
    }

    /// Current values as a JSON string.
    pub fn values(&self) -> String {
        self.driver.store().values().to_string()
    }

    /// Grouped control-panel schema as a JSON string.
    pub fn schema() -> String {
        ParameterStore::schema().to_string()
    }

    /// Preset names as a JSON array string.
    pub fn presets() -> String {
        Value::from(Preset::list_names().to_vec()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_starts_and_uploads_positions() {
        let grid = WaveGrid::build(40.0, 30.0, "classic", 1).unwrap();
        assert_eq!(grid.position_version(), 1);
        assert_eq!(grid.positions().len(), grid.point_count() as usize * 3);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(matches!(
            WaveGrid::build(40.0, 30.0, "tsunami", 1),
            Err(WaveError::UnknownPreset(_))
        ));
    }

    #[test]
    fn tick_fills_sizes_and_tints() {
        let mut grid = WaveGrid::build(40.0, 30.0, "storm", 1).unwrap();
        grid.tick();
        let n = grid.point_count() as usize;
        assert_eq!(grid.sizes().len(), n);
        assert_eq!(grid.tints().len(), n * 3);
        assert!(grid.time() > 0.0);
    }

    #[test]
    fn set_reports_acceptance() {
        let mut grid = WaveGrid::build(40.0, 30.0, "classic", 1).unwrap();
        assert!(grid.set("minSize", 1.2));
        assert!(!grid.set("wobble", 1.0));
        assert!(grid.set_str("background_color", "#102030"));
        assert_eq!(grid.background(), "#102030");
        assert!(!grid.set_str("shape", "square"));
    }

    #[test]
    fn set_clamps_non_finite_values_for_known_names() {
        let mut grid = WaveGrid::build(40.0, 30.0, "classic", 1).unwrap();
        assert!(grid.set("speed", f64::INFINITY));
        assert!(grid.set("angle", f64::NEG_INFINITY));
        let values: Value = serde_json::from_str(&grid.values()).unwrap();
        assert_eq!(values["speed"], ParamId::Speed.spec().max);
        assert_eq!(values["angle"], ParamId::Angle.spec().min);
    }

    #[test]
    fn spacing_change_bumps_position_version() {
        let mut grid = WaveGrid::build(40.0, 30.0, "classic", 1).unwrap();
        assert!(grid.set("spacing", 4.0));
        assert_eq!(grid.position_version(), 2);
        grid.resize(40.0, 30.0);
        assert_eq!(grid.position_version(), 2);
    }

    #[test]
    fn apply_str_is_all_or_nothing() {
        let mut grid = WaveGrid::build(40.0, 30.0, "classic", 1).unwrap();
        assert!(grid.apply_str(r#"{"angle": 45, "bogus": 1}"#).is_err());
        assert!(grid.apply_str("not json").is_err());
        grid.apply_str(r#"{"angle": 45}"#).unwrap();
        let values: Value = serde_json::from_str(&grid.values()).unwrap();
        assert_eq!(values["angle"], 45.0);
    }

    #[test]
    fn static_catalogs_are_valid_json() {
        let schema: Value = serde_json::from_str(&WaveGrid::schema()).unwrap();
        assert!(schema.get("chaos").is_some());
        let presets: Value = serde_json::from_str(&WaveGrid::presets()).unwrap();
        assert_eq!(presets.as_array().unwrap().len(), Preset::ALL.len());
    }
}
