//! Reproducible description of a headless run.
//!
//! A [`RunSpec`] captures everything needed to recreate an animation state:
//! preset name, viewport, parameter overrides, noise seed and tick count.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::FieldConfig;
use crate::driver::AnimationDriver;
use crate::error::WaveError;
use crate::preset::Preset;
use crate::sink::RenderSink;

/// Reproducible specification for a run.
///
/// Two identical `RunSpec` values built against the same binary produce
/// bit-identical frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSpec {
    pub preset: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "empty_params")]
    pub params: Value,
    pub seed: u32,
    #[serde(default)]
    pub ticks: usize,
}

fn empty_params() -> Value {
    Value::Object(Map::new())
}

impl RunSpec {
    /// Creates a RunSpec with no overrides (`{}`) and zero ticks.
    pub fn new(preset: &str, width: f64, height: f64, seed: u32) -> Self {
        Self {
            preset: preset.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            ticks: 0,
        }
    }

    /// Checks the viewport, the preset name and the overrides.
    pub fn validate(&self) -> Result<(), WaveError> {
        self.config().map(|_| ())
    }

    /// The preset's configuration with `params` layered on top.
    pub fn config(&self) -> Result<FieldConfig, WaveError> {
        for (label, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(WaveError::InvalidRunSpec(format!(
                    "{label} must be positive and finite, got {v}"
                )));
            }
        }
        if !self.params.is_object() {
            return Err(WaveError::InvalidRunSpec(
                "params must be a JSON object".into(),
            ));
        }
        let preset = Preset::from_name(&self.preset)?;
        FieldConfig::from_json(&preset.config(), &self.params)
    }

    /// Builds an idle driver feeding `sink`.
    pub fn build<R: RenderSink>(&self, sink: R) -> Result<AnimationDriver<R>, WaveError> {
        let config = self.config()?;
        Ok(AnimationDriver::new(
            config,
            self.width,
            self.height,
            self.seed,
            sink,
        ))
    }

    /// Builds a driver and runs it for `ticks` ticks.
    pub fn run<R: RenderSink>(&self, sink: R) -> Result<AnimationDriver<R>, WaveError> {
        let mut driver = self.build(sink)?;
        driver.start();
        for _ in 0..self.ticks {
            driver.tick();
        }
        Ok(driver)
    }
}
