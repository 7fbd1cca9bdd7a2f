//! Animation driver: owns the live state and runs one tick per host frame.
//!
//! The driver is the only stateful piece. It holds the parameter store, the
//! current grid, the composer, the reusable frame buffer and the animation
//! clock, and pushes buffers to a [`RenderSink`]. Every mutating method takes
//! `&mut self`, so a parameter change can never land halfway through a tick.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Srgb;
use crate::composer::FieldComposer;
use crate::config::FieldConfig;
use crate::error::WaveError;
use crate::frame::FieldFrame;
use crate::grid::Grid;
use crate::noise::NoiseFamily;
use crate::params::{ColorId, ParamId};
use crate::preset::Preset;
use crate::shape::WaveShape;
use crate::sink::RenderSink;
use crate::store::ParameterStore;

/// Time advanced per tick at `speed = 1`.
pub const DEFAULT_TIME_SCALE: f64 = 0.125;

/// Driver tuning that is not a user-facing parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Per-tick time step is `speed * time_scale`.
    pub time_scale: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

/// Lifecycle of a driver. `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Monotonic animation clock. Never decreases and never becomes non-finite.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeAccumulator {
    time: f64,
}

impl TimeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advances by `step` and returns the new time. Negative or non-finite
    /// steps, and steps that would overflow, are ignored.
    pub fn advance(&mut self, step: f64) -> f64 {
        if step.is_finite() && step > 0.0 {
            let next = self.time + step;
            if next.is_finite() {
                self.time = next;
            }
        }
        self.time
    }
}

/// Receives viewport size changes from the windowing layer.
pub trait ViewportAdapter {
    fn resize(&mut self, width: f64, height: f64);
}

/// Per-tick loop tying store, grid, composer and sink together.
#[derive(Debug)]
pub struct AnimationDriver<R: RenderSink> {
    store: ParameterStore,
    composer: FieldComposer,
    grid: Grid,
    frame: FieldFrame,
    clock: TimeAccumulator,
    settings: DriverConfig,
    viewport: (f64, f64),
    state: DriverState,
    positions_dirty: bool,
    sink: R,
}

impl<R: RenderSink> AnimationDriver<R> {
    /// Builds an idle driver for a `width` x `height` viewport.
    pub fn new(config: FieldConfig, width: f64, height: f64, seed: u32, sink: R) -> Self {
        let grid = Grid::generate(width, height, config.get(ParamId::Spacing));
        Self {
            store: ParameterStore::new(config),
            composer: FieldComposer::new(seed),
            grid,
            frame: FieldFrame::new(),
            clock: TimeAccumulator::new(),
            settings: DriverConfig::default(),
            viewport: (width, height),
            state: DriverState::Idle,
            positions_dirty: true,
            sink,
        }
    }

    pub fn with_settings(mut self, settings: DriverConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn settings(&self) -> DriverConfig {
        self.settings
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The most recently evaluated frame.
    pub fn frame(&self) -> &FieldFrame {
        &self.frame
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn config(&self) -> &FieldConfig {
        self.store.config()
    }

    pub fn composer(&self) -> &FieldComposer {
        &self.composer
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    pub fn into_sink(self) -> R {
        self.sink
    }

    /// Submits the position buffer and enters `Running`. No-op once running.
    pub fn start(&mut self) {
        if self.state == DriverState::Running {
            return;
        }
        info!(
            "starting driver: {}x{} viewport, {} points",
            self.viewport.0,
            self.viewport.1,
            self.grid.len()
        );
        self.flush_positions();
        self.state = DriverState::Running;
    }

    /// Advances time, evaluates every point and hands the frame to the sink.
    ///
    /// Starts the driver first if it is still idle. An empty grid still
    /// advances time and submits an empty frame.
    pub fn tick(&mut self) -> &FieldFrame {
        self.start();
        let step = self.store.get(ParamId::Speed) * self.settings.time_scale;
        let time = self.clock.advance(step);

        if self.positions_dirty {
            self.flush_positions();
        }
        self.composer
            .evaluate_frame(&self.grid, time, self.store.config(), &mut self.frame);
        self.sink.submit_frame(&self.frame);
        &self.frame
    }

    /// Sets a parameter through the store. A spacing change rebuilds the grid.
    pub fn set(&mut self, id: ParamId, value: f64) -> f64 {
        let stored = self.store.set(id, value);
        self.sync_grid();
        stored
    }

    pub fn set_color(&mut self, id: ColorId, color: Srgb) {
        self.store.set_color(id, color);
    }

    pub fn set_shape(&mut self, shape: WaveShape) {
        self.store.set_shape(shape);
    }

    pub fn set_noise_family(&mut self, family: NoiseFamily) {
        self.store.set_noise_family(family);
    }

    /// String-keyed update, as from a GUI. See [`ParameterStore::apply`].
    pub fn apply(&mut self, name: &str, value: &Value) -> Result<(), WaveError> {
        self.store.apply(name, value)?;
        self.sync_grid();
        Ok(())
    }

    /// All-or-nothing update from a JSON object.
    pub fn apply_all(&mut self, overrides: &Value) -> Result<(), WaveError> {
        self.store.apply_all(overrides)?;
        self.sync_grid();
        Ok(())
    }

    /// Registers the single observer for `id`.
    pub fn observe<F>(&mut self, id: ParamId, observer: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.store.observe(id, observer);
    }

    /// Replaces the whole configuration, keeping time and viewport.
    pub fn load(&mut self, config: FieldConfig) {
        self.store.load(config);
        self.sync_grid();
    }

    pub fn load_preset(&mut self, preset: Preset) {
        debug!("loading preset {}", preset.name());
        self.load(preset.config());
    }

    /// Regenerates the grid if spacing no longer matches it.
    fn sync_grid(&mut self) {
        let spacing = self.store.get(ParamId::Spacing);
        if spacing != self.grid.spacing() {
            self.regenerate();
        }
    }

    fn regenerate(&mut self) {
        let (width, height) = self.viewport;
        self.grid = Grid::generate(width, height, self.store.get(ParamId::Spacing));
        self.positions_dirty = true;
        if self.state == DriverState::Running {
            self.flush_positions();
        }
    }

    fn flush_positions(&mut self) {
        self.sink.submit_positions(&self.grid);
        self.positions_dirty = false;
    }
}

impl<R: RenderSink> ViewportAdapter for AnimationDriver<R> {
    /// Rebuilds the grid for a new viewport. Repeating the current size is a
    /// no-op.
    fn resize(&mut self, width: f64, height: f64) {
        if same_extent(self.viewport.0, width) && same_extent(self.viewport.1, height) {
            return;
        }
        debug!("resize to {width}x{height}");
        self.viewport = (width, height);
        self.regenerate();
    }
}

fn same_extent(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{BufferSink, NullSink};
    use serde_json::json;

    fn wave_config() -> FieldConfig {
        FieldConfig::default()
            .with(ParamId::Spacing, 2.0)
            .with(ParamId::MinSize, 1.0)
            .with(ParamId::MaxSize, 7.0)
            .with(ParamId::Speed, 1.0)
            .with(ParamId::Frequency, 0.03)
            .with(ParamId::Angle, 30.0)
    }

    fn driver() -> AnimationDriver<BufferSink> {
        AnimationDriver::new(wave_config(), 800.0, 600.0, 42, BufferSink::new())
    }

    // -- clock --

    #[test]
    fn accumulator_ignores_bad_steps() {
        let mut clock = TimeAccumulator::new();
        assert_eq!(clock.advance(0.5), 0.5);
        assert_eq!(clock.advance(-1.0), 0.5);
        assert_eq!(clock.advance(f64::NAN), 0.5);
        assert_eq!(clock.advance(f64::INFINITY), 0.5);
        assert_eq!(clock.advance(0.0), 0.5);
    }

    #[test]
    fn accumulator_never_overflows() {
        let mut clock = TimeAccumulator::new();
        clock.advance(f64::MAX);
        assert_eq!(clock.advance(f64::MAX), f64::MAX);
    }

    // -- lifecycle --

    #[test]
    fn new_driver_is_idle_until_started() {
        let mut d = driver();
        assert_eq!(d.state(), DriverState::Idle);
        assert_eq!(d.sink().position_uploads(), 0);
        d.start();
        d.start();
        assert_eq!(d.state(), DriverState::Running);
        assert_eq!(d.sink().position_uploads(), 1);
    }

    #[test]
    fn tick_starts_implicitly() {
        let mut d = driver();
        d.tick();
        assert_eq!(d.state(), DriverState::Running);
        assert_eq!(d.sink().position_uploads(), 1);
        assert_eq!(d.sink().frames(), 1);
    }

    #[test]
    fn tick_advances_time_by_speed_times_scale() {
        let mut d = driver();
        d.tick();
        assert_eq!(d.time(), 0.125);
        d.set(ParamId::Speed, 2.0);
        d.tick();
        assert_eq!(d.time(), 0.375);
        d.set(ParamId::Speed, 0.0);
        d.tick();
        assert_eq!(d.time(), 0.375);
    }

    #[test]
    fn custom_time_scale_is_used() {
        let mut d = driver().with_settings(DriverConfig { time_scale: 1.0 });
        d.tick();
        d.tick();
        assert_eq!(d.time(), 2.0);
    }

    #[test]
    fn frame_is_stamped_with_tick_time() {
        let mut d = driver();
        d.tick();
        let time = d.tick().time();
        assert_eq!(time, d.time());
    }

    // -- end to end --

    #[test]
    fn hundred_ticks_stay_in_size_range_with_fixed_point_count() {
        let mut d = driver();
        let expected = 401 * 301;
        for _ in 0..100 {
            let frame = d.tick();
            assert_eq!(frame.len(), expected);
            assert!(
                frame.values().iter().all(|v| (1.0..=7.0).contains(v)),
                "value outside [1, 7] at t={}",
                frame.time()
            );
        }
        assert_eq!(d.grid().len(), expected);
        assert_eq!(d.sink().sizes().len(), expected);
        assert_eq!(d.sink().positions().len(), expected * 3);
        assert_eq!(d.sink().position_uploads(), 1);
        assert_eq!(d.sink().frames(), 100);
    }

    // -- grid regeneration --

    #[test]
    fn spacing_change_regenerates_and_resubmits() {
        let mut d = driver();
        d.tick();
        d.set(ParamId::Spacing, 4.0);
        assert_eq!(d.grid().len(), 201 * 151);
        assert_eq!(d.sink().position_uploads(), 2);
        assert_eq!(d.tick().len(), 201 * 151);
    }

    #[test]
    fn spacing_set_to_same_value_keeps_grid() {
        let mut d = driver();
        d.tick();
        d.set(ParamId::Spacing, 2.0);
        assert_eq!(d.sink().position_uploads(), 1);
    }

    #[test]
    fn spacing_change_while_idle_waits_for_start() {
        let mut d = driver();
        d.apply("spacing", &json!(4.0)).unwrap();
        assert_eq!(d.sink().position_uploads(), 0);
        d.tick();
        assert_eq!(d.sink().position_uploads(), 1);
        assert_eq!(d.sink().positions().len(), 201 * 151 * 3);
    }

    #[test]
    fn non_grid_parameters_do_not_regenerate() {
        let mut d = driver();
        d.tick();
        d.set(ParamId::Frequency, 0.5);
        d.set_shape(WaveShape::Breaking);
        d.set_color(ColorId::Peak, Srgb::BLACK);
        assert_eq!(d.sink().position_uploads(), 1);
    }

    #[test]
    fn load_preset_with_new_spacing_regenerates() {
        let mut d = driver();
        d.tick();
        d.load_preset(Preset::Classic);
        assert_eq!(d.grid().spacing(), 1.0);
        assert_eq!(d.grid().len(), 801 * 601);
        assert_eq!(d.config().get(ParamId::MaxSize), 4.5);
    }

    // -- resize --

    #[test]
    fn resize_regenerates_for_new_viewport() {
        let mut d = driver();
        d.tick();
        d.resize(400.0, 300.0);
        assert_eq!(d.viewport(), (400.0, 300.0));
        assert_eq!(d.grid().len(), 201 * 151);
        assert_eq!(d.sink().position_uploads(), 2);
    }

    #[test]
    fn repeated_resize_is_idempotent() {
        let mut d = driver();
        d.tick();
        d.resize(1024.0, 768.0);
        let grid = d.grid().clone();
        let uploads = d.sink().position_uploads();
        d.resize(1024.0, 768.0);
        d.resize(1024.0, 768.0);
        assert_eq!(d.grid(), &grid);
        assert_eq!(d.sink().position_uploads(), uploads);
    }

    #[test]
    fn resize_to_current_size_is_noop() {
        let mut d = driver();
        d.tick();
        d.resize(800.0, 600.0);
        assert_eq!(d.sink().position_uploads(), 1);
    }

    #[test]
    fn degenerate_viewport_ticks_empty_frames() {
        let mut d = driver();
        d.tick();
        d.resize(-10.0, 600.0);
        assert!(d.grid().is_empty());
        let before = d.time();
        let frame = d.tick();
        assert!(frame.is_empty());
        assert!(d.time() > before);
        assert!(d.sink().sizes().is_empty());
        assert_eq!(d.sink().frames(), 2);
    }

    #[test]
    fn viewport_adapter_is_object_safe() {
        let mut d = AnimationDriver::new(wave_config(), 10.0, 10.0, 0, NullSink);
        let adapter: &mut dyn ViewportAdapter = &mut d;
        adapter.resize(20.0, 20.0);
        assert_eq!(d.viewport(), (20.0, 20.0));
    }

    // -- parameter routing --

    #[test]
    fn apply_unknown_name_changes_nothing() {
        let mut d = driver();
        d.tick();
        let before = d.store().values();
        assert!(d.apply("waveSpeed", &json!(3.0)).is_err());
        assert_eq!(d.store().values(), before);
    }

    #[test]
    fn observer_sees_driver_sets() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut d = driver();
        let seen = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&seen);
        d.observe(ParamId::Angle, move |v| sink.set(v));
        d.apply("angle", &json!(400.0)).unwrap();
        assert_eq!(seen.get(), 360.0);
    }

    #[test]
    fn same_seed_same_frames() {
        let config = Preset::Storm.config();
        let mut a = AnimationDriver::new(config.clone(), 120.0, 80.0, 7, NullSink);
        let mut b = AnimationDriver::new(config, 120.0, 80.0, 7, NullSink);
        for _ in 0..10 {
            a.tick();
            b.tick();
        }
        assert!(a
            .frame()
            .values()
            .iter()
            .zip(b.frame().values())
            .all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    #[test]
    fn every_preset_ticks_within_size_bounds() {
        for preset in Preset::ALL {
            let config = preset.config();
            let lo = config.get(ParamId::MinSize).max(1.0);
            let hi = config.get(ParamId::MaxSize);
            let mut d = AnimationDriver::new(config, 160.0, 120.0, 3, NullSink);
            for _ in 0..5 {
                let frame = d.tick();
                assert!(
                    frame.values().iter().all(|v| *v >= lo && *v <= hi),
                    "{} left [{lo}, {hi}]",
                    preset.name()
                );
            }
        }
    }
}
