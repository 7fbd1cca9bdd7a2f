#![deny(unsafe_code)]
//! Core of the wavegrid procedural wave-field engine.
//!
//! Provides the noise kernel (`NoiseKernel`), wave shaping, the origin-centered
//! sample `Grid`, the `FieldComposer` pipeline, the `ParameterStore` with its
//! declared parameter table, named `Preset`s, and the `AnimationDriver` that
//! ticks everything into a `RenderSink`.

pub mod color;
pub mod composer;
pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod grid;
pub mod hash;
pub mod noise;
pub mod params;
pub mod preset;
pub mod run_spec;
pub mod shape;
pub mod sink;
pub mod store;

pub use color::Srgb;
pub use composer::FieldComposer;
pub use config::FieldConfig;
pub use driver::{AnimationDriver, DriverConfig, DriverState, TimeAccumulator, ViewportAdapter};
pub use error::WaveError;
pub use frame::{FieldFrame, FrameStats};
pub use grid::{Grid, SamplePoint};
pub use noise::{NoiseFamily, NoiseKernel};
pub use params::{ColorId, ParamGroup, ParamId};
pub use preset::Preset;
pub use run_spec::RunSpec;
pub use shape::WaveShape;
pub use sink::{BufferSink, NullSink, RenderSink};
pub use store::ParameterStore;
