//! Error types for the wavegrid core.
//!
//! Every error here is recoverable. Callers on the tick path log and carry on;
//! the `Result`-returning entry points exist so hosts can report problems.

use thiserror::Error;

/// Errors produced by wavegrid operations.
#[derive(Debug, Error)]
pub enum WaveError {
    /// A parameter name did not match any declared parameter or color.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// A parameter existed but the supplied JSON value had the wrong type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Spacing or a viewport dimension cannot produce a lattice.
    #[error("degenerate grid: viewport {width}x{height} with spacing {spacing}")]
    DegenerateGrid {
        width: f64,
        height: f64,
        spacing: f64,
    },

    /// A preset name was not recognized.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A run description failed validation.
    #[error("invalid run spec: {0}")]
    InvalidRunSpec(String),
}
