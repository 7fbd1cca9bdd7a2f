//! Exit codes for `wavegrid`.
//!
//! - 0:  the run, listing or schema dump completed
//! - 2:  clap rejected the command line
//! - 10: the engine refused the run: unknown preset, unknown parameter name,
//!   wrong JSON type for a parameter, a non-positive or non-finite viewport, or
//!   a malformed color hex
//! - 12: `--params` is not valid JSON
//! - 13: frame stats, the preset list or the schema could not be encoded

use std::fmt;

use wavegrid_core::WaveError;

/// Why a `wavegrid` invocation failed.
#[derive(Debug)]
pub enum CliError {
    /// `RunSpec::validate` or the parameter store rejected the run.
    Engine(WaveError),
    /// The `--params` override object did not parse.
    Input(String),
    /// Report output could not be written as JSON.
    Serialization(String),
}

impl CliError {
    /// Process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<WaveError> for CliError {
    fn from(e: WaveError) -> Self {
        CliError::Engine(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_exit_code_is_10() {
        let err = CliError::Engine(WaveError::UnknownPreset("foo".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = CliError::Input("bad params".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn from_wave_error_routes_to_engine() {
        let cli_err = CliError::from(WaveError::UnknownParameter("xyz".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("xyz"));
    }

    #[test]
    fn rejected_runs_exit_with_engine_code() {
        let zero_width = wavegrid_core::RunSpec::new("classic", 0.0, 600.0, 1);
        let err = CliError::from(zero_width.validate().unwrap_err());
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("width"));

        let mut bad_type = wavegrid_core::RunSpec::new("classic", 800.0, 600.0, 1);
        bad_type.params = serde_json::json!({"speed": "fast"});
        assert_eq!(CliError::from(bad_type.validate().unwrap_err()).exit_code(), 10);
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
