#![deny(unsafe_code)]
//! CLI binary for the wavegrid field engine.
//!
//! Subcommands:
//! - `run <preset>`: drive the field headlessly for N ticks, report frame stats
//! - `list`: print available presets
//! - `schema`: print the grouped control-panel schema

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use log::{info, LevelFilter};
use std::process;
use wavegrid_core::{FieldFrame, FrameStats, Grid, ParameterStore, Preset, RenderSink, RunSpec};

#[derive(Parser)]
#[command(name = "wavegrid", about = "Procedural wave-field grid engine")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a preset for N ticks and report per-frame statistics.
    Run {
        /// Preset name (e.g. "classic").
        preset: String,

        /// Viewport width.
        #[arg(short = 'W', long, default_value_t = 800.0)]
        width: f64,

        /// Viewport height.
        #[arg(short = 'H', long, default_value_t = 600.0)]
        height: f64,

        /// Number of animation ticks.
        #[arg(short, long, default_value_t = 100)]
        ticks: usize,

        /// Noise seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u32,

        /// Parameter overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Report statistics for every tick instead of only the last.
        #[arg(long)]
        every: bool,
    },
    /// List available presets.
    List,
    /// Print the grouped control-panel schema.
    Schema,
}

/// Records frame statistics instead of drawing.
#[derive(Default)]
struct StatsSink {
    points: usize,
    uploads: usize,
    history: Vec<FrameStats>,
    keep_all: bool,
}

impl RenderSink for StatsSink {
    fn submit_positions(&mut self, grid: &Grid) {
        self.points = grid.len();
        self.uploads += 1;
    }

    fn submit_frame(&mut self, frame: &FieldFrame) {
        if let Some(stats) = frame.stats() {
            if !self.keep_all {
                self.history.clear();
            }
            self.history.push(stats);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let presets: Vec<serde_json::Value> = Preset::ALL
                    .iter()
                    .map(|p| serde_json::json!({"name": p.name(), "description": p.description()}))
                    .collect();
                let info = serde_json::json!({ "presets": presets });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Presets:");
                for preset in Preset::ALL {
                    println!("  {:<10} {}", preset.name(), preset.description());
                }
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&ParameterStore::schema())?);
        }
        Command::Run {
            preset,
            width,
            height,
            ticks,
            seed,
            params,
            every,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;

            let spec = RunSpec {
                preset,
                width,
                height,
                params,
                seed,
                ticks,
            };
            spec.validate()?;
            info!("running {} for {} ticks", spec.preset, spec.ticks);

            let sink = StatsSink {
                keep_all: every,
                ..StatsSink::default()
            };
            let driver = spec.run(sink)?;
            let time = driver.time();
            let values = driver.store().values();
            let sink = driver.into_sink();

            if cli.json {
                let info = serde_json::json!({
                    "spec": spec,
                    "points": sink.points,
                    "position_uploads": sink.uploads,
                    "time": time,
                    "frames": sink.history,
                    "values": values,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for stats in &sink.history {
                    println!(
                        "t={:>8.3}  points={}  min={:.3}  max={:.3}  mean={:.3}",
                        stats.time, stats.points, stats.min, stats.max, stats.mean
                    );
                }
                eprintln!(
                    "ran {} ({}x{}, {} ticks, seed {}) -> {} points",
                    spec.preset, spec.width, spec.height, spec.ticks, spec.seed, sink.points
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
