//! # GCodeVM
//!
//! A G-code motion virtual machine. Pre-tokenized blocks are resolved into an
//! append-only history of absolute positions, with arcs approximated by line
//! segments, and the history is replayed into pluggable output generators
//! that only see what changed.
//!
//! ## Architecture
//!
//! GCodeVM is organized as a workspace with multiple crates:
//!
//! 1. **gcodevm-core** - Positions, machine state, configuration, errors
//! 2. **gcodevm-machine** - Position engine, arc approximation, block interpreter
//! 3. **gcodevm-export** - Generator contract and change-tracking dispatch
//! 4. **gcodevm-settings** - JSON/TOML configuration files
//! 5. **gcodevm** - Program loading, logging and the command-line binary

use anyhow::Context;
use serde::Serialize;
use std::path::Path;

pub use gcodevm_core::{
    ConfigError, CutterCompensation, DispatchError, DistanceMode, Error, FeedMode,
    GeneratorError, MachineConfig, MachineError, MeasurementSystem, MoveMode, Plane, Position,
    Result, State,
};
pub use gcodevm_export::{
    handle_all_positions, handle_position, handle_position_at_index, BaseGenerator,
    CodeGenerator, EventRecorder, GeneratorEvent, GeneratorResult, TracingGenerator,
};
pub use gcodevm_machine::{Machine, Statement, Word, WordSource};
pub use gcodevm_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Outcome of running a program and replaying its history
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Number of blocks executed
    pub blocks: usize,
    /// Full position history, initial position included
    pub positions: Vec<Position>,
    /// Reactions recorded during replay
    pub events: Vec<GeneratorEvent>,
}

impl Report {
    /// Final machine position
    pub fn end(&self) -> Option<&Position> {
        self.positions.last()
    }

    /// Number of recorded moves
    pub fn move_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_move()).count()
    }
}

/// Parse a program: a JSON array of blocks, each an array of `[letter, value]`
pub fn parse_program(source: &str) -> anyhow::Result<Vec<Statement>> {
    serde_json::from_str(source).context("Invalid program: expected [[[letter, value], ...], ...]")
}

/// Read and parse a program file
pub fn load_program(path: &Path) -> anyhow::Result<Vec<Statement>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read program {}", path.display()))?;
    parse_program(&source)
}

/// Run `program` on a fresh machine and replay the history
///
/// Extra generators receive the replay after the built-in recorder.
pub fn simulate(
    config: &Config,
    program: &[Statement],
    generators: &mut [&mut dyn CodeGenerator],
) -> anyhow::Result<Report> {
    let mut machine = Machine::new(config.machine).context("Invalid machine configuration")?;
    machine.run(program).context("Program failed")?;

    let positions = machine.into_positions();
    let mut recorder = EventRecorder::new();
    handle_all_positions(&positions, &mut [&mut recorder]).context("Replay failed")?;
    handle_all_positions(&positions, generators).context("Replay failed")?;

    tracing::info!(
        "Executed {} blocks into {} positions",
        program.len(),
        positions.len()
    );

    Ok(Report {
        blocks: program.len(),
        positions,
        events: recorder.into_events(),
    })
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, so stdout stays free for results
/// - RUST_LOG environment variable support, `info` by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
