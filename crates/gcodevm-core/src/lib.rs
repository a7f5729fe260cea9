//! # GCodeVM Core
//!
//! Core types shared by the GCodeVM crates: the discrete machine state,
//! absolute positions, machine configuration, unit conversion and the
//! error types of every layer.

pub mod config;
pub mod error;
pub mod state;
pub mod units;

pub use config::{DistanceMode, MachineConfig, Plane};
pub use error::{ConfigError, DispatchError, Error, GeneratorError, MachineError, Result};
pub use state::{CutterCompensation, FeedMode, MoveMode, Position, State};
pub use units::{MeasurementSystem, MM_PER_INCH};
