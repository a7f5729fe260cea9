//! # GCodeVM Export
//!
//! Output side of GCodeVM. A position history produced by the machine is
//! replayed into one or more [`CodeGenerator`]s; each generator only sees
//! the reactions whose inputs changed since its last position.

pub mod dispatch;
pub mod generator;
pub mod recorder;
pub mod tracing_generator;

pub use dispatch::{handle_all_positions, handle_position, handle_position_at_index};
pub use generator::{BaseGenerator, CodeGenerator, GeneratorResult};
pub use recorder::{EventRecorder, GeneratorEvent};
pub use tracing_generator::TracingGenerator;
