//! Output generator contract
//!
//! A generator consumes the position history one change at a time. It keeps
//! a cursor with the last position it has seen; dispatch compares the next
//! position against that cursor and calls only the reactions whose inputs
//! changed.

use gcodevm_core::{CutterCompensation, FeedMode, GeneratorError, MoveMode, Position};

/// Result of a generator reaction
pub type GeneratorResult = Result<(), GeneratorError>;

/// Interface for exporting a position history
///
/// Only the cursor bookkeeping is required. Every reaction defaults to a
/// no-op, so observer-style generators implement just the reactions they
/// care about.
pub trait CodeGenerator {
    /// Name used in error reports
    fn name(&self) -> &str {
        "generator"
    }

    /// Last position this generator has seen
    fn position(&self) -> &Position;

    /// Record the last seen position
    fn set_position(&mut self, position: Position);

    /// Reset the cursor to the initial position
    fn init(&mut self) {
        self.set_position(Position::default());
    }

    /// Called when the selected tool changes
    fn toolchange(&mut self, _tool: Option<u32>) -> GeneratorResult {
        Ok(())
    }

    /// Called when spindle enable, direction or speed changes
    fn spindle(&mut self, _enabled: bool, _clockwise: bool, _speed: f64) -> GeneratorResult {
        Ok(())
    }

    /// Called when flood or mist coolant changes
    fn coolant(&mut self, _flood: bool, _mist: bool) -> GeneratorResult {
        Ok(())
    }

    /// Called when the feed rate mode changes
    fn feed_mode(&mut self, _mode: Option<FeedMode>) -> GeneratorResult {
        Ok(())
    }

    /// Called when the feed rate changes
    fn feedrate(&mut self, _feedrate: f64) -> GeneratorResult {
        Ok(())
    }

    /// Called when cutter compensation changes
    fn cutter_compensation(&mut self, _mode: Option<CutterCompensation>) -> GeneratorResult {
        Ok(())
    }

    /// Called when X, Y or Z changes
    fn move_to(&mut self, _x: f64, _y: f64, _z: f64, _mode: Option<MoveMode>) -> GeneratorResult {
        Ok(())
    }
}

/// A generator with position bookkeeping only
///
/// Useful on its own to track the last exported position, or embedded in a
/// richer generator that forwards `position`/`set_position` to it.
#[derive(Debug, Clone, Default)]
pub struct BaseGenerator {
    position: Position,
}

impl BaseGenerator {
    /// Create a generator at the initial position
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeGenerator for BaseGenerator {
    fn name(&self) -> &str {
        "base"
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}
