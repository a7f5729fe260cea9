//! Error handling for GCodeVM
//!
//! Provides error types for every layer of the position pipeline:
//! - Machine errors (arc geometry, malformed words)
//! - Configuration errors (invalid tolerances)
//! - Generator errors (raised by output backends while reacting)
//! - Dispatch errors (replaying positions into generators)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Machine error type
///
/// Raised while resolving a statement into one or more absolute positions.
/// A machine error is fatal for the statement that caused it: no position
/// of that statement is appended to the history.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    /// Arc with a zero radius at its start or end point
    #[error("Invalid arc: zero radius (start radius {radius1}, end radius {radius2})")]
    DegenerateArc {
        /// Distance from the center to the start point in the work plane.
        radius1: f64,
        /// Distance from the center to the end point in the work plane.
        radius2: f64,
    },

    /// Arc whose start and end radii differ by more than 1%
    #[error("Radius deviation of {deviation_percent:.6} percent")]
    NonCircularArc {
        /// The measured radius deviation, in percent of the start radius.
        deviation_percent: f64,
    },

    /// Arc that would expand to more line segments than allowed
    #[error("Arc expands to {segments} segments, limit is {limit}")]
    TooManySegments {
        /// The computed number of segments.
        segments: usize,
        /// The largest accepted number of segments.
        limit: usize,
    },

    /// A word carries a value the machine cannot use
    #[error("Invalid word {letter}{value}: {reason}")]
    InvalidWord {
        /// The word letter.
        letter: char,
        /// The word value.
        value: f64,
        /// The reason the word was rejected.
        reason: String,
    },

    /// A required word is absent from the statement
    #[error("Missing word '{letter}'")]
    MissingWord {
        /// The letter that was looked up.
        letter: char,
    },
}

impl MachineError {
    /// Create an invalid word error
    pub fn invalid_word(letter: char, value: f64, reason: impl Into<String>) -> Self {
        MachineError::InvalidWord {
            letter,
            value,
            reason: reason.into(),
        }
    }

    /// Check if this error comes from arc validation
    pub fn is_arc_error(&self) -> bool {
        matches!(
            self,
            MachineError::DegenerateArc { .. }
                | MachineError::NonCircularArc { .. }
                | MachineError::TooManySegments { .. }
        )
    }
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A configuration value is out of its valid range
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// The reason the value is invalid.
        reason: String,
    },
}

/// Generator error type
///
/// Returned by output generator reactions. Dispatch wraps it into a
/// [`DispatchError::Reaction`] naming the generator and the reaction.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The generator could not handle the change
    #[error("{0}")]
    Fault(String),

    /// I/O error while writing generator output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    /// Create a fault from a message
    pub fn fault(msg: impl Into<String>) -> Self {
        GeneratorError::Fault(msg.into())
    }
}

/// Dispatch error type
///
/// Represents a failure while replaying positions into output generators.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A generator reaction failed
    #[error("Generator '{generator}' failed in {reaction}: {source}")]
    Reaction {
        /// Name of the generator whose reaction failed.
        generator: String,
        /// Name of the reaction that failed.
        reaction: &'static str,
        /// The error returned by the generator.
        #[source]
        source: GeneratorError,
    },

    /// Position index outside of the history
    #[error("Position index {index} out of range (history holds {len} positions)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The history length.
        len: usize,
    },

    /// Replay stopped at a position
    #[error("Replay failed at position {index}: {source}")]
    Replay {
        /// Index of the position that failed.
        index: usize,
        /// The underlying failure.
        #[source]
        source: Box<DispatchError>,
    },
}

impl DispatchError {
    /// History index of the failing position, if this error came from a replay
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            DispatchError::Replay { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Main error type for GCodeVM
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Machine error
    #[error(transparent)]
    Machine(#[from] MachineError),

    /// A block of a program failed
    #[error("Block {index}: {source}")]
    Block {
        /// Index of the block in the program.
        index: usize,
        /// The machine error raised by the block.
        #[source]
        source: MachineError,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dispatch error
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a machine error
    pub fn is_machine_error(&self) -> bool {
        matches!(self, Error::Machine(_) | Error::Block { .. })
    }

    /// Check if this is a dispatch error
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, Error::Dispatch(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
