//! # GCodeVM Machine
//!
//! Position engine for GCodeVM. Resolves pre-tokenized statements into an
//! append-only history of absolute positions:
//! - Statement accessor contract ([`WordSource`]) and a word-list [`Statement`]
//! - Unit and distance mode resolution ([`Machine::calc_pos`])
//! - Linear moves ([`Machine::positioning`])
//! - Arc approximation in the XY, XZ and YZ planes ([`Machine::approximate_arc`])
//! - Block interpretation of modal G/M words ([`Machine::process`])

pub mod arc;
pub mod interpreter;
pub mod machine;
pub mod statement;

pub use arc::{
    arc_steps, sweep_angle, unproject, PlaneArc, MAX_ARC_SEGMENTS, MAX_RADIUS_DEVIATION,
};
pub use machine::{Machine, Target};
pub use statement::{Statement, Word, WordSource};
