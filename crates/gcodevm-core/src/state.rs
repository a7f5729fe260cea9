//! Discrete machine state and absolute positions
//!
//! A [`Position`] is one entry of the machine's position history: absolute
//! X/Y/Z coordinates in millimeters plus a snapshot of the discrete [`State`]
//! at that point. Modal values that have never been programmed are `None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion mode - Group 1 (G00, G01, G02, G03)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    /// Rapid positioning (G00)
    Rapid,
    /// Linear interpolation (G01)
    Linear,
    /// Clockwise arc (G02)
    ClockwiseArc,
    /// Counter-clockwise arc (G03)
    CounterClockwiseArc,
}

impl MoveMode {
    /// Map a G-code number to a motion mode
    pub fn from_gcode(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Rapid),
            1 => Some(Self::Linear),
            2 => Some(Self::ClockwiseArc),
            3 => Some(Self::CounterClockwiseArc),
            _ => None,
        }
    }

    /// The G-code number selecting this mode
    pub fn gcode(self) -> u32 {
        match self {
            Self::Rapid => 0,
            Self::Linear => 1,
            Self::ClockwiseArc => 2,
            Self::CounterClockwiseArc => 3,
        }
    }

    /// Check if this mode describes an arc
    pub fn is_arc(self) -> bool {
        matches!(self, Self::ClockwiseArc | Self::CounterClockwiseArc)
    }
}

impl fmt::Display for MoveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rapid => write!(f, "Rapid positioning (G00)"),
            Self::Linear => write!(f, "Linear interpolation (G01)"),
            Self::ClockwiseArc => write!(f, "Clockwise arc (G02)"),
            Self::CounterClockwiseArc => write!(f, "Counter-clockwise arc (G03)"),
        }
    }
}

/// Feed rate mode - Group 5 (G93, G94, G95)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// Inverse time (G93)
    InverseTime,
    /// Units per minute (G94)
    UnitsPerMinute,
    /// Units per revolution (G95)
    UnitsPerRevolution,
}

impl FeedMode {
    /// Map a G-code number to a feed mode
    pub fn from_gcode(code: u32) -> Option<Self> {
        match code {
            93 => Some(Self::InverseTime),
            94 => Some(Self::UnitsPerMinute),
            95 => Some(Self::UnitsPerRevolution),
            _ => None,
        }
    }

    /// The G-code number selecting this mode
    pub fn gcode(self) -> u32 {
        match self {
            Self::InverseTime => 93,
            Self::UnitsPerMinute => 94,
            Self::UnitsPerRevolution => 95,
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InverseTime => write!(f, "Inverse time (G93)"),
            Self::UnitsPerMinute => write!(f, "Units per minute (G94)"),
            Self::UnitsPerRevolution => write!(f, "Units per revolution (G95)"),
        }
    }
}

/// Cutter compensation - Group 7 (G40, G41, G42)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutterCompensation {
    /// Compensation off (G40)
    Off,
    /// Compensate left of path (G41)
    Left,
    /// Compensate right of path (G42)
    Right,
}

impl CutterCompensation {
    /// Map a G-code number to a compensation mode
    pub fn from_gcode(code: u32) -> Option<Self> {
        match code {
            40 => Some(Self::Off),
            41 => Some(Self::Left),
            42 => Some(Self::Right),
            _ => None,
        }
    }

    /// The G-code number selecting this mode
    pub fn gcode(self) -> u32 {
        match self {
            Self::Off => 40,
            Self::Left => 41,
            Self::Right => 42,
        }
    }
}

impl fmt::Display for CutterCompensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "Compensation off (G40)"),
            Self::Left => write!(f, "Compensation left (G41)"),
            Self::Right => write!(f, "Compensation right (G42)"),
        }
    }
}

/// Discrete machine state
///
/// Everything except the coordinates that an output generator may need to
/// react to. `None` marks a modal value that was never programmed, so a
/// change from `None` to any value is a real change.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    /// Current feed rate (F value), in mm per feed mode unit
    pub feedrate: f64,
    /// Current spindle speed (S value)
    pub spindle_speed: f64,
    /// Motion mode
    pub move_mode: Option<MoveMode>,
    /// Feed rate mode
    pub feed_mode: Option<FeedMode>,
    /// Spindle running
    pub spindle_enabled: bool,
    /// Spindle direction, true for clockwise (M3)
    pub spindle_clockwise: bool,
    /// Flood coolant (M8)
    pub flood_coolant: bool,
    /// Mist coolant (M7)
    pub mist_coolant: bool,
    /// Selected tool (T value)
    pub tool: Option<u32>,
    /// Cutter compensation
    pub cutter_compensation: Option<CutterCompensation>,
}

impl State {
    /// Create a new state with every modal value unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of this state with a different motion mode
    pub fn with_move_mode(mut self, mode: MoveMode) -> Self {
        self.move_mode = Some(mode);
        self
    }
}

/// An absolute machine position with the state in effect there
///
/// Positions are values: once appended to a history they are never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Discrete state at this position
    pub state: State,
    /// Absolute X in mm
    pub x: f64,
    /// Absolute Y in mm
    pub y: f64,
    /// Absolute Z in mm
    pub z: f64,
}

impl Position {
    /// Create a position at the given coordinates
    pub fn new(state: State, x: f64, y: f64, z: f64) -> Self {
        Self { state, x, y, z }
    }

    /// Check if the coordinates differ from another position
    pub fn moved_from(&self, other: &Position) -> bool {
        self.x != other.x || self.y != other.y || self.z != other.z
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{:.4} Y{:.4} Z{:.4}", self.x, self.y, self.z)
    }
}
