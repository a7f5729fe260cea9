//! Machine configuration
//!
//! Settings that shape how statements are resolved into positions. They are
//! owned by each machine instance, so independent machines never share them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::units::MeasurementSystem;

/// Plane selection - Group 2 (G17, G18, G19)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Plane {
    /// XY plane (G17), arc center from I/J, helix along Z
    #[default]
    XY,
    /// XZ plane (G18), arc center from K/I, helix along Y
    XZ,
    /// YZ plane (G19), arc center from J/K, helix along X
    YZ,
}

impl Plane {
    /// Map a G-code number to a plane
    pub fn from_gcode(code: u32) -> Option<Self> {
        match code {
            17 => Some(Self::XY),
            18 => Some(Self::XZ),
            19 => Some(Self::YZ),
            _ => None,
        }
    }

    /// The G-code number selecting this plane
    pub fn gcode(self) -> u32 {
        match self {
            Self::XY => 17,
            Self::XZ => 18,
            Self::YZ => 19,
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XY => write!(f, "XY plane (G17)"),
            Self::XZ => write!(f, "XZ plane (G18)"),
            Self::YZ => write!(f, "YZ plane (G19)"),
        }
    }
}

/// Distance mode (G90/G91 for axes, G90.1/G91.1 for arc centers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMode {
    /// Values are absolute coordinates
    Absolute,
    /// Values are offsets from the current position
    Incremental,
}

impl DistanceMode {
    /// Check if values are offsets
    pub fn is_incremental(self) -> bool {
        self == Self::Incremental
    }
}

impl fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => write!(f, "Absolute"),
            Self::Incremental => write!(f, "Incremental"),
        }
    }
}

/// Machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Units of statement values
    pub units: MeasurementSystem,
    /// Distance mode for X/Y/Z
    pub distance_mode: DistanceMode,
    /// Distance mode for I/J/K
    pub arc_distance_mode: DistanceMode,
    /// Active work plane for arcs
    pub plane: Plane,
    /// Maximum chordal deviation of an approximated arc, in mm
    pub max_arc_deviation: f64,
    /// Minimum length of a line segment of an approximated arc, in mm
    pub min_arc_line_length: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            units: MeasurementSystem::Metric,
            distance_mode: DistanceMode::Absolute,
            arc_distance_mode: DistanceMode::Incremental,
            plane: Plane::XY,
            max_arc_deviation: 0.002,
            min_arc_line_length: 0.01,
        }
    }
}

impl MachineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the units
    pub fn with_units(mut self, units: MeasurementSystem) -> Self {
        self.units = units;
        self
    }

    /// Set the axis distance mode
    pub fn with_distance_mode(mut self, mode: DistanceMode) -> Self {
        self.distance_mode = mode;
        self
    }

    /// Set the arc center distance mode
    pub fn with_arc_distance_mode(mut self, mode: DistanceMode) -> Self {
        self.arc_distance_mode = mode;
        self
    }

    /// Set the work plane
    pub fn with_plane(mut self, plane: Plane) -> Self {
        self.plane = plane;
        self
    }

    /// Set the arc tolerances
    pub fn with_arc_tolerance(mut self, max_deviation: f64, min_line_length: f64) -> Self {
        self.max_arc_deviation = max_deviation;
        self.min_arc_line_length = min_line_length;
        self
    }

    /// Validate the arc tolerances
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_arc_deviation.is_finite() || self.max_arc_deviation <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "max_arc_deviation".to_string(),
                reason: format!("must be > 0, got {}", self.max_arc_deviation),
            });
        }
        if !self.min_arc_line_length.is_finite() || self.min_arc_line_length <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "min_arc_line_length".to_string(),
                reason: format!("must be > 0, got {}", self.min_arc_line_length),
            });
        }
        Ok(())
    }
}
