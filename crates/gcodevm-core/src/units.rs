//! Unit conversion utilities
//!
//! Positions are always stored in millimeters. Statement values given in
//! inches (G20) are scaled on the way in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm), G21
    #[default]
    Metric,
    /// Imperial system (inches), G20
    Imperial,
}

impl MeasurementSystem {
    /// Convert a value given in this system to millimeters
    pub fn to_mm(self, value: f64) -> f64 {
        match self {
            Self::Metric => value,
            Self::Imperial => value * MM_PER_INCH,
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}
