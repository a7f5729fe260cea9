//! A generator that logs each reaction through `tracing`

use gcodevm_core::{CutterCompensation, FeedMode, MoveMode, Position};
use tracing::info;

use crate::generator::{CodeGenerator, GeneratorResult};

fn mode_or_unset<T: std::fmt::Display>(mode: Option<T>) -> String {
    mode.map_or_else(|| "unset".to_string(), |m| m.to_string())
}

/// Logs every reaction at info level
#[derive(Debug, Clone, Default)]
pub struct TracingGenerator {
    position: Position,
}

impl TracingGenerator {
    /// Create a generator at the initial position
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeGenerator for TracingGenerator {
    fn name(&self) -> &str {
        "tracing"
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn toolchange(&mut self, tool: Option<u32>) -> GeneratorResult {
        info!("Tool change: {}", mode_or_unset(tool));
        Ok(())
    }

    fn spindle(&mut self, enabled: bool, clockwise: bool, speed: f64) -> GeneratorResult {
        if enabled {
            let direction = if clockwise { "CW" } else { "CCW" };
            info!("Spindle on {} at {}", direction, speed);
        } else {
            info!("Spindle off");
        }
        Ok(())
    }

    fn coolant(&mut self, flood: bool, mist: bool) -> GeneratorResult {
        info!("Coolant: flood={} mist={}", flood, mist);
        Ok(())
    }

    fn feed_mode(&mut self, mode: Option<FeedMode>) -> GeneratorResult {
        info!("Feed mode: {}", mode_or_unset(mode));
        Ok(())
    }

    fn feedrate(&mut self, feedrate: f64) -> GeneratorResult {
        info!("Feed rate: {}", feedrate);
        Ok(())
    }

    fn cutter_compensation(&mut self, mode: Option<CutterCompensation>) -> GeneratorResult {
        info!("Cutter compensation: {}", mode_or_unset(mode));
        Ok(())
    }

    fn move_to(&mut self, x: f64, y: f64, z: f64, mode: Option<MoveMode>) -> GeneratorResult {
        info!("Move {} to X{:.4} Y{:.4} Z{:.4}", mode_or_unset(mode), x, y, z);
        Ok(())
    }
}
