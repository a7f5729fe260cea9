//! A generator that records every reaction it receives

use gcodevm_core::{CutterCompensation, FeedMode, MoveMode, Position};
use serde::{Deserialize, Serialize};

use crate::generator::{CodeGenerator, GeneratorResult};

/// One generator reaction with its arguments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GeneratorEvent {
    Toolchange {
        tool: Option<u32>,
    },
    Spindle {
        enabled: bool,
        clockwise: bool,
        speed: f64,
    },
    Coolant {
        flood: bool,
        mist: bool,
    },
    FeedMode {
        mode: Option<FeedMode>,
    },
    Feedrate {
        feedrate: f64,
    },
    CutterCompensation {
        mode: Option<CutterCompensation>,
    },
    Move {
        x: f64,
        y: f64,
        z: f64,
        mode: Option<MoveMode>,
    },
}

impl GeneratorEvent {
    /// Check if this event is a move
    pub fn is_move(&self) -> bool {
        matches!(self, GeneratorEvent::Move { .. })
    }
}

/// Collects reactions in call order
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    position: Position,
    events: Vec<GeneratorEvent>,
}

impl EventRecorder {
    /// Create an empty recorder at the initial position
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first
    pub fn events(&self) -> &[GeneratorEvent] {
        &self.events
    }

    /// Consume the recorder, keeping its events
    pub fn into_events(self) -> Vec<GeneratorEvent> {
        self.events
    }

    /// Number of recorded moves
    pub fn move_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_move()).count()
    }

    /// Forget recorded events; the cursor is kept
    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, event: GeneratorEvent) -> GeneratorResult {
        self.events.push(event);
        Ok(())
    }
}

impl CodeGenerator for EventRecorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn toolchange(&mut self, tool: Option<u32>) -> GeneratorResult {
        self.record(GeneratorEvent::Toolchange { tool })
    }

    fn spindle(&mut self, enabled: bool, clockwise: bool, speed: f64) -> GeneratorResult {
        self.record(GeneratorEvent::Spindle {
            enabled,
            clockwise,
            speed,
        })
    }

    fn coolant(&mut self, flood: bool, mist: bool) -> GeneratorResult {
        self.record(GeneratorEvent::Coolant { flood, mist })
    }

    fn feed_mode(&mut self, mode: Option<FeedMode>) -> GeneratorResult {
        self.record(GeneratorEvent::FeedMode { mode })
    }

    fn feedrate(&mut self, feedrate: f64) -> GeneratorResult {
        self.record(GeneratorEvent::Feedrate { feedrate })
    }

    fn cutter_compensation(&mut self, mode: Option<CutterCompensation>) -> GeneratorResult {
        self.record(GeneratorEvent::CutterCompensation { mode })
    }

    fn move_to(&mut self, x: f64, y: f64, z: f64, mode: Option<MoveMode>) -> GeneratorResult {
        self.record(GeneratorEvent::Move { x, y, z, mode })
    }
}
