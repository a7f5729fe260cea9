//! Block interpreter
//!
//! Applies the modal words of a pre-tokenized block to the machine state and
//! then performs the block's motion, if any.

use gcodevm_core::{
    CutterCompensation, DistanceMode, Error, FeedMode, MachineError, MeasurementSystem, MoveMode,
    Plane, Position,
};
use tracing::debug;

use crate::machine::Machine;
use crate::statement::WordSource;

/// A G or M code split into its number and one decimal digit, e.g. 91.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Code {
    number: u32,
    minor: u32,
}

impl Code {
    fn parse(letter: char, value: f64) -> Result<Self, MachineError> {
        if !value.is_finite() || value < 0.0 || value > 1000.0 {
            return Err(MachineError::invalid_word(letter, value, "not a valid code"));
        }
        let tenths = (value * 10.0).round() as u32;
        if ((tenths as f64) / 10.0 - value).abs() > 1e-6 {
            return Err(MachineError::invalid_word(letter, value, "not a valid code"));
        }
        Ok(Self {
            number: tenths / 10,
            minor: tenths % 10,
        })
    }
}

/// G codes accepted without effect on positions
const IGNORED_G: &[u32] = &[4, 54, 55, 56, 57, 58, 59, 61, 64];
/// M codes accepted without effect on positions
const IGNORED_M: &[u32] = &[0, 1, 2, 6, 30];

impl Machine {
    /// Apply one block and perform its motion
    ///
    /// Modal words are applied in a fixed order regardless of their order in
    /// the block: feed mode, plane, units and distance modes first, then `F`,
    /// `S`, `T`, spindle and coolant, and cutter compensation and motion
    /// mode last. A block
    /// with X/Y/Z words then moves; a block without them that changed the
    /// discrete state appends one position at the current coordinates so the
    /// change is replayed in order.
    ///
    /// A failing block leaves state, configuration and history as they were.
    pub fn process<S>(&mut self, stmt: &S) -> Result<(), MachineError>
    where
        S: WordSource + ?Sized,
    {
        let saved_state = self.state;
        let saved_config = *self.config();
        let result = self.apply_block(stmt);
        if result.is_err() {
            self.state = saved_state;
            *self.config_mut() = saved_config;
        }
        result
    }

    fn apply_block<S>(&mut self, stmt: &S) -> Result<(), MachineError>
    where
        S: WordSource + ?Sized,
    {
        let g_codes = stmt
            .words('G')
            .into_iter()
            .map(|v| Code::parse('G', v).map(|c| (v, c)))
            .collect::<Result<Vec<_>, _>>()?;
        let m_codes = stmt
            .words('M')
            .into_iter()
            .map(|v| Code::parse('M', v).map(|c| (v, c)))
            .collect::<Result<Vec<_>, _>>()?;
        let before = self.state;

        for &(value, code) in &g_codes {
            self.apply_g_code(value, code)?;
        }

        if let Some(f) = stmt.word('F') {
            if !f.is_finite() || f < 0.0 {
                return Err(MachineError::invalid_word('F', f, "must be >= 0"));
            }
            self.state.feedrate = match self.state.feed_mode {
                Some(FeedMode::InverseTime) => f,
                _ => self.config().units.to_mm(f),
            };
        }
        if let Some(s) = stmt.word('S') {
            if !s.is_finite() || s < 0.0 {
                return Err(MachineError::invalid_word('S', s, "must be >= 0"));
            }
            self.state.spindle_speed = s;
        }
        if let Some(t) = stmt.word('T') {
            if !t.is_finite() || t < 0.0 || t.fract() != 0.0 || t > f64::from(u32::MAX) {
                return Err(MachineError::invalid_word(
                    'T',
                    t,
                    "must be a non-negative integer",
                ));
            }
            self.state.tool = Some(t as u32);
        }

        for &(value, code) in &m_codes {
            self.apply_m_code(value, code)?;
        }

        for &(value, code) in &g_codes {
            if code.minor == 0 {
                if let Some(mode) = CutterCompensation::from_gcode(code.number) {
                    self.state.cutter_compensation = Some(mode);
                } else if let Some(mode) = MoveMode::from_gcode(code.number) {
                    self.state.move_mode = Some(mode);
                }
            }
            debug!(code = value, "applied G code");
        }

        let axis = ['X', 'Y', 'Z'].into_iter().find(|&l| stmt.has(l));
        match (axis, self.state.move_mode) {
            (Some(letter), None) => Err(MachineError::invalid_word(
                letter,
                stmt.get_or(letter, 0.0),
                "no motion mode selected",
            )),
            (Some(_), Some(mode)) if mode.is_arc() => self.approximate_arc(stmt),
            (Some(_), Some(_)) => self.positioning(stmt),
            (None, _) => {
                if self.state != before {
                    let current = *self.current();
                    self.push_position(Position::new(
                        self.state,
                        current.x,
                        current.y,
                        current.z,
                    ));
                }
                Ok(())
            }
        }
    }

    /// Process every block in order, stopping at the first failing block
    pub fn run<I>(&mut self, blocks: I) -> gcodevm_core::Result<()>
    where
        I: IntoIterator,
        I::Item: WordSource,
    {
        for (index, block) in blocks.into_iter().enumerate() {
            self.process(&block)
                .map_err(|source| Error::Block { index, source })?;
        }
        debug!(positions = self.positions().len(), "program processed");
        Ok(())
    }

    /// Apply the configuration part of a G code, validating every code
    fn apply_g_code(&mut self, value: f64, code: Code) -> Result<(), MachineError> {
        if code.minor == 0 {
            if let Some(mode) = FeedMode::from_gcode(code.number) {
                self.state.feed_mode = Some(mode);
                return Ok(());
            }
        }
        let config = self.config_mut();
        match (code.number, code.minor) {
            (17..=19, 0) => {
                if let Some(plane) = Plane::from_gcode(code.number) {
                    config.plane = plane;
                }
            }
            (20, 0) => config.units = MeasurementSystem::Imperial,
            (21, 0) => config.units = MeasurementSystem::Metric,
            (90, 0) => config.distance_mode = DistanceMode::Absolute,
            (91, 0) => config.distance_mode = DistanceMode::Incremental,
            (90, 1) => config.arc_distance_mode = DistanceMode::Absolute,
            (91, 1) => config.arc_distance_mode = DistanceMode::Incremental,
            (0..=3, 0) | (40..=42, 0) => {}
            (number, 0) if IGNORED_G.contains(&number) => {}
            _ => return Err(MachineError::invalid_word('G', value, "unsupported G code")),
        }
        Ok(())
    }

    fn apply_m_code(&mut self, value: f64, code: Code) -> Result<(), MachineError> {
        if code.minor != 0 {
            return Err(MachineError::invalid_word('M', value, "unsupported M code"));
        }
        match code.number {
            3 => {
                self.state.spindle_enabled = true;
                self.state.spindle_clockwise = true;
            }
            4 => {
                self.state.spindle_enabled = true;
                self.state.spindle_clockwise = false;
            }
            5 => self.state.spindle_enabled = false,
            7 => self.state.mist_coolant = true,
            8 => self.state.flood_coolant = true,
            9 => {
                self.state.mist_coolant = false;
                self.state.flood_coolant = false;
            }
            number if IGNORED_M.contains(&number) => {}
            _ => return Err(MachineError::invalid_word('M', value, "unsupported M code")),
        }
        Ok(())
    }
}
