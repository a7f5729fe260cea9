//! Position engine
//!
//! A [`Machine`] owns its configuration, the current discrete state and an
//! append-only history of absolute positions. The history is seeded with a
//! sentinel position, so it is never empty and its last element is always
//! the position the next statement is resolved against.

use gcodevm_core::{ConfigError, MachineConfig, MachineError, Position, State};
use tracing::trace;

use crate::statement::WordSource;

/// Absolute coordinates resolved from one statement
///
/// `x`, `y`, `z` are the target of the move. `i`, `j`, `k` are the absolute
/// arc center; for incremental arc centers they are resolved against the
/// start of the move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Target {
    /// Absolute X in mm
    pub x: f64,
    /// Absolute Y in mm
    pub y: f64,
    /// Absolute Z in mm
    pub z: f64,
    /// Absolute arc center X in mm
    pub i: f64,
    /// Absolute arc center Y in mm
    pub j: f64,
    /// Absolute arc center Z in mm
    pub k: f64,
}

/// Position engine with its position history
#[derive(Debug, Clone)]
pub struct Machine {
    config: MachineConfig,
    /// Discrete state applied to the next appended position
    pub state: State,
    positions: Vec<Position>,
}

impl Machine {
    /// Create a machine with a validated configuration
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: State::default(),
            positions: vec![Position::default()],
        })
    }

    /// Machine configuration
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Mutable machine configuration
    ///
    /// Tolerances changed through this reference are not revalidated; use
    /// [`Machine::set_config`] for that.
    pub fn config_mut(&mut self) -> &mut MachineConfig {
        &mut self.config
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: MachineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Discrete state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Every recorded position, oldest first
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Consume the machine, keeping its history
    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }

    /// The position the next statement is resolved against
    pub fn current(&self) -> &Position {
        // The history is seeded in `new` and only ever grows.
        &self.positions[self.positions.len() - 1]
    }

    pub(crate) fn push_position(&mut self, position: Position) {
        trace!(
            index = self.positions.len(),
            x = position.x,
            y = position.y,
            z = position.z,
            "append position"
        );
        self.positions.push(position);
    }

    /// Resolve the absolute target and arc center of a statement
    ///
    /// Axes missing from the statement keep the current coordinate, missing
    /// center offsets are 0. Values are scaled to mm before incremental
    /// modes add the start position.
    pub fn calc_pos<S>(&self, stmt: &S) -> Result<Target, MachineError>
    where
        S: WordSource + ?Sized,
    {
        let pos = self.current();
        let units = self.config.units;
        let axis = |letter: char| -> Result<Option<f64>, MachineError> {
            match stmt.word(letter) {
                Some(value) if !value.is_finite() => Err(MachineError::invalid_word(
                    letter,
                    value,
                    "value must be finite",
                )),
                Some(value) => Ok(Some(units.to_mm(value))),
                None => Ok(None),
            }
        };

        let incremental = self.config.distance_mode.is_incremental();
        let resolve = |letter: char, current: f64| -> Result<f64, MachineError> {
            Ok(match axis(letter)? {
                Some(value) if incremental => current + value,
                Some(value) => value,
                None => current,
            })
        };
        let x = resolve('X', pos.x)?;
        let y = resolve('Y', pos.y)?;
        let z = resolve('Z', pos.z)?;

        let arc_incremental = self.config.arc_distance_mode.is_incremental();
        let center = |letter: char, start: f64| -> Result<f64, MachineError> {
            let value = axis(letter)?.unwrap_or(0.0);
            Ok(if arc_incremental { start + value } else { value })
        };
        let i = center('I', pos.x)?;
        let j = center('J', pos.y)?;
        let k = center('K', pos.z)?;

        Ok(Target { x, y, z, i, j, k })
    }

    /// Append a linear move to the statement's target
    pub fn positioning<S>(&mut self, stmt: &S) -> Result<(), MachineError>
    where
        S: WordSource + ?Sized,
    {
        let target = self.calc_pos(stmt)?;
        let position = Position::new(self.state, target.x, target.y, target.z);
        self.push_position(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Statement;
    use gcodevm_core::{DistanceMode, MeasurementSystem};

    fn machine(config: MachineConfig) -> Machine {
        Machine::new(config).unwrap()
    }

    #[test]
    fn test_new_machine_has_sentinel_position() {
        let m = machine(MachineConfig::default());
        assert_eq!(m.positions().len(), 1);
        assert_eq!(*m.current(), Position::default());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MachineConfig::default().with_arc_tolerance(-1.0, 0.01);
        assert!(Machine::new(config).is_err());
    }

    #[test]
    fn test_missing_axes_keep_current_value() {
        let mut m = machine(MachineConfig::default());
        m.positioning(&Statement::from_words([('X', 1.0), ('Y', 2.0), ('Z', 3.0)]))
            .unwrap();
        m.positioning(&Statement::from_words([('Y', 5.0)])).unwrap();
        let pos = m.current();
        assert_eq!((pos.x, pos.y, pos.z), (1.0, 5.0, 3.0));
    }

    #[test]
    fn test_incremental_positioning_adds_to_current() {
        let config = MachineConfig::default().with_distance_mode(DistanceMode::Incremental);
        let mut m = machine(config);
        m.positioning(&Statement::from_words([('X', 2.0)])).unwrap();
        m.positioning(&Statement::from_words([('X', 2.0), ('Z', -1.0)]))
            .unwrap();
        let pos = m.current();
        assert_eq!((pos.x, pos.y, pos.z), (4.0, 0.0, -1.0));
    }

    #[test]
    fn test_imperial_scales_axes_and_centers_independently() {
        let config = MachineConfig::default()
            .with_units(MeasurementSystem::Imperial)
            .with_arc_distance_mode(DistanceMode::Absolute);
        let m = machine(config);
        let target = m
            .calc_pos(&Statement::from_words([
                ('X', 1.0),
                ('Z', 2.0),
                ('I', 0.5),
                ('J', -1.0),
                ('K', 3.0),
            ]))
            .unwrap();
        assert_eq!(target.x, 25.4);
        assert_eq!(target.z, 50.8);
        assert_eq!(target.i, 12.7);
        assert_eq!(target.j, -25.4);
        // K scales from its own value, not from Z.
        assert!((target.k - 76.2).abs() < 1e-12);
    }

    #[test]
    fn test_incremental_center_is_relative_to_start() {
        let mut m = machine(MachineConfig::default());
        m.positioning(&Statement::from_words([('X', 10.0), ('Y', 10.0)]))
            .unwrap();
        let target = m
            .calc_pos(&Statement::from_words([('X', 20.0), ('I', 5.0), ('J', -2.0)]))
            .unwrap();
        assert_eq!((target.i, target.j, target.k), (15.0, 8.0, 0.0));
    }

    #[test]
    fn test_non_finite_value_is_rejected() {
        let m = machine(MachineConfig::default());
        let err = m
            .calc_pos(&Statement::from_words([('X', f64::INFINITY)]))
            .unwrap_err();
        assert!(matches!(err, MachineError::InvalidWord { letter: 'X', .. }));
    }

    #[test]
    fn test_positioning_carries_state() {
        let mut m = machine(MachineConfig::default());
        m.state.feedrate = 300.0;
        m.positioning(&Statement::from_words([('X', 1.0)])).unwrap();
        assert_eq!(m.current().state.feedrate, 300.0);
        assert_eq!(m.positions()[0].state.feedrate, 0.0);
    }
}
