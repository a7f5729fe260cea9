//! Property tests for position resolution and arc step counts

use gcodevm_core::{MachineConfig, MeasurementSystem, MoveMode};
use gcodevm_machine::{arc_steps, Machine, Statement};
use proptest::prelude::*;

fn seeded(config: MachineConfig, start: (f64, f64, f64)) -> Machine {
    let units = config.units;
    let mut m = Machine::new(config.with_units(MeasurementSystem::Metric)).unwrap();
    m.state.move_mode = Some(MoveMode::Linear);
    m.positioning(&Statement::from_words([
        ('X', start.0),
        ('Y', start.1),
        ('Z', start.2),
    ]))
    .unwrap();
    m.config_mut().units = units;
    m
}

proptest! {
    #[test]
    fn omitted_axes_keep_previous_value(
        start in (-500.0f64..500.0, -500.0f64..500.0, -500.0f64..500.0),
        value in -500.0f64..500.0,
        axis in 0usize..3,
    ) {
        let mut m = seeded(MachineConfig::default(), start);
        let letter = ['X', 'Y', 'Z'][axis];
        m.positioning(&Statement::from_words([(letter, value)])).unwrap();

        let pos = *m.current();
        let previous = [start.0, start.1, start.2];
        let current = [pos.x, pos.y, pos.z];
        for i in 0..3 {
            if i == axis {
                prop_assert_eq!(current[i], value);
            } else {
                prop_assert_eq!(current[i], previous[i]);
            }
        }
    }

    #[test]
    fn imperial_values_scale_by_inch(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        z in -100.0f64..100.0,
    ) {
        let config = MachineConfig::default().with_units(MeasurementSystem::Imperial);
        let mut m = seeded(config, (0.0, 0.0, 0.0));
        m.positioning(&Statement::from_words([('X', x), ('Y', y), ('Z', z)])).unwrap();
        let pos = *m.current();
        prop_assert_eq!(pos.x, x * 25.4);
        prop_assert_eq!(pos.y, y * 25.4);
        prop_assert_eq!(pos.z, z * 25.4);
    }

    #[test]
    fn metric_values_are_stored_exactly(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        z in -1000.0f64..1000.0,
    ) {
        let mut m = seeded(MachineConfig::default(), (0.0, 0.0, 0.0));
        m.positioning(&Statement::from_words([('X', x), ('Y', y), ('Z', z)])).unwrap();
        let pos = *m.current();
        prop_assert_eq!((pos.x, pos.y, pos.z), (x, y, z));
    }

    #[test]
    fn steps_grow_with_sweep(
        radius in 0.1f64..100.0,
        a in 0.001f64..20.0,
        b in 0.001f64..20.0,
        deviation in 0.0001f64..1.0,
    ) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            arc_steps(small, radius, 0.0, deviation, 0.01)
                <= arc_steps(large, radius, 0.0, deviation, 0.01)
        );
        prop_assert!(
            arc_steps(-small, radius, 0.0, deviation, 0.01)
                <= arc_steps(-large, radius, 0.0, deviation, 0.01)
        );
    }

    #[test]
    fn steps_shrink_with_deviation(
        radius in 0.1f64..100.0,
        sweep in 0.001f64..20.0,
        a in 0.0001f64..200.0,
        b in 0.0001f64..200.0,
    ) {
        let (tight, loose) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            arc_steps(sweep, radius, 0.0, tight, 0.01)
                >= arc_steps(sweep, radius, 0.0, loose, 0.01)
        );
    }
}
