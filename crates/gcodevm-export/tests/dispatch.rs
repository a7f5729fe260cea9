//! Change-tracking dispatch across generators

use gcodevm_core::{
    DispatchError, FeedMode, GeneratorError, MachineConfig, MoveMode, Position, State,
};
use gcodevm_export::{
    handle_all_positions, handle_position, handle_position_at_index, BaseGenerator,
    CodeGenerator, EventRecorder, GeneratorEvent, GeneratorResult,
};
use gcodevm_machine::{Machine, Statement};

/// Fails every move, records nothing else
#[derive(Default)]
struct FailingMoves {
    position: Position,
    calls: usize,
}

impl CodeGenerator for FailingMoves {
    fn name(&self) -> &str {
        "failing"
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn move_to(&mut self, _x: f64, _y: f64, _z: f64, _mode: Option<MoveMode>) -> GeneratorResult {
        self.calls += 1;
        Err(GeneratorError::fault("axis limit"))
    }
}

fn linear(feedrate: f64) -> State {
    State {
        feedrate,
        ..State::new().with_move_mode(MoveMode::Linear)
    }
}

#[test]
fn test_feedrate_then_move_fires_two_reactions() {
    let base = Position::default();
    let feed = Position {
        state: State {
            feedrate: 300.0,
            ..base.state
        },
        ..base
    };
    let moved = Position { x: 5.0, ..feed };

    let mut recorder = EventRecorder::new();
    handle_all_positions(&[base, feed, moved], &mut [&mut recorder]).unwrap();

    assert_eq!(
        recorder.events(),
        &[
            GeneratorEvent::Feedrate { feedrate: 300.0 },
            GeneratorEvent::Move {
                x: 5.0,
                y: 0.0,
                z: 0.0,
                mode: None
            },
        ]
    );
    assert_eq!(*recorder.position(), moved);
}

#[test]
fn test_repeated_position_is_idempotent() {
    let target = Position::new(linear(100.0), 1.0, 2.0, 3.0);
    let mut recorder = EventRecorder::new();

    handle_position(&target, &mut [&mut recorder]).unwrap();
    let first = recorder.events().len();
    handle_position(&target, &mut [&mut recorder]).unwrap();

    assert_eq!(recorder.events().len(), first);
}

#[test]
fn test_each_group_fires_once() {
    let mut state = linear(100.0);
    state.tool = Some(2);
    state.spindle_enabled = true;
    state.spindle_clockwise = true;
    state.spindle_speed = 12000.0;
    state.flood_coolant = true;
    state.feed_mode = Some(FeedMode::UnitsPerMinute);
    let target = Position::new(state, 1.0, 0.0, 0.0);

    let mut recorder = EventRecorder::new();
    handle_position(&target, &mut [&mut recorder]).unwrap();

    assert_eq!(
        recorder.events(),
        &[
            GeneratorEvent::Toolchange { tool: Some(2) },
            GeneratorEvent::Spindle {
                enabled: true,
                clockwise: true,
                speed: 12000.0
            },
            GeneratorEvent::Coolant {
                flood: true,
                mist: false
            },
            GeneratorEvent::FeedMode {
                mode: Some(FeedMode::UnitsPerMinute)
            },
            GeneratorEvent::Feedrate { feedrate: 100.0 },
            GeneratorEvent::Move {
                x: 1.0,
                y: 0.0,
                z: 0.0,
                mode: Some(MoveMode::Linear)
            },
        ]
    );
}

#[test]
fn test_move_mode_alone_does_not_move() {
    let target = Position::new(State::new().with_move_mode(MoveMode::Rapid), 0.0, 0.0, 0.0);
    let mut recorder = EventRecorder::new();
    handle_position(&target, &mut [&mut recorder]).unwrap();
    assert!(recorder.events().is_empty());
    assert_eq!(*recorder.position(), target);
}

#[test]
fn test_setting_unset_value_is_a_change() {
    let mut recorder = EventRecorder::new();
    let mut state = State::new();
    state.tool = Some(0);
    handle_position(&Position::new(state, 0.0, 0.0, 0.0), &mut [&mut recorder]).unwrap();
    assert_eq!(recorder.events(), &[GeneratorEvent::Toolchange { tool: Some(0) }]);
}

#[test]
fn test_failure_keeps_earlier_generator_commit() {
    let target = Position::new(linear(0.0), 10.0, 0.0, 0.0);
    let mut first = EventRecorder::new();
    let mut failing = FailingMoves::default();
    let mut last = BaseGenerator::new();

    let err = handle_position(&target, &mut [&mut first, &mut failing, &mut last]).unwrap_err();
    match err {
        DispatchError::Reaction {
            generator,
            reaction,
            ..
        } => {
            assert_eq!(generator, "failing");
            assert_eq!(reaction, "move_to");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(*first.position(), target);
    assert_eq!(*failing.position(), Position::default());
    assert_eq!(*last.position(), Position::default());

    // The failing generator still sees the change next time.
    let _ = handle_position(&target, &mut [&mut failing]);
    assert_eq!(failing.calls, 2);
}

#[test]
fn test_replay_reports_failing_index() {
    let positions = [
        Position::default(),
        Position::new(linear(50.0), 0.0, 0.0, 0.0),
        Position::new(linear(50.0), 0.0, 4.0, 0.0),
    ];
    let mut failing = FailingMoves::default();
    let err = handle_all_positions(&positions, &mut [&mut failing]).unwrap_err();
    assert_eq!(err.failed_index(), Some(2));
    assert_eq!(*failing.position(), positions[1]);
}

#[test]
fn test_index_out_of_range() {
    let positions = [Position::default()];
    let mut base = BaseGenerator::new();
    let err = handle_position_at_index(&positions, 1, &mut base).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::IndexOutOfRange { index: 1, len: 1 }
    ));
}

#[test]
fn test_step_through_history_by_index() {
    let positions = [
        Position::default(),
        Position::new(linear(10.0), 1.0, 0.0, 0.0),
    ];
    let mut recorder = EventRecorder::new();
    for index in 0..positions.len() {
        handle_position_at_index(&positions, index, &mut recorder).unwrap();
    }
    assert_eq!(recorder.move_count(), 1);
    assert_eq!(*recorder.position(), positions[1]);
}

#[test]
fn test_machine_history_replays_to_end_point() {
    let mut machine = Machine::new(MachineConfig::default()).unwrap();
    let program = vec![
        Statement::from_words([('G', 21.0), ('G', 90.0), ('F', 600.0)]),
        Statement::from_words([('G', 0.0), ('X', 5.0), ('Y', 0.0)]),
        Statement::from_words([('M', 3.0), ('S', 8000.0)]),
        Statement::from_words([('G', 2.0), ('X', 15.0), ('I', 5.0), ('J', 0.0)]),
        Statement::from_words([('M', 5.0)]),
    ];
    machine.run(&program).unwrap();

    let mut recorder = EventRecorder::new();
    handle_all_positions(machine.positions(), &mut [&mut recorder]).unwrap();

    assert_eq!(recorder.position(), machine.current());
    let last_move = recorder
        .events()
        .iter()
        .rev()
        .find(|e| e.is_move())
        .copied()
        .unwrap();
    assert_eq!(
        last_move,
        GeneratorEvent::Move {
            x: 15.0,
            y: 0.0,
            z: 0.0,
            mode: Some(MoveMode::Linear)
        }
    );
    let spindle: Vec<_> = recorder
        .events()
        .iter()
        .filter(|e| matches!(e, GeneratorEvent::Spindle { .. }))
        .collect();
    assert_eq!(spindle.len(), 2);
}
