//! Change-tracking dispatch
//!
//! Replays positions into generators, calling only the reactions whose
//! inputs differ from the generator's cursor. Field comparisons are exact:
//! any difference, including leaving an unset modal value, is a change.

use gcodevm_core::{DispatchError, GeneratorError, Position};
use tracing::{debug, warn};

use crate::generator::CodeGenerator;

fn reaction_fault(
    generator: &dyn CodeGenerator,
    reaction: &'static str,
    source: GeneratorError,
) -> DispatchError {
    warn!(generator = generator.name(), reaction, error = %source, "generator reaction failed");
    DispatchError::Reaction {
        generator: generator.name().to_string(),
        reaction,
        source,
    }
}

/// Apply one position to a single generator
///
/// Returns the number of reactions fired. The cursor is committed only when
/// every reaction succeeded.
fn apply(target: &Position, generator: &mut dyn CodeGenerator) -> Result<usize, DispatchError> {
    let cur = *generator.position();
    let cs = &cur.state;
    let ns = &target.state;
    let mut fired = 0;

    if ns.tool != cs.tool {
        generator
            .toolchange(ns.tool)
            .map_err(|e| reaction_fault(generator, "toolchange", e))?;
        fired += 1;
    }

    if ns.spindle_enabled != cs.spindle_enabled
        || ns.spindle_clockwise != cs.spindle_clockwise
        || ns.spindle_speed != cs.spindle_speed
    {
        generator
            .spindle(ns.spindle_enabled, ns.spindle_clockwise, ns.spindle_speed)
            .map_err(|e| reaction_fault(generator, "spindle", e))?;
        fired += 1;
    }

    if ns.flood_coolant != cs.flood_coolant || ns.mist_coolant != cs.mist_coolant {
        generator
            .coolant(ns.flood_coolant, ns.mist_coolant)
            .map_err(|e| reaction_fault(generator, "coolant", e))?;
        fired += 1;
    }

    if ns.feed_mode != cs.feed_mode {
        generator
            .feed_mode(ns.feed_mode)
            .map_err(|e| reaction_fault(generator, "feed_mode", e))?;
        fired += 1;
    }

    if ns.feedrate != cs.feedrate {
        generator
            .feedrate(ns.feedrate)
            .map_err(|e| reaction_fault(generator, "feedrate", e))?;
        fired += 1;
    }

    if ns.cutter_compensation != cs.cutter_compensation {
        generator
            .cutter_compensation(ns.cutter_compensation)
            .map_err(|e| reaction_fault(generator, "cutter_compensation", e))?;
        fired += 1;
    }

    if target.moved_from(&cur) {
        generator
            .move_to(target.x, target.y, target.z, ns.move_mode)
            .map_err(|e| reaction_fault(generator, "move_to", e))?;
        fired += 1;
    }

    generator.set_position(*target);
    Ok(fired)
}

/// Call every generator for the state changes leading to `target`
///
/// Generators are handled in order. If a reaction fails, dispatch stops:
/// generators before the failing one keep their committed cursor, the
/// failing one and those after it keep their previous cursor.
pub fn handle_position(
    target: &Position,
    generators: &mut [&mut dyn CodeGenerator],
) -> Result<(), DispatchError> {
    for generator in generators.iter_mut() {
        let fired = apply(target, &mut **generator)?;
        if fired > 0 {
            debug!(generator = generator.name(), fired, "dispatched position");
        }
    }
    Ok(())
}

/// Replay a whole position history into every generator
///
/// Stops at the first failing position; the error carries its index.
pub fn handle_all_positions(
    positions: &[Position],
    generators: &mut [&mut dyn CodeGenerator],
) -> Result<(), DispatchError> {
    for (index, position) in positions.iter().enumerate() {
        handle_position(position, generators).map_err(|source| DispatchError::Replay {
            index,
            source: Box::new(source),
        })?;
    }
    debug!(positions = positions.len(), "replayed history");
    Ok(())
}

/// Apply the position at `index` of a history to one generator
pub fn handle_position_at_index(
    positions: &[Position],
    index: usize,
    generator: &mut dyn CodeGenerator,
) -> Result<(), DispatchError> {
    let position = positions
        .get(index)
        .ok_or(DispatchError::IndexOutOfRange {
            index,
            len: positions.len(),
        })?;
    handle_position(position, &mut [generator])
}
