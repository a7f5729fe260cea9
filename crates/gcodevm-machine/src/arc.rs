//! Arc interpolation
//!
//! Approximates a circular or helical arc in the active work plane as a
//! sequence of linear moves whose chords stay within the configured
//! deviation of the true arc.

use std::f64::consts::PI;

use gcodevm_core::{MachineError, MoveMode, Plane, Position};
use tracing::{debug, warn};

use crate::machine::{Machine, Target};
use crate::statement::WordSource;

/// Largest accepted relative difference between start and end radius
pub const MAX_RADIUS_DEVIATION: f64 = 0.01;

/// Largest number of line segments a single arc may expand to
pub const MAX_ARC_SEGMENTS: usize = 1_000_000;

/// Arc coordinates flipped into a work plane
///
/// `1` and `2` are the in-plane axes, `3` is the elevation along the plane
/// normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneArc {
    /// In-plane start
    pub start: (f64, f64),
    /// In-plane end
    pub end: (f64, f64),
    /// In-plane center
    pub center: (f64, f64),
    /// Elevation at the start
    pub start_elevation: f64,
    /// Elevation at the end
    pub end_elevation: f64,
}

impl PlaneArc {
    /// Project a move from `start` to `target` into `plane`
    pub fn project(plane: Plane, start: &Position, target: &Target) -> Self {
        match plane {
            Plane::XY => Self {
                start: (start.x, start.y),
                end: (target.x, target.y),
                center: (target.i, target.j),
                start_elevation: start.z,
                end_elevation: target.z,
            },
            Plane::XZ => Self {
                start: (start.z, start.x),
                end: (target.z, target.x),
                center: (target.k, target.i),
                start_elevation: start.y,
                end_elevation: target.y,
            },
            Plane::YZ => Self {
                start: (start.y, start.z),
                end: (target.y, target.z),
                center: (target.j, target.k),
                start_elevation: start.x,
                end_elevation: target.x,
            },
        }
    }

    /// Distance from the center to the start point
    pub fn start_radius(&self) -> f64 {
        (self.start.0 - self.center.0).hypot(self.start.1 - self.center.1)
    }

    /// Distance from the center to the end point
    pub fn end_radius(&self) -> f64 {
        (self.end.0 - self.center.0).hypot(self.end.1 - self.center.1)
    }

    /// Angle of the start point around the center
    pub fn start_angle(&self) -> f64 {
        angle_around(self.center, self.start)
    }

    /// Angle of the end point around the center
    pub fn end_angle(&self) -> f64 {
        angle_around(self.center, self.end)
    }
}

/// `atan2` of `point` relative to `center`, in (-pi, pi]
///
/// Signed zeros are folded to +0 so that points on the seam left of the
/// center always map to +pi.
fn angle_around(center: (f64, f64), point: (f64, f64)) -> f64 {
    let d1 = (point.0 - center.0) + 0.0;
    let d2 = (point.1 - center.1) + 0.0;
    d2.atan2(d1)
}

/// Map an in-plane point and elevation back to X/Y/Z
pub fn unproject(plane: Plane, a1: f64, a2: f64, a3: f64) -> [f64; 3] {
    match plane {
        Plane::XY => [a1, a2, a3],
        Plane::XZ => [a2, a3, a1],
        Plane::YZ => [a3, a1, a2],
    }
}

/// Signed sweep from `theta1` to `theta2` including `turns` extra revolutions
///
/// Negative sweeps are clockwise. A sweep pointing against the requested
/// direction is wrapped by one full turn; a zero base sweep is kept.
pub fn sweep_angle(theta1: f64, theta2: f64, clockwise: bool, turns: u32) -> f64 {
    let mut sweep = theta2 - theta1;
    if sweep < 0.0 && !clockwise {
        sweep += 2.0 * PI;
    } else if sweep > 0.0 && clockwise {
        sweep -= 2.0 * PI;
    }

    let extra = 2.0 * PI * f64::from(turns);
    if clockwise {
        sweep - extra
    } else {
        sweep + extra
    }
}

/// Number of linear segments for an arc
///
/// The upper bound keeps the sagitta of every chord below `max_deviation`;
/// the result is then capped so no segment of the helix is shorter than
/// `min_line_length`.
pub fn arc_steps(
    sweep: f64,
    radius: f64,
    elevation: f64,
    max_deviation: f64,
    min_line_length: f64,
) -> usize {
    let mut steps = if max_deviation < radius {
        let step_angle = 2.0 * (1.0 - max_deviation / radius).acos();
        (sweep.abs() / step_angle).ceil() as usize
    } else {
        1
    };

    let length = if sweep == 0.0 {
        elevation.abs()
    } else {
        sweep.abs() * (radius.powi(2) + (elevation / sweep).powi(2)).sqrt()
    };
    let limit = (length / min_line_length).floor() as usize;
    if steps > limit {
        steps = limit;
    }
    steps
}

impl Machine {
    /// Append the linear moves approximating an arc statement
    ///
    /// The direction comes from the current move mode (clockwise only for
    /// [`MoveMode::ClockwiseArc`]). `P` adds whole revolutions. Every emitted
    /// position carries move mode [`MoveMode::Linear`], and the exact end
    /// point is always appended last. After the arc the machine is left in
    /// linear mode. On error the history and state are unchanged.
    pub fn approximate_arc<S>(&mut self, stmt: &S) -> Result<(), MachineError>
    where
        S: WordSource + ?Sized,
    {
        let start = *self.current();
        let target = self.calc_pos(stmt)?;
        let turns = arc_turns(stmt)?;
        let clockwise = self.state.move_mode == Some(MoveMode::ClockwiseArc);
        let plane = self.config().plane;
        let arc = PlaneArc::project(plane, &start, &target);

        let radius1 = arc.start_radius();
        let radius2 = arc.end_radius();
        if radius1 == 0.0 || radius2 == 0.0 {
            warn!(radius1, radius2, "arc with zero radius");
            return Err(MachineError::DegenerateArc { radius1, radius2 });
        }
        let deviation = ((radius2 - radius1) / radius1).abs();
        if deviation > MAX_RADIUS_DEVIATION {
            warn!(radius1, radius2, "arc radius mismatch");
            return Err(MachineError::NonCircularArc {
                deviation_percent: deviation * 100.0,
            });
        }

        let theta1 = arc.start_angle();
        let sweep = sweep_angle(theta1, arc.end_angle(), clockwise, turns);
        let (s3, e3) = (arc.start_elevation, arc.end_elevation);
        let steps = arc_steps(
            sweep,
            radius1,
            e3 - s3,
            self.config().max_arc_deviation,
            self.config().min_arc_line_length,
        );
        debug!(?plane, clockwise, radius1, sweep, steps, "approximating arc");
        if steps > MAX_ARC_SEGMENTS {
            warn!(steps, turns, "arc expands to too many segments");
            return Err(MachineError::TooManySegments {
                segments: steps,
                limit: MAX_ARC_SEGMENTS,
            });
        }

        let state = self.state.with_move_mode(MoveMode::Linear);
        let (c1, c2) = arc.center;
        let mut segment = Vec::with_capacity(steps.saturating_add(2));
        for i in 0..=steps {
            let fraction = if steps == 0 {
                0.0
            } else {
                i as f64 / steps as f64
            };
            let angle = theta1 + sweep * fraction;
            let a1 = c1 + radius1 * angle.cos();
            let a2 = c2 + radius1 * angle.sin();
            let a3 = s3 + (e3 - s3) * fraction;
            let [x, y, z] = unproject(plane, a1, a2, a3);
            segment.push(Position::new(state, x, y, z));
        }
        segment.push(Position::new(state, target.x, target.y, target.z));

        for position in segment {
            self.push_position(position);
        }
        self.state.move_mode = Some(MoveMode::Linear);
        Ok(())
    }
}

/// Extra revolutions requested through `P`
fn arc_turns<S>(stmt: &S) -> Result<u32, MachineError>
where
    S: WordSource + ?Sized,
{
    let p = stmt.get_or('P', 0.0);
    if !p.is_finite() || p < 0.0 || p.fract() != 0.0 || p > f64::from(u32::MAX) {
        return Err(MachineError::invalid_word(
            'P',
            p,
            "must be a non-negative integer",
        ));
    }
    Ok(p as u32)
}
