//! Curvature-adaptive step-size controller.
//!
//! Not error-controlled: the step grows through straight stretches of a
//! trajectory and shrinks where it turns, judged by the angle between the
//! last two segments.

use flowline_core::Particle;

/// Turns below this many degrees count as straight.
pub const LOWER_ANGLE_DEG: f32 = 3.0;
/// Turns above this many degrees count as sharp.
pub const UPPER_ANGLE_DEG: f32 = 15.0;

/// Step multiplier on straight stretches.
pub const ACCELERATE: f32 = 1.25;
/// Step multiplier on sharp turns.
pub const DECELERATE: f32 = 0.5;

/// Smallest adapted step, as a divisor of the base step.
pub const MIN_STEP_DIVISOR: f32 = 20.0;
/// Largest adapted step, as a multiple of the base step.
pub const MAX_STEP_MULTIPLE: f32 = 50.0;

/// Segments shorter than this (product of lengths) give a neutral factor.
const DEGENERATE_EPS: f32 = 1e-7;

/// Scale factor for the next step given the three most recent particles,
/// oldest first.
pub fn adjust_factor(p2: &Particle, p1: &Particle, p0: &Particle) -> f32 {
    let a = p1.location - p2.location;
    let b = p0.location - p1.location;
    let denominator = a.length() * b.length();
    if denominator < DEGENERATE_EPS {
        return 1.0;
    }
    let cosine = a.dot(b) / denominator;

    if cosine > LOWER_ANGLE_DEG.to_radians().cos() {
        ACCELERATE
    } else if cosine < UPPER_ANGLE_DEG.to_radians().cos() {
        DECELERATE
    } else {
        1.0
    }
}

/// Clamp `dt` into `[delta_t / 20, delta_t * 50]`, with the bounds taken
/// in whichever order is ascending so backward integration clamps too.
pub fn clamp_step(dt: f32, delta_t: f32) -> f32 {
    let a = delta_t / MIN_STEP_DIVISOR;
    let b = delta_t * MAX_STEP_MULTIPLE;
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    dt.clamp(lo, hi)
}

/// Step size for the next integration step of `stream`.
///
/// Starts from `delta_t`. Once the stream holds at least three particles
/// and neither of the two before the last is a separator, the previous
/// step's elapsed time is scaled by [`adjust_factor`] and clamped with
/// [`clamp_step`].
pub fn next_step_size(stream: &[Particle], delta_t: f32) -> f32 {
    let n = stream.len();
    if n < 3 {
        return delta_t;
    }
    let (p2, p1, p0) = (&stream[n - 3], &stream[n - 2], &stream[n - 1]);
    if p1.is_special() || p2.is_special() {
        return delta_t;
    }
    let dt = (p0.time - p1.time) * adjust_factor(p2, p1, p0);
    clamp_step(dt, delta_t)
}
