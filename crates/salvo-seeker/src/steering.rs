//! Turn-rate steering and speed shaping.
//!
//! Pure functions, no state. The proportional gain is passed in by the
//! caller so seekers and turret beams each keep their own tuning constant.

use glam::DVec2;

use salvo_core::enums::SeekerAi;
use salvo_core::types::{angle_diff, heading_of};

/// Heading error (radians, signed) from `dir` to the point the seeker
/// should fly at.
///
/// Smart seekers lead the target by the time it would take to cover the
/// current distance at top speed; everything else chases the target's
/// current position.
pub fn heading_error(
    ai: SeekerAi,
    pos: DVec2,
    dir: f64,
    target_pos: DVec2,
    target_vel: DVec2,
    speed_max: f64,
) -> f64 {
    let to_target = target_pos - pos;
    let aim = match ai {
        SeekerAi::Smart if speed_max > 0.0 => {
            let t = to_target.length() / speed_max;
            to_target + target_vel * t
        }
        _ => to_target,
    };
    angle_diff(dir, heading_of(aim))
}

/// Commanded angular velocity for a heading error, clamped to `±turn_rate`.
pub fn clamp_turn(error: f64, turn_rate: f64, gain: f64) -> f64 {
    (gain * error * turn_rate).clamp(-turn_rate, turn_rate)
}

/// Advance a speed toward `cap` by `accel * dt`, never exceeding the cap.
pub fn advance_speed(current: f64, cap: f64, accel: f64, dt: f64) -> f64 {
    (current + accel * dt).min(cap)
}
