//! Fire-control math for turreted and fixed weapons.
//!
//! Provides the turret aim predictor, electronic-warfare tracking falloff,
//! heat-driven accuracy loss, and the bounded gaussian used for spread.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use salvo_core::constants::*;
use salvo_core::types::{angle_diff, heading_of, normalize_angle};

/// What a turret is trying to hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimTarget {
    pub pos: DVec2,
    pub vel: DVec2,
    /// How far to trust the target's velocity, in `[0, 1]`.
    /// 1 is a full lead; 0 aims at the current position.
    pub lead: f64,
}

/// Predict a firing angle for a turret.
///
/// The lead point blends the target's current relative position with where
/// it will be after `flight_time` at its current relative velocity. The
/// result is clamped to `±swivel` around `heading`. With no target the
/// weapon fires along `heading`.
pub fn aim_turret(
    shooter_pos: DVec2,
    shooter_vel: DVec2,
    heading: f64,
    target: Option<&AimTarget>,
    flight_time: f64,
    swivel: f64,
) -> f64 {
    let Some(target) = target else {
        return heading;
    };

    let rel_pos = target.pos - shooter_pos;
    let rel_vel = target.vel - shooter_vel;
    let predicted = rel_pos + rel_vel * flight_time;
    let aim = rel_pos.lerp(predicted, target.lead.clamp(0.0, 1.0));

    let wanted = heading_of(aim);
    let off = angle_diff(heading, wanted);
    if off.abs() > swivel {
        normalize_angle(heading + swivel.copysign(off))
    } else {
        normalize_angle(wanted)
    }
}

/// Fraction of full lead a weapon can apply against a target.
///
/// Targets whose evasion is inside the weapon's effective tracking range are
/// fully tracked; beyond it, the fraction falls off linearly and reaches
/// zero at three times the limit.
pub fn track_fraction(weapon_track: f64, ew_track: f64, evasion: f64) -> f64 {
    let limit = weapon_track * ew_track;
    if limit <= 0.0 {
        return if evasion <= 0.0 { 1.0 } else { 0.0 };
    }
    if evasion < limit {
        1.0
    } else {
        (1.0 - TRACK_FALLOFF_SLOPE * (evasion / limit - 1.0)).max(0.0)
    }
}

/// Accuracy loss factor in `[0, 1]` for a mount at `temperature` kelvin.
pub fn heat_accuracy_mod(temperature: f64) -> f64 {
    ((temperature - HEAT_ACCURACY_START) / HEAT_ACCURACY_SPAN).clamp(0.0, 1.0)
}

/// Standard normal sample, truncated to `±ACCURACY_SIGMA_LIMIT`.
pub fn bounded_gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        // Box-Muller; `1 - u` keeps the log argument in (0, 1].
        let u1 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        if z.abs() <= ACCURACY_SIGMA_LIMIT {
            return z;
        }
    }
}

/// Spread (radians) to add to an aimed shot.
pub fn heat_spread<R: Rng + ?Sized>(temperature: f64, rng: &mut R) -> f64 {
    bounded_gaussian(rng) * HEAT_WORST_ACCURACY * heat_accuracy_mod(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn target(x: f64, y: f64, vx: f64, vy: f64, lead: f64) -> AimTarget {
        AimTarget {
            pos: DVec2::new(x, y),
            vel: DVec2::new(vx, vy),
            lead,
        }
    }

    #[test]
    fn test_no_target_fires_along_heading() {
        let dir = aim_turret(DVec2::ZERO, DVec2::ZERO, 1.25, None, 2.0, PI);
        assert_eq!(dir, 1.25);
    }

    #[test]
    fn test_full_lead_on_crossing_target() {
        // Target 1000 ahead crossing at 100 m/s; 2 s flight time.
        let t = target(1000.0, 0.0, 0.0, 100.0, 1.0);
        let dir = aim_turret(DVec2::ZERO, DVec2::ZERO, 0.0, Some(&t), 2.0, PI);
        assert!((dir - 200.0_f64.atan2(1000.0)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_lead_aims_at_current_position() {
        let t = target(0.0, 500.0, 300.0, 0.0, 0.0);
        let dir = aim_turret(DVec2::ZERO, DVec2::ZERO, 0.0, Some(&t), 5.0, PI);
        assert!((dir - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_lead_uses_relative_velocity() {
        // Shooter and target moving together: no lead needed.
        let t = target(1000.0, 0.0, 0.0, 100.0, 1.0);
        let dir = aim_turret(DVec2::ZERO, DVec2::new(0.0, 100.0), 0.0, Some(&t), 3.0, PI);
        assert!(dir.abs() < 1e-12);
    }

    #[test]
    fn test_swivel_clamps_to_arc() {
        let t = target(0.0, 1000.0, 0.0, 0.0, 1.0);
        let left = aim_turret(DVec2::ZERO, DVec2::ZERO, 0.0, Some(&t), 1.0, FRAC_PI_4);
        assert!((left - FRAC_PI_4).abs() < 1e-12);

        let t = target(0.0, -1000.0, 0.0, 0.0, 1.0);
        let right = aim_turret(DVec2::ZERO, DVec2::ZERO, 0.0, Some(&t), 1.0, FRAC_PI_4);
        assert!((right - (TAU - FRAC_PI_4)).abs() < 1e-12);
    }

    #[test]
    fn test_track_fraction_falloff() {
        assert_eq!(track_fraction(1000.0, 1.0, 500.0), 1.0);
        assert!((track_fraction(1000.0, 1.0, 1500.0) - 0.75).abs() < 1e-12);
        assert_eq!(track_fraction(1000.0, 1.0, 3000.0), 0.0);
        assert_eq!(track_fraction(1000.0, 1.0, 10_000.0), 0.0);
        // Better sensors push the limit out.
        assert_eq!(track_fraction(1000.0, 2.0, 1500.0), 1.0);
    }

    #[test]
    fn test_heat_accuracy_ramp() {
        assert_eq!(heat_accuracy_mod(300.0), 0.0);
        assert_eq!(heat_accuracy_mod(500.0), 0.0);
        assert!((heat_accuracy_mod(800.0) - 0.5).abs() < 1e-12);
        assert_eq!(heat_accuracy_mod(2000.0), 1.0);
    }

    #[test]
    fn test_cold_mount_has_no_spread() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(heat_spread(250.0, &mut rng), 0.0);
        }
    }

    #[test]
    fn test_bounded_gaussian_stays_within_two_sigma() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let samples: Vec<f64> = (0..5000).map(|_| bounded_gaussian(&mut rng)).collect();
        assert!(samples.iter().all(|z| z.abs() <= ACCURACY_SIGMA_LIMIT));
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.1, "mean {mean}");
    }
}
