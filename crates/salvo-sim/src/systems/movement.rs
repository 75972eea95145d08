//! Kinematic integration for weapon solids.
//!
//! Advances heading, velocity and position from angular velocity and
//! thrust, applies the speed cap, and samples projectile trails.

use glam::DVec2;
use hecs::{Entity, World};

use salvo_core::enums::Integrator;
use salvo_core::solid::Solid;
use salvo_core::types::{normalize_angle, unit};

use crate::host::EffectSink;
use crate::weapon::Weapon;

/// Integrate every live weapon in `layer`.
pub fn run(world: &mut World, layer: &[Entity], dt: f64) {
    for &entity in layer {
        let Ok(weapon) = world.query_one_mut::<&mut Weapon>(entity) else {
            continue;
        };
        if weapon.is_destroyed() {
            continue;
        }
        integrate(&mut weapon.solid, dt);
    }
}

/// Push the current tail position of every trailed projectile.
pub fn sample_trails(world: &mut World, layer: &[Entity], fx: &mut dyn EffectSink) {
    for &entity in layer {
        let Ok(weapon) = world.query_one_mut::<&mut Weapon>(entity) else {
            continue;
        };
        if weapon.is_destroyed() {
            continue;
        }
        let (Some(trail), Some(spec)) = (weapon.trail, weapon.outfit.effects.trail.as_ref()) else {
            continue;
        };
        let tail = weapon.solid.pos - unit(weapon.solid.dir) * spec.offset;
        fx.trail_sample(trail, tail);
    }
}

/// Advance a solid by `dt` with its configured integrator.
pub fn integrate(solid: &mut Solid, dt: f64) {
    match solid.integrator {
        Integrator::Euler => euler(solid, dt),
        Integrator::Rk4 => rk4(solid, dt),
    }
}

fn acceleration(solid: &Solid, dir: f64) -> DVec2 {
    if solid.thrust == 0.0 || solid.mass <= 0.0 {
        DVec2::ZERO
    } else {
        unit(dir) * (solid.thrust / solid.mass)
    }
}

fn cap_speed(solid: &mut Solid) {
    if let Some(max) = solid.speed_max {
        let speed = solid.vel.length();
        if speed > max && speed > 0.0 {
            solid.vel *= max / speed;
        }
    }
}

fn euler(solid: &mut Solid, dt: f64) {
    solid.dir = normalize_angle(solid.dir + solid.dir_vel * dt);
    solid.vel += acceleration(solid, solid.dir) * dt;
    cap_speed(solid);
    solid.pos += solid.vel * dt;
}

/// Classic RK4 on (position, velocity), with the heading swept linearly
/// across the step so thrust follows the turn.
fn rk4(solid: &mut Solid, dt: f64) {
    let dir0 = solid.dir;
    let half = dt * 0.5;
    let a_start = acceleration(solid, dir0);
    let a_mid = acceleration(solid, dir0 + solid.dir_vel * half);
    let a_end = acceleration(solid, dir0 + solid.dir_vel * dt);

    let v = solid.vel;
    let k1_v = a_start;
    let k1_p = v;
    let k2_v = a_mid;
    let k2_p = v + k1_v * half;
    let k3_v = a_mid;
    let k3_p = v + k2_v * half;
    let k4_v = a_end;
    let k4_p = v + k3_v * dt;

    solid.vel = v + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0);
    cap_speed(solid);
    solid.pos += (k1_p + k2_p * 2.0 + k3_p * 2.0 + k4_p) * (dt / 6.0);
    solid.dir = normalize_angle(dir0 + solid.dir_vel * dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn solid(vel: DVec2) -> Solid {
        Solid::new(1.0, 0.0, DVec2::ZERO, vel)
    }

    #[test]
    fn test_euler_coasts_exactly() {
        let mut s = solid(DVec2::new(500.0, 0.0));
        integrate(&mut s, 1.0);
        assert_eq!(s.pos, DVec2::new(500.0, 0.0));
    }

    #[test]
    fn test_euler_thrust_accelerates_along_heading() {
        let mut s = Solid::new(2.0, FRAC_PI_2, DVec2::ZERO, DVec2::ZERO);
        s.thrust = 20.0;
        integrate(&mut s, 0.5);
        // a = 10 along +y; v = 5; p = 2.5
        assert!((s.vel - DVec2::new(0.0, 5.0)).length() < 1e-12);
        assert!((s.pos - DVec2::new(0.0, 2.5)).length() < 1e-12);
    }

    #[test]
    fn test_speed_cap_enforced() {
        let mut s = solid(DVec2::new(90.0, 0.0));
        s.thrust = 100.0;
        s.speed_max = Some(100.0);
        for integrator in [Integrator::Euler, Integrator::Rk4] {
            let mut s = s.clone();
            s.integrator = integrator;
            for _ in 0..10 {
                integrate(&mut s, 0.1);
                assert!(s.speed() <= 100.0 + 1e-9, "{integrator:?}");
            }
        }
    }

    #[test]
    fn test_heading_wraps() {
        let mut s = solid(DVec2::ZERO);
        s.dir = 6.2;
        s.dir_vel = 1.0;
        integrate(&mut s, 0.5);
        assert!(s.dir >= 0.0 && s.dir < std::f64::consts::TAU);
        assert!((s.dir - (6.7 - std::f64::consts::TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_rk4_matches_closed_form_for_constant_thrust() {
        let mut s = solid(DVec2::new(10.0, 0.0));
        s.thrust = 4.0;
        s.integrator = Integrator::Rk4;
        integrate(&mut s, 2.0);
        // p = v t + a t² / 2 = 20 + 8
        assert!((s.pos.x - 28.0).abs() < 1e-9);
        assert!((s.vel.x - 18.0).abs() < 1e-9);
    }
}
