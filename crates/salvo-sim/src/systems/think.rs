//! Per-tick guidance: seeker steering for guided munitions and owner
//! tracking for beams.

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use salvo_core::constants::{BEAM_EXPIRED, BEAM_TURN_GAIN};
use salvo_core::enums::{WeaponCategory, WeaponStatus};
use salvo_core::outfit::WeaponClass;
use salvo_core::types::{angle_diff, heading_of, unit};
use salvo_seeker::fsm::{self, SeekerContext};
use salvo_seeker::steering;

use crate::guidance::{self, AimTarget};
use crate::host::Battlespace;
use crate::weapon::{Weapon, WeaponState};

pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    layer: &[Entity],
    dt: f64,
    space: &mut dyn Battlespace,
    rng: &mut R,
) {
    for &entity in layer {
        let Ok(weapon) = world.query_one_mut::<&mut Weapon>(entity) else {
            continue;
        };
        if weapon.is_destroyed() {
            continue;
        }
        match weapon.category() {
            WeaponCategory::GuidedAmmo => think_seeker(weapon, dt, space, rng),
            WeaponCategory::Beam | WeaponCategory::TurretBeam => {
                if !think_beam(weapon, dt, space) {
                    weapon.destroy();
                }
            }
            WeaponCategory::Bolt | WeaponCategory::TurretBolt => {}
        }
    }
}

/// Steer a guided munition. Unguided and self-targeted munitions coast.
pub fn think_seeker<R: Rng + ?Sized>(
    weapon: &mut Weapon,
    dt: f64,
    space: &dyn Battlespace,
    rng: &mut R,
) {
    if !weapon.has_target() {
        return;
    }
    let WeaponClass::GuidedAmmo(spec) = &weapon.outfit.class else {
        return;
    };
    let WeaponState::Ammo {
        seeker: Some(seeker),
        real_speed,
    } = &mut weapon.state
    else {
        return;
    };

    let Some(target) = space.pilot(weapon.target) else {
        // Target left the battlespace: go ballistic.
        weapon.solid.thrust = 0.0;
        weapon.solid.dir_vel = 0.0;
        return;
    };

    let speed_max = weapon.solid.speed_max.unwrap_or(spec.speed_max);
    let ctx = SeekerContext {
        status: seeker.status,
        lock_timer: seeker.lock_timer,
        jam_roll: seeker.jam_roll,
        ai: spec.ai,
        turn: spec.turn,
        thrust_force: spec.thrust * weapon.solid.mass,
        resist: spec.resist,
        speed_max,
        pos: weapon.solid.pos,
        dir: weapon.solid.dir,
        target_pos: target.pos,
        target_vel: target.vel,
        target_jam_chance: target.stats.jam_chance,
        target_evasion: target.ew_evasion,
        dt,
    };
    let update = fsm::evaluate(&ctx, rng);

    if update.status_changed {
        debug!(
            outfit = %weapon.outfit.name,
            from = ?seeker.status,
            to = ?update.status,
            "seeker status changed"
        );
    }
    seeker.status = update.status;
    seeker.lock_timer = update.lock_timer;
    if let Some(slow) = update.jam_slow {
        seeker.jam_slow = slow;
    }
    if let Some(turn) = update.turn {
        weapon.solid.dir_vel = turn;
    }
    if let Some(thrust) = update.thrust {
        weapon.solid.thrust = thrust;
    }

    let speed_mod = if seeker.status == WeaponStatus::JammedSlowed {
        seeker.jam_slow
    } else {
        1.0
    };
    *real_speed = steering::advance_speed(*real_speed, speed_mod * speed_max, spec.thrust, dt);
    weapon.solid.vel = unit(weapon.solid.dir) * *real_speed;
}

/// Re-anchor a beam on its owner and aim it. Turret beams turn toward the
/// target; fixed beams hold the owner's heading, or the swivel-limited
/// angle onto the target when the mount can swivel. Returns `false` when the
/// beam must end: owner gone, owner out of energy, or target out of range.
pub fn think_beam(weapon: &mut Weapon, dt: f64, space: &mut dyn Battlespace) -> bool {
    let (spec, turret) = match &weapon.outfit.class {
        WeaponClass::Beam(spec) => (spec, false),
        WeaponClass::TurretBeam(spec) => (spec, true),
        _ => return true,
    };
    let WeaponState::Beam(beam) = &mut weapon.state else {
        return true;
    };

    let Some(owner) = space.pilot_mut(weapon.owner) else {
        debug!(beam = beam.id.0, "beam owner gone");
        weapon.timer = BEAM_EXPIRED;
        return false;
    };

    let energy_mod = if turret {
        owner.stats.tur_energy
    } else {
        owner.stats.fwd_energy
    };
    // Free beams never starve, even on an empty capacitor.
    let drain = energy_mod * dt * spec.energy;
    if drain > 0.0 {
        owner.energy -= drain;
        if owner.energy <= 0.0 {
            owner.energy = 0.0;
            debug!(beam = beam.id.0, "beam owner out of energy");
            weapon.timer = BEAM_EXPIRED;
            return false;
        }
    }

    // Ship stats may change while the beam is held.
    let (damage, conversion) = if turret {
        (owner.stats.tur_damage, owner.stats.tur_dam_as_dis)
    } else {
        (owner.stats.fwd_damage, owner.stats.fwd_dam_as_dis)
    };
    weapon.damage_mod = damage;
    weapon.dam_as_dis = conversion.clamp(0.0, 1.0);

    let owner_dir = owner.dir;
    let owner_vel = owner.vel;
    let nav_asteroid = owner.nav_asteroid;
    weapon.solid.pos = owner.pos + beam.mount.offset(owner_dir);

    let target = if weapon.target != weapon.owner {
        space.pilot(weapon.target).map(|p| (p.pos, p.vel))
    } else {
        nav_asteroid
            .and_then(|id| space.asteroid(id))
            .map(|a| (a.pos, a.vel))
    };

    if let Some((pos, _)) = target {
        let locked = beam.elapsed < spec.min_duration;
        if !locked && pos.distance(weapon.solid.pos) > spec.range {
            debug!(beam = beam.id.0, "beam target out of range");
            weapon.timer = BEAM_EXPIRED;
            return false;
        }
    }

    match (turret, target) {
        (true, Some((pos, _))) => {
            let error = angle_diff(weapon.solid.dir, heading_of(pos - weapon.solid.pos));
            weapon.solid.dir_vel = steering::clamp_turn(error, spec.turn, BEAM_TURN_GAIN);
        }
        (false, Some((pos, vel))) if spec.swivel > 0.0 => {
            let aim = AimTarget { pos, vel, lead: 1.0 };
            weapon.solid.dir = guidance::aim_turret(
                weapon.solid.pos,
                owner_vel,
                owner_dir,
                Some(&aim),
                0.0,
                spec.swivel,
            );
            weapon.solid.dir_vel = 0.0;
        }
        _ => {
            weapon.solid.dir = owner_dir;
            weapon.solid.dir_vel = 0.0;
        }
    }

    beam.elapsed += dt;
    true
}
