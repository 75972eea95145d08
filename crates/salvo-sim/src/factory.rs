//! Weapon construction.
//!
//! Turns a shot request into a fully-initialised `Weapon`: aim, spread,
//! stat-derived damage multipliers, initial kinematics, guidance state, and
//! the sound/trail/counter side effects every new weapon carries.

use std::f64::consts::PI;
use std::sync::Arc;

use glam::DVec2;
use rand::Rng;
use tracing::debug;

use salvo_core::components::{Pilot, ShipStats};
use salvo_core::constants::UNIT_MASS;
use salvo_core::enums::{SeekerAi, WeaponLayer, WeaponStatus};
use salvo_core::error::FactoryError;
use salvo_core::outfit::{AmmoSpec, BeamSpec, BoltSpec, WeaponClass, WeaponOutfit};
use salvo_core::solid::Solid;
use salvo_core::types::{heading_of, unit, BeamId, FactionId, Mount, PilotId};

use crate::guidance::{self, AimTarget};
use crate::host::{Battlespace, EffectSink};
use crate::systems::sprite;
use crate::weapon::{BeamState, Seeker, Weapon, WeaponState};

/// A request to fire one weapon.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub shooter: PilotId,
    pub target: Option<PilotId>,
    /// Muzzle position.
    pub pos: DVec2,
    /// Shooter velocity, inherited by the projectile.
    pub vel: DVec2,
    /// Hull heading of the shooter.
    pub heading: f64,
    /// Mount temperature (kelvin).
    pub temperature: f64,
    /// Expected time to target for lead prediction. Estimated from range
    /// and muzzle speed when not given.
    pub flight_time: Option<f64>,
}

impl Shot {
    /// A cold, untargeted shot from the shooter's current state.
    pub fn from_pilot(pilot: &Pilot) -> Self {
        Self {
            shooter: pilot.id,
            target: pilot.target,
            pos: pilot.pos,
            vel: pilot.vel,
            heading: pilot.dir,
            temperature: 0.0,
            flight_time: None,
        }
    }

    pub fn at(mut self, target: PilotId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_flight_time(mut self, flight_time: f64) -> Self {
        self.flight_time = Some(flight_time);
        self
    }
}

/// Shooter-derived facts shared by every weapon category.
struct Origin {
    owner: PilotId,
    target: PilotId,
    faction: FactionId,
    layer: WeaponLayer,
    stats: ShipStats,
    /// Position/velocity of the locked pilot, else of the nav asteroid.
    aim_at: Option<(DVec2, DVec2, Option<f64>)>,
}

impl Origin {
    fn resolve(space: &dyn Battlespace, shot: &Shot) -> Result<Self, FactoryError> {
        let shooter = space
            .pilot(shot.shooter)
            .ok_or(FactoryError::MissingShooter(shot.shooter))?;

        // Unknown or self targets collapse to "no target".
        let target = shot
            .target
            .filter(|t| *t != shooter.id && space.pilot(*t).is_some())
            .unwrap_or(shooter.id);

        let aim_at = if target != shooter.id {
            space
                .pilot(target)
                .map(|p| (p.pos, p.vel, Some(p.ew_evasion)))
        } else {
            shooter
                .nav_asteroid
                .and_then(|id| space.asteroid(id))
                .map(|a| (a.pos, a.vel, None))
        };

        let layer = if space.player() == Some(shooter.id) {
            WeaponLayer::Foreground
        } else {
            WeaponLayer::Background
        };

        Ok(Self {
            owner: shooter.id,
            target,
            faction: shooter.faction,
            layer,
            stats: shooter.stats,
            aim_at,
        })
    }

    fn has_target(&self) -> bool {
        self.target != self.owner
    }

    /// Aim point for a weapon with tracking rating `track`.
    fn aim_target(&self, track: f64) -> Option<AimTarget> {
        self.aim_at.map(|(pos, vel, evasion)| AimTarget {
            pos,
            vel,
            lead: evasion.map_or(1.0, |ev| guidance::track_fraction(track, self.stats.ew_track, ev)),
        })
    }

    fn flight_time(&self, shot: &Shot, speed: f64) -> f64 {
        if let Some(t) = shot.flight_time {
            return t;
        }
        match self.aim_at {
            Some((pos, _, _)) if speed > 0.0 => pos.distance(shot.pos) / speed,
            _ => 0.0,
        }
    }
}

/// Programmatic outfits skip catalog validation; reject the ones that
/// would divide by zero.
fn check_outfit(outfit: &WeaponOutfit) -> Result<(), FactoryError> {
    outfit.validate().map_err(|err| FactoryError::InvalidOutfit {
        name: outfit.name.clone(),
        reason: err.to_string(),
    })
}

/// Build a bolt or guided munition.
pub fn create_projectile<R: Rng + ?Sized>(
    outfit: &Arc<WeaponOutfit>,
    shot: &Shot,
    space: &mut dyn Battlespace,
    fx: &mut dyn EffectSink,
    rng: &mut R,
) -> Result<Weapon, FactoryError> {
    check_outfit(outfit)?;
    let origin = Origin::resolve(space, shot)?;
    let mut weapon = match &outfit.class {
        WeaponClass::Bolt(spec) => create_bolt(outfit, spec, false, shot, &origin, rng),
        WeaponClass::TurretBolt(spec) => create_bolt(outfit, spec, true, shot, &origin, rng),
        WeaponClass::GuidedAmmo(spec) => create_ammo(outfit, spec, shot, &origin, rng),
        WeaponClass::Beam(_) | WeaponClass::TurretBeam(_) => {
            return Err(FactoryError::NotAProjectile {
                name: outfit.name.clone(),
                category: outfit.category(),
            });
        }
    };

    if weapon.seeker().is_some() {
        if let Some(target) = space.pilot_mut(origin.target) {
            target.lockons += 1;
        }
    }
    attach(&mut weapon, &origin, space, fx);
    debug!(
        outfit = %outfit.name,
        owner = origin.owner.0,
        target = origin.target.0,
        "projectile created"
    );
    Ok(weapon)
}

fn create_bolt<R: Rng + ?Sized>(
    outfit: &Arc<WeaponOutfit>,
    spec: &BoltSpec,
    turret: bool,
    shot: &Shot,
    origin: &Origin,
    rng: &mut R,
) -> Weapon {
    let swivel = if turret { PI } else { spec.swivel };
    let mut dir = if swivel > 0.0 {
        let aim = origin.aim_target(spec.track);
        guidance::aim_turret(
            shot.pos,
            shot.vel,
            shot.heading,
            aim.as_ref(),
            origin.flight_time(shot, spec.speed),
            swivel,
        )
    } else {
        shot.heading
    };
    dir += guidance::heat_spread(shot.temperature, rng);

    let vel = shot.vel + unit(dir) * spec.speed;
    let solid = Solid::new(UNIT_MASS, dir, shot.pos, vel);

    let life = spec.range / spec.speed;
    let falloff_range = spec.falloff.unwrap_or(spec.range);
    let state = WeaponState::Bolt {
        falloff: life - falloff_range / spec.speed,
        strength: 1.0,
    };

    let mut weapon = Weapon::new(
        Arc::clone(outfit),
        solid,
        origin.faction,
        origin.owner,
        origin.target,
        origin.layer,
        life,
        state,
    );
    let (damage, conversion) = if turret {
        (origin.stats.tur_damage, origin.stats.tur_dam_as_dis)
    } else {
        (origin.stats.fwd_damage, origin.stats.fwd_dam_as_dis)
    };
    weapon.damage_mod = damage;
    weapon.dam_as_dis = conversion.clamp(0.0, 1.0);
    weapon
}

fn create_ammo<R: Rng + ?Sized>(
    outfit: &Arc<WeaponOutfit>,
    spec: &AmmoSpec,
    shot: &Shot,
    origin: &Origin,
    rng: &mut R,
) -> Weapon {
    let swivel = if spec.turret { PI } else { spec.swivel };
    let dir = if swivel > 0.0 {
        let aim = origin.aim_target(spec.track);
        guidance::aim_turret(
            shot.pos,
            shot.vel,
            shot.heading,
            aim.as_ref(),
            origin.flight_time(shot, spec.speed_max),
            swivel,
        )
    } else {
        shot.heading
    };

    let vel = shot.vel + unit(dir) * spec.speed;
    let mut solid = Solid::new(outfit.mass, dir, shot.pos, vel);
    if spec.thrust != 0.0 {
        solid.thrust = spec.thrust * outfit.mass;
        let inherited = if spec.speed > 0.0 { shot.vel.length() } else { 0.0 };
        solid.speed_max = Some(spec.speed_max + inherited);
    }

    let seeker = (spec.ai != SeekerAi::Unguided && origin.has_target()).then(|| {
        let lock_timer = spec.lock_on * origin.stats.launch_calibration;
        Seeker {
            status: if lock_timer > 0.0 {
                WeaponStatus::Locking
            } else {
                WeaponStatus::Ok
            },
            lock_timer,
            jam_roll: rng.gen(),
            jam_slow: 1.0,
        }
    });

    let real_speed = solid.speed();
    let mut weapon = Weapon::new(
        Arc::clone(outfit),
        solid,
        origin.faction,
        origin.owner,
        origin.target,
        origin.layer,
        spec.duration * origin.stats.launch_range,
        WeaponState::Ammo { seeker, real_speed },
    );
    weapon.damage_mod = origin.stats.launch_damage;
    weapon.dam_as_dis = if spec.turret {
        origin.stats.tur_dam_as_dis
    } else {
        origin.stats.fwd_dam_as_dis
    }
    .clamp(0.0, 1.0);
    weapon
}

/// Build a beam weapon anchored at `mount`.
pub fn create_beam(
    outfit: &Arc<WeaponOutfit>,
    shot: &Shot,
    mount: Mount,
    id: BeamId,
    space: &mut dyn Battlespace,
    fx: &mut dyn EffectSink,
) -> Result<Weapon, FactoryError> {
    let (spec, turret): (&BeamSpec, bool) = match &outfit.class {
        WeaponClass::Beam(spec) => (spec, false),
        WeaponClass::TurretBeam(spec) => (spec, true),
        _ => {
            return Err(FactoryError::NotABeam {
                name: outfit.name.clone(),
                category: outfit.category(),
            })
        }
    };
    check_outfit(outfit)?;
    let origin = Origin::resolve(space, shot)?;

    let dir = match origin.aim_at {
        Some((pos, _, _)) if turret => heading_of(pos - shot.pos),
        Some(_) if spec.swivel > 0.0 => {
            let aim = origin.aim_target(0.0);
            guidance::aim_turret(shot.pos, shot.vel, shot.heading, aim.as_ref(), 0.0, spec.swivel)
        }
        _ => shot.heading,
    };

    let solid = Solid::new(UNIT_MASS, dir, shot.pos, DVec2::ZERO);
    let state = WeaponState::Beam(BeamState {
        id,
        mount,
        effect_timer: 0.0,
        elapsed: 0.0,
        striking: false,
    });
    let mut weapon = Weapon::new(
        Arc::clone(outfit),
        solid,
        origin.faction,
        origin.owner,
        origin.target,
        origin.layer,
        spec.duration,
        state,
    );
    let (damage, conversion) = if turret {
        (origin.stats.tur_damage, origin.stats.tur_dam_as_dis)
    } else {
        (origin.stats.fwd_damage, origin.stats.fwd_dam_as_dis)
    };
    weapon.damage_mod = damage;
    weapon.dam_as_dis = conversion.clamp(0.0, 1.0);

    attach(&mut weapon, &origin, space, fx);
    debug!(outfit = %outfit.name, beam = id.0, owner = origin.owner.0, "beam started");
    Ok(weapon)
}

/// Side effects shared by every new weapon: target bookkeeping, firing
/// sound, trail, and initial sprite frame.
fn attach(weapon: &mut Weapon, origin: &Origin, space: &mut dyn Battlespace, fx: &mut dyn EffectSink) {
    if origin.has_target() {
        if let Some(target) = space.pilot_mut(origin.target) {
            target.projectiles += 1;
        }
    }

    let outfit = Arc::clone(&weapon.outfit);
    let effects = &outfit.effects;
    if let Some(sound) = effects.sound {
        weapon.voice = fx.play_sound(sound, weapon.solid.pos, weapon.solid.vel);
    }
    // Beams draw as a line; only projectiles leave trails.
    if !weapon.category().is_beam() {
        if let Some(spec) = &effects.trail {
            weapon.trail = Some(fx.trail_create(spec));
        }
    }
    weapon.sprite = sprite::frame_for(weapon.solid.dir, &effects.sprite);
}
