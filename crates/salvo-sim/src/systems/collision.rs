//! Collision detection: who a weapon may hit, and what it touched this tick.
//!
//! Projectiles stop at their first contact. Beams test their whole segment
//! against every eligible pilot and asteroid and may strike several at once.

use glam::DVec2;
use hecs::{Entity, World};

use salvo_core::components::{Pilot, Placed};
use salvo_core::enums::AsteroidState;
use salvo_core::types::{unit, AsteroidId, PilotId};

use crate::geometry::NarrowPhase;
use crate::host::{Battlespace, EffectSink};
use crate::systems::hit;
use crate::weapon::Weapon;

/// Everything the collision pass needs besides the weapons themselves.
pub struct Scene<'a> {
    pub pilots: &'a [PilotId],
    pub asteroids: &'a [AsteroidId],
    pub narrow: &'a dyn NarrowPhase,
    pub weapon_safety: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    Pilot(PilotId),
    Asteroid(AsteroidId),
}

/// A touch between a weapon and a target. Projectiles report the same
/// point twice; beams report where they enter and leave the hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub target: HitTarget,
    pub entry: DVec2,
    pub exit: DVec2,
}

pub fn run(
    world: &mut World,
    layer: &[Entity],
    scene: &Scene<'_>,
    dt: f64,
    space: &mut dyn Battlespace,
    fx: &mut dyn EffectSink,
) {
    for &entity in layer {
        let Ok(weapon) = world.query_one_mut::<&mut Weapon>(entity) else {
            continue;
        };
        if weapon.is_destroyed() {
            continue;
        }
        if weapon.category().is_beam() {
            let contacts = beam_contacts(weapon, scene, space);
            hit::resolve_beam(weapon, &contacts, dt, space, fx);
        } else if let Some(contact) = projectile_contact(weapon, scene, space) {
            hit::resolve_projectile(weapon, contact, space, fx);
            weapon.destroy();
        }
    }
}

/// Whether `weapon` is allowed to damage `pilot`.
pub fn can_hit(
    weapon: &Weapon,
    pilot: &Pilot,
    space: &dyn Battlespace,
    weapon_safety: bool,
) -> bool {
    if pilot.id == weapon.owner {
        return false;
    }
    let flags = &pilot.flags;
    if flags.invincible || flags.hidden || flags.dead || flags.landing || flags.taking_off {
        return false;
    }
    if pilot.faction == weapon.faction {
        return false;
    }
    if pilot.id == weapon.target {
        return true;
    }

    let player = space.player();
    if player == Some(weapon.owner) {
        return !weapon_safety || pilot.hostile;
    }
    if player == Some(pilot.id) && space.pilot(weapon.owner).is_some_and(|o| o.hostile) {
        return true;
    }
    space.are_enemies(weapon.faction, pilot.faction)
}

/// First pilot or asteroid a bolt or munition overlaps, if any.
///
/// A homing munition only collides with its own target; once jammed it can
/// hit anything eligible.
pub fn projectile_contact(
    weapon: &Weapon,
    scene: &Scene<'_>,
    space: &dyn Battlespace,
) -> Option<Contact> {
    let shape = Placed {
        hull: &weapon.outfit.hull,
        pos: weapon.solid.pos,
        dir: weapon.solid.dir,
    };
    let homing = weapon.is_homing();

    for &id in scene.pilots {
        if homing && id != weapon.target {
            continue;
        }
        let Some(pilot) = space.pilot(id) else {
            continue;
        };
        if !can_hit(weapon, pilot, space, scene.weapon_safety) {
            continue;
        }
        if let Some(point) = scene.narrow.collide(shape, pilot.placed()) {
            return Some(Contact {
                target: HitTarget::Pilot(id),
                entry: point,
                exit: point,
            });
        }
    }

    for &id in scene.asteroids {
        let Some(asteroid) = space.asteroid(id) else {
            continue;
        };
        if asteroid.state != AsteroidState::Visible {
            continue;
        }
        if let Some(point) = scene.narrow.collide(shape, asteroid.placed()) {
            return Some(Contact {
                target: HitTarget::Asteroid(id),
                entry: point,
                exit: point,
            });
        }
    }
    None
}

/// Every pilot and asteroid crossed by a beam's segment.
pub fn beam_contacts(weapon: &Weapon, scene: &Scene<'_>, space: &dyn Battlespace) -> Vec<Contact> {
    let start = weapon.solid.pos;
    let end = start + unit(weapon.solid.dir) * weapon.outfit.range();
    let mut contacts = Vec::new();

    for &id in scene.pilots {
        let Some(pilot) = space.pilot(id) else {
            continue;
        };
        if !can_hit(weapon, pilot, space, scene.weapon_safety) {
            continue;
        }
        if let Some([entry, exit]) = scene.narrow.collide_line(start, end, pilot.placed()) {
            contacts.push(Contact {
                target: HitTarget::Pilot(id),
                entry,
                exit,
            });
        }
    }

    for &id in scene.asteroids {
        let Some(asteroid) = space.asteroid(id) else {
            continue;
        };
        if !matches!(asteroid.state, AsteroidState::Visible | AsteroidState::Exploding) {
            continue;
        }
        if let Some([entry, exit]) = scene.narrow.collide_line(start, end, asteroid.placed()) {
            contacts.push(Contact {
                target: HitTarget::Asteroid(id),
                entry,
                exit,
            });
        }
    }
    contacts
}
