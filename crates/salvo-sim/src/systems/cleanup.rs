//! Purge: removes destroyed weapons and releases what they hold.
//!
//! Runs once at the end of each tick. Removal is deferred to here so no
//! weapon is freed while a system is still iterating its layer.

use hecs::{Entity, World};

use crate::host::{Battlespace, EffectSink};
use crate::weapon::Weapon;

/// Drop every destroyed weapon from `layer`, preserving the order of the
/// survivors, then despawn them. Uses a pre-allocated buffer to avoid
/// per-tick allocation.
pub fn run(
    world: &mut World,
    layer: &mut Vec<Entity>,
    despawn_buffer: &mut Vec<Entity>,
    space: &mut dyn Battlespace,
    fx: &mut dyn EffectSink,
) {
    despawn_buffer.clear();

    layer.retain(|&entity| {
        let Ok(weapon) = world.get::<&Weapon>(entity) else {
            return false;
        };
        if !weapon.is_destroyed() {
            return true;
        }
        release(&weapon, space, fx);
        despawn_buffer.push(entity);
        false
    });

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Undo everything a live weapon holds on the outside world.
fn release(weapon: &Weapon, space: &mut dyn Battlespace, fx: &mut dyn EffectSink) {
    if weapon.has_target() {
        if let Some(target) = space.pilot_mut(weapon.target) {
            target.projectiles = target.projectiles.saturating_sub(1);
            if weapon.seeker().is_some() {
                target.lockons = target.lockons.saturating_sub(1);
            }
        }
    }

    if weapon.category().is_beam() {
        if let Some(voice) = weapon.voice {
            fx.stop_sound(voice);
        }
        if let Some(sound) = weapon.outfit.effects.sound_off {
            fx.play_sound(sound, weapon.solid.pos, weapon.solid.vel);
        }
    }

    if let Some(trail) = weapon.trail {
        fx.trail_release(trail);
    }
}
