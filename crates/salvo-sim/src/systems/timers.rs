//! Lifetime timers.
//!
//! Counts down every live weapon's life, applies bolt range falloff, and
//! marks expired weapons destroyed. Expiring projectiles leave their death
//! visual behind when the outfit defines one.

use hecs::{Entity, World};

use salvo_core::enums::{EffectLayer, WeaponLayer};

use crate::host::EffectSink;
use crate::weapon::{Weapon, WeaponState};

/// Damage multiplier for a bolt with `timer` life left and decay starting
/// at `falloff`.
pub fn falloff_strength(timer: f64, falloff: f64) -> f64 {
    if falloff > 0.0 && timer < falloff {
        (timer / falloff).max(0.0)
    } else {
        1.0
    }
}

pub fn run(world: &mut World, layer: &[Entity], dt: f64, fx: &mut dyn EffectSink) {
    for &entity in layer {
        let Ok(weapon) = world.query_one_mut::<&mut Weapon>(entity) else {
            continue;
        };
        if weapon.is_destroyed() {
            continue;
        }
        advance(weapon, dt, fx);
    }
}

fn advance(weapon: &mut Weapon, dt: f64, fx: &mut dyn EffectSink) {
    weapon.timer -= dt;
    let expired = weapon.timer < 0.0;

    match &mut weapon.state {
        WeaponState::Bolt { falloff, strength } => {
            if !expired {
                *strength = falloff_strength(weapon.timer, *falloff);
            }
        }
        WeaponState::Ammo { .. } => {}
        WeaponState::Beam(beam) => {
            beam.effect_timer -= dt;
            // Beams end silently; their sound is stopped during purge.
            if expired {
                weapon.destroy();
            }
            return;
        }
    }

    if expired {
        if let Some(effect) = weapon.outfit.effects.spfx_armour {
            let layer = match weapon.layer {
                WeaponLayer::Foreground => EffectLayer::Front,
                WeaponLayer::Background => EffectLayer::Middle,
            };
            fx.spawn_effect(effect, weapon.solid.pos, weapon.solid.vel, layer);
        }
        weapon.destroy();
    }
}
