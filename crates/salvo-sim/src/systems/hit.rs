//! Hit resolution: damage, impact feedback and AI notification.

use glam::DVec2;
use tracing::debug;

use salvo_core::components::Damage;
use salvo_core::constants::{BEAM_EFFECT_INTERVAL, PILOT_HOSTILE_THRESHOLD};
use salvo_core::enums::{AsteroidState, EffectLayer};
use salvo_core::types::{AsteroidId, PilotId};

use crate::host::{Battlespace, EffectSink};
use crate::systems::collision::{Contact, HitTarget};
use crate::weapon::{Weapon, WeaponState};

/// Damage a weapon deals, scaled by `scale` (1 for projectiles, `dt` for
/// beams). Part of it is diverted to disable by the shooter's conversion
/// fraction.
pub fn damage_for(weapon: &Weapon, scale: f64) -> Damage {
    let spec = &weapon.outfit.damage;
    let mult = weapon.damage_mod * weapon.strength() * scale;
    let applied = mult * spec.amount;
    let conversion = weapon.dam_as_dis;
    Damage {
        amount: (applied * (1.0 - conversion)).max(0.0),
        penetration: spec.penetration,
        kind: spec.kind,
        disable: (mult * spec.disable + applied * conversion).max(0.0),
    }
}

/// Apply a bolt or munition hit. The caller destroys the weapon.
pub fn resolve_projectile(
    weapon: &Weapon,
    contact: Contact,
    space: &mut dyn Battlespace,
    fx: &mut dyn EffectSink,
) {
    let damage = damage_for(weapon, 1.0);
    if let Some(sound) = weapon.outfit.effects.sound_hit {
        fx.play_sound(sound, contact.entry, weapon.solid.vel);
    }
    match contact.target {
        HitTarget::Pilot(victim) => {
            let applied = space.damage_pilot(victim, &weapon.solid, weapon.owner, &damage);
            impact_on_pilot(weapon, victim, contact.entry, space, fx);
            notify_ai(space, victim, weapon.owner, applied);
        }
        HitTarget::Asteroid(id) => {
            hit_asteroid(id, &damage, space);
            impact_on_asteroid(weapon, id, contact.entry, space, fx);
        }
    }
}

/// Apply one tick of beam contact. Damage lands every tick; visuals and AI
/// notification are throttled by the beam's effect timer.
pub fn resolve_beam(
    weapon: &mut Weapon,
    contacts: &[Contact],
    dt: f64,
    space: &mut dyn Battlespace,
    fx: &mut dyn EffectSink,
) {
    let Some(beam) = weapon.beam() else {
        return;
    };
    let flash = beam.effect_timer <= 0.0;
    let damage = damage_for(weapon, dt);

    for contact in contacts {
        match contact.target {
            HitTarget::Pilot(victim) => {
                let applied = space.damage_pilot(victim, &weapon.solid, weapon.owner, &damage);
                if flash {
                    impact_on_pilot(weapon, victim, contact.entry, space, fx);
                    notify_ai(space, victim, weapon.owner, applied);
                }
            }
            HitTarget::Asteroid(id) => {
                // Exploding asteroids still block the beam but take no damage.
                if space.asteroid(id).is_some_and(|a| a.state == AsteroidState::Visible) {
                    hit_asteroid(id, &damage, space);
                }
                if flash {
                    impact_on_asteroid(weapon, id, contact.entry, space, fx);
                }
            }
        }
    }

    let striking = !contacts.is_empty();
    if let WeaponState::Beam(beam) = &mut weapon.state {
        beam.striking = striking;
        if flash && striking {
            beam.effect_timer = BEAM_EFFECT_INTERVAL;
        }
    }
}

fn hit_asteroid(id: AsteroidId, damage: &Damage, space: &mut dyn Battlespace) {
    let remaining = space.damage_asteroid(id, damage);
    if remaining <= 0.0 {
        debug!(asteroid = id.0, "asteroid broken up");
        space.break_up_asteroid(id);
    }
}

fn impact_on_pilot(
    weapon: &Weapon,
    victim: PilotId,
    point: DVec2,
    space: &dyn Battlespace,
    fx: &mut dyn EffectSink,
) {
    let Some(pilot) = space.pilot(victim) else {
        return;
    };
    let effects = &weapon.outfit.effects;
    let effect = if pilot.shield > 0.0 {
        effects.spfx_shield
    } else {
        effects.spfx_armour
    };
    let layer = if space.player() == Some(victim) {
        EffectLayer::Front
    } else {
        EffectLayer::Middle
    };
    if let Some(effect) = effect {
        fx.spawn_effect(effect, point, pilot.vel, layer);
    }
}

fn impact_on_asteroid(
    weapon: &Weapon,
    id: AsteroidId,
    point: DVec2,
    space: &dyn Battlespace,
    fx: &mut dyn EffectSink,
) {
    let vel = space.asteroid(id).map_or(DVec2::ZERO, |a| a.vel);
    if let Some(effect) = weapon.outfit.effects.spfx_armour {
        fx.spawn_effect(effect, point, vel, EffectLayer::Middle);
    }
}

/// Tell the victim's AI who hurt it.
///
/// Player fire only provokes a victim once the accumulated damage passes
/// `PILOT_HOSTILE_THRESHOLD` of its max health, or immediately if it was
/// the player's declared target. Everyone else always provokes.
pub fn notify_ai(space: &mut dyn Battlespace, victim: PilotId, shooter: PilotId, damage: f64) {
    if damage <= 0.0 {
        return;
    }
    let Some(attacker) = space.pilot(shooter) else {
        return;
    };
    let targeted = attacker.target == Some(victim);
    let from_player = space.player() == Some(shooter);

    let Some(pilot) = space.pilot_mut(victim) else {
        return;
    };
    if pilot.flags.disabled {
        return;
    }

    if from_player {
        let max_health = pilot.max_health();
        if max_health > 0.0 {
            pilot.player_damage += damage / max_health;
        }
        if pilot.player_damage <= PILOT_HOSTILE_THRESHOLD && !targeted {
            return;
        }
        if !pilot.hostile {
            debug!(pilot = victim.0, "pilot turned hostile to the player");
        }
        pilot.hostile = true;
    }
    space.notify_attacked(victim, shooter, damage);
}
