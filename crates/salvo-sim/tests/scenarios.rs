//! End-to-end combat scenarios driven through the public engine API.

use std::sync::Arc;

use glam::DVec2;

use salvo_core::constants::{BEAM_EXPIRED, DT};
use salvo_core::enums::{ExplosionMask, SeekerAi, WeaponLayer, WeaponStatus};
use salvo_core::outfit::{AmmoSpec, BeamSpec, BoltSpec, DamageSpec, OutfitCatalog, WeaponClass, WeaponOutfit};
use salvo_core::types::{FactionId, Mount, PilotId};
use salvo_sim::factory::Shot;
use salvo_sim::host::{Battlespace, EventLog};
use salvo_sim::theatre::Theatre;
use salvo_sim::{CombatEngine, SimConfig};

const NAVY: FactionId = FactionId(1);
const PIRATE: FactionId = FactionId(2);

fn engine(seed: u64) -> CombatEngine {
    CombatEngine::new(SimConfig {
        seed,
        ..Default::default()
    })
}

fn bolt(speed: f64, range: f64) -> Arc<WeaponOutfit> {
    Arc::new(WeaponOutfit::new(
        "mass driver",
        WeaponClass::Bolt(BoltSpec {
            speed,
            range,
            ..Default::default()
        }),
        DamageSpec {
            amount: 10.0,
            ..Default::default()
        },
    ))
}

fn seeker(lock_on: f64) -> Arc<WeaponOutfit> {
    Arc::new(WeaponOutfit::new(
        "seeker",
        WeaponClass::GuidedAmmo(AmmoSpec {
            ai: SeekerAi::Smart,
            speed: 200.0,
            speed_max: 200.0,
            turn: 2.0,
            duration: 20.0,
            lock_on,
            ..Default::default()
        }),
        DamageSpec {
            amount: 30.0,
            ..Default::default()
        },
    ))
}

fn shot(space: &Theatre, shooter: PilotId) -> Shot {
    Shot::from_pilot(space.pilot(shooter).unwrap())
}

fn status_of(engine: &CombatEngine, entity: hecs::Entity) -> Option<WeaponStatus> {
    engine.weapon(entity).and_then(|w| w.status())
}

#[test]
fn scenario_a_bolt_flies_exactly_one_second() {
    let mut space = Theatre::new();
    let mut fx = EventLog::new();
    let mut engine = engine(7);
    let player = space.spawn_player(NAVY, DVec2::ZERO);

    let entity = engine
        .fire_weapon(&bolt(500.0, 1000.0), &shot(&space, player), &mut space, &mut fx)
        .unwrap();
    assert_eq!(engine.weapon(entity).unwrap().timer, 2.0);

    engine.tick(1.0, &mut space, &mut fx);

    let weapon = engine.weapon(entity).unwrap();
    assert_eq!(weapon.solid.pos, DVec2::new(500.0, 0.0));
    assert_eq!(weapon.timer, 1.0);
}

#[test]
fn scenario_b_instant_lock_starts_ok() {
    let mut space = Theatre::new();
    let mut fx = EventLog::new();
    let mut engine = engine(7);
    let player = space.spawn_player(NAVY, DVec2::ZERO);
    let pirate = space.spawn_pilot(PIRATE, DVec2::new(1000.0, 0.0));

    let entity = engine
        .fire_weapon(&seeker(0.0), &shot(&space, player).at(pirate), &mut space, &mut fx)
        .unwrap();
    assert_eq!(status_of(&engine, entity), Some(WeaponStatus::Ok));

    let entity = engine
        .fire_weapon(&seeker(0.3), &shot(&space, player).at(pirate), &mut space, &mut fx)
        .unwrap();
    assert_eq!(status_of(&engine, entity), Some(WeaponStatus::Locking));
}

#[test]
fn scenario_c_unjammable_target_keeps_seekers_locked() {
    for seed in 0..8 {
        let mut space = Theatre::new();
        let mut fx = EventLog::new();
        let mut engine = engine(seed);
        let player = space.spawn_player(NAVY, DVec2::ZERO);
        let pirate = space.spawn_pilot(PIRATE, DVec2::new(0.0, 2500.0));
        {
            let target = space.pilot_mut(pirate).unwrap();
            target.stats.jam_chance = 0.0;
            target.ew_evasion = 1.0e6;
            target.vel = DVec2::new(150.0, 0.0);
        }

        let entity = engine
            .fire_weapon(&seeker(0.2), &shot(&space, player).at(pirate), &mut space, &mut fx)
            .unwrap();
        for _ in 0..600 {
            engine.tick(DT, &mut space, &mut fx);
            let Some(status) = status_of(&engine, entity) else {
                break;
            };
            assert!(
                matches!(
                    status,
                    WeaponStatus::Locking | WeaponStatus::Ok | WeaponStatus::Unjammed
                ),
                "seed {seed}: unexpected {status:?}"
            );
        }
    }
}

#[test]
fn seeker_status_transitions_are_closed() {
    let allowed = |from: WeaponStatus, to: WeaponStatus| match from {
        WeaponStatus::Locking => matches!(to, WeaponStatus::Locking | WeaponStatus::Ok),
        WeaponStatus::Ok => !matches!(to, WeaponStatus::Locking),
        WeaponStatus::Unjammed => to == WeaponStatus::Unjammed,
        WeaponStatus::Jammed | WeaponStatus::JammedSlowed => to == from,
    };

    let mut jammed_seen = false;
    for seed in 0..16 {
        let mut space = Theatre::new();
        let mut fx = EventLog::new();
        let mut engine = engine(seed);
        let player = space.spawn_player(NAVY, DVec2::ZERO);
        let pirate = space.spawn_pilot(PIRATE, DVec2::new(1500.0, 0.0));
        space.pilot_mut(pirate).unwrap().stats.jam_chance = 1.0;

        let entity = engine
            .fire_weapon(&seeker(0.5), &shot(&space, player).at(pirate), &mut space, &mut fx)
            .unwrap();
        let mut last = status_of(&engine, entity).unwrap();
        for _ in 0..900 {
            engine.tick(DT, &mut space, &mut fx);
            let Some(status) = status_of(&engine, entity) else {
                break;
            };
            assert!(allowed(last, status), "seed {seed}: {last:?} -> {status:?}");
            jammed_seen |= status.is_jammed();
            last = status;
        }
    }
    assert!(jammed_seen, "a certain jam should trip at least once");
}

#[test]
fn scenario_d_explosion_uses_strict_radius() {
    let mut space = Theatre::new();
    let mut fx = EventLog::new();
    let mut engine = engine(7);

    let slow = bolt(1.0, 100.0);
    let mut fire_from = |pos: DVec2, engine: &mut CombatEngine, space: &mut Theatre| {
        let gunner = space.spawn_pilot(PIRATE, pos);
        engine
            .fire_weapon(&slow, &shot(space, gunner), space, &mut fx)
            .unwrap()
    };
    let inside = fire_from(DVec2::new(50.0, 0.0), &mut engine, &mut space);
    let edge = fire_from(DVec2::new(0.0, 100.0), &mut engine, &mut space);
    let outside = fire_from(DVec2::new(-150.0, 0.0), &mut engine, &mut space);

    let destroyed = engine.explode_area(DVec2::ZERO, 100.0, None, ExplosionMask::ALL);
    assert_eq!(destroyed, 1);
    assert!(engine.weapon(inside).unwrap().is_destroyed());
    assert!(!engine.weapon(edge).unwrap().is_destroyed());
    assert!(!engine.weapon(outside).unwrap().is_destroyed());

    engine.tick(DT, &mut space, &mut fx);
    assert!(engine.weapon(inside).is_none());
    assert_eq!(engine.layer(WeaponLayer::Background), &[edge, outside]);
}

#[test]
fn explosion_respects_mask_and_spared_faction() {
    let mut space = Theatre::new();
    let mut fx = EventLog::new();
    let mut engine = engine(7);
    let navy = space.spawn_pilot(NAVY, DVec2::ZERO);
    let pirate = space.spawn_pilot(PIRATE, DVec2::new(300.0, 0.0));

    let navy_bolt = engine
        .fire_weapon(&bolt(1.0, 100.0), &shot(&space, navy), &mut space, &mut fx)
        .unwrap();
    let pirate_bolt = engine
        .fire_weapon(&bolt(1.0, 100.0), &shot(&space, pirate), &mut space, &mut fx)
        .unwrap();
    let missile = engine
        .fire_weapon(&seeker(1.0), &shot(&space, pirate).at(navy), &mut space, &mut fx)
        .unwrap();
    engine.tick(DT, &mut space, &mut fx);

    assert_eq!(engine.explode_area(DVec2::ZERO, 500.0, None, ExplosionMask::AMMO), 1);
    assert!(engine.weapon(missile).unwrap().is_destroyed());
    assert!(!engine.weapon(pirate_bolt).unwrap().is_destroyed());

    assert_eq!(engine.explode_area(DVec2::ZERO, 500.0, Some(PIRATE), ExplosionMask::BOLT), 1);
    assert!(engine.weapon(navy_bolt).unwrap().is_destroyed());
    assert!(!engine.weapon(pirate_bolt).unwrap().is_destroyed());

    engine.tick(DT, &mut space, &mut fx);
    assert_eq!(engine.layer(WeaponLayer::Background), &[pirate_bolt]);
    assert_eq!(space.pilot(navy).unwrap().lockons, 0);
}

#[test]
fn scenario_e_beam_dies_with_owner_energy() {
    let mut space = Theatre::new();
    let mut fx = EventLog::new();
    let mut engine = engine(7);
    let player = space.spawn_player(NAVY, DVec2::ZERO);

    let outfit = Arc::new(WeaponOutfit::new(
        "cutter",
        WeaponClass::Beam(BeamSpec {
            range: 800.0,
            duration: 10.0,
            energy: 5.0,
            ..Default::default()
        }),
        DamageSpec {
            amount: 40.0,
            ..Default::default()
        },
    ));
    let id = engine
        .beam_start(&outfit, &shot(&space, player), Mount::default(), &mut space, &mut fx)
        .unwrap();
    for _ in 0..30 {
        engine.tick(DT, &mut space, &mut fx);
    }
    let entity = engine.beam(id).unwrap();
    assert!(engine.weapon(entity).unwrap().timer > 9.0);

    space.pilot_mut(player).unwrap().energy = 0.0;
    engine.update(DT, &mut space, &mut fx);
    {
        let weapon = engine.weapon(entity).unwrap();
        assert!(weapon.is_destroyed());
        assert_eq!(weapon.timer, BEAM_EXPIRED);
    }
    engine.purge(&mut space, &mut fx);
    assert!(engine.beam(id).is_none());
    assert_eq!(engine.weapon_count(), 0);
}

#[test]
fn layers_are_isolated() {
    let mut space = Theatre::new();
    let mut fx = EventLog::new();
    let mut engine = engine(7);
    let player = space.spawn_player(NAVY, DVec2::ZERO);
    let npc = space.spawn_pilot(NAVY, DVec2::new(0.0, 500.0));

    let fleeting = bolt(100.0, 1.0);
    let lasting = bolt(100.0, 1000.0);
    for _ in 0..4 {
        engine.fire_weapon(&fleeting, &shot(&space, player), &mut space, &mut fx);
    }
    let background: Vec<_> = (0..3)
        .filter_map(|_| engine.fire_weapon(&lasting, &shot(&space, npc), &mut space, &mut fx))
        .collect();

    engine.tick(DT, &mut space, &mut fx);
    assert!(engine.layer(WeaponLayer::Foreground).is_empty());
    assert_eq!(engine.layer(WeaponLayer::Background), background.as_slice());
    assert_eq!(engine.weapon_count(), 3);
}

#[test]
fn catalog_outfits_fire_through_the_engine() {
    let json = r#"[
        {
            "name": "Ion Cannon",
            "category": "turret_bolt",
            "speed": 800.0,
            "range": 1600.0,
            "falloff": 1200.0,
            "damage": { "amount": 8.0, "kind": "ion", "disable": 4.0 }
        }
    ]"#;
    let (catalog, rejected) = OutfitCatalog::from_json_str(json).unwrap();
    assert!(rejected.is_empty());
    let ion = catalog.get("Ion Cannon").unwrap();

    let mut space = Theatre::new();
    let mut fx = EventLog::new();
    let mut engine = engine(7);
    space.declare_enemies(NAVY, PIRATE);
    let pirate = space.spawn_pilot(PIRATE, DVec2::ZERO);
    let navy = space.spawn_pilot(NAVY, DVec2::new(0.0, 300.0));

    // Fired facing away: the turret still swings onto the enemy.
    space.pilot_mut(pirate).unwrap().dir = std::f64::consts::PI;
    engine.fire_weapon(&ion, &shot(&space, pirate).at(navy), &mut space, &mut fx);
    for _ in 0..60 {
        engine.tick(DT, &mut space, &mut fx);
    }

    let target = space.pilot(navy).unwrap();
    assert_eq!(target.shield, 92.0);
    assert_eq!(target.projectiles, 0);
    assert_eq!(space.attacks().len(), 1);
    assert_eq!(engine.weapon_count(), 0);
}
