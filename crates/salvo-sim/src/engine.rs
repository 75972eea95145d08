//! Combat engine: owns every weapon in flight.
//!
//! `CombatEngine` keeps weapons in a hecs arena split into two ordered
//! layers (background for NPC fire, foreground for the player's), runs the
//! per-tick systems over each layer, and purges destroyed weapons at the end
//! of the tick. Headless and deterministic for a given seed.

use std::sync::Arc;

use glam::DVec2;
use hecs::{Entity, Ref, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use salvo_core::constants::BEAM_EXPIRED;
use salvo_core::enums::{ExplosionMask, WeaponLayer};
use salvo_core::outfit::WeaponOutfit;
use salvo_core::types::{BeamId, FactionId, Mount, PilotId, SimTime};

use crate::factory::{self, Shot};
use crate::geometry::{Geometry, NarrowPhase};
use crate::host::{Battlespace, EffectSink};
use crate::systems;
use crate::systems::collision::Scene;
use crate::weapon::Weapon;

/// Configuration for a new engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// When on, player fire only hurts pilots already hostile to the player.
    pub weapon_safety: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            weapon_safety: true,
        }
    }
}

pub struct CombatEngine {
    world: World,
    background: Vec<Entity>,
    foreground: Vec<Entity>,
    /// Weapons created since the last update; merged into their layer at
    /// the start of the next one.
    spawn_queue: Vec<Entity>,
    despawn_buffer: Vec<Entity>,
    rng: ChaCha8Rng,
    time: SimTime,
    last_beam_id: u32,
    weapon_safety: bool,
    narrow_phase: Box<dyn NarrowPhase>,
}

impl CombatEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            background: Vec::new(),
            foreground: Vec::new(),
            spawn_queue: Vec::new(),
            despawn_buffer: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time: SimTime::default(),
            last_beam_id: 0,
            weapon_safety: config.weapon_safety,
            narrow_phase: Box::new(Geometry),
        }
    }

    /// Replace the built-in geometry with a host-provided narrow phase.
    pub fn with_narrow_phase(mut self, narrow_phase: Box<dyn NarrowPhase>) -> Self {
        self.narrow_phase = narrow_phase;
        self
    }

    pub fn set_weapon_safety(&mut self, on: bool) {
        self.weapon_safety = on;
    }

    /// Fire a bolt or guided munition. The weapon joins its layer on the
    /// next update. Invalid requests are logged and ignored.
    pub fn fire_weapon(
        &mut self,
        outfit: &Arc<WeaponOutfit>,
        shot: &Shot,
        space: &mut dyn Battlespace,
        fx: &mut dyn EffectSink,
    ) -> Option<Entity> {
        match factory::create_projectile(outfit, shot, space, fx, &mut self.rng) {
            Ok(weapon) => Some(self.enqueue(weapon)),
            Err(err) => {
                warn!("fire_weapon ignored: {err}");
                None
            }
        }
    }

    /// Start a beam and return its id for `beam_end`. Invalid requests are
    /// logged and ignored.
    pub fn beam_start(
        &mut self,
        outfit: &Arc<WeaponOutfit>,
        shot: &Shot,
        mount: Mount,
        space: &mut dyn Battlespace,
        fx: &mut dyn EffectSink,
    ) -> Option<BeamId> {
        // Ids are never reused; zero is reserved as "no beam".
        let Some(next) = self.last_beam_id.checked_add(1) else {
            warn!("beam_start refused: beam ids exhausted");
            return None;
        };
        let id = BeamId(next);
        match factory::create_beam(outfit, shot, mount, id, space, fx) {
            Ok(weapon) => {
                self.last_beam_id = id.0;
                self.enqueue(weapon);
                Some(id)
            }
            Err(err) => {
                warn!("beam_start ignored: {err}");
                None
            }
        }
    }

    /// Stop a beam. Ending a beam that is already gone, or was never
    /// started, is a no-op.
    pub fn beam_end(&mut self, shooter: PilotId, beam: BeamId) {
        if beam.0 == 0 {
            warn!("beam_end called with the reserved beam id 0");
            return;
        }
        let Some(entity) = self.find_beam(beam) else {
            debug!(beam = beam.0, "beam_end: beam already gone");
            return;
        };
        let Ok(weapon) = self.world.query_one_mut::<&mut Weapon>(entity) else {
            return;
        };
        if weapon.owner != shooter {
            warn!(
                beam = beam.0,
                shooter = shooter.0,
                owner = weapon.owner.0,
                "beam_end from a pilot that does not own the beam"
            );
            return;
        }
        if weapon.is_destroyed() {
            debug!(beam = beam.0, "beam_end: beam already ending");
            return;
        }
        weapon.timer = BEAM_EXPIRED;
        weapon.destroy();
    }

    /// Advance every weapon by `dt` and purge the ones that died.
    pub fn tick(&mut self, dt: f64, space: &mut dyn Battlespace, fx: &mut dyn EffectSink) {
        self.update(dt, space, fx);
        self.purge(space, fx);
    }

    /// Run the per-tick systems over both layers without purging.
    pub fn update(&mut self, dt: f64, space: &mut dyn Battlespace, fx: &mut dyn EffectSink) {
        self.flush_spawn_queue();

        let pilots = space.pilot_ids();
        let asteroids = space.asteroid_ids();
        let scene = Scene {
            pilots: &pilots,
            asteroids: &asteroids,
            narrow: self.narrow_phase.as_ref(),
            weapon_safety: self.weapon_safety,
        };

        for layer in [&self.background, &self.foreground] {
            run_layer(&mut self.world, layer, &scene, dt, &mut self.rng, space, fx);
        }
        self.time.advance(dt);
    }

    /// Remove destroyed weapons from both layers, releasing their counters,
    /// sounds and trails.
    pub fn purge(&mut self, space: &mut dyn Battlespace, fx: &mut dyn EffectSink) {
        for layer in [&mut self.background, &mut self.foreground] {
            systems::cleanup::run(&mut self.world, layer, &mut self.despawn_buffer, space, fx);
        }
    }

    /// Destroy bolts and munitions caught in a blast. Weapons of `spare`
    /// survive. Returns how many were destroyed.
    pub fn explode_area(
        &mut self,
        center: DVec2,
        radius: f64,
        spare: Option<FactionId>,
        mask: ExplosionMask,
    ) -> usize {
        [&self.background, &self.foreground, &self.spawn_queue]
            .into_iter()
            .map(|layer| systems::explosion::run(&mut self.world, layer, center, radius, spare, mask))
            .sum()
    }

    /// Destroy and purge everything, queued weapons included.
    pub fn clear(&mut self, space: &mut dyn Battlespace, fx: &mut dyn EffectSink) {
        self.flush_spawn_queue();
        for (_entity, weapon) in self.world.query_mut::<&mut Weapon>() {
            weapon.destroy();
        }
        self.purge(space, fx);
        debug!("combat engine cleared");
    }

    /// Ordered weapons of one layer.
    pub fn layer(&self, layer: WeaponLayer) -> &[Entity] {
        match layer {
            WeaponLayer::Background => &self.background,
            WeaponLayer::Foreground => &self.foreground,
        }
    }

    /// Weapons created since the last update.
    pub fn queued(&self) -> &[Entity] {
        &self.spawn_queue
    }

    pub fn weapon(&self, entity: Entity) -> Option<Ref<'_, Weapon>> {
        self.world.get::<&Weapon>(entity).ok()
    }

    /// Entity of a live beam.
    pub fn beam(&self, id: BeamId) -> Option<Entity> {
        self.find_beam(id)
    }

    /// Number of weapons in the arena, queued ones included.
    pub fn weapon_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the weapon arena.
    pub fn world(&self) -> &World {
        &self.world
    }

    fn enqueue(&mut self, weapon: Weapon) -> Entity {
        let entity = self.world.spawn((weapon,));
        self.spawn_queue.push(entity);
        entity
    }

    fn flush_spawn_queue(&mut self) {
        for entity in self.spawn_queue.drain(..) {
            let Ok(weapon) = self.world.get::<&Weapon>(entity) else {
                continue;
            };
            match weapon.layer {
                WeaponLayer::Background => self.background.push(entity),
                WeaponLayer::Foreground => self.foreground.push(entity),
            }
        }
    }

    fn find_beam(&self, id: BeamId) -> Option<Entity> {
        self.background
            .iter()
            .chain(&self.foreground)
            .chain(&self.spawn_queue)
            .copied()
            .find(|&entity| {
                self.world
                    .get::<&Weapon>(entity)
                    .is_ok_and(|w| w.beam_id() == Some(id))
            })
    }
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

/// Run all systems over one layer, in order.
fn run_layer(
    world: &mut World,
    layer: &[Entity],
    scene: &Scene<'_>,
    dt: f64,
    rng: &mut ChaCha8Rng,
    space: &mut dyn Battlespace,
    fx: &mut dyn EffectSink,
) {
    // 1. Lifetimes and range falloff
    systems::timers::run(world, layer, dt, fx);
    // 2. Seeker guidance and beam tracking
    systems::think::run(world, layer, dt, space, rng);
    // 3. Collision and hit resolution
    systems::collision::run(world, layer, scene, dt, space, fx);
    // 4. Integration
    systems::movement::run(world, layer, dt);
    // 5. Sprite frame and spin
    systems::sprite::run(world, layer, dt);
    // 6. Trails
    systems::movement::sample_trails(world, layer, fx);
}

#[cfg(test)]
mod tests {
    use super::*;

    use salvo_core::outfit::{BeamSpec, DamageSpec, WeaponClass};

    use crate::host::EventLog;
    use crate::theatre::Theatre;

    fn cutter() -> Arc<WeaponOutfit> {
        Arc::new(WeaponOutfit::new(
            "cutter",
            WeaponClass::Beam(BeamSpec {
                range: 500.0,
                duration: 5.0,
                ..Default::default()
            }),
            DamageSpec::default(),
        ))
    }

    #[test]
    fn test_beam_ids_are_not_recycled_after_the_last_one() {
        let mut space = Theatre::new();
        let mut fx = EventLog::new();
        let player = space.spawn_player(FactionId(1), DVec2::ZERO);
        let shot = Shot::from_pilot(space.pilot(player).unwrap());
        let mut engine = CombatEngine::default();

        engine.last_beam_id = u32::MAX - 1;
        let last = engine.beam_start(&cutter(), &shot, Mount::default(), &mut space, &mut fx);
        assert_eq!(last, Some(BeamId(u32::MAX)));

        let refused = engine.beam_start(&cutter(), &shot, Mount::default(), &mut space, &mut fx);
        assert_eq!(refused, None);
        assert_eq!(engine.queued().len(), 1);
        assert!(engine.beam(BeamId(u32::MAX)).is_some());
    }
}
