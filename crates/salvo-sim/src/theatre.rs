//! Reference `Battlespace`: a small self-contained world of pilots and
//! asteroids.
//!
//! Pilots are damaged shield-first, then armour; a pilot whose armour
//! reaches zero is flagged dead. Disable damage and penetration are not
//! modelled. Attack notifications and asteroid break-ups are recorded so
//! callers can inspect them.

use std::collections::{BTreeMap, HashSet};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use salvo_core::components::{Asteroid, Damage, Pilot};
use salvo_core::enums::AsteroidState;
use salvo_core::solid::Solid;
use salvo_core::types::{AsteroidId, FactionId, PilotId};

use crate::host::Battlespace;

/// One `notify_attacked` call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub victim: PilotId,
    pub attacker: PilotId,
    pub damage: f64,
}

#[derive(Debug, Default)]
pub struct Theatre {
    pilots: BTreeMap<PilotId, Pilot>,
    asteroids: BTreeMap<AsteroidId, Asteroid>,
    player: Option<PilotId>,
    /// Unordered pairs of mutually hostile factions.
    enmities: HashSet<(FactionId, FactionId)>,
    attacks: Vec<Attack>,
    broken_up: Vec<AsteroidId>,
    next_pilot: u32,
    next_asteroid: u32,
}

impl Theatre {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pilot with default stats and return its id.
    pub fn spawn_pilot(&mut self, faction: FactionId, pos: DVec2) -> PilotId {
        self.next_pilot += 1;
        let id = PilotId(self.next_pilot);
        self.pilots.insert(id, Pilot::new(id, faction, pos));
        id
    }

    /// Add the player's pilot.
    pub fn spawn_player(&mut self, faction: FactionId, pos: DVec2) -> PilotId {
        let id = self.spawn_pilot(faction, pos);
        self.player = Some(id);
        id
    }

    pub fn remove_pilot(&mut self, id: PilotId) -> Option<Pilot> {
        if self.player == Some(id) {
            self.player = None;
        }
        self.pilots.remove(&id)
    }

    pub fn spawn_asteroid(&mut self, pos: DVec2, radius: f64, armour: f64) -> AsteroidId {
        self.next_asteroid += 1;
        let id = AsteroidId(self.next_asteroid);
        self.asteroids.insert(id, Asteroid::new(id, pos, radius, armour));
        id
    }

    /// Declare two factions enemies of each other.
    pub fn declare_enemies(&mut self, a: FactionId, b: FactionId) {
        self.enmities.insert(ordered(a, b));
    }

    pub fn asteroid_mut(&mut self, id: AsteroidId) -> Option<&mut Asteroid> {
        self.asteroids.get_mut(&id)
    }

    /// Every attack notification so far, oldest first.
    pub fn attacks(&self) -> &[Attack] {
        &self.attacks
    }

    /// Asteroids broken up so far, oldest first.
    pub fn broken_up(&self) -> &[AsteroidId] {
        &self.broken_up
    }
}

fn ordered(a: FactionId, b: FactionId) -> (FactionId, FactionId) {
    if a.0 <= b.0 {
        (a, b)
    } else {
        (b, a)
    }
}

impl Battlespace for Theatre {
    fn player(&self) -> Option<PilotId> {
        self.player
    }

    fn pilot_ids(&self) -> Vec<PilotId> {
        self.pilots.keys().copied().collect()
    }

    fn pilot(&self, id: PilotId) -> Option<&Pilot> {
        self.pilots.get(&id)
    }

    fn pilot_mut(&mut self, id: PilotId) -> Option<&mut Pilot> {
        self.pilots.get_mut(&id)
    }

    fn are_enemies(&self, a: FactionId, b: FactionId) -> bool {
        self.enmities.contains(&ordered(a, b))
    }

    fn damage_pilot(
        &mut self,
        victim: PilotId,
        _source: &Solid,
        _attacker: PilotId,
        damage: &Damage,
    ) -> f64 {
        let Some(pilot) = self.pilots.get_mut(&victim) else {
            return 0.0;
        };
        let amount = damage.amount.max(0.0);
        let to_shield = amount.min(pilot.shield);
        pilot.shield -= to_shield;
        let to_armour = (amount - to_shield).min(pilot.armour);
        pilot.armour -= to_armour;
        if pilot.armour <= 0.0 {
            pilot.flags.dead = true;
        }
        to_shield + to_armour
    }

    fn notify_attacked(&mut self, victim: PilotId, attacker: PilotId, damage: f64) {
        self.attacks.push(Attack {
            victim,
            attacker,
            damage,
        });
    }

    fn asteroid_ids(&self) -> Vec<AsteroidId> {
        self.asteroids.keys().copied().collect()
    }

    fn asteroid(&self, id: AsteroidId) -> Option<&Asteroid> {
        self.asteroids.get(&id)
    }

    fn damage_asteroid(&mut self, id: AsteroidId, damage: &Damage) -> f64 {
        let Some(asteroid) = self.asteroids.get_mut(&id) else {
            return 0.0;
        };
        asteroid.armour -= damage.amount.max(0.0);
        asteroid.armour
    }

    fn break_up_asteroid(&mut self, id: AsteroidId) {
        if let Some(asteroid) = self.asteroids.get_mut(&id) {
            asteroid.state = AsteroidState::Exploding;
            self.broken_up.push(id);
        }
    }
}
