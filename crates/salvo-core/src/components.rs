//! Plain-data records for the entities weapons interact with.
//!
//! Pilots and asteroids are owned by the host world; the simulation reads
//! them through the collaborator traits and writes back only the fields the
//! weapon engine is responsible for (energy drain, lock counters, hostility).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{AsteroidState, DamageKind};
use crate::types::{AsteroidId, FactionId, PilotId};

/// Collision representation of a hull or projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Hull {
    /// Sprite approximated by its bounding circle.
    Sprite { radius: f64 },
    /// Convex polygon in local coordinates, rotated by the owner's heading.
    Polygon { points: Vec<DVec2> },
}

impl Default for Hull {
    fn default() -> Self {
        Hull::Sprite { radius: 1.0 }
    }
}

/// A hull placed in the world.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub hull: &'a Hull,
    pub pos: DVec2,
    pub dir: f64,
}

/// Damage handed to the pilot or asteroid damage model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    pub amount: f64,
    pub penetration: f64,
    pub kind: DamageKind,
    pub disable: f64,
}

/// Status flags that gate whether weapons can hit a pilot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotFlags {
    pub invincible: bool,
    pub hidden: bool,
    pub landing: bool,
    pub taking_off: bool,
    pub dead: bool,
    pub disabled: bool,
}

/// Stat block derived from the pilot's loadout. Multipliers default to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub fwd_damage: f64,
    pub tur_damage: f64,
    pub launch_damage: f64,
    /// Fraction of forward weapon damage converted to disable.
    pub fwd_dam_as_dis: f64,
    /// Fraction of turret weapon damage converted to disable.
    pub tur_dam_as_dis: f64,
    pub fwd_energy: f64,
    pub tur_energy: f64,
    pub launch_range: f64,
    pub launch_calibration: f64,
    /// Chance of jamming an incoming seeker each tick.
    pub jam_chance: f64,
    /// Multiplier on weapon tracking range.
    pub ew_track: f64,
}

impl Default for ShipStats {
    fn default() -> Self {
        Self {
            fwd_damage: 1.0,
            tur_damage: 1.0,
            launch_damage: 1.0,
            fwd_dam_as_dis: 0.0,
            tur_dam_as_dis: 0.0,
            fwd_energy: 1.0,
            tur_energy: 1.0,
            launch_range: 1.0,
            launch_calibration: 1.0,
            jam_chance: 0.0,
            ew_track: 1.0,
        }
    }
}

/// A ship as seen by the weapon engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pilot {
    pub id: PilotId,
    pub faction: FactionId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub dir: f64,
    pub hull: Hull,
    pub flags: PilotFlags,
    /// Hostile towards the player.
    pub hostile: bool,
    pub stats: ShipStats,
    /// Electronic evasion; larger is harder to track and easier to jam for.
    pub ew_evasion: f64,
    pub shield: f64,
    pub shield_max: f64,
    pub armour: f64,
    pub armour_max: f64,
    pub energy: f64,
    /// Currently selected target, if any.
    pub target: Option<PilotId>,
    /// Currently selected asteroid, if any.
    pub nav_asteroid: Option<AsteroidId>,
    /// Seekers currently locked on this pilot.
    pub lockons: u32,
    /// Projectiles currently targeting this pilot.
    pub projectiles: u32,
    /// Damage dealt by the player, as a fraction of max health.
    pub player_damage: f64,
}

impl Pilot {
    pub fn new(id: PilotId, faction: FactionId, pos: DVec2) -> Self {
        Self {
            id,
            faction,
            pos,
            vel: DVec2::ZERO,
            dir: 0.0,
            hull: Hull::Sprite { radius: 20.0 },
            flags: PilotFlags::default(),
            hostile: false,
            stats: ShipStats::default(),
            ew_evasion: 1000.0,
            shield: 100.0,
            shield_max: 100.0,
            armour: 100.0,
            armour_max: 100.0,
            energy: 100.0,
            target: None,
            nav_asteroid: None,
            lockons: 0,
            projectiles: 0,
            player_damage: 0.0,
        }
    }

    /// Total max health used to normalise player damage.
    pub fn max_health(&self) -> f64 {
        self.shield_max + self.armour_max
    }

    pub fn placed(&self) -> Placed<'_> {
        Placed {
            hull: &self.hull,
            pos: self.pos,
            dir: self.dir,
        }
    }
}

/// An asteroid as seen by the weapon engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: AsteroidId,
    pub pos: DVec2,
    pub vel: DVec2,
    pub hull: Hull,
    pub armour: f64,
    pub state: AsteroidState,
}

impl Asteroid {
    pub fn new(id: AsteroidId, pos: DVec2, radius: f64, armour: f64) -> Self {
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            hull: Hull::Sprite { radius },
            armour,
            state: AsteroidState::Visible,
        }
    }

    pub fn placed(&self) -> Placed<'_> {
        Placed {
            hull: &self.hull,
            pos: self.pos,
            dir: 0.0,
        }
    }
}
