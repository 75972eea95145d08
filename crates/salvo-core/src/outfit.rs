//! Immutable weapon outfit definitions and the catalog that loads them.
//!
//! Outfits are parsed once and shared read-only (`Arc<WeaponOutfit>`) by
//! every weapon instance fired from them. Nothing in the simulation mutates
//! an outfit after loading.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::components::Hull;
use crate::enums::{DamageKind, SeekerAi, WeaponCategory};
use crate::error::OutfitError;
use crate::types::{EffectId, SoundId};

/// A weapon outfit as authored in content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponOutfit {
    pub name: String,
    /// Mass of a single munition (only meaningful for guided ammo).
    #[serde(default = "default_mass")]
    pub mass: f64,
    #[serde(flatten)]
    pub class: WeaponClass,
    pub damage: DamageSpec,
    /// Collision representation of the projectile.
    #[serde(default)]
    pub hull: Hull,
    #[serde(default)]
    pub effects: OutfitEffects,
}

fn default_mass() -> f64 {
    1.0
}

/// Category-specific parameters, tagged by `category` in content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum WeaponClass {
    Bolt(BoltSpec),
    TurretBolt(BoltSpec),
    GuidedAmmo(AmmoSpec),
    Beam(BeamSpec),
    TurretBeam(BeamSpec),
}

/// Unguided projectile parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoltSpec {
    /// Muzzle speed relative to the shooter.
    pub speed: f64,
    /// Maximum travel distance.
    pub range: f64,
    /// Distance after which damage starts to decay. Defaults to no falloff.
    #[serde(default)]
    pub falloff: Option<f64>,
    /// Maximum aim deviation from the hull heading (radians).
    #[serde(default)]
    pub swivel: f64,
    /// Electronic tracking range used for the lead fraction.
    #[serde(default)]
    pub track: f64,
}

/// Launcher + munition parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmmoSpec {
    #[serde(default)]
    pub ai: SeekerAi,
    /// Initial speed relative to the shooter.
    #[serde(default)]
    pub speed: f64,
    pub speed_max: f64,
    /// Acceleration while under power.
    #[serde(default)]
    pub thrust: f64,
    /// Maximum turn rate (rad/s).
    #[serde(default)]
    pub turn: f64,
    /// Flight time before self-destruct (seconds).
    pub duration: f64,
    /// Jam resistance subtracted from the target's jam chance.
    #[serde(default)]
    pub resist: f64,
    /// Lock-on delay (seconds). Zero means locked at launch.
    #[serde(default)]
    pub lock_on: f64,
    #[serde(default)]
    pub swivel: f64,
    /// Turret launcher: aim is unconstrained by the hull heading.
    #[serde(default)]
    pub turret: bool,
    #[serde(default)]
    pub track: f64,
}

/// Continuous beam parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamSpec {
    pub range: f64,
    /// Maximum firing time (seconds).
    pub duration: f64,
    /// Beams with a minimum duration ignore range checks until it elapses.
    #[serde(default)]
    pub min_duration: f64,
    #[serde(default)]
    pub turn: f64,
    #[serde(default)]
    pub swivel: f64,
    /// Energy drained from the owner per second.
    #[serde(default)]
    pub energy: f64,
}

/// Base damage of a weapon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageSpec {
    pub amount: f64,
    #[serde(default)]
    pub penetration: f64,
    #[serde(default)]
    pub kind: DamageKind,
    #[serde(default)]
    pub disable: f64,
}

/// Render and audio hooks; the simulation only passes these ids along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitEffects {
    #[serde(default)]
    pub sound: Option<SoundId>,
    #[serde(default)]
    pub sound_hit: Option<SoundId>,
    /// Played when a beam shuts off.
    #[serde(default)]
    pub sound_off: Option<SoundId>,
    #[serde(default)]
    pub spfx_shield: Option<EffectId>,
    #[serde(default)]
    pub spfx_armour: Option<EffectId>,
    #[serde(default)]
    pub trail: Option<TrailSpec>,
    #[serde(default)]
    pub sprite: SpriteSheet,
    /// Spin rate of the sprite (rad/s); zero for non-spinning projectiles.
    #[serde(default)]
    pub spin: f64,
}

/// Trail style passed to the visual-effects collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailSpec {
    pub style: String,
    /// Offset of the trail emitter behind the projectile.
    #[serde(default)]
    pub offset: f64,
}

/// Dimensions of a directional sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub cols: u32,
    pub rows: u32,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self { cols: 1, rows: 1 }
    }
}

impl WeaponOutfit {
    /// Build an outfit with default mass, hull, and effects.
    pub fn new(name: impl Into<String>, class: WeaponClass, damage: DamageSpec) -> Self {
        Self {
            name: name.into(),
            mass: default_mass(),
            class,
            damage,
            hull: Hull::default(),
            effects: OutfitEffects::default(),
        }
    }

    pub fn category(&self) -> WeaponCategory {
        match self.class {
            WeaponClass::Bolt(_) => WeaponCategory::Bolt,
            WeaponClass::TurretBolt(_) => WeaponCategory::TurretBolt,
            WeaponClass::GuidedAmmo(_) => WeaponCategory::GuidedAmmo,
            WeaponClass::Beam(_) => WeaponCategory::Beam,
            WeaponClass::TurretBeam(_) => WeaponCategory::TurretBeam,
        }
    }

    /// Nominal reach of the weapon.
    pub fn range(&self) -> f64 {
        match &self.class {
            WeaponClass::Bolt(b) | WeaponClass::TurretBolt(b) => b.range,
            WeaponClass::GuidedAmmo(a) => a.duration * a.speed_max.max(a.speed),
            WeaponClass::Beam(b) | WeaponClass::TurretBeam(b) => b.range,
        }
    }

    /// Check the numeric invariants the simulation divides by.
    pub fn validate(&self) -> Result<(), OutfitError> {
        let positive = |field: &'static str, value: f64| {
            if value > 0.0 {
                Ok(())
            } else {
                Err(OutfitError::NonPositive {
                    name: self.name.clone(),
                    field,
                    value,
                })
            }
        };
        match &self.class {
            WeaponClass::Bolt(b) | WeaponClass::TurretBolt(b) => {
                positive("speed", b.speed)?;
                positive("range", b.range)
            }
            WeaponClass::GuidedAmmo(a) => {
                positive("speed_max", a.speed_max)?;
                positive("duration", a.duration)?;
                positive("mass", self.mass)
            }
            WeaponClass::Beam(b) | WeaponClass::TurretBeam(b) => {
                positive("range", b.range)?;
                positive("duration", b.duration)
            }
        }
    }
}

/// Outfits keyed by name.
#[derive(Debug, Clone, Default)]
pub struct OutfitCatalog {
    outfits: HashMap<String, Arc<WeaponOutfit>>,
}

impl OutfitCatalog {
    /// Load a catalog from a JSON array of outfit objects.
    ///
    /// Bad entries are skipped with a warning and returned alongside the
    /// catalog; only a non-array document is a hard error.
    pub fn from_json_str(json: &str) -> Result<(Self, Vec<OutfitError>), OutfitError> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(OutfitError::NotAnArray)?;

        let mut catalog = Self::default();
        let mut rejected = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            match Self::parse_entry(index, entry) {
                Ok(outfit) => catalog.insert(outfit),
                Err(err) => {
                    warn!("skipping outfit: {err}");
                    rejected.push(err);
                }
            }
        }

        Ok((catalog, rejected))
    }

    fn parse_entry(index: usize, entry: serde_json::Value) -> Result<WeaponOutfit, OutfitError> {
        let name = entry
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("<unnamed>")
            .to_string();
        let category = entry
            .get("category")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        if WeaponCategory::from_tag(&category).is_none() {
            return Err(OutfitError::UnknownCategory { name, category });
        }

        let outfit: WeaponOutfit = serde_json::from_value(entry)
            .map_err(|source| OutfitError::Malformed { index, source })?;
        outfit.validate()?;
        Ok(outfit)
    }

    pub fn insert(&mut self, outfit: WeaponOutfit) {
        self.outfits.insert(outfit.name.clone(), Arc::new(outfit));
    }

    pub fn get(&self, name: &str) -> Option<Arc<WeaponOutfit>> {
        self.outfits.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }
}
