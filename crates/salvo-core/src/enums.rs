//! Enumeration types used throughout the simulation.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Weapon category, the discriminant of an outfit's class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Bolt,
    TurretBolt,
    GuidedAmmo,
    Beam,
    TurretBeam,
}

impl WeaponCategory {
    /// Catalog tag for this category.
    pub fn tag(self) -> &'static str {
        match self {
            WeaponCategory::Bolt => "bolt",
            WeaponCategory::TurretBolt => "turret_bolt",
            WeaponCategory::GuidedAmmo => "guided_ammo",
            WeaponCategory::Beam => "beam",
            WeaponCategory::TurretBeam => "turret_beam",
        }
    }

    /// Parse a catalog tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "bolt" => Some(WeaponCategory::Bolt),
            "turret_bolt" => Some(WeaponCategory::TurretBolt),
            "guided_ammo" => Some(WeaponCategory::GuidedAmmo),
            "beam" => Some(WeaponCategory::Beam),
            "turret_beam" => Some(WeaponCategory::TurretBeam),
            _ => None,
        }
    }

    pub fn is_beam(self) -> bool {
        matches!(self, WeaponCategory::Beam | WeaponCategory::TurretBeam)
    }

    pub fn is_bolt(self) -> bool {
        matches!(self, WeaponCategory::Bolt | WeaponCategory::TurretBolt)
    }
}

/// Seeker guidance law of a guided munition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekerAi {
    /// Flies straight; never locks.
    #[default]
    Unguided,
    /// Pure pursuit of the target's current position.
    Dumb,
    /// Lead pursuit using closing time and target velocity.
    Smart,
}

/// Seeker status of a guided munition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponStatus {
    /// Acquiring lock; cannot be jammed.
    Locking,
    /// Locked; rolls for jamming every tick.
    Ok,
    /// Survived a jam roll; steers without further rolls.
    Unjammed,
    /// Jammed with a fixed turn/thrust command.
    Jammed,
    /// Jammed with a reduced speed cap.
    JammedSlowed,
}

impl WeaponStatus {
    /// Whether the seeker is flying wild for the rest of its life.
    pub fn is_jammed(self) -> bool {
        matches!(self, WeaponStatus::Jammed | WeaponStatus::JammedSlowed)
    }
}

/// The two ordered weapon collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponLayer {
    /// Weapons fired by anyone other than the player.
    Background,
    /// Weapons fired by the player.
    Foreground,
}

/// Draw layer for a spawned visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectLayer {
    Back,
    Middle,
    Front,
}

/// Damage type, consumed by the pilot damage model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    #[default]
    Energy,
    Kinetic,
    Ion,
    Radiation,
    Emp,
}

/// Visibility state of an asteroid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidState {
    /// Fading in; not collidable.
    Appearing,
    #[default]
    Visible,
    /// Breaking up; beams still strike it.
    Exploding,
}

/// Numerical integrator used to advance a `Solid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Integrator {
    #[default]
    Euler,
    Rk4,
}

/// Bitmask of weapon categories affected by an area explosion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplosionMask(pub u8);

impl ExplosionMask {
    pub const NONE: ExplosionMask = ExplosionMask(0);
    /// Bolts and turret bolts.
    pub const BOLT: ExplosionMask = ExplosionMask(0b01);
    /// Guided ammo.
    pub const AMMO: ExplosionMask = ExplosionMask(0b10);
    pub const ALL: ExplosionMask = ExplosionMask(0b11);

    pub fn contains(self, other: ExplosionMask) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Whether weapons of `category` are affected. Beams never are.
    pub fn affects(self, category: WeaponCategory) -> bool {
        match category {
            WeaponCategory::Bolt | WeaponCategory::TurretBolt => self.contains(Self::BOLT),
            WeaponCategory::GuidedAmmo => self.contains(Self::AMMO),
            WeaponCategory::Beam | WeaponCategory::TurretBeam => false,
        }
    }
}

impl BitOr for ExplosionMask {
    type Output = ExplosionMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ExplosionMask(self.0 | rhs.0)
    }
}
