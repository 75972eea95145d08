//! In-flight weapon records.
//!
//! A `Weapon` is the single hecs component the engine spawns per shot. It
//! owns its `Solid`, shares its `WeaponOutfit`, and carries exactly one
//! category-specific state block.

use std::sync::Arc;

use salvo_core::enums::{WeaponCategory, WeaponLayer, WeaponStatus};
use salvo_core::outfit::WeaponOutfit;
use salvo_core::solid::Solid;
use salvo_core::types::{BeamId, FactionId, Mount, PilotId, TrailHandle, VoiceHandle};

/// Guidance state of a locked-on munition.
#[derive(Debug, Clone, PartialEq)]
pub struct Seeker {
    pub status: WeaponStatus,
    pub lock_timer: f64,
    /// Per-munition jitter in `[0, 1)` drawn at launch.
    pub jam_roll: f64,
    /// Speed-cap fraction while `JammedSlowed`.
    pub jam_slow: f64,
}

/// Beam-only state.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamState {
    pub id: BeamId,
    pub mount: Mount,
    /// Impact visuals and AI notifications wait until this reaches zero.
    pub effect_timer: f64,
    /// Seconds since the beam started.
    pub elapsed: f64,
    /// Whether the beam struck anything on the last tick.
    pub striking: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeaponState {
    Bolt {
        /// Remaining life below which damage decays linearly.
        falloff: f64,
        strength: f64,
    },
    Ammo {
        /// `None` for unguided munitions and self-targeted launches.
        seeker: Option<Seeker>,
        /// Speed along the heading, shaped by the seeker each tick.
        real_speed: f64,
    },
    Beam(BeamState),
}

/// Sprite-sheet cell for the current heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteFrame {
    pub col: u32,
    pub row: u32,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub outfit: Arc<WeaponOutfit>,
    pub solid: Solid,
    pub faction: FactionId,
    pub owner: PilotId,
    /// Equal to `owner` when nothing is targeted.
    pub target: PilotId,
    pub layer: WeaponLayer,
    pub damage_mod: f64,
    /// Fraction of damage converted to disable, in `[0, 1]`.
    pub dam_as_dis: f64,
    /// Remaining life (seconds).
    pub timer: f64,
    pub state: WeaponState,
    pub sprite: SpriteFrame,
    pub spin: f64,
    pub voice: Option<VoiceHandle>,
    pub trail: Option<TrailHandle>,
    destroyed: bool,
}

impl Weapon {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        outfit: Arc<WeaponOutfit>,
        solid: Solid,
        faction: FactionId,
        owner: PilotId,
        target: PilotId,
        layer: WeaponLayer,
        timer: f64,
        state: WeaponState,
    ) -> Self {
        Self {
            outfit,
            solid,
            faction,
            owner,
            target,
            layer,
            damage_mod: 1.0,
            dam_as_dis: 0.0,
            timer,
            state,
            sprite: SpriteFrame::default(),
            spin: 0.0,
            voice: None,
            trail: None,
            destroyed: false,
        }
    }

    pub fn category(&self) -> WeaponCategory {
        self.outfit.category()
    }

    pub fn has_target(&self) -> bool {
        self.target != self.owner
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark for removal at the end of the tick. Idempotent.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Damage multiplier from range falloff; 1 for everything but bolts.
    pub fn strength(&self) -> f64 {
        match self.state {
            WeaponState::Bolt { strength, .. } => strength,
            _ => 1.0,
        }
    }

    pub fn seeker(&self) -> Option<&Seeker> {
        match &self.state {
            WeaponState::Ammo { seeker, .. } => seeker.as_ref(),
            _ => None,
        }
    }

    /// Seeker status, if this is a locked-on munition.
    pub fn status(&self) -> Option<WeaponStatus> {
        self.seeker().map(|s| s.status)
    }

    /// Guided toward its target and not jammed.
    pub fn is_homing(&self) -> bool {
        self.has_target() && self.status().is_some_and(|s| !s.is_jammed())
    }

    pub fn beam(&self) -> Option<&BeamState> {
        match &self.state {
            WeaponState::Beam(beam) => Some(beam),
            _ => None,
        }
    }

    pub fn beam_id(&self) -> Option<BeamId> {
        self.beam().map(|b| b.id)
    }
}
