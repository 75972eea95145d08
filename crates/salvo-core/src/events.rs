//! Events emitted by the simulation for audio and visual collaborators.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::EffectLayer;
use crate::types::{EffectId, SoundId, TrailHandle, VoiceHandle};

/// A request to an external sink, recorded in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// Impact or death visual.
    Effect {
        effect: EffectId,
        pos: DVec2,
        vel: DVec2,
        layer: EffectLayer,
    },
    /// Positional sound started.
    Sound {
        sound: SoundId,
        voice: VoiceHandle,
        pos: DVec2,
    },
    /// Looping sound stopped.
    SoundStopped { voice: VoiceHandle },
    TrailCreated { trail: TrailHandle, style: String },
    TrailSample { trail: TrailHandle, pos: DVec2 },
    TrailReleased { trail: TrailHandle },
}
