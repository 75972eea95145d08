//! Interfaces the host game implements for the weapon engine.
//!
//! `Battlespace` exposes pilots, asteroids and their damage models;
//! `EffectSink` receives audio/visual requests. `EventLog` is a recording
//! sink that turns every request into a `CombatEvent`.

use glam::DVec2;

use salvo_core::components::{Asteroid, Damage, Pilot};
use salvo_core::enums::EffectLayer;
use salvo_core::events::CombatEvent;
use salvo_core::outfit::TrailSpec;
use salvo_core::solid::Solid;
use salvo_core::types::{
    AsteroidId, EffectId, FactionId, PilotId, SoundId, TrailHandle, VoiceHandle,
};

/// Pilots, asteroids, and the damage entry points weapons call into.
pub trait Battlespace {
    /// The player's pilot, if one is in play.
    fn player(&self) -> Option<PilotId>;

    /// All pilots in update order.
    fn pilot_ids(&self) -> Vec<PilotId>;

    fn pilot(&self, id: PilotId) -> Option<&Pilot>;

    fn pilot_mut(&mut self, id: PilotId) -> Option<&mut Pilot>;

    fn are_enemies(&self, a: FactionId, b: FactionId) -> bool;

    /// Apply damage and return what was actually dealt after mitigation.
    /// Called at most once per resolved hit.
    fn damage_pilot(
        &mut self,
        victim: PilotId,
        source: &Solid,
        attacker: PilotId,
        damage: &Damage,
    ) -> f64;

    /// Tell the victim's AI it was attacked. Fire-and-forget.
    fn notify_attacked(&mut self, victim: PilotId, attacker: PilotId, damage: f64);

    /// All asteroids in update order.
    fn asteroid_ids(&self) -> Vec<AsteroidId>;

    fn asteroid(&self, id: AsteroidId) -> Option<&Asteroid>;

    /// Reduce asteroid armour and return what remains.
    fn damage_asteroid(&mut self, id: AsteroidId, damage: &Damage) -> f64;

    fn break_up_asteroid(&mut self, id: AsteroidId);
}

/// Audio and visual sinks.
pub trait EffectSink {
    fn spawn_effect(&mut self, effect: EffectId, pos: DVec2, vel: DVec2, layer: EffectLayer);

    fn play_sound(&mut self, sound: SoundId, pos: DVec2, vel: DVec2) -> Option<VoiceHandle>;

    fn stop_sound(&mut self, voice: VoiceHandle);

    fn trail_create(&mut self, spec: &TrailSpec) -> TrailHandle;

    fn trail_sample(&mut self, trail: TrailHandle, pos: DVec2);

    fn trail_release(&mut self, trail: TrailHandle);
}

/// Recording `EffectSink`: every request becomes a `CombatEvent`.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
    next_voice: u32,
    next_trail: u32,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Hand the recorded events to the caller, leaving the log empty.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EffectSink for EventLog {
    fn spawn_effect(&mut self, effect: EffectId, pos: DVec2, vel: DVec2, layer: EffectLayer) {
        self.events.push(CombatEvent::Effect {
            effect,
            pos,
            vel,
            layer,
        });
    }

    fn play_sound(&mut self, sound: SoundId, pos: DVec2, _vel: DVec2) -> Option<VoiceHandle> {
        self.next_voice += 1;
        let voice = VoiceHandle(self.next_voice);
        self.events.push(CombatEvent::Sound { sound, voice, pos });
        Some(voice)
    }

    fn stop_sound(&mut self, voice: VoiceHandle) {
        self.events.push(CombatEvent::SoundStopped { voice });
    }

    fn trail_create(&mut self, spec: &TrailSpec) -> TrailHandle {
        self.next_trail += 1;
        let trail = TrailHandle(self.next_trail);
        self.events.push(CombatEvent::TrailCreated {
            trail,
            style: spec.style.clone(),
        });
        trail
    }

    fn trail_sample(&mut self, trail: TrailHandle, pos: DVec2) {
        self.events.push(CombatEvent::TrailSample { trail, pos });
    }

    fn trail_release(&mut self, trail: TrailHandle) {
        self.events.push(CombatEvent::TrailReleased { trail });
    }
}
