//! Weapon simulation and combat resolution.
//!
//! Owns every bolt, guided munition and beam in flight, advances them at a
//! fixed tick, resolves hits against the host's pilots and asteroids, and
//! reports audio/visual requests through the host's effect sink.

pub mod engine;
pub mod factory;
pub mod geometry;
pub mod guidance;
pub mod host;
pub mod systems;
pub mod theatre;
pub mod weapon;

pub use engine::{CombatEngine, SimConfig};
pub use salvo_core as core;
