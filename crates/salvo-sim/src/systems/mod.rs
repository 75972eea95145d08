//! Per-tick systems over a weapon layer.
//!
//! Systems are free functions that take the weapon arena and the ordered
//! entity list of one layer. They hold no state of their own; everything
//! lives in the `Weapon` component or the host collaborators.

pub mod cleanup;
pub mod collision;
pub mod explosion;
pub mod hit;
pub mod movement;
pub mod sprite;
pub mod think;
pub mod timers;
