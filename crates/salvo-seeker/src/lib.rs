//! Seeker guidance for SALVO guided munitions.
//!
//! Implements the lock-on / jamming state machine and the turn-rate
//! steering law shared by seekers and turret beams.

pub mod fsm;
pub mod steering;

pub use salvo_core as core;
