//! Minimal rigid body owned by each weapon.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::Integrator;
use crate::types::normalize_angle;

/// Rigid-body state. Advanced by `salvo_sim::systems::movement::integrate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub mass: f64,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Heading in `[0, 2π)`.
    pub dir: f64,
    /// Angular velocity (rad/s).
    pub dir_vel: f64,
    /// Thrust force along the heading.
    pub thrust: f64,
    /// Speed cap; `None` is uncapped.
    pub speed_max: Option<f64>,
    pub integrator: Integrator,
}

impl Solid {
    pub fn new(mass: f64, dir: f64, pos: DVec2, vel: DVec2) -> Self {
        Self {
            mass,
            pos,
            vel,
            dir: normalize_angle(dir),
            dir_vel: 0.0,
            thrust: 0.0,
            speed_max: None,
            integrator: Integrator::Euler,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}
