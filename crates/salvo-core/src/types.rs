//! Fundamental ids, angles, and simulation time.

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Identifier of a pilot (ship) in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PilotId(pub u32);

/// Identifier of a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);

/// Identifier of an asteroid in the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsteroidId(pub u32);

/// Identifier of a live beam. Zero is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeamId(pub u32);

/// Handle to a playing sound voice, owned by the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceHandle(pub u32);

/// Handle to a trail, owned by the visual-effects collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrailHandle(pub u32);

/// Identifier of a sound asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundId(pub u32);

/// Identifier of a visual effect asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u32);

/// Beam mount point in ship-local coordinates.
///
/// `x`/`y` rotate with the ship heading; `h` is a screen-space height offset
/// added after rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Mount {
    pub x: f64,
    pub y: f64,
    pub h: f64,
}

impl Mount {
    pub fn new(x: f64, y: f64, h: f64) -> Self {
        Self { x, y, h }
    }

    /// World-space offset of this mount for a ship facing `dir`.
    pub fn offset(&self, dir: f64) -> DVec2 {
        let (sm, cm) = dir.sin_cos();
        DVec2::new(self.x * cm - self.y * sm, self.x * sm + self.y * cm + self.h)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks run so far.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-π, π]`.
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// Heading of a vector in radians (0 = +x, counter-clockwise).
pub fn heading_of(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Unit vector for a heading.
pub fn unit(dir: f64) -> DVec2 {
    let (s, c) = dir.sin_cos();
    DVec2::new(c, s)
}
