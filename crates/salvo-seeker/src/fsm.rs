//! Seeker status finite state machine.
//!
//! `Locking → Ok ⇄ {Unjammed, Jammed, JammedSlowed}`. Evaluated once per tick
//! per guided munition. Operates on plain data; the only randomness comes
//! from the `Rng` the caller passes in.
//!
//! The jam thresholds are gameplay tuning and are applied literally.

use glam::DVec2;
use rand::Rng;

use salvo_core::constants::*;
use salvo_core::enums::{SeekerAi, WeaponStatus};

use crate::steering;

/// Input to the seeker FSM for a single munition.
pub struct SeekerContext {
    pub status: WeaponStatus,
    /// Remaining lock-on time (seconds).
    pub lock_timer: f64,
    /// Per-munition jitter in `[0, 1)` assigned at launch; scales the jam gate.
    pub jam_roll: f64,
    pub ai: SeekerAi,
    /// Rated turn (rad/s).
    pub turn: f64,
    /// Thrust force applied when powered (acceleration × mass).
    pub thrust_force: f64,
    pub resist: f64,
    pub speed_max: f64,
    pub pos: DVec2,
    pub dir: f64,
    pub target_pos: DVec2,
    pub target_vel: DVec2,
    pub target_jam_chance: f64,
    pub target_evasion: f64,
    pub dt: f64,
}

/// Output from the seeker FSM. `None` fields leave the munition unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct SeekerUpdate {
    pub status: WeaponStatus,
    pub lock_timer: f64,
    /// Speed-cap fraction chosen when the munition is slowed.
    pub jam_slow: Option<f64>,
    pub turn: Option<f64>,
    pub thrust: Option<f64>,
    pub status_changed: bool,
}

impl SeekerUpdate {
    fn unchanged(ctx: &SeekerContext) -> Self {
        Self {
            status: ctx.status,
            lock_timer: ctx.lock_timer,
            jam_slow: None,
            turn: None,
            thrust: None,
            status_changed: false,
        }
    }

    fn with_status(mut self, status: WeaponStatus, from: WeaponStatus) -> Self {
        self.status = status;
        self.status_changed = status != from;
        self
    }
}

/// Evaluate the FSM for one munition.
pub fn evaluate<R: Rng + ?Sized>(ctx: &SeekerContext, rng: &mut R) -> SeekerUpdate {
    match ctx.status {
        WeaponStatus::Locking => evaluate_locking(ctx),
        WeaponStatus::Ok => evaluate_ok(ctx, rng),
        WeaponStatus::Unjammed => steer(ctx, SeekerUpdate::unchanged(ctx)),
        // Whatever was commanded when the jam hit persists.
        WeaponStatus::Jammed | WeaponStatus::JammedSlowed => SeekerUpdate::unchanged(ctx),
    }
}

fn evaluate_locking(ctx: &SeekerContext) -> SeekerUpdate {
    let mut update = SeekerUpdate::unchanged(ctx);
    update.lock_timer = ctx.lock_timer - ctx.dt;
    if update.lock_timer >= 0.0 {
        update.thrust = Some(ctx.thrust_force);
        update
    } else {
        update.with_status(WeaponStatus::Ok, ctx.status)
    }
}

fn evaluate_ok<R: Rng + ?Sized>(ctx: &SeekerContext, rng: &mut R) -> SeekerUpdate {
    let mut update = SeekerUpdate::unchanged(ctx);

    let jam_chance = ctx.target_jam_chance - ctx.resist;
    if jam_chance > 0.0 {
        let distance = ctx.target_pos.distance(ctx.pos);
        if distance < ctx.jam_roll * ctx.target_evasion {
            if rng.gen::<f64>() < jam_chance {
                return jam(ctx, rng);
            }
            update = update.with_status(WeaponStatus::Unjammed, ctx.status);
        }
    }

    steer(ctx, update)
}

fn jam<R: Rng + ?Sized>(ctx: &SeekerContext, rng: &mut R) -> SeekerUpdate {
    let update = SeekerUpdate::unchanged(ctx);
    let roll: f64 = rng.gen();

    if roll < JAM_SLOWED_THRESHOLD {
        let mut update = update.with_status(WeaponStatus::JammedSlowed, ctx.status);
        update.jam_slow = Some(rng.gen::<f64>() * JAM_SLOW_MAX_FRACTION);
        update
    } else if roll < JAM_SPIN_THRESHOLD {
        let mut update = update.with_status(WeaponStatus::Jammed, ctx.status);
        let sign = if rng.gen::<f64>() > 0.5 { -1.0 } else { 1.0 };
        update.turn = Some(ctx.turn * sign);
        update
    } else {
        // Flies straight and accelerates past the target.
        let mut update = update.with_status(WeaponStatus::Jammed, ctx.status);
        update.turn = Some(0.0);
        update.thrust = Some(ctx.thrust_force);
        update
    }
}

fn steer(ctx: &SeekerContext, mut update: SeekerUpdate) -> SeekerUpdate {
    let error = steering::heading_error(
        ctx.ai,
        ctx.pos,
        ctx.dir,
        ctx.target_pos,
        ctx.target_vel,
        ctx.speed_max,
    );
    update.turn = Some(steering::clamp_turn(error, ctx.turn, SEEKER_TURN_GAIN));
    update
}
