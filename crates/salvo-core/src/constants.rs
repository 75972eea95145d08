//! Simulation constants and tuning parameters.

/// Nominal simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the nominal rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Accuracy ---

/// Worst-case angular spread of an overheated weapon (radians, 10°).
pub const HEAT_WORST_ACCURACY: f64 = 10.0 * std::f64::consts::PI / 180.0;

/// Weapon temperature (K) at which accuracy starts to degrade.
pub const HEAT_ACCURACY_START: f64 = 500.0;

/// Temperature span (K) over which accuracy degrades to the worst case.
pub const HEAT_ACCURACY_SPAN: f64 = 600.0;

/// Truncation of the accuracy jitter distribution, in standard deviations.
pub const ACCURACY_SIGMA_LIMIT: f64 = 2.0;

// --- Seeker ---

/// Proportional gain on heading error for seeker turn commands.
pub const SEEKER_TURN_GAIN: f64 = 10.0;

/// Jam roll below this value slows the munition.
pub const JAM_SLOWED_THRESHOLD: f64 = 0.4;

/// Jam roll below this value (and above the slowed band) sends it spinning.
pub const JAM_SPIN_THRESHOLD: f64 = 0.7;

/// Upper bound (exclusive) of the random speed-cap fraction when slowed.
pub const JAM_SLOW_MAX_FRACTION: f64 = 0.5;

// --- Beams ---

/// Proportional gain on heading error for turret beam turn commands.
pub const BEAM_TURN_GAIN: f64 = 10.0;

/// Minimum interval between beam impact visuals and AI notifications (seconds).
pub const BEAM_EFFECT_INTERVAL: f64 = 0.1;

/// Timer value that forces a beam to expire at the next check.
pub const BEAM_EXPIRED: f64 = -1.0;

// --- Tracking ---

/// Lead fraction lost per unit of evasion beyond the tracking limit.
pub const TRACK_FALLOFF_SLOPE: f64 = 0.5;

// --- AI notification ---

/// Fraction of max health the player must deal before a pilot turns hostile.
pub const PILOT_HOSTILE_THRESHOLD: f64 = 0.09;

// --- Physics ---

/// Mass assigned to bolts and beams, which have no physical mass.
pub const UNIT_MASS: f64 = 1.0;
