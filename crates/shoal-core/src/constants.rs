//! Simulation constants and tuning defaults.
//!
//! Everything here is a default; the live values are carried by
//! [`crate::config::SimConfig`].

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Vectors shorter than 0.1 carry no usable direction.
pub const MIN_DIRECTION_LENGTH_SQ: f64 = 0.01;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

// --- Arena ---

/// Half-size of the default arena (100 x 50 x 100 volume).
pub const ARENA_HALF_EXTENTS: [f64; 3] = [50.0, 25.0, 50.0];

/// Fraction of the distance back to center recovered per second while outside.
pub const CONTAINMENT_SPRING_RATE: f64 = 0.25;

// --- Population ---

/// Hard cap on live prey.
pub const MAX_PREY_COUNT: u32 = 20;

/// Seconds between scheduled spawns.
pub const SPAWN_INTERVAL_SECS: f64 = 2.0;

/// Radius used to derive the no-spawn zone around the player.
pub const SPAWN_RADIUS: f64 = 50.0;

/// Spawns closer to the player than `SPAWN_RADIUS * SPAWN_EXCLUSION_FACTOR` are rejected.
pub const SPAWN_EXCLUSION_FACTOR: f64 = 0.3;

/// Candidate positions drawn before the placement falls back to the last one.
pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 10;

/// Upper bound on the session-start burst.
pub const INITIAL_BURST_MAX: u32 = 10;

// --- Player ---

pub const PLAYER_BASE_SIZE: f64 = 1.0;
pub const PLAYER_MAX_SIZE: f64 = 5.0;
pub const PLAYER_GROWTH_RATE: f64 = 0.1;

/// Size margin needed to eat (or be hurt by) another agent.
pub const CONSUMPTION_RATIO: f64 = 0.8;

pub const MAX_HUNGER: f64 = 100.0;

/// Hunger lost per second.
pub const HUNGER_DECAY_RATE: f64 = 5.0;

/// Hunger restored per unit of nutritional value.
pub const FEEDING_AMOUNT: f64 = 20.0;

pub const PLAYER_MAX_SPEED: f64 = 15.0;
pub const PLAYER_ACCELERATION: f64 = 2.0;
pub const PLAYER_DECELERATION: f64 = 1.0;
pub const PLAYER_ROTATION_SPEED: f64 = 5.0;

/// Contact radius of the player at base size; scales with size / base size.
pub const PLAYER_CONTACT_RADIUS: f64 = 1.0;

// --- Consumption ---

/// Flat score per prey eaten.
pub const SCORE_PER_PREY: u32 = 10;

/// Bonus score per unit of prey size.
pub const SCORE_PER_PREY_SIZE: f64 = 5.0;

/// Hunger lost per unit of prey size when bitten by a larger prey.
pub const DAMAGE_PER_PREY_SIZE: f64 = 10.0;

// --- Prey ---

pub const PREY_SIZE: f64 = 0.5;
pub const PREY_NUTRITIONAL_VALUE: f64 = 1.0;
pub const PREY_MOVE_SPEED: f64 = 3.0;
pub const PREY_FLEE_SPEED: f64 = 6.0;
pub const PREY_DETECTION_RANGE: f64 = 8.0;
pub const PREY_FLEE_DISTANCE: f64 = 12.0;
pub const PREY_WANDER_RADIUS: f64 = 5.0;
pub const PREY_CHANGE_DIRECTION_SECS: f64 = 3.0;

/// Magnitude of the random offset added to a flee heading.
pub const FLEE_JITTER: f64 = 0.3;

/// Vertical component of a wander heading is scaled by this.
pub const WANDER_VERTICAL_DAMPING: f64 = 0.5;

/// Weight of the pull back toward the wander center once outside the wander radius.
pub const WANDER_RETURN_BIAS: f64 = 0.5;

/// Interpolation rate (per second) of a prey's facing toward its heading.
pub const PREY_TURN_RATE: f64 = 3.0;

/// Prey contact radius as a fraction of its size.
pub const PREY_CONTACT_RADIUS_FACTOR: f64 = 0.5;
