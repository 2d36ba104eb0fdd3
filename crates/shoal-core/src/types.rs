//! Fundamental geometric and simulation types.
//!
//! Vectors are `glam::DVec3` in arena units, y = up.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each active tick).
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

/// Normalize `v`, or return `None` when it is too short to carry a direction.
pub fn try_direction(v: DVec3) -> Option<DVec3> {
    if v.length_squared() > crate::constants::MIN_DIRECTION_LENGTH_SQ {
        Some(v.normalize())
    } else {
        None
    }
}

/// Rotate `current` toward `target` by interpolation factor `t` (clamped to 1).
///
/// Both inputs are expected to be unit vectors; the result is re-normalized.
/// Falls back to `target` when the blend cancels out (opposite vectors).
pub fn turn_toward(current: DVec3, target: DVec3, t: f64) -> DVec3 {
    let blended = current.lerp(target, t.clamp(0.0, 1.0));
    try_direction(blended).unwrap_or(target)
}
