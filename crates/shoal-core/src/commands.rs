//! Intents sent by input and UI collaborators to the simulation.
//!
//! Commands are queued and consumed at the start of the next tick.

use serde::{Deserialize, Serialize};

/// All possible collaborator intents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Movement ---
    /// Desired swim direction. A (near) zero vector releases the input.
    Steer { x: f64, y: f64, z: f64 },

    // --- Session control ---
    Pause,
    Resume,
    /// Platform focus lost (honored when `pause_on_focus_loss` is set).
    FocusLost,
    /// Platform focus regained.
    FocusGained,
    /// Throw away the session and start a fresh one.
    Restart,
    /// Stop the host loop.
    Quit,

    // --- Power-ups ---
    /// Multiply max speed for a while.
    SpeedBoost { multiplier: f64, duration_secs: f64 },
    /// Multiply growth rate for a while.
    GrowthBoost { multiplier: f64, duration_secs: f64 },
    /// Restore hunger immediately.
    RestoreHunger { amount: f64 },
}
