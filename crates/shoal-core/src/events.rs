//! Notifications published by the simulation for presentation collaborators.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A state change, delivered to subscribers in the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    ScoreChanged { score: u32 },
    HungerChanged { hunger: f64 },
    SizeChanged { size: f64 },
    FishEaten { count: u32 },
    GameTimeChanged { seconds: f64 },
    GameStarted,
    GamePaused,
    GameResumed,
    GameOver { score: u32, seconds: f64 },
    /// A prey was eaten at `position` (for particles and sound).
    PreyConsumed { prey_id: u64, position: DVec3 },
    /// A larger prey bit the player.
    PlayerDamaged { amount: f64 },
}
