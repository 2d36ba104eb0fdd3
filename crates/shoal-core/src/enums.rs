//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Prey behavior state. A prey only leaves the machine by being eaten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreyState {
    #[default]
    Wandering,
    Fleeing,
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ticks advance every system.
    #[default]
    Active,
    /// Explicit pause or focus loss. State is kept, nothing advances.
    Paused,
    /// Hunger ran out. Terminal until a restart.
    Over,
}

/// Result of resolving one contact between the player and a prey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// Sizes too close; nothing happens.
    None,
    PreyEaten,
    PlayerDamaged,
}

/// Player stats that timed boosts can scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoostedStat {
    MaxSpeed,
    GrowthRate,
}
