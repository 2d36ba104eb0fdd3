//! ECS components for prey entities.
//!
//! Components are plain data structs with no game logic.
//! Behavior lives in the prey FSM and the systems.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::config::PreyArchetype;
use crate::enums::PreyState;

/// Marks an entity as a prey agent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Prey;

/// World-space position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec3);

/// Where the agent is swimming and where it is pointing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Unit move direction chosen by the FSM.
    pub direction: DVec3,
    /// Unit facing, eased toward `direction` each tick.
    pub facing: DVec3,
}

/// Fixed per-prey body and behavior parameters, copied from its archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreyTraits {
    pub species: String,
    pub size: f64,
    pub nutritional_value: f64,
    pub move_speed: f64,
    pub flee_speed: f64,
    pub detection_range: f64,
    pub flee_distance: f64,
    pub wander_radius: f64,
    pub change_direction_secs: f64,
}

impl From<&PreyArchetype> for PreyTraits {
    fn from(archetype: &PreyArchetype) -> Self {
        Self {
            species: archetype.name.clone(),
            size: archetype.size,
            nutritional_value: archetype.nutritional_value,
            move_speed: archetype.move_speed,
            flee_speed: archetype.flee_speed,
            detection_range: archetype.detection_range,
            flee_distance: archetype.flee_distance,
            wander_radius: archetype.wander_radius,
            change_direction_secs: archetype.change_direction_secs,
        }
    }
}

/// Mutable AI state of a prey.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreyBrain {
    pub state: PreyState,
    /// Spawn point; wandering is biased to stay near it.
    pub wander_center: DVec3,
    /// Simulation time (seconds) of the last wander heading change.
    pub last_direction_change: f64,
}

/// Whether the prey overlapped the player on the previous tick.
/// Contacts only resolve on the transition from apart to touching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactState {
    pub touching: bool,
}
