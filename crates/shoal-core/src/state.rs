//! Simulation snapshot: the complete visible state published after each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::{PreyState, SessionPhase};
use crate::events::SimEvent;
use crate::types::SimTime;

/// Everything a renderer or HUD needs for one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub score: ScoreView,
    pub player: PlayerView,
    pub prey: Vec<PreyView>,
    /// Events raised during this tick, in emission order.
    pub events: Vec<SimEvent>,
}

/// Player transform and vitals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: DVec3,
    pub facing: DVec3,
    pub speed: f64,
    pub size: f64,
    /// Render scale relative to base size.
    pub scale: f64,
    pub hunger: f64,
    pub max_hunger: f64,
}

/// One live prey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreyView {
    pub id: u64,
    pub species: String,
    pub position: DVec3,
    pub facing: DVec3,
    pub size: f64,
    pub state: PreyState,
}

/// Running score for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub fish_eaten: u32,
    pub elapsed_secs: f64,
    pub live_prey: u32,
}
