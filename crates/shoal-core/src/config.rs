//! Simulation configuration.
//!
//! Every field has a default taken from [`crate::constants`], so a partial
//! JSON document is a valid config.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::SimError;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f64,
    /// Whether focus-lost / focus-gained signals pause and resume the session.
    pub pause_on_focus_loss: bool,
    pub arena: ArenaConfig,
    pub spawn: SpawnConfig,
    pub player: PlayerConfig,
    /// Prey species the spawner picks from. An empty set disables spawning.
    pub archetypes: Vec<PreyArchetype>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            dt: DT,
            pause_on_focus_loss: true,
            arena: ArenaConfig::default(),
            spawn: SpawnConfig::default(),
            player: PlayerConfig::default(),
            archetypes: default_archetypes(),
        }
    }
}

/// Playable volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub center: DVec3,
    pub half_extents: DVec3,
    pub spring_rate: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            half_extents: DVec3::from_array(ARENA_HALF_EXTENTS),
            spring_rate: CONTAINMENT_SPRING_RATE,
        }
    }
}

/// Spawner tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub max_prey_count: u32,
    pub interval_secs: f64,
    pub radius: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_prey_count: MAX_PREY_COUNT,
            interval_secs: SPAWN_INTERVAL_SECS,
            radius: SPAWN_RADIUS,
        }
    }
}

/// Player agent tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_size: f64,
    pub max_size: f64,
    pub growth_rate: f64,
    pub consumption_ratio: f64,
    pub max_hunger: f64,
    pub hunger_decay_rate: f64,
    pub feeding_amount: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub rotation_speed: f64,
    pub contact_radius: f64,
    /// Where the player starts; defaults to the arena origin.
    pub start_position: DVec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_size: PLAYER_BASE_SIZE,
            max_size: PLAYER_MAX_SIZE,
            growth_rate: PLAYER_GROWTH_RATE,
            consumption_ratio: CONSUMPTION_RATIO,
            max_hunger: MAX_HUNGER,
            hunger_decay_rate: HUNGER_DECAY_RATE,
            feeding_amount: FEEDING_AMOUNT,
            max_speed: PLAYER_MAX_SPEED,
            acceleration: PLAYER_ACCELERATION,
            deceleration: PLAYER_DECELERATION,
            rotation_speed: PLAYER_ROTATION_SPEED,
            contact_radius: PLAYER_CONTACT_RADIUS,
            start_position: DVec3::ZERO,
        }
    }
}

/// A prey species: body, nutrition and behavior ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreyArchetype {
    pub name: String,
    pub size: f64,
    pub nutritional_value: f64,
    pub move_speed: f64,
    pub flee_speed: f64,
    pub detection_range: f64,
    pub flee_distance: f64,
    pub wander_radius: f64,
    pub change_direction_secs: f64,
}

impl Default for PreyArchetype {
    fn default() -> Self {
        Self {
            name: "mackerel".into(),
            size: PREY_SIZE,
            nutritional_value: PREY_NUTRITIONAL_VALUE,
            move_speed: PREY_MOVE_SPEED,
            flee_speed: PREY_FLEE_SPEED,
            detection_range: PREY_DETECTION_RANGE,
            flee_distance: PREY_FLEE_DISTANCE,
            wander_radius: PREY_WANDER_RADIUS,
            change_direction_secs: PREY_CHANGE_DIRECTION_SECS,
        }
    }
}

/// The default species mix: two edible from the start, one that needs
/// some growth, and one that bites back until the player is much larger.
pub fn default_archetypes() -> Vec<PreyArchetype> {
    vec![
        PreyArchetype {
            name: "sardine".into(),
            size: 0.3,
            nutritional_value: 0.5,
            move_speed: 3.5,
            flee_speed: 7.0,
            ..Default::default()
        },
        PreyArchetype::default(),
        PreyArchetype {
            name: "snapper".into(),
            size: 1.0,
            nutritional_value: 1.5,
            move_speed: 2.5,
            flee_speed: 5.5,
            detection_range: 10.0,
            flee_distance: 14.0,
            ..Default::default()
        },
        PreyArchetype {
            name: "grouper".into(),
            size: 2.0,
            nutritional_value: 3.0,
            move_speed: 2.0,
            flee_speed: 4.0,
            detection_range: 6.0,
            flee_distance: 10.0,
            wander_radius: 8.0,
            change_direction_secs: 4.0,
        },
    ]
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no tick could run with.
    ///
    /// An empty archetype set is allowed here: the spawner reports it per
    /// attempt instead.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));

        if self.dt.is_nan() || self.dt <= 0.0 {
            return invalid(format!("dt must be positive, got {}", self.dt));
        }
        let arena = &self.arena;
        if arena.half_extents.min_element() < 0.0 {
            return invalid(format!(
                "arena half_extents must be non-negative, got {}",
                arena.half_extents
            ));
        }
        // Spawn sampling needs a finite span on every axis.
        let span = (arena.center + arena.half_extents) - (arena.center - arena.half_extents);
        if !arena.center.is_finite() || !span.is_finite() {
            return invalid(format!(
                "arena center {} with half_extents {} is not a finite volume",
                arena.center, arena.half_extents
            ));
        }
        if !arena.spring_rate.is_finite() || arena.spring_rate < 0.0 {
            return invalid("arena spring_rate must be finite and non-negative".into());
        }
        let spawn = &self.spawn;
        if !(spawn.interval_secs.is_finite() && spawn.radius.is_finite())
            || spawn.interval_secs < 0.0
            || spawn.radius < 0.0
        {
            return invalid("spawn interval and radius must be finite and non-negative".into());
        }

        let p = &self.player;
        if p.base_size.is_nan() || p.base_size <= 0.0 || p.max_size < p.base_size {
            return invalid(format!(
                "player size range [{}, {}] is empty",
                p.base_size, p.max_size
            ));
        }
        if p.max_hunger.is_nan() || p.max_hunger <= 0.0 {
            return invalid("player max_hunger must be positive".into());
        }
        if p.consumption_ratio < 0.0 || p.hunger_decay_rate < 0.0 || p.growth_rate < 0.0 {
            return invalid("player ratios and rates must be non-negative".into());
        }
        if !p.start_position.is_finite() {
            return invalid(format!(
                "player start_position {} is not finite",
                p.start_position
            ));
        }

        for archetype in &self.archetypes {
            if archetype.size.is_nan() || archetype.size <= 0.0 {
                return invalid(format!("prey '{}' must have a positive size", archetype.name));
            }
            if archetype.flee_speed < archetype.move_speed {
                return invalid(format!(
                    "prey '{}' flee_speed {} is slower than move_speed {}",
                    archetype.name, archetype.flee_speed, archetype.move_speed
                ));
            }
            if archetype.change_direction_secs < 0.0 {
                return invalid(format!(
                    "prey '{}' change_direction_secs must be non-negative",
                    archetype.name
                ));
            }
        }
        Ok(())
    }
}
