//! The player agent: steering kinematics and the clamped size/hunger vitals.

use glam::DVec3;

use shoal_core::config::PlayerConfig;
use shoal_core::enums::BoostedStat;
use shoal_core::types::{try_direction, turn_toward};

use shoal_prey_ai::fsm::can_consume;

/// Below this speed the player is treated as stationary.
const MIN_MOVING_SPEED: f64 = 0.1;

/// The single predator of a session.
///
/// `size` and `hunger` are private: every write goes through a clamp into
/// `[base_size, max_size]` and `[0, max_hunger]`.
#[derive(Debug, Clone)]
pub struct PlayerAgent {
    pub position: DVec3,
    pub facing: DVec3,
    pub speed: f64,

    size: f64,
    hunger: f64,
    fish_eaten: u32,

    base_size: f64,
    max_size: f64,
    max_hunger: f64,

    pub growth_rate: f64,
    pub feeding_amount: f64,
    pub consumption_ratio: f64,
    pub hunger_decay_rate: f64,

    pub max_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
    pub rotation_speed: f64,
    pub contact_radius: f64,

    /// Latest steering input, `None` when released.
    input: Option<DVec3>,
    /// Direction of travel; kept after the input is released so the player coasts.
    travel_direction: DVec3,
}

impl PlayerAgent {
    /// Fresh player at base size and full hunger.
    pub fn new(config: &PlayerConfig) -> Self {
        let base_size = config.base_size;
        let max_size = config.max_size.max(base_size);
        Self {
            position: config.start_position,
            facing: DVec3::Z,
            speed: 0.0,
            size: base_size,
            hunger: config.max_hunger,
            fish_eaten: 0,
            base_size,
            max_size,
            max_hunger: config.max_hunger,
            growth_rate: config.growth_rate,
            feeding_amount: config.feeding_amount,
            consumption_ratio: config.consumption_ratio,
            hunger_decay_rate: config.hunger_decay_rate,
            max_speed: config.max_speed,
            acceleration: config.acceleration,
            deceleration: config.deceleration,
            rotation_speed: config.rotation_speed,
            contact_radius: config.contact_radius,
            input: None,
            travel_direction: DVec3::Z,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn hunger(&self) -> f64 {
        self.hunger
    }

    pub fn base_size(&self) -> f64 {
        self.base_size
    }

    pub fn max_size(&self) -> f64 {
        self.max_size
    }

    pub fn max_hunger(&self) -> f64 {
        self.max_hunger
    }

    pub fn fish_eaten(&self) -> u32 {
        self.fish_eaten
    }

    /// Hunger as a fraction of the maximum, for gauges.
    pub fn hunger_fraction(&self) -> f64 {
        self.hunger / self.max_hunger
    }

    /// Render scale relative to base size.
    pub fn scale(&self) -> f64 {
        self.size / self.base_size
    }

    pub fn is_starved(&self) -> bool {
        self.hunger <= 0.0
    }

    /// Whether the player is big enough to eat a prey of `prey_size`.
    pub fn can_consume(&self, prey_size: f64) -> bool {
        can_consume(self.size, prey_size, self.consumption_ratio)
    }

    /// Contact radius at the current size.
    pub fn contact_reach(&self) -> f64 {
        self.contact_radius * self.scale()
    }

    /// Set size, clamped to `[base_size, max_size]`. Returns the stored value.
    pub fn set_size(&mut self, size: f64) -> f64 {
        self.size = size.clamp(self.base_size, self.max_size);
        self.size
    }

    /// Set hunger, clamped to `[0, max_hunger]`. Returns the stored value.
    pub fn set_hunger(&mut self, hunger: f64) -> f64 {
        self.hunger = hunger.clamp(0.0, self.max_hunger);
        self.hunger
    }

    pub fn add_hunger(&mut self, delta: f64) -> f64 {
        self.set_hunger(self.hunger + delta)
    }

    pub(crate) fn record_meal(&mut self) -> u32 {
        self.fish_eaten += 1;
        self.fish_eaten
    }

    /// Current value of a boostable stat.
    pub fn stat(&self, stat: BoostedStat) -> f64 {
        match stat {
            BoostedStat::MaxSpeed => self.max_speed,
            BoostedStat::GrowthRate => self.growth_rate,
        }
    }

    pub fn set_stat(&mut self, stat: BoostedStat, value: f64) {
        match stat {
            BoostedStat::MaxSpeed => {
                self.max_speed = value;
                self.speed = self.speed.min(value);
            }
            BoostedStat::GrowthRate => self.growth_rate = value,
        }
    }

    /// Record a steering input. Vectors too short to carry a direction
    /// release the input.
    pub fn steer(&mut self, direction: DVec3) {
        self.input = try_direction(direction);
    }

    /// Advance speed, facing and position by `dt`.
    ///
    /// While an input is held the player accelerates toward `max_speed`
    /// along it; once released it decelerates along the last direction.
    pub fn integrate(&mut self, dt: f64) {
        match self.input {
            Some(direction) => {
                self.travel_direction = direction;
                self.speed = (self.speed + self.acceleration * dt).min(self.max_speed);
            }
            None => {
                self.speed = (self.speed - self.deceleration * dt).max(0.0);
            }
        }

        if self.speed > MIN_MOVING_SPEED {
            self.position += self.travel_direction * self.speed * dt;
            self.facing = turn_toward(self.facing, self.travel_direction, self.rotation_speed * dt);
        }
    }
}
