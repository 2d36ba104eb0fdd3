//! Prey behavior finite state machine.
//!
//! Pure functions that compute state transitions and headings for one prey
//! from its situation. No ECS dependency: operates on plain data, with the
//! random source passed in so seeded runs stay deterministic.

use glam::DVec3;
use rand::Rng;

use shoal_core::components::PreyTraits;
use shoal_core::enums::PreyState;

use crate::steering::{flee_heading, wander_heading};

/// What a prey can sense about the player this tick.
#[derive(Debug, Clone, Copy)]
pub struct PredatorSense {
    pub position: DVec3,
    /// Whether the player is currently large enough to eat this prey.
    pub can_consume: bool,
}

/// Input to the prey FSM for a single entity.
pub struct PreyContext<'a> {
    pub state: PreyState,
    pub position: DVec3,
    pub direction: DVec3,
    pub wander_center: DVec3,
    pub traits: &'a PreyTraits,
    /// `None` when no player is available; detection is skipped.
    pub predator: Option<PredatorSense>,
    pub secs_since_direction_change: f64,
}

/// Output from the prey FSM.
#[derive(Debug, Clone, Copy)]
pub struct PreyUpdate {
    pub new_state: PreyState,
    pub new_direction: DVec3,
    pub state_changed: bool,
    /// A wander heading was picked; the caller resets its direction timer.
    pub wander_reset: bool,
}

/// `eater` can eat `eaten` when it is larger by the full consumption margin.
pub fn can_consume(eater_size: f64, eaten_size: f64, consumption_ratio: f64) -> bool {
    eater_size >= eaten_size * (1.0 + consumption_ratio)
}

/// State transition for a prey at `distance` from the player.
pub fn next_state(
    state: PreyState,
    distance: f64,
    can_consume: bool,
    traits: &PreyTraits,
) -> PreyState {
    match state {
        PreyState::Wandering => {
            if distance <= traits.detection_range && can_consume {
                PreyState::Fleeing
            } else {
                PreyState::Wandering
            }
        }
        PreyState::Fleeing => {
            if distance > traits.flee_distance || distance > traits.detection_range {
                PreyState::Wandering
            } else {
                PreyState::Fleeing
            }
        }
    }
}

/// Movement speed for a state.
pub fn speed_for(state: PreyState, traits: &PreyTraits) -> f64 {
    match state {
        PreyState::Wandering => traits.move_speed,
        PreyState::Fleeing => traits.flee_speed,
    }
}

/// Evaluate the FSM for one prey. Returns the updated state and heading.
pub fn evaluate<R: Rng>(ctx: &PreyContext<'_>, rng: &mut R) -> PreyUpdate {
    let new_state = match ctx.predator {
        Some(predator) => next_state(
            ctx.state,
            ctx.position.distance(predator.position),
            predator.can_consume,
            ctx.traits,
        ),
        None => ctx.state,
    };

    let mut update = PreyUpdate {
        new_state,
        new_direction: ctx.direction,
        state_changed: new_state != ctx.state,
        wander_reset: false,
    };

    match new_state {
        PreyState::Fleeing => {
            // Re-aim every tick while the player is in sight.
            if let Some(predator) = ctx.predator {
                update.new_direction = flee_heading(ctx.position, predator.position, rng);
            }
        }
        PreyState::Wandering => {
            if ctx.secs_since_direction_change >= ctx.traits.change_direction_secs {
                update.new_direction = wander_heading(
                    ctx.position,
                    ctx.wander_center,
                    ctx.traits.wander_radius,
                    rng,
                );
                update.wander_reset = true;
            }
        }
    }

    update
}
