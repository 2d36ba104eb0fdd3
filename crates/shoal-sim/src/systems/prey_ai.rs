//! Prey AI system: runs the prey FSM for every prey each tick.
//!
//! Calls the FSM from shoal-prey-ai and writes the resulting state and
//! heading back into the prey components.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use shoal_core::components::{Heading, Position, Prey, PreyBrain, PreyTraits};
use shoal_core::error::SimError;

use shoal_prey_ai::fsm::{evaluate, PredatorSense, PreyContext};

use crate::player::PlayerAgent;

/// Advance every prey's behavior. Without a player, prey keep their state
/// and only wander. Returns how many prey changed state.
pub fn run(
    world: &mut World,
    player: Option<&PlayerAgent>,
    now: f64,
    rng: &mut ChaCha8Rng,
) -> usize {
    let mut transitions = 0;
    if player.is_none() {
        debug!(error = %SimError::MissingCollaborator("player"), "prey detection skipped");
    }

    for (entity, (_prey, pos, heading, traits, brain)) in
        world.query_mut::<(&Prey, &Position, &mut Heading, &PreyTraits, &mut PreyBrain)>()
    {
        let ctx = PreyContext {
            state: brain.state,
            position: pos.0,
            direction: heading.direction,
            wander_center: brain.wander_center,
            traits,
            predator: player.map(|p| PredatorSense {
                position: p.position,
                can_consume: p.can_consume(traits.size),
            }),
            secs_since_direction_change: now - brain.last_direction_change,
        };

        let update = evaluate(&ctx, rng);

        if update.state_changed {
            trace!(
                prey = entity.to_bits().get(),
                from = ?brain.state,
                to = ?update.new_state,
                "prey state change"
            );
            brain.state = update.new_state;
            transitions += 1;
        }
        if update.wander_reset {
            brain.last_direction_change = now;
        }
        heading.direction = update.new_direction;
    }

    transitions
}
