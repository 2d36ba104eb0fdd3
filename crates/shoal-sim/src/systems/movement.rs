//! Kinematic integration system.
//!
//! Prey swim along their heading at the speed of their current state and
//! ease their facing toward it. The player integrates its own steering.

use hecs::World;

use shoal_core::components::{Heading, Position, Prey, PreyBrain, PreyTraits};
use shoal_core::constants::PREY_TURN_RATE;
use shoal_core::types::turn_toward;

use shoal_prey_ai::fsm::speed_for;

use crate::player::PlayerAgent;

/// Move every prey: position += heading * speed * dt.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (_prey, pos, heading, traits, brain)) in
        world.query_mut::<(&Prey, &mut Position, &mut Heading, &PreyTraits, &PreyBrain)>()
    {
        let speed = speed_for(brain.state, traits);
        pos.0 += heading.direction * speed * dt;
        heading.facing = turn_toward(heading.facing, heading.direction, PREY_TURN_RATE * dt);
    }
}

/// Move the player along its steering input.
pub fn run_player(player: &mut PlayerAgent, dt: f64) {
    player.integrate(dt);
}
