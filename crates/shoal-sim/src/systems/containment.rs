//! Containment system: springs agents that left the arena back toward it.

use hecs::World;
use tracing::debug;

use shoal_core::components::{Position, Prey};
use shoal_core::error::SimError;

use crate::arena::Arena;
use crate::player::PlayerAgent;

/// Apply the arena's spring-back to the player and every prey. Returns how
/// many agents were corrected. A missing player only skips the player.
pub fn run(world: &mut World, player: Option<&mut PlayerAgent>, arena: &Arena, dt: f64) -> usize {
    let mut corrected = 0;

    match player {
        Some(player) => {
            if !arena.contains(player.position) {
                player.position = arena.containment_correction(player.position, dt);
                corrected += 1;
            }
        }
        None => debug!(
            error = %SimError::MissingCollaborator("player"),
            "player containment skipped"
        ),
    }

    for (_entity, (_prey, pos)) in world.query_mut::<(&Prey, &mut Position)>() {
        if !arena.contains(pos.0) {
            pos.0 = arena.containment_correction(pos.0, dt);
            corrected += 1;
        }
    }

    corrected
}
