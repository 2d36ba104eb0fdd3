//! Snapshot system: reads the roster and player into a `SimSnapshot`.
//!
//! This system is read-only.

use hecs::World;

use shoal_core::components::{Heading, Position, Prey, PreyBrain, PreyTraits};
use shoal_core::events::SimEvent;
use shoal_core::state::{PlayerView, PreyView, ScoreView, SimSnapshot};

use crate::player::PlayerAgent;
use crate::session::Session;

/// Build a complete snapshot of the current state.
pub fn build_snapshot(
    world: &World,
    player: &PlayerAgent,
    session: &Session,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    let prey = build_prey(world);
    SimSnapshot {
        time: session.time(),
        phase: session.phase(),
        score: ScoreView {
            score: session.score(),
            fish_eaten: player.fish_eaten(),
            elapsed_secs: session.time().elapsed_secs,
            live_prey: prey.len() as u32,
        },
        player: build_player(player),
        prey,
        events,
    }
}

fn build_player(player: &PlayerAgent) -> PlayerView {
    PlayerView {
        position: player.position,
        facing: player.facing,
        speed: player.speed,
        size: player.size(),
        scale: player.scale(),
        hunger: player.hunger(),
        max_hunger: player.max_hunger(),
    }
}

/// Prey views sorted by id for a stable order.
fn build_prey(world: &World) -> Vec<PreyView> {
    let mut prey: Vec<PreyView> = world
        .query::<(&Prey, &Position, &Heading, &PreyTraits, &PreyBrain)>()
        .iter()
        .map(|(entity, (_prey, pos, heading, traits, brain))| PreyView {
            id: entity.to_bits().get(),
            species: traits.species.clone(),
            position: pos.0,
            facing: heading.facing,
            size: traits.size,
            state: brain.state,
        })
        .collect();
    prey.sort_by_key(|view| view.id);
    prey
}
