//! A steering bot for headless runs: chase the nearest edible prey, swerve
//! away from anything that can bite.

use glam::DVec3;

use shoal_core::commands::PlayerCommand;
use shoal_core::config::SimConfig;
use shoal_core::enums::SessionPhase;
use shoal_core::error::SimError;
use shoal_core::state::{PreyView, SimSnapshot};
use shoal_sim::player::PlayerAgent;
use shoal_sim::SimulationEngine;

/// Threats closer than this take priority over food.
const AVOID_RANGE: f64 = 6.0;

/// Direction the bot wants to swim in, if any.
pub fn choose_heading(player: &PlayerAgent, prey: &[PreyView]) -> Option<DVec3> {
    let threat = prey
        .iter()
        .filter(|p| p.size >= player.size() * (1.0 + player.consumption_ratio))
        .map(|p| (p, p.position.distance(player.position)))
        .filter(|(_, distance)| *distance < AVOID_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((threat, _)) = threat {
        return (player.position - threat.position).try_normalize();
    }

    prey.iter()
        .filter(|p| player.can_consume(p.size))
        .min_by(|a, b| {
            a.position
                .distance_squared(player.position)
                .total_cmp(&b.position.distance_squared(player.position))
        })
        .and_then(|target| (target.position - player.position).try_normalize())
}

/// Run a session under the bot until game over or `max_secs` of game time.
pub fn run_headless(config: SimConfig, max_secs: f64) -> Result<SimSnapshot, SimError> {
    let mut engine = SimulationEngine::new(config)?;
    let mut snapshot = engine.tick();

    while snapshot.phase == SessionPhase::Active && snapshot.time.elapsed_secs < max_secs {
        if let Some(heading) = choose_heading(engine.player(), &snapshot.prey) {
            engine.queue_command(PlayerCommand::Steer {
                x: heading.x,
                y: heading.y,
                z: heading.z,
            });
        }
        snapshot = engine.tick();
    }

    Ok(snapshot)
}
