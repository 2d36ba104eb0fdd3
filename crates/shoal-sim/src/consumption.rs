//! Consumption rules: contact resolution, growth, feeding, damage and
//! hunger decay.

use shoal_core::components::PreyTraits;
use shoal_core::constants::{DAMAGE_PER_PREY_SIZE, SCORE_PER_PREY, SCORE_PER_PREY_SIZE};
use shoal_core::enums::ContactOutcome;

use shoal_prey_ai::fsm::can_consume;

use crate::player::PlayerAgent;

/// Resolve one contact between the player and a prey.
///
/// Eating is checked first: with some ratios both inequalities can hold
/// for the same pair, and eating wins. On `PreyEaten` the player grows and
/// is fed; removing the prey and scoring are the caller's job. On
/// `PlayerDamaged` the player loses `prey.size * 10` hunger.
pub fn resolve_contact(player: &mut PlayerAgent, prey: &PreyTraits) -> ContactOutcome {
    let ratio = player.consumption_ratio;

    if can_consume(player.size(), prey.size, ratio) {
        let grown = player.size() + prey.nutritional_value * player.growth_rate;
        player.set_size(grown);
        player.add_hunger(player.feeding_amount * prey.nutritional_value);
        player.record_meal();
        ContactOutcome::PreyEaten
    } else if can_consume(prey.size, player.size(), ratio) {
        player.add_hunger(-prey.size * DAMAGE_PER_PREY_SIZE);
        ContactOutcome::PlayerDamaged
    } else {
        ContactOutcome::None
    }
}

/// Points for eating a prey of `prey_size`: a flat 10 plus `size * 5`
/// rounded half-to-even.
pub fn score_for(prey_size: f64) -> u32 {
    SCORE_PER_PREY + (prey_size * SCORE_PER_PREY_SIZE).round_ties_even().max(0.0) as u32
}

/// Apply one tick of hunger decay. Returns `true` when hunger is exhausted.
pub fn decay_hunger(player: &mut PlayerAgent, dt: f64) -> bool {
    player.add_hunger(-player.hunger_decay_rate * dt);
    player.is_starved()
}
