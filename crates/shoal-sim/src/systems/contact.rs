//! Contact system: turns player/prey overlaps into consumption outcomes.
//!
//! A contact event fires when a prey starts overlapping the player. A prey
//! that stays in contact does not fire again until it separates.

use glam::DVec3;
use hecs::Entity;
use tracing::debug;

use shoal_core::components::{ContactState, Position, Prey, PreyTraits};
use shoal_core::constants::PREY_CONTACT_RADIUS_FACTOR;
use shoal_core::enums::ContactOutcome;
use shoal_core::events::SimEvent;

use crate::consumption::{resolve_contact, score_for};
use crate::player::PlayerAgent;
use crate::population::PopulationController;
use crate::session::Session;

/// Resolve every new contact this tick, in roster order.
///
/// Stops early once the session is no longer active, so nothing is eaten
/// or scored after a fatal bite. Returns the outcome for each contact.
pub fn run(
    population: &mut PopulationController,
    player: &mut PlayerAgent,
    session: &mut Session,
    events: &mut Vec<SimEvent>,
) -> Vec<(Entity, ContactOutcome)> {
    let contacts = detect_new_contacts(population, player);
    let mut outcomes = Vec::with_capacity(contacts.len());

    for (entity, position, traits) in contacts {
        if !session.is_active() {
            break;
        }
        // An earlier contact may already have taken this prey.
        if !population.contains(entity) {
            continue;
        }

        let hunger_before = player.hunger();
        let outcome = resolve_contact(player, &traits);

        match outcome {
            ContactOutcome::PreyEaten => {
                population.remove(entity);
                events.push(SimEvent::PreyConsumed {
                    prey_id: entity.to_bits().get(),
                    position,
                });
                events.push(SimEvent::SizeChanged {
                    size: player.size(),
                });
                events.push(SimEvent::HungerChanged {
                    hunger: player.hunger(),
                });
                events.push(SimEvent::FishEaten {
                    count: player.fish_eaten(),
                });
                session.add_score(score_for(traits.size), events);
                debug!(
                    species = %traits.species,
                    size = player.size(),
                    hunger = player.hunger(),
                    fish_eaten = player.fish_eaten(),
                    "prey eaten"
                );
            }
            ContactOutcome::PlayerDamaged => {
                events.push(SimEvent::PlayerDamaged {
                    amount: hunger_before - player.hunger(),
                });
                events.push(SimEvent::HungerChanged {
                    hunger: player.hunger(),
                });
                debug!(species = %traits.species, hunger = player.hunger(), "player bitten");
                if player.is_starved() {
                    session.end(events);
                }
            }
            ContactOutcome::None => {}
        }

        outcomes.push((entity, outcome));
    }

    outcomes
}

/// Prey that overlap the player now but did not on the previous tick.
fn detect_new_contacts(
    population: &mut PopulationController,
    player: &PlayerAgent,
) -> Vec<(Entity, DVec3, PreyTraits)> {
    let reach = player.contact_reach();
    let mut contacts = Vec::new();

    for (entity, (_prey, pos, traits, contact)) in population
        .world_mut()
        .query_mut::<(&Prey, &Position, &PreyTraits, &mut ContactState)>()
    {
        let touching =
            pos.0.distance(player.position) <= reach + traits.size * PREY_CONTACT_RADIUS_FACTOR;
        if touching && !contact.touching {
            contacts.push((entity, pos.0, traits.clone()));
        }
        contact.touching = touching;
    }

    contacts
}
