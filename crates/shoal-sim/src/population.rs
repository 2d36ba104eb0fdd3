//! Population controller: owns the prey roster, enforces the cap, and runs
//! the spawn schedule and placement.

use glam::DVec3;
use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use shoal_core::components::{ContactState, Heading, Position, Prey, PreyBrain, PreyTraits};
use shoal_core::config::{PreyArchetype, SpawnConfig};
use shoal_core::constants::{INITIAL_BURST_MAX, SPAWN_EXCLUSION_FACTOR, SPAWN_PLACEMENT_ATTEMPTS};
use shoal_core::enums::PreyState;
use shoal_core::error::SimError;

use shoal_prey_ai::steering::wander_heading;

use crate::arena::Arena;

/// The prey roster. Prey entities live only in this controller's world.
pub struct PopulationController {
    world: World,
    count: u32,
    cap: u32,
    spawn_interval: f64,
    spawn_radius: f64,
    last_spawn_time: f64,
    archetypes: Vec<PreyArchetype>,
}

impl PopulationController {
    pub fn new(config: &SpawnConfig, archetypes: Vec<PreyArchetype>) -> Self {
        Self {
            world: World::new(),
            count: 0,
            cap: config.max_prey_count,
            spawn_interval: config.interval_secs,
            spawn_radius: config.radius,
            last_spawn_time: 0.0,
            archetypes,
        }
    }

    /// Read-only view of the roster.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Live prey count.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.cap
    }

    pub fn contains(&self, id: Entity) -> bool {
        self.world.contains(id)
    }

    pub fn last_spawn_time(&self) -> f64 {
        self.last_spawn_time
    }

    /// Scheduled spawn.
    ///
    /// Returns `Ok(None)` while the roster is full or the interval has not
    /// elapsed. An empty archetype set is reported as an error; the interval
    /// timer still restarts so the attempt repeats on the next interval
    /// rather than every tick.
    pub fn try_spawn(
        &mut self,
        now: f64,
        player_position: Option<DVec3>,
        arena: &Arena,
        rng: &mut ChaCha8Rng,
    ) -> Result<Option<Entity>, SimError> {
        if self.is_full() || now - self.last_spawn_time < self.spawn_interval {
            return Ok(None);
        }
        self.last_spawn_time = now;
        self.spawn_random(now, player_position, arena, rng).map(Some)
    }

    /// Session-start spawn of `min(cap / 2, 10)` prey, ignoring the interval.
    pub fn initial_burst(
        &mut self,
        now: f64,
        player_position: Option<DVec3>,
        arena: &Arena,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Entity>, SimError> {
        let burst = (self.cap / 2).min(INITIAL_BURST_MAX);
        self.last_spawn_time = now;

        let mut spawned = Vec::with_capacity(burst as usize);
        for _ in 0..burst {
            if self.is_full() {
                break;
            }
            spawned.push(self.spawn_random(now, player_position, arena, rng)?);
        }
        Ok(spawned)
    }

    /// Remove a prey from the roster. Removing an absent id is a no-op and
    /// returns `false`, so a prey hit by two contacts in one tick is safe.
    pub fn remove(&mut self, id: Entity) -> bool {
        if self.world.despawn(id).is_ok() {
            self.count = self.count.saturating_sub(1);
            debug!(prey = id.to_bits().get(), live = self.count, "prey removed");
            true
        } else {
            false
        }
    }

    /// Insert a prey of `archetype` at `position`. Returns `None` at the cap.
    pub fn insert(
        &mut self,
        archetype: &PreyArchetype,
        position: DVec3,
        now: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<Entity> {
        if self.is_full() {
            return None;
        }
        Some(self.spawn_entity(archetype, position, now, rng))
    }

    /// Ids of every live prey.
    pub fn ids(&self) -> Vec<Entity> {
        self.world.iter().map(|entity_ref| entity_ref.entity()).collect()
    }

    /// Callers check the cap first.
    fn spawn_random(
        &mut self,
        now: f64,
        player_position: Option<DVec3>,
        arena: &Arena,
        rng: &mut ChaCha8Rng,
    ) -> Result<Entity, SimError> {
        let archetype = self
            .archetypes
            .choose(rng)
            .cloned()
            .ok_or(SimError::EmptyArchetypes)?;
        let position = choose_spawn_position(arena, player_position, self.spawn_radius, rng);
        Ok(self.spawn_entity(&archetype, position, now, rng))
    }

    fn spawn_entity(
        &mut self,
        archetype: &PreyArchetype,
        position: DVec3,
        now: f64,
        rng: &mut ChaCha8Rng,
    ) -> Entity {
        let direction = wander_heading(position, position, archetype.wander_radius, rng);
        let entity = self.world.spawn((
            Prey,
            Position(position),
            Heading {
                direction,
                facing: direction,
            },
            PreyTraits::from(archetype),
            PreyBrain {
                state: PreyState::Wandering,
                wander_center: position,
                last_direction_change: now,
            },
            ContactState::default(),
        ));
        self.count += 1;

        debug!(
            prey = entity.to_bits().get(),
            species = %archetype.name,
            x = position.x,
            y = position.y,
            z = position.z,
            live = self.count,
            "spawned prey"
        );
        entity
    }
}

/// Rejection-sample a spawn point away from the player.
///
/// Draws up to [`SPAWN_PLACEMENT_ATTEMPTS`] uniform points in the arena and
/// keeps the first at least `SPAWN_EXCLUSION_FACTOR * spawn_radius` from the
/// player. If every draw is too close the last one is used anyway, so
/// placement never blocks. Without a player the first draw is accepted.
pub fn choose_spawn_position(
    arena: &Arena,
    player_position: Option<DVec3>,
    spawn_radius: f64,
    rng: &mut ChaCha8Rng,
) -> DVec3 {
    let exclusion = spawn_radius * SPAWN_EXCLUSION_FACTOR;
    let mut candidate = arena.random_point(rng);

    let Some(player) = player_position else {
        return candidate;
    };

    for attempt in 1..=SPAWN_PLACEMENT_ATTEMPTS {
        if candidate.distance(player) >= exclusion {
            return candidate;
        }
        if attempt < SPAWN_PLACEMENT_ATTEMPTS {
            candidate = arena.random_point(rng);
        }
    }
    candidate
}
