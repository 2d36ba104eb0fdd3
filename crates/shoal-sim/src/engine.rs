//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the arena, the player, the prey roster, the
//! session and the timed effects. It processes player commands, runs all
//! systems in a fixed order, fans the tick's events out to subscribers and
//! produces `SimSnapshot`s. Completely headless, enabling deterministic
//! testing.

use std::collections::VecDeque;

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use shoal_core::commands::PlayerCommand;
use shoal_core::config::SimConfig;
use shoal_core::enums::{BoostedStat, SessionPhase};
use shoal_core::error::SimError;
use shoal_core::events::SimEvent;
use shoal_core::state::SimSnapshot;
use shoal_core::types::SimTime;

use crate::arena::Arena;
use crate::bus::{Dispatch, EventBus, SubscriptionId};
use crate::consumption::decay_hunger;
use crate::effects::EffectScheduler;
use crate::player::PlayerAgent;
use crate::population::PopulationController;
use crate::session::Session;
use crate::systems;

/// The simulation engine. Owns the roster world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    arena: Arena,
    player: PlayerAgent,
    population: PopulationController,
    session: Session,
    effects: EffectScheduler,
    bus: EventBus,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
    quit_requested: bool,
}

impl SimulationEngine {
    /// Create a new engine and start its first session.
    ///
    /// The config is validated first. The session-start events are
    /// delivered with the first tick.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut engine = Self {
            arena: Arena::from_config(&config.arena),
            player: PlayerAgent::new(&config.player),
            population: PopulationController::new(&config.spawn, config.archetypes.clone()),
            session: Session::new(),
            effects: EffectScheduler::new(),
            bus: EventBus::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            quit_requested: false,
            config,
        };
        engine.start_session();
        Ok(engine)
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        if self.session.is_active() {
            self.run_systems();
        }

        let events = std::mem::take(&mut self.events);
        self.bus.publish(&events);
        systems::snapshot::build_snapshot(
            self.population.world(),
            &self.player,
            &self.session,
            events,
        )
    }

    /// Register an event handler. Handlers run synchronously at the end of
    /// each tick, in registration order.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&SimEvent, &mut Dispatch) + Send + 'static,
    {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Get the current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// Get the current session time.
    pub fn time(&self) -> SimTime {
        self.session.time()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    /// Whether a `Quit` command has been processed.
    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> &PlayerAgent {
        &self.player
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn population(&self) -> &PopulationController {
        &self.population
    }

    /// Get a read-only reference to the prey roster world.
    pub fn world(&self) -> &hecs::World {
        self.population.world()
    }

    /// Number of boosts waiting to expire.
    pub fn pending_effects(&self) -> usize {
        self.effects.pending()
    }

    /// Mutable player access (for tests that stage sizes and positions).
    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut PlayerAgent {
        &mut self.player
    }

    /// Place a prey of `archetype` at `position` (for scripted contacts).
    #[cfg(test)]
    pub fn spawn_prey_at(
        &mut self,
        archetype: &shoal_core::config::PreyArchetype,
        position: DVec3,
    ) -> Option<hecs::Entity> {
        let now = self.session.time().elapsed_secs;
        self.population.insert(archetype, position, now, &mut self.rng)
    }

    /// Reset player, roster, score, clock and effects, then run the
    /// initial spawn burst. The RNG keeps its stream.
    fn start_session(&mut self) {
        self.player = PlayerAgent::new(&self.config.player);
        self.population =
            PopulationController::new(&self.config.spawn, self.config.archetypes.clone());
        self.session = Session::new();
        self.effects.clear();

        self.events.push(SimEvent::GameStarted);
        self.events.push(SimEvent::ScoreChanged { score: 0 });
        self.events.push(SimEvent::SizeChanged {
            size: self.player.size(),
        });
        self.events.push(SimEvent::HungerChanged {
            hunger: self.player.hunger(),
        });

        match self.population.initial_burst(
            0.0,
            Some(self.player.position),
            &self.arena,
            &mut self.rng,
        ) {
            Ok(spawned) => info!(prey = spawned.len(), "session started"),
            Err(error) => warn!(%error, "session started without initial prey"),
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Steer { x, y, z } => {
                if self.session.phase() != SessionPhase::Over {
                    self.player.steer(DVec3::new(x, y, z));
                }
            }
            PlayerCommand::Pause => {
                self.session.pause(&mut self.events);
            }
            PlayerCommand::Resume => {
                self.session.resume(&mut self.events);
            }
            PlayerCommand::FocusLost => {
                if self.config.pause_on_focus_loss {
                    self.session.pause(&mut self.events);
                }
            }
            PlayerCommand::FocusGained => {
                if self.config.pause_on_focus_loss {
                    self.session.resume(&mut self.events);
                }
            }
            PlayerCommand::Restart => {
                info!(
                    score = self.session.score(),
                    elapsed = self.session.time().elapsed_secs,
                    "restarting session"
                );
                self.start_session();
            }
            PlayerCommand::Quit => {
                info!("quit requested");
                self.quit_requested = true;
            }
            PlayerCommand::SpeedBoost {
                multiplier,
                duration_secs,
            } => self.apply_boost(BoostedStat::MaxSpeed, multiplier, duration_secs),
            PlayerCommand::GrowthBoost {
                multiplier,
                duration_secs,
            } => self.apply_boost(BoostedStat::GrowthRate, multiplier, duration_secs),
            PlayerCommand::RestoreHunger { amount } => {
                if !self.session.is_active() || !amount.is_finite() || amount < 0.0 {
                    debug!(amount, phase = ?self.session.phase(), "hunger restore ignored");
                    return;
                }
                let hunger = self.player.add_hunger(amount);
                self.events.push(SimEvent::HungerChanged { hunger });
            }
        }
    }

    fn apply_boost(&mut self, stat: BoostedStat, multiplier: f64, duration_secs: f64) {
        let valid = multiplier.is_finite()
            && multiplier > 0.0
            && duration_secs.is_finite()
            && duration_secs > 0.0;
        if !valid || !self.session.is_active() {
            debug!(
                ?stat,
                multiplier,
                duration_secs,
                phase = ?self.session.phase(),
                "boost ignored"
            );
            return;
        }
        self.effects.apply(
            &mut self.player,
            stat,
            multiplier,
            duration_secs,
            self.session.time().tick,
            self.config.dt,
        );
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.config.dt;

        // 1. Expire boosts whose countdown has run out
        self.effects.fire_due(&mut self.player, self.session.time().tick);
        // 2. Session clock
        self.session.advance_clock(dt, &mut self.events);
        let now = self.session.time().elapsed_secs;
        // 3. Scheduled spawning
        if let Err(error) = self.population.try_spawn(
            now,
            Some(self.player.position),
            &self.arena,
            &mut self.rng,
        ) {
            warn!(%error, "scheduled spawn skipped");
        }
        // 4. Prey AI
        systems::prey_ai::run(
            self.population.world_mut(),
            Some(&self.player),
            now,
            &mut self.rng,
        );
        // 5. Movement integration
        systems::movement::run_player(&mut self.player, dt);
        systems::movement::run(self.population.world_mut(), dt);
        // 6. Arena containment
        systems::containment::run(
            self.population.world_mut(),
            Some(&mut self.player),
            &self.arena,
            dt,
        );
        // 7. Contacts
        systems::contact::run(
            &mut self.population,
            &mut self.player,
            &mut self.session,
            &mut self.events,
        );
        // 8. Hunger decay and game over
        if self.session.is_active() {
            let starved = decay_hunger(&mut self.player, dt);
            self.events.push(SimEvent::HungerChanged {
                hunger: self.player.hunger(),
            });
            if starved {
                self.session.end(&mut self.events);
            }
        }
    }
}
