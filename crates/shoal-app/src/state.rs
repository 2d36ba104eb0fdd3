//! Application state shared between the front end and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use shoal_core::commands::PlayerCommand;
use shoal_core::config::SimConfig;
use shoal_core::error::SimError;
use shoal_core::state::SimSnapshot;

use crate::game_loop;

/// Commands sent from the front end to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop stopped")]
    LoopStopped,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Config(#[from] SimError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to a running game loop.
///
/// `Arc<Mutex<..>>` holds the latest snapshot, written by the loop thread
/// after every tick.
#[derive(Default)]
pub struct AppState {
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `config` and spawn the game loop thread.
    pub fn start_simulation(&self, config: SimConfig) -> Result<(), AppError> {
        let mut handle = self.loop_handle.lock().map_err(|_| AppError::Poisoned)?;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return Err(AppError::AlreadyRunning);
        }
        config.validate()?;

        let (cmd_tx, join) = game_loop::spawn_game_loop(config, self.latest_snapshot.clone())?;

        *self.command_tx.lock().map_err(|_| AppError::Poisoned)? = Some(cmd_tx);
        *handle = Some(join);
        Ok(())
    }

    /// Forward a player command to the loop.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), AppError> {
        let tx = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        match tx.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|_| AppError::LoopStopped),
            None => Err(AppError::NotStarted),
        }
    }

    /// Latest snapshot, if the loop has ticked at least once.
    pub fn snapshot(&self) -> Result<Option<SimSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    pub fn is_running(&self) -> bool {
        self.loop_handle
            .lock()
            .map(|h| h.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Ask the loop to stop and wait for it.
    pub fn shutdown(&self) -> Result<(), AppError> {
        if let Some(tx) = self.command_tx.lock().map_err(|_| AppError::Poisoned)?.take() {
            // The loop may already have exited on Quit.
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        self.wait()
    }

    /// Block until the loop thread exits.
    pub fn wait(&self) -> Result<(), AppError> {
        let handle = self.loop_handle.lock().map_err(|_| AppError::Poisoned)?.take();
        if let Some(handle) = handle {
            handle.join().map_err(|_| AppError::LoopStopped)?;
        }
        Ok(())
    }
}
