//! Simulation engine for SHOAL.
//!
//! Owns the prey roster (a hecs world), the player and the session, runs
//! systems at a fixed tick rate, and produces `SimSnapshot`s for the
//! frontend.

pub mod arena;
pub mod bus;
pub mod consumption;
pub mod effects;
pub mod engine;
pub mod player;
pub mod population;
pub mod session;
pub mod systems;

pub use shoal_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
