//! SHOAL application shell.
//!
//! Wires the simulation crates to a fixed-rate game loop thread and a
//! headless runner for scripted sessions.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use shoal_core as core;
