//! Systems that operate on the simulation each tick.
//!
//! Systems are plain functions over the roster world and the engine-owned
//! player and session. They keep no state of their own.

pub mod contact;
pub mod containment;
pub mod movement;
pub mod prey_ai;
pub mod snapshot;
