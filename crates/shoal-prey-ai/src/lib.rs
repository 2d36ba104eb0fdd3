//! Prey AI for Shoal.
//!
//! Implements the prey behavior state machine and the steering math
//! behind wandering and fleeing.

pub mod fsm;
pub mod steering;

pub use shoal_core as core;
