//! Core types and definitions for the Shoal simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! configuration, components, commands, snapshots, events, errors and
//! constants. It has no dependency on the ECS or any runtime.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use glam::DVec3;
