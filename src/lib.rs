//! Snake Arena - a turn-based multi-snake grid simulation
//!
//! This library provides:
//! - Core simulation (game module): grid, snakes, simultaneous turn engine, runner
//! - Pluggable move strategies through the `Controller` trait
//! - TUI and plain-text rendering (render module)
//! - Keyboard input (input module)
//! - Interactive and headless execution modes (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

pub use error::{GameError, Result};
