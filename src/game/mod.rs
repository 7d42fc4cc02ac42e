//! Core simulation for multi-snake games
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Controllers plug in through the [`Controller`] trait.

pub mod action;
pub mod config;
pub mod controller;
pub mod engine;
pub mod grid;
pub mod runner;
pub mod snake;
pub mod state;
pub mod view;

// Re-export commonly used types
pub use action::Direction;
pub use config::GameConfig;
pub use controller::{Controller, DecisionError, FallbackPolicy, RandomWalk, Scripted};
pub use engine::{DeathCause, Game, TurnReport};
pub use grid::{Cell, Grid};
pub use runner::{RunSummary, Runner, StopCondition};
pub use snake::{Snake, SnakeId, SnakeStatus, SnakeView};
pub use state::Position;
pub use view::BoardView;
