//! Move decision strategies.
//!
//! The engine only talks to a [`Controller`]: it hands over a read-only
//! [`BoardView`] and gets a [`Direction`] back. Anything that can do that can
//! drive a snake.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::Direction;
use super::snake::SnakeId;
use super::view::BoardView;

/// Why a controller could not produce a move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("no input received this turn")]
    NoInput,

    #[error("no safe move available")]
    NoSafeMove,

    #[error("scripted moves exhausted")]
    Exhausted,

    #[error("snake {0} is not on the board")]
    UnknownSnake(SnakeId),
}

/// Chooses a direction for one snake each turn.
pub trait Controller {
    fn name(&self) -> &str;

    /// Pick a move for snake `me` from a snapshot of the board.
    fn decide(&mut self, view: &BoardView, me: SnakeId) -> Result<Direction, DecisionError>;
}

/// What the engine does when a controller fails to decide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Keep going in the snake's last direction
    #[default]
    ContinuePrevious,
    /// Always take this direction
    Fixed(Direction),
}

impl FallbackPolicy {
    pub fn resolve(&self, last_direction: Direction) -> Direction {
        match self {
            FallbackPolicy::ContinuePrevious => last_direction,
            FallbackPolicy::Fixed(direction) => *direction,
        }
    }
}

/// Wanders randomly, avoiding walls and occupied snake cells one step ahead.
pub struct RandomWalk {
    name: String,
    rng: StdRng,
}

impl RandomWalk {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Directions whose target cell is on the board and free of snakes.
    pub fn safe_moves(view: &BoardView, me: SnakeId) -> Result<Vec<Direction>, DecisionError> {
        let head = view
            .snake(me)
            .and_then(|snake| snake.head())
            .ok_or(DecisionError::UnknownSnake(me))?;

        Ok(head
            .neighbours()
            .into_iter()
            .filter(|(_, pos)| {
                view.cell(*pos)
                    .is_some_and(|cell| cell.snake().is_none())
            })
            .map(|(direction, _)| direction)
            .collect())
    }
}

impl Controller for RandomWalk {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, view: &BoardView, me: SnakeId) -> Result<Direction, DecisionError> {
        Self::safe_moves(view, me)?
            .choose(&mut self.rng)
            .copied()
            .ok_or(DecisionError::NoSafeMove)
    }
}

/// Replays a fixed list of moves, one per turn.
pub struct Scripted {
    name: String,
    moves: VecDeque<Direction>,
}

impl Scripted {
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            name: name.into(),
            moves: moves.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Controller for Scripted {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, _view: &BoardView, _me: SnakeId) -> Result<Direction, DecisionError> {
        self.moves.pop_front().ok_or(DecisionError::Exhausted)
    }
}
