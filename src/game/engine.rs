use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    action::Direction,
    config::GameConfig,
    controller::{Controller, DecisionError},
    grid::{Cell, Grid},
    snake::{Snake, SnakeId},
    state::Position,
    view::BoardView,
};
use crate::error::{GameError, Result};

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Head left the grid
    Wall,
    /// Head hit the snake's own body
    SelfCollision,
    /// Head hit another snake's body
    Body(SnakeId),
    /// Head met another head on the same cell, or two heads swapped places
    HeadToHead,
}

/// What happened during one turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    /// Turn counter after the turn was committed
    pub turn: u64,
    /// Direction applied to each snake that moved
    pub moves: Vec<(SnakeId, Direction)>,
    /// Snakes whose controller failed, and why. Their move came from the fallback policy.
    pub fallbacks: Vec<(SnakeId, DecisionError)>,
    pub deaths: Vec<(SnakeId, DeathCause)>,
    pub food_eaten: Vec<(SnakeId, Position)>,
    pub food_spawned: Option<Position>,
}

impl TurnReport {
    pub fn died(&self, id: SnakeId) -> Option<DeathCause> {
        self.deaths
            .iter()
            .find(|(dead, _)| *dead == id)
            .map(|(_, cause)| *cause)
    }
}

/// The turn engine. Owns the grid, every snake and their controllers.
pub struct Game {
    config: GameConfig,
    grid: Grid,
    snakes: Vec<Snake>,
    controllers: Vec<Box<dyn Controller>>,
    turn: u64,
    rng: StdRng,
}

/// Result of moving one snake, before collisions are judged
struct Move {
    idx: usize,
    old_head: Position,
    new_head: Position,
}

impl Game {
    /// Start a game with one snake per controller, each placed on a random empty cell.
    pub fn new(config: GameConfig, controllers: Vec<Box<dyn Controller>>) -> Result<Self> {
        config.validate()?;
        if controllers.is_empty() {
            return Err(GameError::NoSnakes);
        }

        let cells = config.grid_size * config.grid_size;
        if controllers.len() > cells {
            return Err(GameError::TooManySnakes {
                snakes: controllers.len(),
                cells,
            });
        }

        let mut rng = Self::make_rng(&config);
        let mut grid = Grid::new(config.grid_size)?;
        let mut snakes = Vec::with_capacity(controllers.len());

        for (idx, controller) in controllers.iter().enumerate() {
            let id = SnakeId(idx);
            let head = grid
                .place_snake_at_random_empty_cell(id, &mut rng)
                .ok_or(GameError::TooManySnakes {
                    snakes: controllers.len(),
                    cells,
                })?;
            snakes.push(Snake::new(id, controller.name(), head, config.initial_growth));
        }
        grid.rebuild_from(&snakes);

        info!(
            snakes = snakes.len(),
            grid_size = config.grid_size,
            "Game created"
        );

        Ok(Self {
            config,
            grid,
            snakes,
            controllers,
            turn: 0,
            rng,
        })
    }

    /// Start a game from explicit snake bodies (head first).
    ///
    /// Every body must lie on the grid and no two segments may share a cell.
    pub fn with_snakes(
        config: GameConfig,
        entrants: Vec<(Vec<Position>, Box<dyn Controller>)>,
    ) -> Result<Self> {
        config.validate()?;
        if entrants.is_empty() {
            return Err(GameError::NoSnakes);
        }

        let mut grid = Grid::new(config.grid_size)?;
        let mut occupied = HashSet::new();
        let mut snakes = Vec::with_capacity(entrants.len());
        let mut controllers = Vec::with_capacity(entrants.len());

        for (idx, (body, controller)) in entrants.into_iter().enumerate() {
            if body.is_empty() {
                return Err(GameError::InvalidLayout(format!("snake {idx} has no body")));
            }
            for &segment in &body {
                if !grid.is_in_bounds(segment) {
                    return Err(GameError::InvalidLayout(format!(
                        "snake {idx} segment {segment} is off the grid"
                    )));
                }
                if !occupied.insert(segment) {
                    return Err(GameError::InvalidLayout(format!(
                        "snake {idx} segment {segment} overlaps another segment"
                    )));
                }
            }
            snakes.push(Snake::with_body(
                SnakeId(idx),
                controller.name(),
                body,
                config.initial_growth,
            ));
            controllers.push(controller);
        }
        grid.rebuild_from(&snakes);

        Ok(Self {
            rng: Self::make_rng(&config),
            config,
            grid,
            snakes,
            controllers,
            turn: 0,
        })
    }

    fn make_rng(config: &GameConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.get(id.0)
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|snake| snake.is_alive()).count()
    }

    pub fn is_over(&self) -> bool {
        self.alive_count() == 0
    }

    /// Snapshot of the current board.
    pub fn view(&self) -> BoardView {
        BoardView::capture(self.turn, &self.grid, &self.snakes)
    }

    /// Put food on a specific empty cell. Returns false if the cell is taken.
    pub fn place_food(&mut self, pos: Position) -> bool {
        self.grid.add_food(pos)
    }

    /// Play one turn: every alive snake decides from the same snapshot, all
    /// moves are applied, collisions and food are resolved, then the grid is
    /// rebuilt. Does nothing once no snake is alive.
    pub fn step(&mut self) -> TurnReport {
        let mut report = TurnReport {
            turn: self.turn,
            ..Default::default()
        };
        if self.is_over() {
            return report;
        }

        let view = self.view();
        let alive: Vec<usize> = (0..self.snakes.len())
            .filter(|&idx| self.snakes[idx].is_alive())
            .collect();

        // Decide against the shared snapshot
        let mut decisions = Vec::with_capacity(alive.len());
        for &idx in &alive {
            let snake = &self.snakes[idx];
            let direction = match self.controllers[idx].decide(&view, snake.id()) {
                Ok(direction) => direction,
                Err(err) => {
                    let direction = self.config.fallback.resolve(snake.last_direction());
                    if err == DecisionError::NoInput {
                        debug!(snake = %snake.id(), %direction, "No input, using fallback");
                    } else {
                        warn!(snake = %snake.id(), error = %err, %direction, "Controller failed, using fallback");
                    }
                    report.fallbacks.push((snake.id(), err));
                    direction
                }
            };
            decisions.push((idx, direction));
        }

        // Cells that stay occupied through this move; vacated tails are left out
        let mut blocked: HashMap<Position, SnakeId> = HashMap::new();
        for &idx in &alive {
            let snake = &self.snakes[idx];
            for &segment in snake.retained_segments() {
                blocked.insert(segment, snake.id());
            }
        }

        // Apply every move before judging any of them
        let mut moves = Vec::with_capacity(decisions.len());
        let mut claims: HashMap<Position, usize> = HashMap::new();
        for (idx, direction) in decisions {
            let old_head = self.snakes[idx].head();
            let new_head = self.snakes[idx].apply_move(direction);
            *claims.entry(new_head).or_default() += 1;
            report.moves.push((self.snakes[idx].id(), direction));
            moves.push(Move {
                idx,
                old_head,
                new_head,
            });
        }

        for mv in &moves {
            let id = self.snakes[mv.idx].id();
            if let Some(cause) = self.collision(id, mv, &moves, &blocked, &claims) {
                report.deaths.push((id, cause));
            }
        }

        // Food goes to survivors only
        for mv in &moves {
            let id = self.snakes[mv.idx].id();
            if report.died(id).is_some() {
                continue;
            }
            if self.grid.consume_food(mv.new_head) {
                self.snakes[mv.idx].grow(1);
                debug!(snake = %id, pos = %mv.new_head, "Food eaten");
                report.food_eaten.push((id, mv.new_head));
            }
        }

        // Commit
        for &(id, cause) in &report.deaths {
            self.snakes[id.0].kill();
            info!(snake = %id, name = self.snakes[id.0].name(), ?cause, turn = self.turn + 1, "Snake died");
        }
        self.grid.rebuild_from(&self.snakes);
        self.turn += 1;
        report.turn = self.turn;

        if self.turn % self.config.food_period == 0 {
            report.food_spawned = self.grid.spawn_food(&mut self.rng);
            match report.food_spawned {
                Some(pos) => debug!(%pos, turn = self.turn, "Food spawned"),
                None => warn!(turn = self.turn, "No empty cell left for food"),
            }
        }

        debug_assert!(self.grid_matches_snakes(), "grid out of sync after turn {}", self.turn);
        debug!(
            turn = self.turn,
            alive = self.alive_count(),
            deaths = report.deaths.len(),
            "Turn committed"
        );

        report
    }

    /// Judge one move against the pre-move blocked cells and all new heads.
    fn collision(
        &self,
        id: SnakeId,
        mv: &Move,
        moves: &[Move],
        blocked: &HashMap<Position, SnakeId>,
        claims: &HashMap<Position, usize>,
    ) -> Option<DeathCause> {
        if !self.grid.is_in_bounds(mv.new_head) {
            return Some(DeathCause::Wall);
        }

        if let Some(&owner) = blocked.get(&mv.new_head) {
            return Some(if owner == id {
                DeathCause::SelfCollision
            } else {
                DeathCause::Body(owner)
            });
        }

        if claims.get(&mv.new_head).copied().unwrap_or(0) > 1 {
            return Some(DeathCause::HeadToHead);
        }

        let swapped = moves.iter().any(|other| {
            other.idx != mv.idx && other.new_head == mv.old_head && other.old_head == mv.new_head
        });
        if swapped {
            return Some(DeathCause::HeadToHead);
        }

        None
    }

    /// Whether the snake marks on the grid are exactly the alive snakes' bodies,
    /// with every head marked as a head.
    pub fn grid_matches_snakes(&self) -> bool {
        let mut expected = 0;
        for snake in self.snakes.iter().filter(|snake| snake.is_alive()) {
            if snake.is_empty() || !snake.body().iter().all(|&pos| self.grid.is_in_bounds(pos)) {
                return false;
            }
            if self.grid.cell(snake.head()) != Some(Cell::Head(snake.id())) {
                return false;
            }
            if snake.body()[1..]
                .iter()
                .any(|&pos| self.grid.cell(pos) != Some(Cell::Body(snake.id())))
            {
                return false;
            }
            expected += snake.len();
        }

        let marked = self
            .grid
            .cells()
            .iter()
            .filter(|cell| cell.snake().is_some())
            .count();
        marked == expected
    }
}
