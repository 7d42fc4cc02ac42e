use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::snake::{Snake, SnakeId};
use super::state::Position;
use crate::error::{GameError, Result};

/// Occupancy of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "snake", rename_all = "lowercase")]
pub enum Cell {
    Empty,
    Food,
    Head(SnakeId),
    Body(SnakeId),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The snake occupying this cell, if any.
    pub fn snake(&self) -> Option<SnakeId> {
        match self {
            Cell::Head(id) | Cell::Body(id) => Some(*id),
            Cell::Empty | Cell::Food => None,
        }
    }
}

/// Square board holding the derived cell view and the authoritative food set.
///
/// The grid never owns snakes. Snake cells are written from the engine's
/// snake list by [`Grid::rebuild_from`] and otherwise only hold ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    /// Row-major, `y * size + x`
    cells: Vec<Cell>,
    /// Food in placement order
    food: Vec<Position>,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidGridSize(size));
        }

        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
            food: Vec::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn food(&self) -> &[Position] {
        &self.food
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.size as i32 && pos.y >= 0 && pos.y < self.size as i32
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    pub fn is_occupied_by_snake_or_food(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|cell| !cell.is_empty())
    }

    /// All currently empty cells, row by row.
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(idx, _)| self.position(idx))
            .collect()
    }

    /// Put one food item on a uniformly chosen empty cell.
    ///
    /// Returns `None` and leaves the grid untouched when no cell is empty.
    pub fn spawn_food<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Position> {
        let pos = self.random_empty_cell(rng)?;
        self.mark_food(pos);
        Some(pos)
    }

    /// Put food on a specific cell. Returns false if the cell is out of bounds
    /// or not empty.
    pub fn add_food(&mut self, pos: Position) -> bool {
        if self.cell(pos) != Some(Cell::Empty) {
            return false;
        }
        self.mark_food(pos);
        true
    }

    /// Remove the food at `pos`. Returns whether there was any.
    pub fn consume_food(&mut self, pos: Position) -> bool {
        let Some(idx) = self.food.iter().position(|&food| food == pos) else {
            return false;
        };
        self.food.remove(idx);
        if let Some(cell_idx) = self.index(pos) {
            if self.cells[cell_idx] == Cell::Food {
                self.cells[cell_idx] = Cell::Empty;
            }
        }
        true
    }

    /// Mark a uniformly chosen empty cell as the head of snake `id`.
    ///
    /// Returns the chosen cell, or `None` when the grid is full.
    pub fn place_snake_at_random_empty_cell<R: Rng + ?Sized>(
        &mut self,
        id: SnakeId,
        rng: &mut R,
    ) -> Option<Position> {
        let pos = self.random_empty_cell(rng)?;
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = Cell::Head(id);
        }
        Some(pos)
    }

    /// Recompute every cell from the food set and the alive snakes' bodies.
    ///
    /// Food is written first, then each snake's body segments and finally
    /// its head. Later writes win; collisions are resolved before this runs.
    pub fn rebuild_from(&mut self, snakes: &[Snake]) {
        self.cells.fill(Cell::Empty);

        for idx in 0..self.food.len() {
            let pos = self.food[idx];
            if let Some(cell_idx) = self.index(pos) {
                self.cells[cell_idx] = Cell::Food;
            }
        }

        for snake in snakes.iter().filter(|snake| snake.is_alive()) {
            for &segment in &snake.body()[1..] {
                if let Some(idx) = self.index(segment) {
                    self.cells[idx] = Cell::Body(snake.id());
                }
            }
            if let Some(idx) = self.index(snake.head()) {
                self.cells[idx] = Cell::Head(snake.id());
            }
        }
    }

    fn mark_food(&mut self, pos: Position) {
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = Cell::Food;
            self.food.push(pos);
        }
    }

    fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        self.empty_cells().choose(rng).copied()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_in_bounds(pos) {
            Some(pos.y as usize * self.size + pos.x as usize)
        } else {
            None
        }
    }

    fn position(&self, idx: usize) -> Position {
        Position::new((idx % self.size) as i32, (idx / self.size) as i32)
    }
}
