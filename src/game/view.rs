use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use super::snake::{Snake, SnakeId, SnakeView};
use super::state::Position;

/// Immutable snapshot of the whole board.
///
/// Controllers decide from this, renderers draw from it. It owns its data, so
/// holding one never borrows from the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub turn: u64,
    pub size: usize,
    /// Row-major cell occupancy, `y * size + x`
    pub cells: Vec<Cell>,
    pub snakes: Vec<SnakeView>,
    pub food: Vec<Position>,
}

impl BoardView {
    pub fn capture(turn: u64, grid: &Grid, snakes: &[Snake]) -> Self {
        Self {
            turn,
            size: grid.size(),
            cells: grid.cells().to_vec(),
            snakes: snakes.iter().map(Snake::observe).collect(),
            food: grid.food().to_vec(),
        }
    }

    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.size as i32 && pos.y >= 0 && pos.y < self.size as i32
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        if self.is_in_bounds(pos) {
            Some(self.cells[pos.y as usize * self.size + pos.x as usize])
        } else {
            None
        }
    }

    pub fn snake(&self, id: SnakeId) -> Option<&SnakeView> {
        self.snakes.iter().find(|snake| snake.id == id)
    }

    pub fn alive_snakes(&self) -> impl Iterator<Item = &SnakeView> {
        self.snakes.iter().filter(|snake| snake.is_alive())
    }

    /// The only snake still alive, if exactly one is.
    pub fn sole_survivor(&self) -> Option<&SnakeView> {
        let mut alive = self.alive_snakes();
        match (alive.next(), alive.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BoardView {
        let mut grid = Grid::new(3).unwrap();
        grid.add_food(Position::new(2, 2));
        let snakes = vec![Snake::with_body(
            SnakeId(0),
            "a",
            vec![Position::new(0, 0), Position::new(1, 0)],
            0,
        )];
        grid.rebuild_from(&snakes);
        BoardView::capture(4, &grid, &snakes)
    }

    #[test]
    fn test_capture_copies_board() {
        let view = sample();
        assert_eq!(view.turn, 4);
        assert_eq!(view.size, 3);
        assert_eq!(view.food, vec![Position::new(2, 2)]);
        assert_eq!(view.cell(Position::new(0, 0)), Some(Cell::Head(SnakeId(0))));
        assert_eq!(view.cell(Position::new(1, 0)), Some(Cell::Body(SnakeId(0))));
        assert_eq!(view.cell(Position::new(3, 0)), None);
        assert_eq!(view.alive_snakes().count(), 1);
        assert_eq!(view.sole_survivor().map(|snake| snake.id), Some(SnakeId(0)));
        assert!(view.snake(SnakeId(0)).is_some());
        assert!(view.snake(SnakeId(9)).is_none());
    }

    #[test]
    fn test_no_sole_survivor_with_several_alive() {
        let mut view = sample();
        let mut rival = view.snakes[0].clone();
        rival.id = SnakeId(1);
        view.snakes.push(rival);

        assert!(view.sole_survivor().is_none());
    }

    #[test]
    fn test_json_export() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["turn"], 4);
        assert_eq!(value["snakes"][0]["status"], "alive");
        assert_eq!(value["cells"][0]["state"], "head");
        assert_eq!(value["cells"][0]["snake"], 0);
        assert_eq!(value["cells"][8]["state"], "food");
    }
}
