use std::cell::Cell;
use std::rc::Rc;

use crate::game::{BoardView, Controller, DecisionError, Direction, SnakeId};

/// Latest steering key, shared between the event loop and a [`KeyboardController`].
#[derive(Debug, Clone, Default)]
pub struct SteeringInput(Rc<Cell<Option<Direction>>>);

impl SteeringInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, direction: Direction) {
        self.0.set(Some(direction));
    }

    /// Take the pending direction, leaving nothing behind.
    pub fn take(&self) -> Option<Direction> {
        self.0.take()
    }

    pub fn clear(&self) {
        self.0.set(None);
    }
}

/// Drives a snake from keyboard input. Each key press is used for one turn.
pub struct KeyboardController {
    name: String,
    input: SteeringInput,
}

impl KeyboardController {
    pub fn new(name: impl Into<String>, input: SteeringInput) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

impl Controller for KeyboardController {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, _view: &BoardView, _me: SnakeId) -> Result<Direction, DecisionError> {
        self.input.take().ok_or(DecisionError::NoInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Grid, Snake};
    use crate::game::state::Position;

    fn view() -> BoardView {
        let snakes = [Snake::new(SnakeId(0), "you", Position::new(1, 1), 0)];
        let mut grid = Grid::new(3).unwrap();
        grid.rebuild_from(&snakes);
        BoardView::capture(0, &grid, &snakes)
    }

    #[test]
    fn test_key_press_is_used_once() {
        let input = SteeringInput::new();
        let mut controller = KeyboardController::new("you", input.clone());

        input.press(Direction::Left);
        assert_eq!(controller.decide(&view(), SnakeId(0)), Ok(Direction::Left));
        assert_eq!(
            controller.decide(&view(), SnakeId(0)),
            Err(DecisionError::NoInput)
        );
    }

    #[test]
    fn test_latest_key_wins() {
        let input = SteeringInput::new();
        let mut controller = KeyboardController::new("you", input.clone());

        input.press(Direction::Up);
        input.press(Direction::Right);
        assert_eq!(controller.decide(&view(), SnakeId(0)), Ok(Direction::Right));
    }

    #[test]
    fn test_clear_drops_pending_key() {
        let input = SteeringInput::new();
        let mut controller = KeyboardController::new("you", input.clone());

        input.press(Direction::Down);
        input.clear();
        assert_eq!(
            controller.decide(&view(), SnakeId(0)),
            Err(DecisionError::NoInput)
        );
    }
}
