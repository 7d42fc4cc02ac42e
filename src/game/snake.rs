use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::state::Position;

/// Stable identity of a snake for the lifetime of a game.
///
/// Ids are handed out densely from zero, so they double as indices into the
/// engine's snake list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnakeId(pub usize);

impl std::fmt::Display for SnakeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakeStatus {
    Alive,
    Dead,
}

/// A snake taking part in the game.
///
/// Only the turn engine mutates snakes once a game has started.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    id: SnakeId,
    name: String,
    /// Body segments, with head at index 0
    body: Vec<Position>,
    status: SnakeStatus,
    /// Number of upcoming moves that keep the tail in place
    growth_pending: u32,
    last_direction: Direction,
    /// Food eaten so far
    score: u32,
}

/// Read-only projection of a snake, as seen by controllers and renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeView {
    pub id: SnakeId,
    pub name: String,
    pub body: Vec<Position>,
    pub status: SnakeStatus,
    pub score: u32,
}

impl SnakeView {
    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }

    pub fn is_alive(&self) -> bool {
        self.status == SnakeStatus::Alive
    }
}

impl Snake {
    /// Create a single-cell snake whose head sits at `head`.
    pub fn new(id: SnakeId, name: impl Into<String>, head: Position, growth_pending: u32) -> Self {
        Self::with_body(id, name, vec![head], growth_pending)
    }

    /// Create a snake from an explicit body, head first.
    ///
    /// # Panics
    ///
    /// Panics if `body` is empty.
    pub fn with_body(
        id: SnakeId,
        name: impl Into<String>,
        body: Vec<Position>,
        growth_pending: u32,
    ) -> Self {
        assert!(!body.is_empty(), "a snake needs at least one body segment");
        Self {
            id,
            name: name.into(),
            body,
            status: SnakeStatus::Alive,
            growth_pending,
            last_direction: Direction::Up,
            score: 0,
        }
    }

    pub fn id(&self) -> SnakeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn status(&self) -> SnakeStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == SnakeStatus::Alive
    }

    pub fn growth_pending(&self) -> u32 {
        self.growth_pending
    }

    pub fn last_direction(&self) -> Direction {
        self.last_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Whether the tail cell is vacated by the next move.
    pub fn vacates_tail(&self) -> bool {
        self.growth_pending == 0
    }

    /// Segments that stay occupied through the next move, before the new head
    /// is added. The tail is left out when it is about to be vacated.
    pub fn retained_segments(&self) -> &[Position] {
        if self.vacates_tail() {
            &self.body[..self.body.len() - 1]
        } else {
            &self.body
        }
    }

    pub fn observe(&self) -> SnakeView {
        SnakeView {
            id: self.id,
            name: self.name.clone(),
            body: self.body.clone(),
            status: self.status,
            score: self.score,
        }
    }

    /// Advance the body one cell in `direction`.
    ///
    /// The new head is prepended. A pending growth is consumed instead of
    /// dropping the tail. No bounds or collision checks happen here.
    pub fn apply_move(&mut self, direction: Direction) -> Position {
        let new_head = self.head().moved_in_direction(direction);
        self.body.insert(0, new_head);

        if self.growth_pending > 0 {
            self.growth_pending -= 1;
        } else {
            self.body.pop();
        }

        self.last_direction = direction;
        new_head
    }

    /// Mark the snake as dead. Calling it again has no effect.
    pub fn kill(&mut self) {
        self.status = SnakeStatus::Dead;
    }

    /// Record `n` pieces of food eaten: the tail stays put for `n` more moves.
    pub fn grow(&mut self, n: u32) {
        self.growth_pending += n;
        self.score += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_snake(growth: u32) -> Snake {
        Snake::with_body(
            SnakeId(0),
            "test",
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)],
            growth,
        )
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(SnakeId(1), "solo", Position::new(2, 3), 3);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(2, 3));
        assert_eq!(snake.tail(), Position::new(2, 3));
        assert_eq!(snake.growth_pending(), 3);
        assert!(snake.is_alive());
    }

    #[test]
    fn test_move_without_growth_drops_tail() {
        let mut snake = straight_snake(0);
        let head = snake.apply_move(Direction::Right);

        assert_eq!(head, Position::new(6, 5));
        assert_eq!(
            snake.body(),
            &[Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)]
        );
        assert_eq!(snake.last_direction(), Direction::Right);
    }

    #[test]
    fn test_move_with_growth_keeps_tail() {
        let mut snake = straight_snake(2);
        snake.apply_move(Direction::Down);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(5, 6));
        assert_eq!(snake.tail(), Position::new(3, 5));
        assert_eq!(snake.growth_pending(), 1);
    }

    #[test]
    fn test_retained_segments_follow_tail_policy() {
        let vacating = straight_snake(0);
        assert_eq!(
            vacating.retained_segments(),
            &[Position::new(5, 5), Position::new(4, 5)]
        );

        let growing = straight_snake(1);
        assert_eq!(growing.retained_segments().len(), 3);
    }

    #[test]
    fn test_single_cell_snake_retains_nothing() {
        let snake = Snake::new(SnakeId(0), "dot", Position::new(0, 0), 0);
        assert!(snake.retained_segments().is_empty());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut snake = straight_snake(0);
        snake.kill();
        snake.kill();
        assert_eq!(snake.status(), SnakeStatus::Dead);
    }

    #[test]
    fn test_grow_adds_pending_growth_and_score() {
        let mut snake = straight_snake(0);
        snake.grow(1);
        assert_eq!(snake.growth_pending(), 1);
        assert_eq!(snake.score(), 1);
    }

    #[test]
    fn test_observe_copies_state() {
        let snake = straight_snake(0);
        let view = snake.observe();
        assert_eq!(view.id, SnakeId(0));
        assert_eq!(view.body, snake.body());
        assert_eq!(view.head(), Some(Position::new(5, 5)));
        assert!(view.is_alive());
    }

    #[test]
    #[should_panic]
    fn test_empty_body_is_rejected() {
        Snake::with_body(SnakeId(0), "empty", Vec::new(), 0);
    }
}
