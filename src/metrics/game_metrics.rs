use std::time::{Duration, Instant};

use crate::game::SnakeView;

/// Player record across restarts of an interactive session.
#[derive(Debug, Clone)]
pub struct GameMetrics {
    round_started: Instant,
    pub round_time: Duration,
    /// Most food the player ate in one round
    pub best_food: u32,
    /// Longest the player's snake has been at the end of a round
    pub best_length: usize,
    pub rounds: u32,
    pub wins: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            round_time: Duration::ZERO,
            best_food: 0,
            best_length: 0,
            rounds: 0,
            wins: 0,
        }
    }

    /// Refresh the round clock. Called once per rendered frame.
    pub fn tick_clock(&mut self) {
        self.round_time = self.round_started.elapsed();
    }

    pub fn on_round_start(&mut self) {
        self.round_started = Instant::now();
        self.round_time = Duration::ZERO;
    }

    pub fn on_round_over(&mut self, player: &SnakeView, won: bool) {
        self.rounds += 1;
        self.wins += u32::from(won);
        self.best_food = self.best_food.max(player.score);
        self.best_length = self.best_length.max(player.body.len());
    }

    /// Wins over finished rounds, e.g. `2/5`
    pub fn record(&self) -> String {
        format!("{}/{}", self.wins, self.rounds)
    }

    pub fn format_time(&self) -> String {
        let secs = self.round_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
