use serde::{Deserialize, Serialize};
use tracing::info;

use super::engine::{Game, TurnReport};
use super::snake::SnakeId;
use super::view::BoardView;

/// When a run ends, apart from the turn cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCondition {
    /// Play until every snake is dead
    #[default]
    NoneAlive,
    /// Stop as soon as at most one snake is left, if the game started with more than one
    LastSnakeStanding,
}

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub turns: u64,
    /// The only snake left alive. When everyone is dead, the snake that died
    /// alone on the final death turn; nobody if several died on that turn.
    /// Single-snake games have no winner.
    pub winner: Option<SnakeId>,
    pub survivors: Vec<SnakeId>,
    /// Whether the run stopped because of the turn cap
    pub hit_turn_limit: bool,
    pub final_view: BoardView,
}

/// Drives a [`Game`] turn by turn until it is finished.
pub struct Runner {
    stop_condition: StopCondition,
    max_turns: Option<u64>,
}

impl Runner {
    pub fn new(stop_condition: StopCondition, max_turns: Option<u64>) -> Self {
        Self {
            stop_condition,
            max_turns,
        }
    }

    /// Use the stop condition and turn cap from the game's own config.
    pub fn for_game(game: &Game) -> Self {
        Self::new(game.config().stop_condition, game.config().max_turns)
    }

    pub fn is_finished(&self, game: &Game) -> bool {
        let alive = game.alive_count();
        match self.stop_condition {
            StopCondition::NoneAlive => alive == 0,
            StopCondition::LastSnakeStanding => {
                alive == 0 || (game.snakes().len() > 1 && alive <= 1)
            }
        }
    }

    fn hit_turn_limit(&self, game: &Game) -> bool {
        self.max_turns.is_some_and(|max| game.turn() >= max)
    }

    pub fn run(&self, game: &mut Game) -> RunSummary {
        self.run_with(game, |_, _| {})
    }

    /// Run to completion, handing each committed board and turn report to `observer`.
    pub fn run_with<F>(&self, game: &mut Game, mut observer: F) -> RunSummary
    where
        F: FnMut(&BoardView, &TurnReport),
    {
        let mut last_deaths: Vec<SnakeId> = Vec::new();

        while !self.is_finished(game) && !self.hit_turn_limit(game) {
            let report = game.step();
            if !report.deaths.is_empty() {
                last_deaths = report.deaths.iter().map(|(id, _)| *id).collect();
            }
            observer(&game.view(), &report);
        }

        let survivors: Vec<SnakeId> = game
            .snakes()
            .iter()
            .filter(|snake| snake.is_alive())
            .map(|snake| snake.id())
            .collect();

        // A lone snake never has a rival to beat
        let winner = match survivors.as_slice() {
            [only] if game.snakes().len() > 1 => Some(*only),
            [] if game.snakes().len() > 1 && last_deaths.len() == 1 => Some(last_deaths[0]),
            _ => None,
        };

        let summary = RunSummary {
            turns: game.turn(),
            winner,
            hit_turn_limit: !self.is_finished(game),
            survivors,
            final_view: game.view(),
        };

        info!(
            turns = summary.turns,
            winner = ?summary.winner,
            survivors = summary.survivors.len(),
            "Run finished"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction::{self, Left, Right, Up};
    use crate::game::config::GameConfig;
    use crate::game::controller::{Controller, RandomWalk, Scripted};
    use crate::game::state::Position;

    fn scripted(moves: &[Direction]) -> Box<dyn Controller> {
        Box::new(Scripted::new("scripted", moves.to_vec()))
    }

    fn config(size: usize) -> GameConfig {
        GameConfig {
            initial_growth: 0,
            food_period: 1000,
            ..GameConfig::new(size).with_seed(5)
        }
    }

    #[test]
    fn test_runs_until_no_snake_alive() {
        let mut game = Game::with_snakes(
            config(5),
            vec![(vec![Position::new(2, 2)], scripted(&[Right; 3]))],
        )
        .unwrap();

        let mut observed = Vec::new();
        let summary = Runner::for_game(&game).run_with(&mut game, |view, report| {
            observed.push((view.turn, report.deaths.len()));
        });

        assert_eq!(summary.turns, 3);
        assert!(summary.survivors.is_empty());
        assert_eq!(summary.winner, None);
        assert!(!summary.hit_turn_limit);
        assert_eq!(observed, vec![(1, 0), (2, 0), (3, 1)]);
    }

    #[test]
    fn test_last_snake_standing_stops_early() {
        let mut game = Game::with_snakes(
            GameConfig {
                stop_condition: StopCondition::LastSnakeStanding,
                ..config(5)
            },
            vec![
                (vec![Position::new(0, 0)], scripted(&[Left])),
                (vec![Position::new(4, 4)], scripted(&[Up; 10])),
            ],
        )
        .unwrap();

        let summary = Runner::for_game(&game).run(&mut game);

        assert_eq!(summary.turns, 1);
        assert_eq!(summary.winner, Some(SnakeId(1)));
        assert_eq!(summary.survivors, vec![SnakeId(1)]);
    }

    #[test]
    fn test_last_death_wins_when_everyone_dies() {
        let mut game = Game::with_snakes(
            config(5),
            vec![
                (vec![Position::new(0, 0)], scripted(&[Left])),
                (vec![Position::new(4, 4)], scripted(&[Up, Right])),
            ],
        )
        .unwrap();

        let summary = Runner::for_game(&game).run(&mut game);

        assert_eq!(summary.turns, 2);
        assert!(summary.survivors.is_empty());
        assert_eq!(summary.winner, Some(SnakeId(1)));
    }

    #[test]
    fn test_turn_limit() {
        let controllers: Vec<Box<dyn Controller>> = vec![Box::new(RandomWalk::seeded("ai", 1))];
        let mut game = Game::new(
            GameConfig {
                max_turns: Some(2),
                ..GameConfig::large().with_seed(1)
            },
            controllers,
        )
        .unwrap();

        let summary = Runner::for_game(&game).run(&mut game);

        assert_eq!(summary.turns, 2);
        assert!(summary.hit_turn_limit);
        assert_eq!(summary.survivors, vec![SnakeId(0)]);
        assert_eq!(summary.final_view.turn, 2);
    }
}
