use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Controller, Direction, Game, GameConfig, RandomWalk, Runner, SnakeId};
use crate::input::{InputHandler, KeyAction, KeyboardController, SteeringInput};
use crate::metrics::GameMetrics;
use crate::render::{Hud, Renderer};

/// The keyboard snake is always created first
const PLAYER: SnakeId = SnakeId(0);

/// Interactive play: one keyboard snake against random-walk opponents.
pub struct HumanMode {
    config: GameConfig,
    opponents: usize,
    tick: Duration,
    game: Game,
    steering: SteeringInput,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    round_recorded: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, opponents: usize, tick: Duration) -> Result<Self> {
        let steering = SteeringInput::new();
        let game = Self::new_game(&config, opponents, &steering)?;

        Ok(Self {
            config,
            opponents,
            tick,
            game,
            steering,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            round_recorded: false,
        })
    }

    fn new_game(config: &GameConfig, opponents: usize, steering: &SteeringInput) -> Result<Game> {
        let mut controllers: Vec<Box<dyn Controller>> =
            vec![Box::new(KeyboardController::new("you", steering.clone()))];
        for n in 1..=opponents {
            let name = format!("ai-{n}");
            let walker = match config.seed {
                Some(seed) => RandomWalk::seeded(name, seed.wrapping_add(n as u64)),
                None => RandomWalk::new(name),
            };
            controllers.push(Box::new(walker));
        }

        Game::new(config.clone(), controllers).context("Failed to set up game")
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if !self.paused && !self.round_over() {
                        self.update_game();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.tick_clock();
                    let view = self.game.view();
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view, &self.metrics, hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn hud(&self) -> Hud {
        Hud {
            player: Some(PLAYER),
            paused: self.paused,
            round_over: self.round_over(),
        }
    }

    /// The round ends when the player dies or the runner's stop rules say so.
    fn round_over(&self) -> bool {
        let player_alive = self.game.snake(PLAYER).is_some_and(|snake| snake.is_alive());
        let capped = self
            .config
            .max_turns
            .is_some_and(|max| self.game.turn() >= max);
        !player_alive || capped || Runner::for_game(&self.game).is_finished(&self.game)
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => self.steer(direction),
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::Restart => self.reset_game()?,
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    /// Queue a direction for the next turn. Reversing into the neck is ignored.
    fn steer(&mut self, direction: Direction) {
        let Some(player) = self.game.snake(PLAYER) else {
            return;
        };
        if player.len() > 1 && player.last_direction().is_opposite(direction) {
            return;
        }
        self.steering.press(direction);
    }

    fn update_game(&mut self) {
        self.game.step();

        if self.round_over() && !self.round_recorded {
            let view = self.game.view();
            let won = view.sole_survivor().is_some_and(|snake| snake.id == PLAYER);
            if let Some(player) = view.snake(PLAYER) {
                self.metrics.on_round_over(player, won);
            }
            self.round_recorded = true;
        }
    }

    fn reset_game(&mut self) -> Result<()> {
        self.steering.clear();
        self.game = Self::new_game(&self.config, self.opponents, &self.steering)?;
        self.metrics.on_round_start();
        self.paused = false;
        self.round_recorded = false;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(opponents: usize) -> HumanMode {
        HumanMode::new(
            GameConfig::default().with_seed(11),
            opponents,
            Duration::from_millis(125),
        )
        .unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode(3);
        assert_eq!(mode.game.snakes().len(), 4);
        assert_eq!(mode.game.snakes()[0].name(), "you");
        assert!(!mode.round_over());
    }

    #[test]
    fn test_steering_reaches_player_snake() {
        let mut mode = mode(0);
        let start = mode.game.snake(PLAYER).unwrap().head();
        // Alone on the board, any in-bounds step is safe
        let direction = Direction::ALL
            .into_iter()
            .find(|&d| mode.game.grid().is_in_bounds(start.moved_in_direction(d)))
            .unwrap();

        mode.steer(direction);
        mode.update_game();

        let snake = mode.game.snake(PLAYER).unwrap();
        assert!(snake.is_alive());
        assert_eq!(snake.head(), start.moved_in_direction(direction));
        assert_eq!(snake.last_direction(), direction);
    }

    #[test]
    fn test_player_death_records_a_lost_round() {
        let mut mode = mode(2);
        let start = mode.game.snake(PLAYER).unwrap().head();
        let size = mode.config.grid_size as i32;
        // Head for the nearest wall and keep going until it is hit
        let direction = if start.x < size / 2 {
            Direction::Left
        } else {
            Direction::Right
        };

        while !mode.round_over() {
            mode.steer(direction);
            mode.update_game();
        }

        assert!(mode.round_recorded);
        assert_eq!(mode.metrics.rounds, 1);
        assert_eq!(mode.metrics.wins, 0);
        assert_eq!(mode.metrics.record(), "0/1");
    }

    #[test]
    fn test_reverse_into_neck_is_ignored() {
        let mut mode = mode(0);
        // Grow a neck first
        mode.steer(Direction::Down);
        mode.update_game();
        mode.steer(Direction::Up);

        assert_eq!(mode.steering.take(), None);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode(1);
        mode.paused = true;
        mode.round_recorded = true;
        for _ in 0..5 {
            mode.game.step();
        }

        mode.reset_game().unwrap();
        assert_eq!(mode.game.turn(), 0);
        assert!(!mode.paused);
        assert!(!mode.round_recorded);
        assert_eq!(mode.game.alive_count(), 2);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let result = HumanMode::new(GameConfig::new(0), 1, Duration::from_millis(125));
        assert!(result.is_err());
    }
}
