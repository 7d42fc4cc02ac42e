//! Unattended runs between random-walk snakes, printed to stdout.

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tracing::info;

use crate::game::{Controller, Game, GameConfig, RandomWalk, RunSummary, Runner};
use crate::render::render_ascii;

/// Output options for a headless run
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub snakes: usize,
    /// Pause between turns when printing boards
    pub delay: Duration,
    /// Print the board after every turn
    pub show_board: bool,
    /// Print the final board as JSON
    pub json: bool,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            snakes: 1,
            delay: Duration::from_millis(100),
            show_board: true,
            json: false,
        }
    }
}

pub struct HeadlessMode {
    config: GameConfig,
    options: HeadlessOptions,
}

impl HeadlessMode {
    pub fn new(config: GameConfig, options: HeadlessOptions) -> Self {
        Self { config, options }
    }

    fn controllers(&self) -> Vec<Box<dyn Controller>> {
        (1..=self.options.snakes)
            .map(|n| {
                let name = format!("ai-{n}");
                let walker = match self.config.seed {
                    Some(seed) => RandomWalk::seeded(name, seed.wrapping_add(n as u64)),
                    None => RandomWalk::new(name),
                };
                Box::new(walker) as Box<dyn Controller>
            })
            .collect()
    }

    /// Play a full game, writing boards and the result to `out`.
    pub fn run_to<W: Write>(&self, out: &mut W) -> Result<RunSummary> {
        let mut game =
            Game::new(self.config.clone(), self.controllers()).context("Failed to set up game")?;
        let runner = Runner::for_game(&game);

        if self.options.show_board {
            write!(out, "{}", render_ascii(&game.view()))?;
        }

        let mut write_error = None;
        let summary = runner.run_with(&mut game, |view, report| {
            if !self.options.show_board || write_error.is_some() {
                return;
            }
            let mut frame = format!("turn {}\n{}", view.turn, render_ascii(view));
            for (id, cause) in &report.deaths {
                frame.push_str(&format!("snake {id} died: {cause:?}\n"));
            }
            if let Err(err) = out.write_all(frame.as_bytes()) {
                write_error = Some(err);
                return;
            }
            if !self.options.delay.is_zero() {
                std::thread::sleep(self.options.delay);
            }
        });
        if let Some(err) = write_error {
            return Err(err).context("Failed to write board");
        }

        writeln!(out, "{}", Self::describe(&summary, &game))?;
        if self.options.json {
            let json = summary
                .final_view
                .to_json()
                .context("Failed to serialize final board")?;
            writeln!(out, "{json}")?;
        }

        info!(turns = summary.turns, "Headless run complete");
        Ok(summary)
    }

    pub fn run(&self) -> Result<RunSummary> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.run_to(&mut lock)
    }

    fn describe(summary: &RunSummary, game: &Game) -> String {
        let name = |id| {
            game.snake(id)
                .map(|snake| snake.name().to_string())
                .unwrap_or_else(|| id.to_string())
        };
        let outcome = match summary.winner {
            Some(id) => format!("winner: {}", name(id)),
            None if !summary.survivors.is_empty() => format!(
                "survivors: {}",
                summary
                    .survivors
                    .iter()
                    .map(|&id| name(id))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            None => "no winner".to_string(),
        };
        let lengths = game
            .snakes()
            .iter()
            .map(|snake| format!("{}={}", snake.name(), snake.len()))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "finished after {} turns, {outcome}{} [{lengths}]",
            summary.turns,
            if summary.hit_turn_limit {
                " (turn limit)"
            } else {
                ""
            }
        )
    }
}
