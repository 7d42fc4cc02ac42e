use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_arena::game::{GameConfig, StopCondition};
use snake_arena::modes::{HeadlessMode, HeadlessOptions, HumanMode};

#[derive(Parser)]
#[command(name = "snake_arena")]
#[command(version, about = "Turn-based multi-snake arena")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long)]
    size: Option<usize>,

    /// Number of AI snakes (opponents in human mode)
    #[arg(long, default_value = "3")]
    snakes: usize,

    /// RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Spawn one food item every N turns
    #[arg(long)]
    food_period: Option<u64>,

    /// Growth each snake starts with
    #[arg(long)]
    initial_growth: Option<u32>,

    /// Stop after this many turns
    #[arg(long)]
    max_turns: Option<u64>,

    /// End the game once a single snake is left
    #[arg(long)]
    last_standing: bool,

    /// Milliseconds per turn (human mode tick, headless print delay)
    #[arg(long, default_value = "125", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Headless: do not print the board each turn
    #[arg(long)]
    quiet: bool,

    /// Headless: print the final board as JSON
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is not set (headless mode)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play with the keyboard against AI snakes
    Human,
    /// Watch AI snakes play on stdout
    Headless,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GameConfig::default(),
        };

        if let Some(size) = self.size {
            config.grid_size = size;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(period) = self.food_period {
            config.food_period = period;
        }
        if let Some(growth) = self.initial_growth {
            config.initial_growth = growth;
        }
        if let Some(max_turns) = self.max_turns {
            config.max_turns = Some(max_turns);
        }
        if self.last_standing {
            config.stop_condition = StopCondition::LastSnakeStanding;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.game_config()?;
    let tick = Duration::from_millis(cli.tick_ms);

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Human => {
            // Log lines would corrupt the alternate screen, so no subscriber here
            let mut human_mode = HumanMode::new(config, cli.snakes, tick)?;
            human_mode.run().await?;
        }
        Mode::Headless => {
            init_tracing(&cli.log_level);
            tracing::info!(grid_size = config.grid_size, snakes = cli.snakes, "Starting headless run");

            let options = HeadlessOptions {
                snakes: cli.snakes,
                delay: if cli.quiet { Duration::ZERO } else { tick },
                show_board: !cli.quiet,
                json: cli.json,
            };
            // The turn loop sleeps between boards, so keep it off the async workers
            tokio::task::spawn_blocking(move || HeadlessMode::new(config, options).run())
                .await
                .context("Headless run panicked")??;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_tick_is_rejected() {
        assert!(Cli::try_parse_from(["snake_arena", "--tick-ms", "0"]).is_err());
        let cli = Cli::try_parse_from(["snake_arena", "--tick-ms", "1"]).unwrap();
        assert_eq!(cli.tick_ms, 1);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "snake_arena",
            "--size",
            "12",
            "--seed",
            "9",
            "--last-standing",
        ])
        .unwrap();
        let config = cli.game_config().unwrap();

        assert_eq!(config.grid_size, 12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.stop_condition, StopCondition::LastSnakeStanding);
    }
}
