//! `shoal [--headless] [--secs N] [CONFIG.json]`
//!
//! Interactive mode runs the 30Hz game loop and reads one JSON
//! `PlayerCommand` per line from stdin. Headless mode plays a session with
//! the autopilot as fast as possible. Both print the final score as JSON.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use shoal_app::autopilot;
use shoal_app::state::{AppError, AppState};
use shoal_core::commands::PlayerCommand;
use shoal_core::config::SimConfig;

const DEFAULT_HEADLESS_SECS: f64 = 120.0;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(name = "shoal")]
#[command(version)]
#[command(about = "Predator/prey arena simulation")]
struct Cli {
    /// Play a session with the autopilot instead of reading stdin
    #[arg(long)]
    headless: bool,
    /// Game-time limit for headless runs, in seconds
    #[arg(long, default_value_t = DEFAULT_HEADLESS_SECS)]
    secs: f64,
    /// JSON config file; defaults apply to anything it leaves out
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<SimConfig, AppError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(SimConfig::from_json_str(&json)?)
        }
        None => Ok(SimConfig::default()),
    }
}

fn run_interactive(config: SimConfig) -> Result<(), AppError> {
    let state = AppState::new();
    state.start_simulation(config)?;
    info!("reading commands from stdin");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command: PlayerCommand = match serde_json::from_str(&line) {
            Ok(command) => command,
            Err(error) => {
                warn!(%error, "ignoring malformed command");
                continue;
            }
        };
        let quit = command == PlayerCommand::Quit;
        if state.send_command(command).is_err() || quit {
            break;
        }
    }

    state.shutdown()?;
    if let Some(snapshot) = state.snapshot()? {
        print_score(&snapshot.score);
    }
    Ok(())
}

fn print_score(score: &shoal_core::state::ScoreView) {
    match serde_json::to_string(score) {
        Ok(json) => println!("{json}"),
        Err(error) => error!(%error, "failed to encode score"),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "could not load config");
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.headless {
        autopilot::run_headless(config, cli.secs)
            .map(|snapshot| {
                info!(
                    score = snapshot.score.score,
                    fish_eaten = snapshot.score.fish_eaten,
                    survived_secs = snapshot.score.elapsed_secs,
                    "headless session finished"
                );
                print_score(&snapshot.score);
            })
            .map_err(AppError::from)
    } else {
        run_interactive(config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "shoal exited with an error");
            ExitCode::FAILURE
        }
    }
}
