use frunk::commands::auth;
use frunk::error::FrunkError;
use frunk::logger::initialize as LoggerInitialize;
use frunk::shell::{Outcome, Shell};
use frunk::state::AppState;

use frunk_core::api::ApiClient;
use frunk_core::config::{AppConfig, default_config_dir};
use frunk_core::editor::buffer::BufferEditorFactory;
use frunk_core::error::CoreError;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::io::Write;
use std::panic::Location;

use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader, stdin};

const PROMPT: &str = "frunk> ";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{e}");
        eprintln!("{}", e.message());
        std::process::exit(1);
    }
}

#[track_caller]
fn startup_error(message: String) -> FrunkError {
    FrunkError::Frunk {
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}

async fn run() -> Result<(), FrunkError> {
    let config_dir = default_config_dir().map_err(CoreError::from)?;
    let log_dir = config_dir.join("logs");

    // Ensure log directory exists
    create_dir_all(&log_dir)
        .map_err(|e| startup_error(format!("Failed to create log directory: {e}")))?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("Frunk starting");
    info!("Log directory: {}", log_dir.display());

    let mut config = AppConfig::load(&config_dir).map_err(CoreError::from)?;
    config.apply_env_overrides().map_err(CoreError::from)?;
    info!("API root: {}", config.server.api_root);

    let api = ApiClient::from_config(&config.server).map_err(CoreError::from)?;
    let state = AppState::new();
    auth::restore_session(&state, &api).await?;

    let mut shell = Shell::new(state, api, BufferEditorFactory::new(), &config.notes);
    println!("{}", shell.render().await);

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        print!("{PROMPT}");
        std::io::stdout()
            .flush()
            .map_err(|e| startup_error(format!("Failed to write to stdout: {e}")))?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                // EOF behaves like quit
                shell.handle_line("quit").await?;
                break;
            }
            Err(e) => return Err(startup_error(format!("Failed to read input: {e}"))),
        };

        if line.trim().is_empty() {
            continue;
        }

        match shell.handle_line(&line).await? {
            Outcome::Continue(output) => println!("{output}"),
            Outcome::Quit => break,
        }
    }

    info!("Frunk exiting");
    Ok(())
}
