//! Pub/Sub TUI
//!
//! ## Architecture
//!
//! Elm Architecture with effects as data:
//! - **Model**: application state (`model/`)
//! - **Message**: everything that can happen (`message/`)
//! - **Update**: `(state, message) -> tasks` (`update/`)
//! - **Task**: side effects and their executor (`task/`)
//! - **View**: rendering (`view/`)
//! - **Event**: terminal input (`event/`)
//! - **Backend**: configuration, bootstrap, template files (`backend/`)
//!
//!
//! main.rs
//! Entry point
//!
//! fn `main()` {
//!
//!     Cli::parse()                // flags
//!     JsonConfigService::load()   // optional config file
//!     Settings::resolve()         // flags > environment > file > defaults
//!     init_logging()              // rolling log file, never the screen
//!     backend::connect()          // project id, credentials, endpoint
//!     create_client()             // REST or in-memory
//!     init_terminal()
//!     app::run()                  // main loop (app.rs)
//!     restore_terminal()          // always, even if run() failed
//!
//! }
//!
//! Everything before init_terminal() runs on the plain terminal, so a
//! missing project or token is reported as an ordinary error message.
//!

mod app;
mod backend;
mod cli;
mod event;
mod message;
mod model;
mod task;
mod update;
mod util;
mod view;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pubsub_tui_client::create_client;
use tokio::sync::mpsc;

use backend::{ConfigService, JsonConfigService, Settings};
use cli::Cli;
use model::{App, AppOptions};
use task::TaskExecutor;
use util::{default_log_dir, init_logging, init_terminal, restore_terminal};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = JsonConfigService::new(
        cli.config
            .clone()
            .unwrap_or_else(JsonConfigService::default_path),
    );
    let file_config = config_service
        .load()
        .with_context(|| format!("loading {}", config_service.path().display()))?;
    let settings = Settings::resolve(&cli, file_config, |key| std::env::var(key).ok());

    let _log_guard = init_logging(&default_log_dir(), &settings.log_level)?;
    log::info!("Starting pubsub-tui {}", env!("CARGO_PKG_VERSION"));

    view::set_theme(settings.theme);

    let connection = backend::connect(&settings).await?;
    let client = create_client(connection.client)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = TaskExecutor::new(client, tx.clone());

    let mut app = App::new(
        AppOptions {
            project_id: connection.project_id,
            emulator_host: settings.emulator_host.clone(),
            templates_dir: settings.templates_dir.clone(),
            auto_ack: settings.auto_ack,
            receive_settings: settings.receive_settings,
        },
        executor.root().child_token(),
    );

    let stop_input = Arc::new(AtomicBool::new(false));
    let input = event::spawn_input_reader(tx, stop_input.clone())?;

    let mut terminal = init_terminal()?;
    let result = app::run(&mut terminal, &mut app, &mut rx, &executor).await;
    restore_terminal(&mut terminal)?;

    stop_input.store(true, Ordering::Relaxed);
    if input.join().is_err() {
        log::warn!("Input reader panicked");
    }
    log::info!("Exiting");

    result
}
