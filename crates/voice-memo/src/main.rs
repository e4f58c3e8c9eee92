//! Voice Memo: record, list and play back audio notes from the terminal.

mod app;
mod app_command;
mod config;
mod console_output;
mod error;
mod permission;

pub(crate) use {
    app::App,
    app_command::UserCommand,
    console_output::ConsoleOutput,
    error::{AppError, Result as AppResult},
    permission::ConsentPermission,
};

use crate::config::Config;

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voice_memo_core::{
    CpalBackend, Library, RouteMonitor, SessionController, SettingsStore, event_channel,
};

/// Log filter used when neither `--log` nor `RUST_LOG` is given.
const DEFAULT_LOG_FILTER: &str = "voice_memo=info,voice_memo_core=info";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "voice-memo", version, about = "Record and play back voice memos")]
struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter directives, e.g. `voice_memo_core=debug`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

/// Application entry point.
fn main() {
    let cli = Cli::parse();

    let filter = match cli.log.as_deref() {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // The controller and its audio objects are not Send, so everything
    // runs on one thread.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        error!(error = ?e, "App error");
        eprintln!("voice-memo: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;
    config.validate()?;

    let data_dir = Config::data_dir()?;
    let (recordings_dir, settings_path) = config.library_paths(&data_dir);
    let library = Library::open(
        &recordings_dir,
        config.library.mode,
        SettingsStore::new(settings_path),
    )?;

    let (events_tx, events_rx) = event_channel();
    let (consent_tx, consent_rx) = mpsc::unbounded_channel();

    let backend = CpalBackend::new(
        config.audio.input_device.clone(),
        config.audio.output_device.clone(),
    );
    let permission = ConsentPermission::new(config.behaviour.microphone_access, consent_tx);
    let route_monitor = RouteMonitor::spawn(config.behaviour.route_poll(), events_tx.clone());

    let controller = SessionController::new(
        config.session_options(),
        Box::new(backend),
        Box::new(permission),
        library,
        events_tx,
    );

    info!(
        recordings_dir = ?recordings_dir,
        config_path = ?config_path,
        "Session ready"
    );

    let app = App {
        controller,
        events_rx,
        consent_rx,
        route_monitor: Some(route_monitor),
        config,
        config_path,
        output: ConsoleOutput::new(std::io::stdout()),
        pending_consent: None,
    };

    app.run().await
}
