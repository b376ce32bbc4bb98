//! `meshradio-tui`: terminal console for a MeshRadio station.
//!
//! Shows the station's live mode and identity, drives the broadcast and
//! listen controls, and keeps an activity log. State arrives over the
//! station's status stream through `meshradio-core`'s controller, which
//! reconnects on its own when the link drops.
//!
//! Logs are written to a file (default `/tmp/meshradio-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod bridge;
mod event;
mod theme;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use meshradio_config::{Config, load_config, resolve_station_config};
use meshradio_core::{Controller, StationConfig};

use crate::app::App;
use crate::bridge::spawn_controller;

/// Terminal console for monitoring and controlling a MeshRadio station.
#[derive(Parser, Debug)]
#[command(name = "meshradio-tui", version, about)]
struct Cli {
    /// Station GUI server URL (e.g., http://[200:1234::1]:8080)
    #[arg(short = 'u', long, env = "MESHRADIO_URL")]
    url: Option<String>,

    /// Config profile to use (defaults to the config's default_profile)
    #[arg(short = 'p', long, env = "MESHRADIO_PROFILE")]
    profile: Option<String>,

    /// Log file path (defaults to /tmp/meshradio-tui.log)
    #[arg(long, default_value = "/tmp/meshradio-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal UI is up. The returned guard flushes the writer on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "meshradio_tui={log_level},meshradio_core={log_level},meshradio_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("meshradio-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Error reports without the env section. `ratatui::try_init` later chains
/// a terminal-restoring panic hook in front of the one installed here.
fn install_hooks() -> Result<()> {
    color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .install()
}

/// Priority: CLI URL > config profile > built-in default station.
fn station_config(cli: &Cli) -> Result<StationConfig> {
    let config = load_config().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });
    Ok(resolve_station_config(
        &config,
        cli.profile.as_deref(),
        cli.url.as_deref(),
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let station = station_config(&cli)?;
    info!(
        station = %station.url,
        profile = cli.profile.as_deref().unwrap_or("(default)"),
        "starting meshradio-tui"
    );

    let controller = Controller::new(station.clone())?;
    let handle = controller.handle();
    let mut app = App::new(handle.clone(), &station);
    let controller_task = spawn_controller(controller, app.action_sender());

    let mut terminal = ratatui::try_init()?;
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    // An error exit skips the app's own shutdown.
    handle.shutdown();

    if let Err(e) = controller_task.await {
        warn!(error = %e, "controller task failed");
    }
    result
}
