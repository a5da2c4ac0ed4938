use std::time::Duration;

mod backend_bridge;
mod controller;
mod media;
mod ui;

use clap::Parser;
use client_core::{load_settings, settings::validate_server_url};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::TtsGuiApp;

const WORKER_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "tts_gui", about = "Desktop client for the speech synthesis backend")]
struct Args {
    /// Overrides `server_url` from tts.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    api_prefix: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(prefix) = args.api_prefix {
        settings.api_prefix = prefix;
    }
    settings.server_url = validate_server_url(&settings.server_url)?;
    tracing::info!(
        server_url = %settings.server_url,
        api_prefix = %settings.api_prefix,
        "starting tts gui"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(1024);
    let worker_done = backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Text to Speech")
            .with_inner_size([820.0, 760.0])
            .with_min_inner_size([520.0, 480.0]),
        ..Default::default()
    };
    let result = eframe::run_native(
        "Text to Speech",
        options,
        Box::new(|_cc| Ok(Box::new(TtsGuiApp::new(cmd_tx, ui_rx)))),
    );

    if worker_done.recv_timeout(WORKER_SHUTDOWN_GRACE).is_err() {
        tracing::warn!("backend worker did not shut down in time; temporary audio may remain");
    }
    result.map_err(|err| anyhow::anyhow!("gui event loop failed: {err}"))
}
