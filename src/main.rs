mod app;
mod cli;
mod config;
mod error;
mod loader;
mod log_parser;
mod render;
mod tabs;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use app::LogViewerApp;
use cli::Cli;
use config::AppConfig;

fn init_logging(filter: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    // --log-level wins over RUST_LOG
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let mut app = LogViewerApp::new(config, cli.filter_criteria());
    if let Some(path) = cli.file.as_deref() {
        app.open_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
    }

    log::info!("Starting log viewer");

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1200.0, 800.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Log Tabs",
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow!("viewer exited with an error: {e}"))
}
