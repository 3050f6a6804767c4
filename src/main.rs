use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sitescout::demo;
use sitescout::ui::App;
use sitescout_core::api::ScoutCoreBuilder;
use sitescout_core::backend::HttpBackend;
use sitescout_core::config::{Config, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    let log_path = setup_logging(cli.debug)?;

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_env();
    settings.merge_cli(&cli);
    settings.validate();

    info!("Logging to {}", log_path.display());

    if cli.is_demo_mode() {
        info!("Starting in demo mode");
        let core = ScoutCoreBuilder::new(settings).build(Arc::new(demo::seeded_backend()));
        return App::new(core).run().await;
    }

    let backend = HttpBackend::from_settings(&settings.backend);
    info!("Using backend at {}", backend.root());
    let core = ScoutCoreBuilder::new(settings).build(Arc::new(backend));
    App::new(core).run().await
}

/// Log to a file; the terminal belongs to the UI
fn setup_logging(debug: bool) -> Result<PathBuf> {
    let filter = if debug {
        EnvFilter::new("sitescout=debug,sitescout_core=debug")
    } else {
        EnvFilter::new("sitescout=info,sitescout_core=info")
    };

    let dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("sitescout");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {:?}", dir))?;
    let path = dir.join("sitescout.log");
    let file = File::create(&path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(path)
}
