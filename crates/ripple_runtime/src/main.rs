//! Ripple Runtime
//!
//! Boots logging and settings, then hands control to the winit event loop.

mod app;

use anyhow::{Context, Result};
use ripple_asset::MaskLoader;
use ripple_core::WaveSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

const CONFIG_FILE: &str = "ripple.json";
const CONFIG_ENV: &str = "RIPPLE_CONFIG";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Ripple v{}", ripple_core::VERSION);

    let settings = load_settings()?;
    tracing::info!(
        fps = settings.fps,
        resolution = settings.resolution,
        courant = settings.courant(),
        "settings loaded"
    );

    // decode the mask while the window and device come up
    let loader = MaskLoader::spawn(settings.mask_path.clone(), settings.resolution)
        .context("failed to start mask loader")?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(settings, loader);
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.into_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// `RIPPLE_CONFIG` or `ripple.json`; a missing file means defaults.
fn load_settings() -> Result<WaveSettings> {
    let path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    if !path.exists() {
        tracing::info!(path = %path.display(), "no settings file, using defaults");
        let settings = WaveSettings::default();
        settings.validate().context("default settings are invalid")?;
        return Ok(settings);
    }

    WaveSettings::load(&path).with_context(|| format!("failed to load {}", path.display()))
}
