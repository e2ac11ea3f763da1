mod app;
mod input;
mod render;

use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let paths = deskpet::config::project_paths()?;
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_path)?;
    // stdout belongs to the terminal UI
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DESKPET_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(log))
        .init();
    app::run(paths)
}
