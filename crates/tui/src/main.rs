mod renderer;
mod scroll;

use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vaulta_core::config::parse_snap_config;
use vaulta_core::sections::PageLayout;
use vaulta_protocol::SnapConfig;

const USAGE: &str = "Usage: vaulta-snap [layout.json] [--config snap.json]";

fn main() -> Result<()> {
    init_logging()?;

    let mut layout_path = None;
    let mut config_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = Some(args.next().context("--config needs a path")?),
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                return Ok(());
            }
            _ => layout_path = Some(arg),
        }
    }

    let layout = match layout_path {
        Some(path) => {
            let data = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            PageLayout::from_json(&data)?
        }
        None => PageLayout::vaulta(),
    };
    let config = match config_path {
        Some(path) => {
            let data = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            parse_snap_config(&data)?
        }
        None => SnapConfig::default(),
    };

    renderer::run(&layout, config)
}

/// Log to the file named by `VAULTA_LOG`; the alternate screen owns the
/// terminal, so nothing is logged without it.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("VAULTA_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path)
        .with_context(|| format!("creating log file {}", path.to_string_lossy()))?;
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
