mod app;
mod color;
mod headless;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::BinwatchApp;
use binwatch::PipelineConfig;
use eframe::egui;
use state::AppState;

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Live peak tracking for multi-bin serial sensors.
        cmd main {
            /// Serial device node or capture file; `-` reads stdin.
            optional --source path: PathBuf
            /// JSON pipeline configuration.
            optional --config file: PathBuf
            /// Run without a window, logging events.
            optional --headless
            /// With --headless: write one CSV row per tick.
            optional --record file: PathBuf
            /// With --headless: stop after this many ticks.
            optional --frames n: u64
        }
    }
}

/// Reject flag combinations that would otherwise be ignored.
fn check_flags(flags: &flags::Main) -> Result<()> {
    if !flags.headless {
        if flags.record.is_some() {
            anyhow::bail!("--record only applies with --headless");
        }
        if flags.frames.is_some() {
            anyhow::bail!("--frames only applies with --headless");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // To change the log level, set the `RUST_LOG` environment variable.
    env_logger::init();

    let flags = flags::Main::from_env_or_exit();
    check_flags(&flags)?;

    let config = match &flags.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if flags.headless {
        let path = flags.source.context("--headless needs --source")?;
        let source = state::open_source(&path)?;
        return headless::run(config, source, flags.record.as_deref(), flags.frames);
    }

    let mut state = AppState::new(config);
    if let Some(path) = &flags.source {
        if let Err(e) = state.open_path(path) {
            log::error!("Failed to open source: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Binwatch – Live Peak Tracker",
        options,
        Box::new(|_cc| Ok(Box::new(BinwatchApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> flags::Main {
        flags::Main::from_vec(args.iter().map(|a| (*a).into()).collect()).unwrap()
    }

    #[test]
    fn headless_only_flags_need_headless() {
        assert!(check_flags(&parse(&["--record", "out.csv"])).is_err());
        assert!(check_flags(&parse(&["--frames", "10"])).is_err());
        assert!(check_flags(&parse(&["--source", "cap.txt"])).is_ok());
        assert!(check_flags(&parse(&[
            "--headless",
            "--source",
            "cap.txt",
            "--record",
            "out.csv",
            "--frames",
            "10",
        ]))
        .is_ok());
    }
}
