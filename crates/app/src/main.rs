//! Ballpoint - headless host for the ink engine
//!
//! Loads a snapshot or replays an event script through the engine's
//! capability interface and writes the canvas as a PNG.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ink::{InkEvent, InkPipeline, InkTexture, Snapshot};
use tracing::{info, warn};

mod cli;
mod config;
mod export;
mod logging;

use cli::{CliArgs, Command};
use config::HostConfig;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    match args.command {
        Command::Render { snapshot, output } => {
            let snapshot = read_snapshot(&snapshot)?;
            let config = HostConfig::new(snapshot.width, snapshot.height, None);
            let mut engine = build_engine(config)?;
            engine.load_snapshot(snapshot).context("loading snapshot")?;
            export::write_png(engine.surface(), &output, &output.output)?;
        }
        Command::Replay {
            events,
            snapshot,
            save_snapshot,
            width,
            height,
            sample_rate,
            output,
        } => {
            ink::validate_extent(width, height).context("canvas size")?;
            let config = HostConfig::new(width, height, sample_rate);
            let mut engine = build_engine(config)?;
            if let Some(path) = snapshot {
                engine
                    .load_snapshot(read_snapshot(&path)?)
                    .context("loading snapshot")?;
            }

            replay(&mut engine, &events)?;

            if let Some(path) = save_snapshot {
                let json = engine.snapshot_json().context("serializing snapshot")?;
                fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                info!("saved snapshot to {}", path.display());
            }
            export::write_png(engine.surface(), &output, &output.output)?;
        }
    }

    Ok(())
}

fn build_engine(config: HostConfig) -> Result<InkPipeline> {
    let texture = InkTexture::from_settings(&config.settings);
    texture.init().context("building ink texture")?;
    Ok(InkPipeline::new(config.canvas, config.settings, Arc::new(texture)))
}

fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Snapshot::from_json(&json).with_context(|| format!("parsing snapshot {}", path.display()))
}

/// Feed every event in the script to the engine.
///
/// A line that is not a valid event aborts the replay. Events the engine
/// rejects (malformed colors, moves without a pen-down) are logged and
/// skipped, as a live host would.
fn replay(engine: &mut InkPipeline, path: &Path) -> Result<()> {
    let script = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let mut applied = 0;
    let mut patches = 0;
    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: InkEvent = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: not an ink event", path.display(), number + 1))?;

        match engine.handle(event) {
            Ok(outcome) => {
                applied += 1;
                patches += outcome.patches.len();
            }
            Err(err) => warn!("{}:{}: skipped: {}", path.display(), number + 1, err),
        }
    }

    info!(
        "replayed {} events ({} patches, {} strokes in log)",
        applied,
        patches,
        engine.log().len()
    );
    Ok(())
}
