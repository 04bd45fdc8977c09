//! Command-line interface for the headless host
//!
//! Usage examples:
//!   ballpoint render --snapshot canvas.json --output canvas.png
//!   ballpoint render -s canvas.json -o thumb.png --scale 0.25
//!   ballpoint replay --events session.jsonl --output out.png --save-snapshot canvas.json
//!   ballpoint replay -e session.jsonl -o out.png --window 1280x720 --zoom 1.5

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Ballpoint ink engine host.
///
/// Renders persisted canvases or recorded event scripts to PNG without a GUI.
#[derive(Parser, Debug)]
#[command(name = "ballpoint", about = "Headless ballpoint ink renderer")]
pub struct CliArgs {
    /// Enable debug logging (RUST_LOG overrides the level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a persisted snapshot envelope
    Render {
        /// Snapshot file ({"version": ..., "data": ...})
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Replay an event script, one JSON event per line
    Replay {
        /// Event script (JSON lines, e.g. {"type":"pointerDown","data":{...}})
        #[arg(short, long, value_name = "FILE")]
        events: PathBuf,

        /// Start from this snapshot instead of an empty canvas
        #[arg(long, value_name = "FILE")]
        snapshot: Option<PathBuf>,

        /// Write the resulting log as a snapshot envelope
        #[arg(long, value_name = "FILE")]
        save_snapshot: Option<PathBuf>,

        /// Canvas width for an empty start
        #[arg(long, default_value_t = ballpoint_config::DEFAULT_WIDTH)]
        width: u32,

        /// Canvas height for an empty start
        #[arg(long, default_value_t = ballpoint_config::DEFAULT_HEIGHT)]
        height: u32,

        /// Use every Nth raw sample for curve fitting
        #[arg(long, value_name = "N")]
        sample_rate: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Where and how large to write the PNG
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Uniform scale applied to the canvas (1.0 = canvas pixels)
    #[arg(long, default_value_t = 1.0, conflicts_with = "window")]
    pub scale: f64,

    /// Fit the canvas into a WIDTHxHEIGHT window, keeping aspect ratio
    #[arg(long, value_name = "WxH", value_parser = parse_window)]
    pub window: Option<(u32, u32)>,

    /// Multiplies the fitted window scale
    #[arg(long, default_value_t = 1.0, requires = "window")]
    pub zoom: f64,
}

fn parse_window(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("window must be non-empty".to_string());
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window() {
        assert_eq!(parse_window("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_window("640X480"), Ok((640, 480)));
        assert!(parse_window("1280").is_err());
        assert!(parse_window("0x10").is_err());
    }

    #[test]
    fn test_replay_args() {
        let args = CliArgs::try_parse_from([
            "ballpoint",
            "replay",
            "-e",
            "session.jsonl",
            "-o",
            "out.png",
            "--sample-rate",
            "1",
            "--window",
            "400x300",
        ])
        .unwrap();
        match args.command {
            Command::Replay {
                sample_rate,
                output,
                width,
                ..
            } => {
                assert_eq!(sample_rate, Some(1));
                assert_eq!(output.window, Some((400, 300)));
                assert_eq!(width, 800);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_scale_conflicts_with_window() {
        let result = CliArgs::try_parse_from([
            "ballpoint", "render", "-s", "a.json", "-o", "a.png", "--scale", "2", "--window", "10x10",
        ]);
        assert!(result.is_err());
    }
}
