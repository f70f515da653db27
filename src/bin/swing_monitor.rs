//! Replays a recorded detection log through a tracking session and prints the
//! speed readout for every frame.
//!
//! Each line of the log is one frame: a JSON array of boxes
//! `{"x": .., "y": .., "width": .., "height": .., "score": ..}` (score is
//! optional), or `null` for a frame where the detector failed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use swingtrack_rs::{
    Detection, DisplayTransform, NormalizedBoundingBox, Origin, Readout, ReplaySource,
    ScriptedDetector, Session, SessionConfig, TrackUpdate, TrackerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "swing-monitor", about = "Replay detections and print tracked speed")]
struct Args {
    /// JSON-lines detection log, one frame per line
    input: PathBuf,

    /// Nominal frame rate of the recording
    #[arg(long, default_value_t = 30.0)]
    frame_rate: f32,

    /// Divisor applied to normalized distances
    #[arg(long, default_value_t = 1.0)]
    normalization_factor: f32,

    /// Release frames at the recording's frame rate instead of as fast as possible
    #[arg(long)]
    paced: bool,

    /// Display size as WIDTHxHEIGHT; positions are printed in display units
    #[arg(long, value_parser = parse_size)]
    display: Option<(f32, f32)>,

    /// Corner the detector's coordinates are relative to
    #[arg(long, value_enum, default_value_t = OriginArg::BottomLeft)]
    origin: OriginArg,

    /// Print one JSON object per frame instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OriginArg {
    BottomLeft,
    TopLeft,
}

impl From<OriginArg> for Origin {
    fn from(arg: OriginArg) -> Self {
        match arg {
            OriginArg::BottomLeft => Origin::BottomLeft,
            OriginArg::TopLeft => Origin::TopLeft,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BoxRecord {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    score: Option<f32>,
}

impl From<BoxRecord> for Detection {
    fn from(r: BoxRecord) -> Self {
        Detection::from_rect(
            NormalizedBoundingBox::new(r.x, r.y, r.width, r.height),
            r.score,
        )
    }
}

fn parse_size(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((w, h))
}

fn load_script(path: &PathBuf) -> Result<Vec<Option<Vec<Detection>>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut script = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: Option<Vec<BoxRecord>> = serde_json::from_str(&line)
            .with_context(|| format!("line {}: invalid detection record", i + 1))?;
        script.push(frame.map(|boxes| boxes.into_iter().map(Detection::from).collect()));
    }
    Ok(script)
}

fn print_update(
    update: &TrackUpdate,
    transform: Option<&DisplayTransform>,
    json: bool,
) -> Result<()> {
    match (Readout::from_update(update, transform), json) {
        (Some(readout), true) => println!("{}", serde_json::to_string(&readout)?),
        (Some(readout), false) => println!("{readout}"),
        (None, true) => println!("null"),
        (None, false) => println!("Speed: --"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let transform = args
        .display
        .map(|(w, h)| DisplayTransform::new(w, h, args.origin.into()))
        .transpose()?;

    let script = load_script(&args.input)?;
    let frames = script.len() as u64;
    tracing::info!(frames, path = %args.input.display(), "Loaded detection log");

    let config = SessionConfig {
        tracker: TrackerConfig {
            frame_rate: args.frame_rate,
            normalization_factor: args.normalization_factor,
        },
        sink_capacity: script.len().max(1),
    };
    let source = ReplaySource::empty_frames(frames, args.frame_rate).with_pacing(args.paced);
    let (mut session, updates) =
        Session::with_channel(source, ScriptedDetector::new(script), config)?;

    session.start()?;
    while !session.is_finished() {
        match updates.try_recv() {
            Some(update) => print_update(&update, transform.as_ref(), args.json)?,
            None => thread::sleep(Duration::from_millis(5)),
        }
    }
    session.wait()?;
    while let Some(update) = updates.try_recv() {
        print_update(&update, transform.as_ref(), args.json)?;
    }

    if let Some(pipeline) = session.pipeline() {
        tracing::info!(
            frames = pipeline.tracker().frame_id(),
            failed = pipeline.failed_frames(),
            "Replay finished"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("390x844"), Ok((390.0, 844.0)));
        assert_eq!(parse_size("1920X1080"), Ok((1920.0, 1080.0)));
        assert!(parse_size("1920").is_err());
        assert!(parse_size("ax2").is_err());
    }

    #[test]
    fn test_box_record_to_detection() {
        let records: Option<Vec<BoxRecord>> =
            serde_json::from_str(r#"[{"x": 0.1, "y": 0.2, "width": 0.2, "height": 0.2}]"#).unwrap();
        let det: Detection = records.unwrap().into_iter().next().unwrap().into();
        assert_eq!(det.score, None);
        let c = det.center();
        assert!((c.x - 0.2).abs() < 1e-6);
        assert!((c.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_null_line_is_failure() {
        let frame: Option<Vec<BoxRecord>> = serde_json::from_str("null").unwrap();
        assert!(frame.is_none());
    }
}
