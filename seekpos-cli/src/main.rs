//! seekpos CLI Tool
//!
//! Command-line interface for building seek positions from time codes and
//! resolving them against a media timeline.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use seekpos_core::{MediaTime, Position, TimeRange};
use seekpos_player::{MediaTimeline, ResolverConfig, SeekPlan, SeekResolver, SeekWindow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "seekpos")]
#[command(about = "seekpos - Tolerance-bounded seek positions on a media timeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the window of times a position accepts
    Window {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// Resolve a position to the time a player would seek to
    Resolve {
        #[command(flatten)]
        position: PositionArgs,

        /// Media duration (time code, `inf` or `indefinite` for live media)
        #[arg(long)]
        duration: String,

        /// Comma-separated sync point time codes
        #[arg(long, value_delimiter = ',')]
        sync_points: Vec<String>,

        /// Generate a sync point every INTERVAL instead of listing them
        #[arg(long, conflicts_with = "sync_points")]
        sync_interval: Option<String>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Never snap to sync points
        #[arg(long)]
        no_snap: bool,
    },
}

#[derive(Args)]
struct PositionArgs {
    /// Target time code (e.g. 90, 90.5s, 1500ms, 1:30, 00:01:30.5)
    time: String,

    /// How the tolerances are chosen
    #[arg(long, value_enum, default_value_t = Mode::Exact)]
    mode: Mode,

    /// Tolerance before the target (custom mode, defaults to 0)
    #[arg(long)]
    before: Option<String>,

    /// Tolerance after the target (custom mode, defaults to 0)
    #[arg(long)]
    after: Option<String>,

    /// Bounding segment as LO..HI
    #[arg(long)]
    segment: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Exact,
    Near,
    Before,
    After,
    Custom,
}

/// Contents of the `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CliConfig {
    resolver: ResolverConfig,
}

#[derive(Serialize)]
struct WindowReport {
    position: Position,
    segment: Option<TimeRange>,
    window: SeekWindow,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Window { position } => show_window(&position)?,

        Commands::Resolve {
            position,
            duration,
            sync_points,
            sync_interval,
            config,
            no_snap,
        } => resolve_position(
            &position,
            &duration,
            &sync_points,
            sync_interval.as_deref(),
            config.as_deref(),
            no_snap,
        )?,
    }

    Ok(())
}

fn show_window(args: &PositionArgs) -> Result<()> {
    let position = build_position(args);
    let segment = args.segment.as_deref().map(parse_segment).transpose()?;

    let mut window = SeekWindow::for_position(&position);
    if let Some(segment) = &segment {
        window = window.constrain(segment);
    }

    if args.json {
        let report = WindowReport {
            position,
            segment,
            window,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_position(&position);
        if let Some(segment) = &segment {
            println!("Segment:  {} to {}", segment.start(), segment.end());
        }
        print_window(&window);
    }

    Ok(())
}

fn resolve_position(
    args: &PositionArgs,
    duration: &str,
    sync_points: &[String],
    sync_interval: Option<&str>,
    config_path: Option<&Path>,
    no_snap: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    };
    if no_snap {
        config.resolver.snap_to_sync_points = false;
    }

    let duration: MediaTime = duration.parse().context("Invalid media duration")?;
    let timeline = match sync_interval {
        Some(interval) => {
            let interval: MediaTime = interval.parse().context("Invalid sync interval")?;
            MediaTimeline::with_sync_interval(duration, interval)
        }
        None => {
            let points = sync_points
                .iter()
                .map(|code| code.parse::<MediaTime>())
                .collect::<seekpos_core::Result<Vec<_>>>()
                .context("Invalid sync point")?;
            MediaTimeline::new(duration, points)
        }
    }
    .context("Failed to build media timeline")?;

    info!(
        "Media timeline: duration {}, {} sync points",
        timeline.duration(),
        timeline.sync_points().len()
    );

    let position = build_position(args);
    let segment = args.segment.as_deref().map(parse_segment).transpose()?;

    let resolver = SeekResolver::new(timeline, config.resolver);
    let plan = resolver
        .resolve(&position, segment.as_ref())
        .context("Failed to resolve position")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }

    Ok(())
}

/// Builds a position from the arguments
///
/// Time codes that do not parse are passed on as invalid times, which the
/// position normalizes (origin for the time, zero for tolerances).
fn build_position(args: &PositionArgs) -> Position {
    let time = parse_lenient(&args.time, "time");

    for flag in ignored_tolerance_flags(args) {
        warn!("Ignoring {} in {:?} mode, use --mode custom to set tolerances", flag, args.mode);
    }

    match args.mode {
        Mode::Exact => Position::exact(time),
        Mode::Near => Position::near(time),
        Mode::Before => Position::before(time),
        Mode::After => Position::after(time),
        Mode::Custom => Position::new(
            time,
            parse_tolerance(args.before.as_deref(), "tolerance before"),
            parse_tolerance(args.after.as_deref(), "tolerance after"),
        ),
    }
}

/// Tolerance flags given along with a mode that fixes the tolerances
fn ignored_tolerance_flags(args: &PositionArgs) -> Vec<&'static str> {
    if args.mode == Mode::Custom {
        return Vec::new();
    }
    let mut flags = Vec::new();
    if args.before.is_some() {
        flags.push("--before");
    }
    if args.after.is_some() {
        flags.push("--after");
    }
    flags
}

fn parse_tolerance(code: Option<&str>, what: &str) -> MediaTime {
    code.map_or(MediaTime::ZERO, |code| parse_lenient(code, what))
}

fn parse_lenient(code: &str, what: &str) -> MediaTime {
    code.parse().unwrap_or_else(|e| {
        warn!("Ignoring {}: {}", what, e);
        MediaTime::INVALID
    })
}

/// Parses `LO..HI` into a time range
fn parse_segment(text: &str) -> Result<TimeRange> {
    let Some((start, end)) = text.split_once("..") else {
        bail!("Segment must be written as LO..HI, got {text:?}");
    };
    let start: MediaTime = start.parse().context("Invalid segment start")?;
    let end: MediaTime = end.parse().context("Invalid segment end")?;
    TimeRange::new(start, end).context("Invalid segment")
}

fn load_config(path: &Path) -> Result<CliConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = parse_config(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn parse_config(text: &str) -> Result<CliConfig> {
    Ok(toml::from_str(text)?)
}

fn print_position(position: &Position) {
    println!(
        "Position: {} (before {}, after {})",
        position.time(),
        position.tolerance_before(),
        position.tolerance_after()
    );
}

fn print_window(window: &SeekWindow) {
    println!(
        "Window:   {} to {} (target {})",
        window.lower(),
        window.upper(),
        window.target()
    );
}

fn print_plan(plan: &SeekPlan) {
    print_position(&plan.position);
    print_window(&plan.window);
    if plan.snapped {
        println!("Resolved: {} (sync point)", plan.resolved);
    } else {
        println!("Resolved: {}", plan.resolved);
    }
    println!("Decode from: {}", plan.decode_from);
}
