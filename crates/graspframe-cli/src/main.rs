//! `graspframe` – pose resolution from the command line.
//!
//! Object-local poses (what a demonstration recorder writes) are mapped into
//! the robot base frame through the TCP reference stored in
//! `~/.graspframe/config.toml`:
//!
//! 1. `graspframe init` writes a default config.
//! 2. `graspframe resolve x,y,z,Rx,Ry,Rz` resolves a single pose.
//! 3. `graspframe trajectory FILE` resolves the approach and end points of a
//!    recorded trajectory (every record with `--all`).

mod config;
mod trajectory;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use graspframe_geometry::FrameChain;
use graspframe_types::{GraspError, Pose, TrajectoryRecord};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "graspframe", version, about = "Resolve object-frame poses into the robot base frame")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Resolve one object-local pose into the base frame.
    Resolve {
        /// Local pose as `x,y,z,Rx,Ry,Rz`.
        #[arg(allow_hyphen_values = true)]
        pose: Pose,
        /// TCP reference to use instead of the configured one.
        #[arg(long, allow_hyphen_values = true)]
        tcp: Option<Pose>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Resolve the records of a recorded trajectory file.
    Trajectory {
        file: PathBuf,
        /// Resolve every record instead of the first and last.
        #[arg(long)]
        all: bool,
        /// TCP reference to use instead of the configured one.
        #[arg(long, allow_hyphen_values = true)]
        tcp: Option<Pose>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // RUST_LOG selects the filter (default "info"); GRASPFRAME_LOG_FORMAT=json
    // switches to newline-delimited JSON.  Logs go to stderr so stdout only
    // carries results.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("GRASPFRAME_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), GraspError> {
    match command {
        Command::Init { force } => run_init(force),
        Command::Resolve { pose, tcp, json } => {
            let cfg = load_config()?;
            let chain = FrameChain::new(&tcp.unwrap_or(cfg.tcp_reference));
            let resolved = chain.resolve(&pose);
            if json {
                println!("{}", to_json(&resolved)?);
            } else {
                println!("{:.*}", cfg.precision, resolved);
            }
            Ok(())
        }
        Command::Trajectory {
            file,
            all,
            tcp,
            json,
        } => {
            let cfg = load_config()?;
            let records = trajectory::read_records(&file)?;
            let chain = FrameChain::new(&tcp.unwrap_or(cfg.tcp_reference));
            let resolved = resolve_records(&chain, &records, all);
            if resolved.is_empty() {
                warn!(file = %file.display(), "trajectory contains no records");
                return Ok(());
            }
            info!(file = %file.display(), records = records.len(), resolved = resolved.len(), "trajectory resolved");
            if json {
                println!("{}", to_json(&resolved)?);
            } else {
                for r in &resolved {
                    println!("{}  {:.*}", format!("t={:>9.3}", r.time_s).dimmed(), cfg.precision, r.pose);
                }
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

fn run_init(force: bool) -> Result<(), GraspError> {
    let path = config::config_path();
    if path.exists() && !force {
        return Err(GraspError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    config::save(&config::Config::default())?;
    println!(
        "  {} Config saved to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    println!("  Set `tcp_reference` to the TCP pose measured at the object origin.");
    Ok(())
}

fn load_config() -> Result<config::Config, GraspError> {
    match config::load()? {
        Some(cfg) => Ok(cfg),
        None => {
            warn!(path = %config::config_path().display(), "no config file, using defaults");
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            Ok(cfg)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// A trajectory record with its pose mapped into the base frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct ResolvedRecord {
    time_s: f64,
    pose: Pose,
    fingers: [f64; 4],
}

fn resolve_records(chain: &FrameChain, records: &[TrajectoryRecord], all: bool) -> Vec<ResolvedRecord> {
    let resolve = |r: &TrajectoryRecord| ResolvedRecord {
        time_s: r.time_s,
        pose: chain.resolve(&r.pose),
        fingers: r.fingers,
    };
    if all {
        return records.iter().map(resolve).collect();
    }
    match trajectory::endpoints(records) {
        Some((approach, end)) => vec![resolve(approach), resolve(end)],
        None => Vec::new(),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, GraspError> {
    serde_json::to_string_pretty(value).map_err(|e| GraspError::Serialization(e.to_string()))
}
