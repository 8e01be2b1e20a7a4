use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::value_objects::{SmoothingWindow, TickInterval};

/// trainpulse: live training-metrics simulator
///
/// Drives a set of bounded random walks that look like a model training
/// run and shows them on a terminal dashboard.
#[derive(Parser, Debug)]
#[command(name = "trainpulse")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to custom config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the live dashboard (default)
    #[command(alias = "w")]
    Watch {
        /// Tick interval in milliseconds (500, 1000, 2000 or 5000)
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<TickInterval>,

        /// Smoothing window in samples
        #[arg(short, long, value_parser = parse_window)]
        smoothing: Option<SmoothingWindow>,

        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Start with the simulation paused
        #[arg(long)]
        paused: bool,
    },

    /// Run the simulation without a dashboard, logging each tick
    #[command(alias = "r")]
    Run {
        /// Stop after this many ticks instead of waiting for Ctrl+C
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Tick interval in milliseconds (500, 1000, 2000 or 5000)
        #[arg(short, long, value_parser = parse_interval)]
        interval: Option<TickInterval>,

        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Simulate a number of ticks instantly and print the result
    #[command(alias = "s")]
    Snapshot {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "30")]
        ticks: u64,

        /// Smoothing window in samples
        #[arg(short, long, value_parser = parse_window)]
        smoothing: Option<SmoothingWindow>,

        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    #[command(alias = "c")]
    Config {
        /// Print the config file location instead
        #[arg(long)]
        path: bool,
    },
}

impl Commands {
    /// The command used when none is given on the command line.
    #[must_use]
    pub const fn default_watch() -> Self {
        Self::Watch {
            interval: None,
            smoothing: None,
            seed: None,
            paused: false,
        }
    }
}

fn parse_interval(raw: &str) -> Result<TickInterval, String> {
    let millis: u64 = raw.parse().map_err(|e| format!("{e}"))?;
    TickInterval::try_from(millis).map_err(|e| e.to_string())
}

fn parse_window(raw: &str) -> Result<SmoothingWindow, String> {
    let size: usize = raw.parse().map_err(|e| format!("{e}"))?;
    SmoothingWindow::new(size).map_err(|e| e.to_string())
}
