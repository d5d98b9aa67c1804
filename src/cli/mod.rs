//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tactic")]
#[command(author, version, about = "Rule-based decision policies over a replayable harness")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay bar data through the configured policies
    Replay(ReplayArgs),
    /// List available policies
    Policies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, ValueEnum)]
pub enum ModeArg {
    /// Submit orders to the paper gateway
    Auto,
    /// Log intended orders without submitting them
    Notify,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Policies to run (comma-separated; default: every configured policy)
    #[arg(short, long, value_delimiter = ',')]
    pub policy: Vec<String>,

    /// Bar data as INSTRUMENT=path.csv pairs
    #[arg(short, long)]
    pub data: Vec<String>,

    /// Override the configured execution mode
    #[arg(long)]
    pub mode: Option<ModeArg>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}
