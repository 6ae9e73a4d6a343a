//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "loadcell", version, about = "ADS1230 load-cell acquisition CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/loadcell.toml")]
    pub config: PathBuf,

    /// Print readings and errors as JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run periodic acquisition on every configured cell and print filtered readings
    Monitor {
        /// Number of reading rounds to print; 0 runs until Ctrl-C
        #[arg(long, value_name = "N", default_value_t = 10)]
        readings: u32,
        /// Zero every cell once its first window is full
        #[arg(long, action = ArgAction::SetTrue)]
        tare: bool,
        /// Skip the offset self-calibration even where the config asks for it
        #[arg(long, action = ArgAction::SetTrue)]
        no_calibrate: bool,
        /// Give up when a cell has not produced a full window within this many ms
        #[arg(long, value_name = "MS", default_value_t = 2000)]
        timeout_ms: u64,
        /// Print acquisition counters to stderr on exit
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// One blocking, best-effort conversion per cell (no moving average)
    Read {
        /// Data-ready wait bound; defaults to polling.timeout_ms from the config
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
    },
    /// Validate the config and probe every cell's port once
    SelfCheck,
}
