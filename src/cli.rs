// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchrun",
    version,
    about = "Rebuild and relaunch an application when its source files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the application binary to monitor and run.
    ///
    /// Relative paths are resolved against the current working directory.
    /// The binary does not have to exist yet; the first build may produce it.
    #[arg(value_name = "APP")]
    pub application: PathBuf,

    /// Source file extension that triggers a rebuild (a leading dot is accepted).
    #[arg(long, value_name = "EXT", default_value = "go")]
    pub ext: String,

    /// Build command, run through the shell with the watched directory as cwd.
    #[arg(long, value_name = "CMD", default_value = "go build")]
    pub build: String,

    /// Seconds between filesystem scans.
    #[arg(long, value_name = "SECS", default_value_t = 1)]
    pub interval: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
