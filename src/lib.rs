// src/lib.rs

pub mod build;
pub mod cli;
pub mod logging;
pub mod monitor;
pub mod process;
pub mod scan;

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::monitor::{Monitor, WatchTarget};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - resolution of the watched executable and its directory
/// - the change detector / builder / process supervisor
/// - the fixed-interval monitor loop with Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let target = WatchTarget::resolve(&args.application)?;

    info!("Monitoring: {}", target.directory.display());

    let period = Duration::from_secs(args.interval.max(1));
    let monitor = Monitor::new(target, &args.ext, &args.build);
    monitor.run(period).await
}
