// src/monitor.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::build::Builder;
use crate::process::ProcessSupervisor;
use crate::scan::ChangeDetector;

/// The application under supervision: the binary to run and the directory
/// whose sources are watched.
///
/// Resolved once from the CLI argument and immutable afterwards.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    /// Absolute path of the executable to launch.
    pub executable: PathBuf,
    /// Absolute path of its containing directory; both the watch root and
    /// the working directory for builds and launches.
    pub directory: PathBuf,
}

impl WatchTarget {
    /// Resolve a possibly relative executable path into a watch target.
    ///
    /// The path is made absolute against the current working directory but
    /// is not required to exist yet; the first build may create it.
    pub fn resolve(application: &Path) -> Result<Self> {
        let executable = std::path::absolute(application)
            .with_context(|| format!("resolving application path {:?}", application))?;

        let directory = executable
            .parent()
            .with_context(|| format!("application path {:?} has no parent directory", executable))?
            .to_path_buf();

        Ok(Self {
            executable,
            directory,
        })
    }
}

/// The control loop: detect, terminate, build, launch on a fixed interval.
pub struct Monitor {
    target: WatchTarget,
    detector: ChangeDetector,
    builder: Builder,
    supervisor: ProcessSupervisor,
}

impl Monitor {
    pub fn new(target: WatchTarget, extension: &str, build_command: &str) -> Self {
        let detector = ChangeDetector::new(target.directory.clone(), extension);
        let builder = Builder::new(target.directory.clone(), build_command);

        Self {
            target,
            detector,
            builder,
            supervisor: ProcessSupervisor::new(),
        }
    }

    /// The tracked process state, for inspection.
    pub fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }

    /// Run a single cycle of the loop.
    ///
    /// A cycle with no detected change does nothing beyond reaping an
    /// already-exited process. On change, the previous instance is
    /// signalled first and the build runs; the application is relaunched
    /// only when the build succeeds, otherwise nothing runs until the next
    /// cycle whose build passes.
    pub async fn tick(&mut self) {
        self.supervisor.reap_exited();

        if !self.detector.scan() {
            return;
        }

        self.supervisor.terminate();

        match self.builder.build().await {
            Ok(()) => {
                self.supervisor
                    .launch(&self.target.executable, &self.target.directory);
            }
            Err(err) => {
                error!("{err:#}");
            }
        }
    }

    /// Drive [`Monitor::tick`] on a fixed interval until Ctrl-C.
    ///
    /// The first tick fires immediately, so a fresh start builds and
    /// launches the application without waiting a full period.
    pub async fn run(mut self, period: Duration) -> Result<()> {
        // Ctrl-C → graceful shutdown.
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = shutdown_tx.send(()).await;
        });

        let mut ticker = tokio::time::interval(period);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                _ = shutdown_rx.recv() => {
                    info!("shutdown requested, stopping monitor");
                    break;
                }
            }
        }

        Ok(())
    }
}
