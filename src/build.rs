// src/build.rs

//! Running the external build command.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tokio::process::Command;
use tracing::{debug, info};

/// Runs the configured build command inside the watched directory.
pub struct Builder {
    directory: PathBuf,
    command: String,
}

impl Builder {
    pub fn new(directory: impl Into<PathBuf>, command: &str) -> Self {
        Self {
            directory: directory.into(),
            command: command.to_string(),
        }
    }

    /// Invoke the build command and wait for it to finish.
    ///
    /// The command runs through the platform shell with the watched
    /// directory as its working directory. On a non-zero exit the combined
    /// stdout and stderr of the command is embedded in the returned error
    /// inside a framed block, so the compiler output reaches the console
    /// verbatim.
    pub async fn build(&self) -> Result<()> {
        info!("Rebuilding application...");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.command);
            c
        };

        let output = cmd
            .current_dir(&self.directory)
            .output()
            .await
            .with_context(|| format!("running build command '{}'", self.command))?;

        if output.status.success() {
            debug!(cmd = %self.command, "build completed");
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Err(anyhow!(
            "build command '{}' failed ({}):\n=== error ====\n\n{}\n==========",
            self.command,
            output.status,
            combined.trim_end()
        ))
    }
}
