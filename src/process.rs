// src/process.rs

use std::path::Path;
use std::process::Stdio;

use anyhow::Result;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A running application instance.
///
/// Owns the child process plus the two background tasks forwarding its
/// output. The tasks are tracked but never cancelled; when the handle is
/// dropped they are detached and finish once the child's pipes close.
pub struct ManagedProcess {
    child: Child,
    io_tasks: Vec<JoinHandle<()>>,
}

/// Tracks at most one running instance of the application.
///
/// The supervisor does not enforce exclusivity on launch; the control loop
/// is expected to request termination of the previous instance before
/// starting the next one.
#[derive(Default)]
pub struct ProcessSupervisor {
    current: Option<ManagedProcess>,
}

impl ProcessSupervisor {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Whether a process handle is currently tracked.
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// OS pid of the tracked process, if one is tracked and still running.
    pub fn tracked_pid(&self) -> Option<u32> {
        self.current.as_ref().and_then(|managed| managed.child.id())
    }

    /// Ask the tracked process to terminate, if there is one.
    ///
    /// Delivery is signal-and-forget: the handle stays tracked and the
    /// caller may start a rebuild before the old process has actually
    /// exited, so a build can overlap a binary that is still shutting down.
    pub fn terminate(&mut self) {
        let Some(managed) = self.current.as_mut() else {
            return;
        };

        match managed.child.id() {
            Some(pid) => {
                debug!(pid, "requesting termination of running process");
                if let Err(err) = send_terminate(pid, &mut managed.child) {
                    warn!(pid, error = %err, "error signalling running process");
                }
            }
            None => {
                debug!("tracked process already finished, nothing to signal");
            }
        }
    }

    /// Poll the tracked process and clear the handle if it exited on its own.
    pub fn reap_exited(&mut self) {
        let Some(managed) = self.current.as_mut() else {
            return;
        };

        match managed.child.try_wait() {
            Ok(Some(status)) => {
                let forwarders_finished = managed.io_tasks.iter().all(JoinHandle::is_finished);
                debug!(forwarders_finished, "output forwarders at exit detection");
                info!(%status, "application exited");
                self.current = None;
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "error polling tracked process for exit");
            }
        }
    }

    /// Start a new instance of the application and track it.
    ///
    /// stdout and stderr are piped and forwarded to the supervisor's own
    /// streams by background tasks. The previously tracked handle, already
    /// signalled by the caller, is replaced. On spawn failure nothing is
    /// tracked and the failure is logged; the next successful cycle will
    /// try again.
    pub fn launch(&mut self, executable: &Path, directory: &Path) {
        let mut child = match Command::new(executable)
            .current_dir(directory)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                warn!(
                    executable = %executable.display(),
                    error = %err,
                    "error starting application"
                );
                self.current = None;
                return;
            }
        };

        let mut io_tasks = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            io_tasks.push(tokio::spawn(forward_output(stdout, tokio::io::stdout())));
        }
        if let Some(stderr) = child.stderr.take() {
            io_tasks.push(tokio::spawn(forward_output(stderr, tokio::io::stderr())));
        }

        info!("Application started!");
        self.current = Some(ManagedProcess { child, io_tasks });
    }
}

#[cfg(unix)]
fn send_terminate(pid: u32, _child: &mut Child) -> Result<()> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    kill(Pid::from_raw(pid as i32), Signal::SIGTERM)?;
    Ok(())
}

#[cfg(not(unix))]
fn send_terminate(_pid: u32, child: &mut Child) -> Result<()> {
    // No graceful signal on this platform; fall back to a hard kill request.
    child.start_kill()?;
    Ok(())
}

/// Copy one of the child's output streams to the supervisor's own stream.
///
/// Runs until the child closes its end of the pipe, usually by exiting.
/// Copy errors are reported at debug level only.
pub async fn forward_output<R, W>(mut reader: R, mut writer: W)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if let Err(err) = tokio::io::copy(&mut reader, &mut writer).await {
        debug!(error = %err, "output forwarding ended with an error");
    }
}
