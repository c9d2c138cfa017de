#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{ffi::OsStr, process::Stdio, time::Duration};

use anyhow::{Context, Result};
use tokio::{
    process::{Child, Command},
    time::timeout,
};

/// Drop guard that terminates a spawned child process if it is abandoned
/// before exiting.
struct ChildDropGuard(Option<Child>);

impl ChildDropGuard {
    /// Wraps the provided child process with the drop guard.
    fn new(child: Child) -> Self {
        Self(Some(child))
    }

    /// Returns a mutable reference to the underlying child process.
    fn child_mut(&mut self) -> Result<&mut Child> {
        self.0
            .as_mut()
            .context("child process already taken from guard")
    }

    /// Prevents the guard from killing the process on drop.
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for ChildDropGuard {
    fn drop(&mut self) {
        if let Some(child) = self.0.as_mut() {
            let _ = child.start_kill();
        }
    }
}

/// How a passthrough child process ended.
#[derive(Debug)]
pub enum Finished {
    /// The process exited on its own.
    Exited(std::process::ExitStatus),
    /// The deadline elapsed and the process was killed.
    TimedOut(Duration),
}

/// Spawns `program` with no arguments, the parent's stdin, stdout and stderr
/// attached, and waits for it.
pub async fn run_passthrough(
    program: impl AsRef<OsStr>,
    deadline: Option<Duration>,
) -> Result<Finished> {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    let mut guard = ChildDropGuard::new(cmd.spawn().context("failed to spawn process")?);

    let wait = async {
        guard
            .child_mut()?
            .wait()
            .await
            .context("failed to wait on process")
    };

    let finished = match deadline {
        Some(limit) => match timeout(limit, wait).await {
            Ok(status) => Finished::Exited(status?),
            // dropping the guard kills the child
            Err(_) => return Ok(Finished::TimedOut(limit)),
        },
        None => Finished::Exited(wait.await?),
    };

    guard.disarm();
    Ok(finished)
}
