#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, time::Duration};

use crate::{
    config::JobConfig,
    process::{Finished, run_passthrough},
};

/// The external grading process.
///
/// Running it yields nothing the pipeline inspects: whether grading worked is
/// read afterwards from the results document the harness leaves behind.
pub trait Harness {
    /// Runs the harness to completion.
    fn run(&self) -> impl Future<Output = ()>;
}

/// Harness backed by an executable on disk.
#[derive(Debug, Clone)]
pub struct CommandHarness {
    /// Program to execute, without arguments.
    program:  PathBuf,
    /// Optional wall-clock limit.
    deadline: Option<Duration>,
}

impl CommandHarness {
    /// Creates a harness that executes `program`.
    pub fn new(program: impl Into<PathBuf>, deadline: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            deadline,
        }
    }

    /// Creates the harness described by `config`.
    pub fn from_config(config: &JobConfig) -> Self {
        Self::new(config.harness(), config.harness_timeout())
    }
}

impl Harness for CommandHarness {
    async fn run(&self) {
        tracing::info!("Running grading harness {}", self.program.display());

        match run_passthrough(&self.program, self.deadline).await {
            Ok(Finished::Exited(status)) if status.success() => {
                tracing::info!("Harness exited with {status}");
            }
            Ok(Finished::Exited(status)) => {
                tracing::warn!("Harness exited with {status}; relying on its results file");
            }
            Ok(Finished::TimedOut(limit)) => {
                tracing::warn!("Harness killed after {}s", limit.as_secs());
            }
            Err(e) => {
                tracing::error!("Could not run harness {}: {e:#}", self.program.display());
            }
        }
    }
}
