#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, time::Duration};

use typed_builder::TypedBuilder;

use crate::{
    constants::{DEFAULT_HARNESS, DEFAULT_JOB_DIR},
    paths::JobPaths,
};

/// Configuration for a single grading job.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct JobConfig {
    /// Root of the job directory.
    #[builder(default = PathBuf::from(DEFAULT_JOB_DIR), setter(into))]
    job_dir:         PathBuf,
    /// Program executed as the grading harness.
    #[builder(default = PathBuf::from(DEFAULT_HARNESS), setter(into))]
    harness:         PathBuf,
    /// Optional wall-clock limit for the harness.
    #[builder(default, setter(strip_option))]
    harness_timeout: Option<Duration>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl JobConfig {
    /// Root of the job directory.
    pub fn job_dir(&self) -> &std::path::Path {
        self.job_dir.as_path()
    }

    /// Program executed as the grading harness.
    pub fn harness(&self) -> &std::path::Path {
        self.harness.as_path()
    }

    /// Wall-clock limit for the harness, if any.
    pub fn harness_timeout(&self) -> Option<Duration> {
        self.harness_timeout
    }

    /// Standard file locations inside the job directory.
    pub fn paths(&self) -> JobPaths {
        JobPaths::new(self.job_dir.clone())
    }
}
