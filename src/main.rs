#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # grade-entrypoint
//!
//! Runs a grading job in `/grade` with `/r_autograder/run.sh` as the harness.
//! Both can be overridden for local runs.

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use bpaf::*;
use grade_entrypoint::{CommandHarness, JobConfig, Outcome, constants};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Command line overrides for the job configuration.
#[derive(Debug, Clone)]
struct Opts {
    /// Job directory root
    job_dir:         PathBuf,
    /// Harness executable
    harness:         PathBuf,
    /// Harness time limit in seconds
    harness_timeout: Option<u64>,
}

/// Parse the command line arguments and return `Opts`
fn options() -> Opts {
    let job_dir = long("job-dir")
        .help("Job directory containing data/, images/ and results/")
        .argument::<PathBuf>("DIR")
        .fallback(PathBuf::from(constants::DEFAULT_JOB_DIR));

    let harness = long("harness")
        .help("Grading harness to execute")
        .argument::<PathBuf>("PATH")
        .fallback(PathBuf::from(constants::DEFAULT_HARNESS));

    let harness_timeout = long("harness-timeout")
        .help("Kill the harness after this many seconds")
        .argument::<u64>("SECS")
        .optional();

    construct!(Opts {
        job_dir,
        harness,
        harness_timeout
    })
    .to_options()
    .descr("Run a grading harness and merge, score, and decorate its results")
    .run()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let opts = options();
    let config = match opts.harness_timeout {
        Some(secs) => JobConfig::builder()
            .job_dir(opts.job_dir)
            .harness(opts.harness)
            .harness_timeout(Duration::from_secs(secs))
            .build(),
        None => JobConfig::builder()
            .job_dir(opts.job_dir)
            .harness(opts.harness)
            .build(),
    };

    let harness = CommandHarness::from_config(&config);
    match grade_entrypoint::run(&config, &harness).await? {
        Outcome::Graded { score, .. } => tracing::info!("Results written, score {score:.4}"),
        Outcome::GradingFailed { .. } => tracing::info!("Results written without images"),
    }

    Ok(())
}
