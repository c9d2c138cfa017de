//! # grade-entrypoint
//!
//! Container entrypoint for an externally graded assignment. It writes the
//! auxiliary files shipped with a submission, runs the grading harness, then
//! merges the harness's results with caller-supplied parts, scores them and
//! attaches diagnostic images as data URIs.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Job configuration
pub mod config;
/// Fixed file names and document keys
pub mod constants;
/// Fatal validation errors
pub mod error;
/// The external grading harness
pub mod harness;
/// Image encoding and binding
pub mod images;
/// Writing autograder files into the job directory
pub mod materialize;
/// Standard job directory layout
pub mod paths;
/// End-to-end job orchestration
pub mod pipeline;
/// Subprocess helpers
pub mod process;
/// Results document types
pub mod results;
/// Merging and scoring test records
pub mod scoring;
/// Submission document loading
pub mod submission;

pub use config::JobConfig;
pub use error::EntrypointError;
pub use harness::{CommandHarness, Harness};
pub use pipeline::{Outcome, run};
pub use results::{EncodedImage, ResultsDocument, TestRecord};
