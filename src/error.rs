#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

/// Fatal validation failures. Any of these ends the job with exit status 1.
#[derive(thiserror::Error, Debug)]
pub enum EntrypointError {
    /// The submission document is valid JSON but not an object.
    #[error("DATA (read from `{0}`) is not a dictionary. Aborting.")]
    SubmissionNotMapping(PathBuf),
    /// The submission document has no `submitted_answers` object.
    #[error("DATA (read from `{0}`) has no `submitted_answers` dictionary. Aborting.")]
    MissingSubmittedAnswers(PathBuf),
    /// The results document is valid JSON but not an object.
    #[error("RESULTS (read from `{0}`) is not a dictionary. Aborting.")]
    ResultsNotMapping(PathBuf),
    /// Grading succeeded but `params._images` is absent or not a list.
    #[error("key 'params._images' is missing or is not a list. Aborting.")]
    ImagesNotConfigured,
    /// Every test record is worth zero points, so no score can be computed.
    #[error(
        "cannot compute a score: total max_points over {tests} test(s) is zero. Aborting."
    )]
    UndefinedScore {
        /// Number of merged test records.
        tests: usize,
    },
    /// An entry of `params._autograder_files` could not be decoded to text.
    #[error("autograder file `{path}` could not be decoded: {reason}")]
    InvalidAutograderFile {
        /// Job-relative destination of the file.
        path:   String,
        /// What went wrong while decoding.
        reason: String,
    },
}
