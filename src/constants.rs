#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Job directory used by the grading container when none is given.
pub const DEFAULT_JOB_DIR: &str = "/grade";

/// External grading harness invoked when none is given.
pub const DEFAULT_HARNESS: &str = "/r_autograder/run.sh";

/// Submission document, relative to the job directory.
pub const DATA_FILE: &str = "data/data.json";

/// Directory holding images referenced by `params._images`, relative to the
/// job directory.
pub const IMAGES_DIR: &str = "images";

/// Results document written by the harness, relative to the job directory.
pub const RESULTS_FILE: &str = "results/results.json";

/// Key inside `submitted_answers` holding pre-supplied test records.
pub const EXTRA_PARTS_KEY: &str = "_extra_parts";

/// Key inside `params` holding auxiliary files to materialize.
pub const AUTOGRADER_FILES_KEY: &str = "_autograder_files";

/// Key inside `params` holding image attachment requests.
pub const IMAGES_KEY: &str = "_images";

/// Part name that binds an image to the overall results.
pub const MAIN_PART: &str = "main";
