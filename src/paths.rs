#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use crate::constants::{DATA_FILE, IMAGES_DIR, RESULTS_FILE};

#[derive(Debug, Clone)]
/// Represents the standard file locations of a grading job.
pub struct JobPaths {
    /// Root directory of the job.
    job_dir:      PathBuf,
    /// `data/data.json`, the submission document.
    data_file:    PathBuf,
    /// `images/`, where diagnostic images are looked up.
    images_dir:   PathBuf,
    /// `results/results.json`, the harness output.
    results_file: PathBuf,
}

impl JobPaths {
    /// Creates the set of job paths rooted at `job_dir`.
    pub fn new(job_dir: impl Into<PathBuf>) -> Self {
        let job_dir = job_dir.into();
        Self {
            data_file: job_dir.join(DATA_FILE),
            images_dir: job_dir.join(IMAGES_DIR),
            results_file: job_dir.join(RESULTS_FILE),
            job_dir,
        }
    }

    /// Root directory of the job.
    pub fn job_dir(&self) -> &Path {
        self.job_dir.as_path()
    }

    /// Submission document path.
    pub fn data_file(&self) -> &Path {
        self.data_file.as_path()
    }

    /// Directory images are resolved against.
    pub fn images_dir(&self) -> &Path {
        self.images_dir.as_path()
    }

    /// Path of the image called `filename`.
    pub fn image(&self, filename: &str) -> PathBuf {
        self.images_dir.join(filename)
    }

    /// Results document path.
    pub fn results_file(&self) -> &Path {
        self.results_file.as_path()
    }

    /// Resolves a job-relative path, as given by an autograder file
    /// descriptor.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.job_dir.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_job_dir() {
        let paths = JobPaths::new("/grade");
        assert_eq!(paths.data_file(), Path::new("/grade/data/data.json"));
        assert_eq!(paths.results_file(), Path::new("/grade/results/results.json"));
        assert_eq!(paths.image("g.png"), PathBuf::from("/grade/images/g.png"));
        assert_eq!(paths.resolve("tests/helper.R"), PathBuf::from("/grade/tests/helper.R"));
    }
}
