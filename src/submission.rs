#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    constants::{AUTOGRADER_FILES_KEY, EXTRA_PARTS_KEY, IMAGES_KEY},
    error::EntrypointError,
    results::TestRecord,
};

/// An auxiliary file shipped inside `params._autograder_files`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AutograderFile {
    /// Destination, relative to the job directory.
    pub path:     String,
    /// Base64 encoded text contents.
    pub contents: String,
}

/// The parts of the submission document this entrypoint acts on.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Test records supplied by the caller, popped out of
    /// `submitted_answers._extra_parts`.
    pub extra_parts:      Vec<TestRecord>,
    /// Files to write into the job directory before grading.
    pub autograder_files: Vec<AutograderFile>,
    /// Raw `params._images` value. Only validated once grading succeeds.
    pub images:           Option<Value>,
}

impl Submission {
    /// Reads the submission document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path)
            .with_context(|| format!("Could not read data file {}", path.display()))?;
        let value: Value = serde_json::from_slice(&raw)
            .with_context(|| format!("Could not parse {} as JSON", path.display()))?;
        Self::from_value(value, path)
    }

    /// Extracts a submission from an already parsed document read from
    /// `origin`.
    ///
    /// `_extra_parts` is removed from `submitted_answers`; everything else is
    /// left untouched.
    pub fn from_value(value: Value, origin: &Path) -> Result<Self> {
        let Value::Object(mut data) = value else {
            return Err(EntrypointError::SubmissionNotMapping(origin.to_path_buf()).into());
        };

        let answers = data
            .get_mut("submitted_answers")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| EntrypointError::MissingSubmittedAnswers(origin.to_path_buf()))?;

        let extra_parts = match answers.remove(EXTRA_PARTS_KEY) {
            Some(parts) => serde_json::from_value(parts)
                .with_context(|| format!("Malformed `{EXTRA_PARTS_KEY}` in {}", origin.display()))?,
            None => Vec::new(),
        };

        let mut params = match data.remove("params") {
            Some(Value::Object(params)) => params,
            _ => Map::new(),
        };

        let autograder_files = match params.remove(AUTOGRADER_FILES_KEY) {
            Some(files) => serde_json::from_value(files).with_context(|| {
                format!("Malformed `params.{AUTOGRADER_FILES_KEY}` in {}", origin.display())
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            extra_parts,
            autograder_files,
            images: params.remove(IMAGES_KEY),
        })
    }
}
