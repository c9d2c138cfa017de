#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fs;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{error::EntrypointError, paths::JobPaths, submission::AutograderFile};

/// Decodes the text contents of an autograder file.
///
/// Characters outside the base64 alphabet, such as the line breaks of
/// wrapped encoder output, are discarded before decoding.
pub fn decode_contents(file: &AutograderFile) -> Result<String, EntrypointError> {
    let invalid = |reason: String| EntrypointError::InvalidAutograderFile {
        path: file.path.clone(),
        reason,
    };

    let alphabet: String = file
        .contents
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let bytes = STANDARD
        .decode(alphabet)
        .map_err(|e| invalid(format!("invalid base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| invalid(format!("not UTF-8 text: {e}")))
}

/// Writes every autograder file into the job directory, overwriting existing
/// files. Returns how many files were written.
pub fn materialize(paths: &JobPaths, files: &[AutograderFile]) -> Result<usize> {
    for file in files {
        let text = decode_contents(file)?;
        let dest = paths.resolve(&file.path);
        fs::write(&dest, text)
            .with_context(|| format!("Could not write autograder file {}", dest.display()))?;
        tracing::info!("Wrote autograder file {}", dest.display());
    }

    Ok(files.len())
}
