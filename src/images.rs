#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs, path::Path};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    constants::MAIN_PART,
    error::EntrypointError,
    paths::JobPaths,
    results::{EncodedImage, ResultsDocument},
    scoring::PartIndex,
};

/// Characters left as-is when quoting the base64 payload, as for a URL path.
const PAYLOAD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// A request to attach an image, as found in `params._images`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageSpec {
    /// Caption for the image.
    #[serde(default)]
    pub label:    Option<String>,
    /// File name under the job's `images/` directory.
    #[serde(default)]
    pub filename: Option<String>,
    /// Test name to attach to; absent or `"main"` means the overall results.
    #[serde(default)]
    pub part:     Option<String>,
}

/// Where an image ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The overall results.
    Main,
    /// The test record at this position.
    Part(usize),
}

/// Counts of what happened to each image request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttachReport {
    /// Images encoded and attached.
    pub attached: usize,
    /// Requests attached as a null placeholder because the file could not be
    /// encoded.
    pub missing:  usize,
    /// Requests dropped without leaving anything behind.
    pub skipped:  usize,
}

/// Validates `params._images`, which must be a list once grading succeeded.
pub fn image_specs(raw: Option<&Value>) -> Result<&[Value], EntrypointError> {
    raw.and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(EntrypointError::ImagesNotConfigured)
}

/// Encodes the file at `path` as a labelled data URI.
///
/// Returns `None` if the file does not exist, its MIME type cannot be guessed
/// from its name, or that type is not an image.
pub fn encode_image(path: &Path, label: &str) -> Option<EncodedImage> {
    if !path.exists() {
        tracing::warn!("Image '{}' does not exist. Skipping.", path.display());
        return None;
    }

    let Some(mime) = mime_guess::from_path(path).first() else {
        tracing::warn!("Could not determine MIME type for '{}'. Skipping.", path.display());
        return None;
    };

    if mime.type_() != mime_guess::mime::IMAGE {
        tracing::warn!("File '{}' is not an image. Skipping.", path.display());
        return None;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Could not read image '{}': {e}. Skipping.", path.display());
            return None;
        }
    };

    let payload = STANDARD.encode(bytes);
    Some(EncodedImage {
        label: label.to_string(),
        url:   format!(
            "data:{};base64,{}",
            mime.essence_str(),
            utf8_percent_encode(&payload, PAYLOAD)
        ),
    })
}

/// Resolves the target of a `part` reference.
pub fn resolve_target(part: Option<&str>, index: &PartIndex) -> Option<Target> {
    match part {
        None | Some(MAIN_PART) => Some(Target::Main),
        Some(name) => index.get(name).map(Target::Part),
    }
}

/// Attaches every requested image, in request order.
///
/// Requests lacking a label or filename, or naming an unknown part, are
/// skipped. Images that cannot be encoded still occupy a `null` slot on their
/// target so positions line up with the requests.
pub fn attach_images(
    results: &mut ResultsDocument,
    index: &PartIndex,
    specs: &[Value],
    paths: &JobPaths,
) -> AttachReport {
    let mut report = AttachReport::default();

    for raw in specs {
        let spec: ImageSpec = match serde_json::from_value(raw.clone()) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!("Image '{raw}' is not a valid image entry ({e}). Skipping.");
                report.skipped += 1;
                continue;
            }
        };

        let Some(label) = spec.label.as_deref() else {
            tracing::warn!("Image '{raw}' does not have a label. Skipping.");
            report.skipped += 1;
            continue;
        };

        let Some(filename) = spec.filename.as_deref() else {
            tracing::warn!("Image '{raw}' does not have a path. Skipping.");
            report.skipped += 1;
            continue;
        };

        let image = encode_image(&paths.image(filename), label);

        let slot = match resolve_target(spec.part.as_deref(), index) {
            Some(Target::Main) => &mut results.images,
            Some(Target::Part(i)) => &mut results.tests[i].images,
            None => {
                tracing::warn!(
                    "Part '{}' not found in tests. Skipping.",
                    spec.part.as_deref().unwrap_or_default()
                );
                report.skipped += 1;
                continue;
            }
        };

        if image.is_some() {
            report.attached += 1;
        } else {
            report.missing += 1;
        }
        slot.get_or_insert_with(Vec::new).push(image);
    }

    report
}
