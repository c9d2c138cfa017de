#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::EntrypointError;

/// An image embedded as a data URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Caption shown next to the image.
    pub label: String,
    /// `data:<mime>;base64,<payload>` URI.
    pub url:   String,
}

/// Image slots attached to a test record or to the overall results. A `None`
/// slot stands for an image that was requested but could not be encoded.
pub type ImageSlots = Vec<Option<EncodedImage>>;

/// A single graded part.
///
/// Only the keys used for scoring and image binding are typed. Everything
/// else (`description`, `message`, `output`, ...) stays in `extra` exactly as
/// written, `null`s included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Name of the part; images bind to parts by this name.
    pub name:       String,
    /// Points awarded, kept in the number form it was written in.
    pub points:     Number,
    /// Points available, kept in the number form it was written in.
    pub max_points: Number,
    /// Images bound to this part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images:     Option<ImageSlots>,
    /// All other keys of the record.
    #[serde(flatten)]
    pub extra:      Map<String, Value>,
}

impl TestRecord {
    /// Creates a record with only the required fields set.
    pub fn new(
        name: impl Into<String>,
        points: impl Into<Number>,
        max_points: impl Into<Number>,
    ) -> Self {
        Self {
            name:       name.into(),
            points:     points.into(),
            max_points: max_points.into(),
            images:     None,
            extra:      Map::new(),
        }
    }

    /// Points awarded, as a float for arithmetic.
    pub fn points_value(&self) -> f64 {
        self.points.as_f64().unwrap_or_default()
    }

    /// Points available, as a float for arithmetic.
    pub fn max_points_value(&self) -> f64 {
        self.max_points.as_f64().unwrap_or_default()
    }

    /// An untyped key of the record, such as `message`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Appends an image slot, creating the list on first use.
    pub fn push_image(&mut self, image: Option<EncodedImage>) {
        self.images.get_or_insert_with(Vec::new).push(image);
    }
}

/// The harness's output document, mutated in place and written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    /// Whether the grading job itself ran to completion.
    #[serde(default)]
    pub succeeded: bool,
    /// Graded parts, in report order.
    #[serde(default)]
    pub tests:     Vec<TestRecord>,
    /// Fraction of points earned over points available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score:     Option<f64>,
    /// Images bound to the overall results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images:    Option<ImageSlots>,
    /// Keys written by the harness that are not modelled above.
    #[serde(flatten)]
    pub extra:     Map<String, Value>,
}

impl ResultsDocument {
    /// Reads the results document at `path`.
    ///
    /// Fails if the file is unreadable, is not JSON, or is not an object.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path)
            .with_context(|| format!("Could not read results file {}", path.display()))?;
        Self::parse(&raw, path)
    }

    /// Parses a results document read from `origin`.
    pub fn parse(raw: &[u8], origin: &Path) -> Result<Self> {
        let value: Value = serde_json::from_slice(raw)
            .with_context(|| format!("Could not parse {} as JSON", origin.display()))?;
        if !value.is_object() {
            return Err(EntrypointError::ResultsNotMapping(origin.to_path_buf()).into());
        }

        serde_json::from_value(value)
            .with_context(|| format!("Malformed results document in {}", origin.display()))
    }

    /// Appends an image slot to the overall results, creating the list on
    /// first use.
    pub fn push_image(&mut self, image: Option<EncodedImage>) {
        self.images.get_or_insert_with(Vec::new).push(image);
    }

    /// Overwrites `path` with this document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Could not serialize results")?;
        fs::write(path, json)
            .with_context(|| format!("Could not write results file {}", path.display()))
    }
}
