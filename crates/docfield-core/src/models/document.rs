//! Value types flowing through the extraction engine.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DocfieldError;
use crate::geometry::{ImageSize, NormalizedRect};

/// One OCR-recognized text fragment with its normalized bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObservation {
    /// Recognized text (top candidate).
    pub text: String,
    /// Bounding box, bottom-left origin.
    pub bounding_box: NormalizedRect,
}

impl TextObservation {
    pub fn new(text: impl Into<String>, bounding_box: NormalizedRect) -> Self {
        Self {
            text: text.into(),
            bounding_box,
        }
    }
}

/// Output of a single OCR call over one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Source image dimensions.
    #[serde(default)]
    pub image_size: ImageSize,
    /// Observations in OCR scan order.
    pub observations: Vec<TextObservation>,
}

/// Observation files are either a full [`Page`] or a bare observation array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PageFile {
    Page(Page),
    Observations(Vec<TextObservation>),
}

impl Page {
    pub fn new(image_size: ImageSize, observations: Vec<TextObservation>) -> Self {
        Self {
            image_size,
            observations,
        }
    }

    /// Parse a page from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocfieldError> {
        let page = match serde_json::from_str::<PageFile>(json)? {
            PageFile::Page(page) => page,
            PageFile::Observations(observations) => Page::new(ImageSize::UNIT, observations),
        };
        Ok(page)
    }

    /// Load a page from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DocfieldError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// A provisional extracted value awaiting ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub score: i32,
    pub bounding_box: NormalizedRect,
}

/// A label keyword paired with its nearest value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledField {
    pub label: String,
    pub value: String,
    /// Box of the observation the value came from.
    pub bounding_box: NormalizedRect,
}

/// A validated date substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateToken {
    /// Substring as it appeared in the source text.
    pub raw: String,
    /// Calendar value.
    pub parsed: NaiveDate,
}

impl DateToken {
    /// Render as `YYYY-MM-DD`.
    pub fn canonical(&self) -> String {
        self.parsed.format(crate::extract::dates::CANONICAL_FORMAT).to_string()
    }
}

/// A merged cluster of observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub bounding_box: NormalizedRect,
    pub text: String,
}

/// Everything the engine extracts from one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFields {
    /// Identifier candidates, most likely first.
    pub identifiers: Vec<String>,
    /// Label to value assignments.
    pub labeled_dates: BTreeMap<String, String>,
    /// Every distinct date, ascending, `YYYY-MM-DD`.
    pub dates: Vec<String>,
    /// Merged text blocks.
    pub blocks: Vec<TextBlock>,
}

impl DocumentFields {
    /// Best identifier candidate, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifiers.first().map(String::as_str)
    }
}
