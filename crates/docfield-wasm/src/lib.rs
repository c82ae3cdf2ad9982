//! WASM bindings for document field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Observations are passed as plain JS objects of the form
//! `{ text, bounding_box: { x, y, width, height } }` in normalized,
//! bottom-left-origin coordinates.

use wasm_bindgen::prelude::*;

use docfield_core::ocr::normalize_pixel_box;
use docfield_core::{
    ClusterConfig, DocfieldConfig, Extractor, ImageSize, LabelConfig, NormalizedRect, Page,
    ScoringConfig, TextObservation,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn observations_from_js(observations: JsValue) -> Result<Vec<TextObservation>, JsValue> {
    serde_wasm_bindgen::from_value(observations).map_err(to_js_error)
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

/// Rank identifier candidates around `anchor`, best first.
#[wasm_bindgen]
pub fn extract_identifier(observations: JsValue, anchor: &str) -> Result<JsValue, JsValue> {
    let observations = observations_from_js(observations)?;
    to_js(&docfield_core::extract_identifier(
        &observations,
        anchor,
        &ScoringConfig::default(),
    ))
}

/// Assign the nearest date to each label keyword.
///
/// `labels` is an array of strings; returns an object mapping label to date.
#[wasm_bindgen]
pub fn extract_labeled_dates(observations: JsValue, labels: JsValue) -> Result<JsValue, JsValue> {
    let observations = observations_from_js(observations)?;
    let labels: Vec<String> = serde_wasm_bindgen::from_value(labels).map_err(to_js_error)?;

    to_js(&docfield_core::extract_labeled_dates(
        &observations,
        &labels,
        &LabelConfig::default(),
    ))
}

/// Every distinct date, ascending, as `YYYY-MM-DD` strings.
#[wasm_bindgen]
pub fn extract_all_dates(observations: JsValue) -> Result<JsValue, JsValue> {
    let observations = observations_from_js(observations)?;
    to_js(&docfield_core::extract_all_dates(&observations))
}

/// Merge observations into text blocks for an image of the given size.
#[wasm_bindgen]
pub fn cluster_text_blocks(observations: JsValue, width: u32, height: u32) -> Result<JsValue, JsValue> {
    let observations = observations_from_js(observations)?;
    to_js(&docfield_core::cluster_text_blocks(
        &observations,
        ImageSize::new(width, height),
        &ClusterConfig::default(),
    ))
}

/// Validate a date string and render it as `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn normalize_date(text: &str) -> Option<String> {
    docfield_core::normalize_date(text)
}

/// Check whether the whole string is a real calendar date.
#[wasm_bindgen]
pub fn is_likely_date(text: &str) -> bool {
    docfield_core::is_likely_date(text)
}

/// Configured extractor class for browser use.
#[wasm_bindgen]
pub struct FieldExtractor {
    extractor: Extractor,
}

#[wasm_bindgen]
impl FieldExtractor {
    /// Create an extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: Extractor::default(),
        }
    }

    /// Create an extractor from a JSON configuration document.
    #[wasm_bindgen]
    pub fn from_config(json: &str) -> Result<FieldExtractor, JsValue> {
        let config: DocfieldConfig = serde_json::from_str(json).map_err(to_js_error)?;
        Ok(Self {
            extractor: Extractor::new(config),
        })
    }

    /// Current configuration as a JSON string.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.extractor.config()).map_err(to_js_error)
    }

    /// Change the identifier anchor keyword.
    #[wasm_bindgen]
    pub fn set_anchor(&mut self, anchor: &str) {
        let mut config = self.extractor.config().clone();
        config.scoring.anchor = anchor.to_string();
        self.extractor = Extractor::new(config);
    }

    /// Replace the label keywords.
    #[wasm_bindgen]
    pub fn set_labels(&mut self, labels: JsValue) -> Result<(), JsValue> {
        let labels: Vec<String> = serde_wasm_bindgen::from_value(labels).map_err(to_js_error)?;
        let mut config = self.extractor.config().clone();
        config.labels.keywords = labels;
        self.extractor = Extractor::new(config);
        Ok(())
    }

    /// Identifier candidates, best first.
    #[wasm_bindgen]
    pub fn extract_identifier(&self, observations: JsValue) -> Result<JsValue, JsValue> {
        let observations = observations_from_js(observations)?;
        to_js(&self.extractor.extract_identifier(&observations))
    }

    /// Identifier candidates with their scores.
    #[wasm_bindgen]
    pub fn identifier_candidates(&self, observations: JsValue) -> Result<JsValue, JsValue> {
        let observations = observations_from_js(observations)?;
        to_js(&self.extractor.identifier_candidates(&observations))
    }

    /// Label to date mapping for the configured keywords.
    #[wasm_bindgen]
    pub fn extract_labeled_dates(&self, observations: JsValue) -> Result<JsValue, JsValue> {
        let observations = observations_from_js(observations)?;
        to_js(&self.extractor.extract_labeled_dates(&observations))
    }

    /// Run every extraction over a page `{ image_size, observations }`.
    #[wasm_bindgen]
    pub fn extract_document(&self, page: JsValue) -> Result<JsValue, JsValue> {
        let page: Page = serde_wasm_bindgen::from_value(page).map_err(to_js_error)?;
        to_js(&self.extractor.extract_document(&page))
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Page assembled from browser-side OCR results.
#[wasm_bindgen]
pub struct PageBuilder {
    page: Page,
}

#[wasm_bindgen]
impl PageBuilder {
    /// Start a page for an image of the given pixel size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            page: Page::new(ImageSize::new(width, height), Vec::new()),
        }
    }

    /// Add an observation with a normalized, bottom-left-origin box.
    #[wasm_bindgen]
    pub fn add(&mut self, text: &str, x: f32, y: f32, width: f32, height: f32) {
        self.page
            .observations
            .push(TextObservation::new(text, NormalizedRect::new(x, y, width, height)));
    }

    /// Add an observation with a top-left-origin pixel box.
    #[wasm_bindgen]
    pub fn add_pixel_box(&mut self, text: &str, min_x: f32, min_y: f32, max_x: f32, max_y: f32) {
        let bounding_box = normalize_pixel_box((min_x, min_y, max_x, max_y), self.page.image_size);
        self.page
            .observations
            .push(TextObservation::new(text, bounding_box));
    }

    /// Number of observations added so far.
    #[wasm_bindgen]
    pub fn len(&self) -> usize {
        self.page.observations.len()
    }

    #[wasm_bindgen]
    pub fn is_empty(&self) -> bool {
        self.page.is_empty()
    }

    /// The page as a JS object.
    #[wasm_bindgen]
    pub fn build(&self) -> Result<JsValue, JsValue> {
        to_js(&self.page)
    }

    /// Extract every field with the given extractor.
    #[wasm_bindgen]
    pub fn extract(&self, extractor: &FieldExtractor) -> Result<JsValue, JsValue> {
        to_js(&extractor.extractor.extract_document(&self.page))
    }
}
