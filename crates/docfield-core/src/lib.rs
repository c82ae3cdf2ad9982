//! Core library for document field extraction from OCR output.
//!
//! This crate provides:
//! - Geometry over normalized, bottom-left-origin bounding boxes
//! - Text block clustering by vertical proximity and column alignment
//! - Identifier candidate scoring around an anchor keyword
//! - Greedy label-to-date assignment by spatial proximity
//! - Date recognition, calendar validation and normalization
//! - A boundary trait for the OCR collaborator that produces observations

pub mod error;
pub mod extract;
pub mod geometry;
pub mod models;
pub mod ocr;

pub use error::{DocfieldError, ExtractionError, OcrError, Result};
pub use extract::{
    BlockClusterer, CandidateScorer, DateRecognizer, Extractor, FieldExtractor, LabelMatcher,
    cluster_text_blocks, extract_all_dates, extract_first_dates, extract_identifier,
    extract_labeled_dates, is_likely_date, normalize_date, parse_date,
};
pub use geometry::{ImageSize, NormalizedRect, PixelRect};
pub use models::{
    Candidate, ClusterConfig, DateToken, DocfieldConfig, DocumentFields, LabelConfig,
    LabeledField, OcrConfig, Page, ProximityWindow, ScoringConfig, TextBlock, TextObservation,
};
pub use ocr::{OcrProvider, RecordedOcr};

#[cfg(feature = "native")]
pub use ocr::PureOcrProvider;
