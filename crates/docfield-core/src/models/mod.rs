//! Data models and configuration.

pub mod config;
pub mod document;

pub use config::{ClusterConfig, DocfieldConfig, LabelConfig, OcrConfig, ProximityWindow, ScoringConfig};
pub use document::{
    Candidate, DateToken, DocumentFields, LabeledField, Page, TextBlock, TextObservation,
};
