//! Field extraction engine.
//!
//! Every operation is a pure function of the observations and the
//! configuration. Malformed observations are logged and skipped; finding
//! nothing yields empty results rather than an error.

pub mod candidates;
pub mod cluster;
pub mod dates;
pub mod labels;
pub mod patterns;

pub use candidates::CandidateScorer;
pub use cluster::BlockClusterer;
pub use dates::{DateRecognizer, is_likely_date, normalize_date, parse_date};
pub use labels::{LabelMatcher, Located, assign_greedy};

use std::borrow::Cow;
use std::collections::BTreeMap;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::geometry::ImageSize;
use crate::models::{
    Candidate, ClusterConfig, DateToken, DocfieldConfig, DocumentFields, LabelConfig,
    LabeledField, Page, ScoringConfig, TextBlock, TextObservation,
};
use crate::ocr::OcrProvider;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for text-level field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Check a single observation against the input contract.
pub fn validate_observation(index: usize, observation: &TextObservation) -> Result<()> {
    if observation.text.trim().is_empty() {
        return Err(ExtractionError::MalformedInput {
            index,
            reason: "empty text".to_string(),
        });
    }

    if !observation.bounding_box.is_normalized() {
        return Err(ExtractionError::MalformedInput {
            index,
            reason: format!("bounding box out of bounds: {:?}", observation.bounding_box),
        });
    }

    Ok(())
}

/// Drop malformed observations, keeping the rest in order.
///
/// Borrows the input when nothing needs to be dropped.
pub fn sanitize(observations: &[TextObservation]) -> Cow<'_, [TextObservation]> {
    let problems: Vec<ExtractionError> = observations
        .iter()
        .enumerate()
        .filter_map(|(i, o)| validate_observation(i, o).err())
        .collect();

    if problems.is_empty() {
        return Cow::Borrowed(observations);
    }

    for problem in &problems {
        warn!("Skipping observation: {}", problem);
    }

    Cow::Owned(
        observations
            .iter()
            .enumerate()
            .filter(|(i, o)| validate_observation(*i, o).is_ok())
            .map(|(_, o)| o.clone())
            .collect(),
    )
}

/// Identifier candidates around `anchor`, most likely first.
pub fn extract_identifier(
    observations: &[TextObservation],
    anchor: &str,
    config: &ScoringConfig,
) -> Vec<String> {
    CandidateScorer::new(config.clone()).rank(&sanitize(observations), anchor)
}

/// Nearest date for each label keyword found in the document.
pub fn extract_labeled_dates(
    observations: &[TextObservation],
    label_keywords: &[String],
    config: &LabelConfig,
) -> BTreeMap<String, String> {
    let config = LabelConfig {
        keywords: label_keywords.to_vec(),
        ..config.clone()
    };

    LabelMatcher::new(config)
        .match_dates(&sanitize(observations))
        .into_iter()
        .map(|field| (field.label, field.value))
        .collect()
}

/// Every distinct date, ascending, as `YYYY-MM-DD`.
pub fn extract_all_dates(observations: &[TextObservation]) -> Vec<String> {
    dates::collect_all_dates(&sanitize(observations))
}

/// First date of each observation, in scan order, not deduplicated.
pub fn extract_first_dates(observations: &[TextObservation]) -> Vec<DateToken> {
    dates::collect_first_dates(&sanitize(observations))
}

/// Merge observations into logical text blocks.
pub fn cluster_text_blocks(
    observations: &[TextObservation],
    image_size: ImageSize,
    config: &ClusterConfig,
) -> Vec<TextBlock> {
    BlockClusterer::new(config.clone()).cluster(&sanitize(observations), image_size)
}

/// Configured extraction engine.
///
/// Holds only read-only configuration, so one instance can serve concurrent
/// calls on different pages.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: DocfieldConfig,
    clusterer: BlockClusterer,
    scorer: CandidateScorer,
    matcher: LabelMatcher,
}

impl Extractor {
    /// Create an extractor from configuration.
    pub fn new(config: DocfieldConfig) -> Self {
        Self {
            clusterer: BlockClusterer::new(config.cluster.clone()),
            scorer: CandidateScorer::new(config.scoring.clone()),
            matcher: LabelMatcher::new(config.labels.clone()),
            config,
        }
    }

    pub fn config(&self) -> &DocfieldConfig {
        &self.config
    }

    /// Scored identifier candidates for the configured anchor.
    pub fn identifier_candidates(&self, observations: &[TextObservation]) -> Vec<Candidate> {
        self.scorer
            .candidates(&sanitize(observations), &self.config.scoring.anchor)
    }

    /// Identifier candidates for the configured anchor, best first.
    pub fn extract_identifier(&self, observations: &[TextObservation]) -> Vec<String> {
        self.scorer
            .rank(&sanitize(observations), &self.config.scoring.anchor)
    }

    /// Label assignments, in keyword order.
    pub fn match_labeled_dates(&self, observations: &[TextObservation]) -> Vec<LabeledField> {
        self.matcher.match_dates(&sanitize(observations))
    }

    /// Label assignments as a label to value map.
    pub fn extract_labeled_dates(&self, observations: &[TextObservation]) -> BTreeMap<String, String> {
        self.match_labeled_dates(observations)
            .into_iter()
            .map(|field| (field.label, field.value))
            .collect()
    }

    pub fn extract_all_dates(&self, observations: &[TextObservation]) -> Vec<String> {
        extract_all_dates(observations)
    }

    pub fn extract_first_dates(&self, observations: &[TextObservation]) -> Vec<DateToken> {
        extract_first_dates(observations)
    }

    /// Text blocks of a page, using its image size for the merge predicate.
    pub fn cluster_text_blocks(&self, page: &Page) -> Vec<TextBlock> {
        self.clusterer
            .cluster(&sanitize(&page.observations), page.image_size)
    }

    /// Run every extraction over one page.
    pub fn extract_document(&self, page: &Page) -> DocumentFields {
        let observations = sanitize(&page.observations);

        let fields = DocumentFields {
            identifiers: self
                .scorer
                .rank(&observations, &self.config.scoring.anchor),
            labeled_dates: self
                .matcher
                .match_dates(&observations)
                .into_iter()
                .map(|field| (field.label, field.value))
                .collect(),
            dates: dates::collect_all_dates(&observations),
            blocks: self.clusterer.cluster(&observations, page.image_size),
        };

        debug!(
            "Extracted {} identifiers, {} labeled dates, {} dates, {} blocks",
            fields.identifiers.len(),
            fields.labeled_dates.len(),
            fields.dates.len(),
            fields.blocks.len()
        );

        fields
    }

    /// Run the OCR collaborator. A provider failure means there is nothing
    /// to extract from.
    pub fn recognize<P: OcrProvider>(&self, provider: &P, image: &DynamicImage) -> Result<Page> {
        provider
            .recognize(image)
            .map_err(|e| ExtractionError::Unavailable(e.to_string()))
    }

    /// Recognize an image and extract every field from it.
    pub fn extract_from_image<P: OcrProvider>(
        &self,
        provider: &P,
        image: &DynamicImage,
    ) -> crate::Result<DocumentFields> {
        let page = self.recognize(provider, image)?;
        Ok(self.extract_document(&page))
    }
}
