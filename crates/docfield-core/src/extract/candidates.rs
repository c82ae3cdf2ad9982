//! Identifier candidate generation and scoring.

use tracing::debug;

use super::patterns::{ALPHABETIC, NUMERIC_DATE_SHAPES};
use crate::geometry::NormalizedRect;
use crate::models::{Candidate, ProximityWindow, ScoringConfig, TextObservation};

/// Generates, filters and ranks identifier candidates around an anchor
/// keyword.
#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    config: ScoringConfig,
}

impl CandidateScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Box of the first observation containing `anchor`, case-insensitively.
    pub fn find_anchor(
        &self,
        observations: &[TextObservation],
        anchor: &str,
    ) -> Option<NormalizedRect> {
        let anchor = anchor.trim().to_lowercase();
        if anchor.is_empty() {
            return None;
        }

        observations
            .iter()
            .find(|o| o.text.to_lowercase().contains(&anchor))
            .map(|o| o.bounding_box)
    }

    /// Window around the anchor inside which candidates get the proximity
    /// bonus.
    pub fn proximity_window(&self, anchor_box: &NormalizedRect) -> NormalizedRect {
        match self.config.window {
            ProximityWindow::Multiplicative {
                width_factor,
                height_factor,
            } => anchor_box.extend(
                anchor_box.width * (width_factor - 1.0),
                anchor_box.height * (height_factor - 1.0),
            ),
            ProximityWindow::Additive { dx, dy } => anchor_box.expand(dx, dy),
        }
    }

    fn is_separator(&self, c: char) -> bool {
        self.config.separators.contains(c)
    }

    /// Letters, digits and separators only, no embedded spaces.
    pub fn has_identifier_shape(&self, token: &str) -> bool {
        !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || self.is_separator(c))
    }

    /// Pure words, numeric dates and separator runs are never identifiers.
    pub fn is_rejected(&self, token: &str) -> bool {
        ALPHABETIC.is_match(token)
            || NUMERIC_DATE_SHAPES.iter().any(|p| p.is_match(token))
            || token.chars().all(|c| self.is_separator(c))
    }

    /// Heuristic score of a single token.
    pub fn score(&self, token: &str, near_anchor: bool) -> i32 {
        let mut score = 0;

        if near_anchor {
            score += self.config.proximity_weight;
        }
        if token == token.to_uppercase() {
            score += self.config.uppercase_weight;
        }
        let has_letter = token.chars().any(|c| c.is_alphabetic());
        let has_digit = token.chars().any(|c| c.is_ascii_digit());
        if has_letter && has_digit {
            score += self.config.alnum_weight;
        }
        if token.chars().any(|c| self.is_separator(c)) {
            score += self.config.separator_weight;
        }

        score
    }

    /// Scored candidates, best first. Ties keep their scan order.
    pub fn candidates(&self, observations: &[TextObservation], anchor: &str) -> Vec<Candidate> {
        let window = self
            .find_anchor(observations, anchor)
            .map(|anchor_box| self.proximity_window(&anchor_box));

        if window.is_none() {
            debug!("Anchor '{}' not found, scoring on token rules only", anchor);
        }

        let mut candidates: Vec<Candidate> = observations
            .iter()
            .flat_map(|o| {
                o.text
                    .split_whitespace()
                    .map(move |token| (token, o.bounding_box))
            })
            .filter(|(token, _)| self.has_identifier_shape(token) && !self.is_rejected(token))
            .map(|(token, bounding_box)| {
                let near_anchor = window.is_some_and(|w| w.intersects(&bounding_box));
                Candidate {
                    text: token.to_string(),
                    score: self.score(token, near_anchor),
                    bounding_box,
                }
            })
            .collect();

        candidates.sort_by(|a, b| b.score.cmp(&a.score));

        debug!("Ranked {} identifier candidates", candidates.len());

        candidates
    }

    /// Candidate strings, best first.
    pub fn rank(&self, observations: &[TextObservation], anchor: &str) -> Vec<String> {
        self.candidates(observations, anchor)
            .into_iter()
            .map(|c| c.text)
            .collect()
    }
}
