//! Label-to-value assignment by spatial proximity.
//!
//! Assignment is greedy: labels are visited in keyword order and each takes
//! the nearest value still in the pool. A label can therefore take a value
//! that a later label was closer to. This is not an optimal matching.

use tracing::debug;

use super::FieldExtractor;
use super::dates::{DateRecognizer, format_canonical};
use crate::geometry::NormalizedRect;
use crate::models::{DateToken, LabelConfig, LabeledField, TextObservation};

/// Anything with a source bounding box.
pub trait Located {
    fn bounding_box(&self) -> &NormalizedRect;
}

/// A validated date together with the box it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct DateValue {
    pub token: DateToken,
    pub bounding_box: NormalizedRect,
}

impl Located for DateValue {
    fn bounding_box(&self) -> &NormalizedRect {
        &self.bounding_box
    }
}

/// Greedy nearest-neighbour assignment.
///
/// For each `(key, box)` in order, picks the pool entry minimizing
/// `metric(box, entry_box)` (earliest entry on ties), then removes it and
/// every entry equal to it from the pool. Keys left without entries are
/// omitted from the result.
pub fn assign_greedy<K, V, M>(
    anchors: impl IntoIterator<Item = (K, NormalizedRect)>,
    mut pool: Vec<V>,
    metric: M,
) -> Vec<(K, V)>
where
    V: Located + PartialEq,
    M: Fn(&NormalizedRect, &NormalizedRect) -> f32,
{
    let mut assigned = Vec::new();

    for (key, anchor_box) in anchors {
        let mut best: Option<(usize, f32)> = None;
        for (i, value) in pool.iter().enumerate() {
            let distance = metric(&anchor_box, value.bounding_box());
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }

        let Some((index, _)) = best else {
            continue;
        };

        let picked = pool.remove(index);
        pool.retain(|v| *v != picked);
        assigned.push((key, picked));
    }

    assigned
}

/// Box of the first observation containing each label, case-insensitively.
/// Labels that never appear are skipped.
pub fn locate_labels(
    observations: &[TextObservation],
    keywords: &[String],
) -> Vec<(String, NormalizedRect)> {
    keywords
        .iter()
        .filter_map(|label| {
            let needle = label.to_lowercase();
            observations
                .iter()
                .find(|o| o.text.to_lowercase().contains(&needle))
                .map(|o| (label.clone(), o.bounding_box))
        })
        .collect()
}

/// Every validated date in every observation, with its source box.
pub fn date_values(observations: &[TextObservation]) -> Vec<DateValue> {
    let recognizer = DateRecognizer::new();

    observations
        .iter()
        .flat_map(|o| {
            recognizer
                .extract_all(&o.text)
                .into_iter()
                .map(move |token| DateValue {
                    token,
                    bounding_box: o.bounding_box,
                })
        })
        .collect()
}

/// Matches label keywords to the nearest free-floating dates.
#[derive(Debug, Clone, Default)]
pub struct LabelMatcher {
    config: LabelConfig,
}

impl LabelMatcher {
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Assign dates to labels using Manhattan distance between box origins.
    pub fn match_dates(&self, observations: &[TextObservation]) -> Vec<LabeledField> {
        self.match_dates_with(observations, NormalizedRect::manhattan_distance)
    }

    /// Assign dates to labels using a caller-provided metric.
    pub fn match_dates_with<M>(&self, observations: &[TextObservation], metric: M) -> Vec<LabeledField>
    where
        M: Fn(&NormalizedRect, &NormalizedRect) -> f32,
    {
        let labels = locate_labels(observations, &self.config.keywords);
        let values = date_values(observations);

        debug!(
            "Matching {} located labels against {} date values",
            labels.len(),
            values.len()
        );

        assign_greedy(labels, values, metric)
            .into_iter()
            .map(|(label, value)| LabeledField {
                label,
                value: if self.config.canonical_values {
                    format_canonical(value.token.parsed)
                } else {
                    value.token.raw
                },
                bounding_box: value.bounding_box,
            })
            .collect()
    }
}
