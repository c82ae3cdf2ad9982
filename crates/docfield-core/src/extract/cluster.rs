//! Merging OCR observations into logical text blocks.
//!
//! Single pass, first match wins: an observation joins the first existing
//! cluster it is close to and column-aligned with. Clusters are never split
//! and never merged with each other afterwards, even when a later box would
//! bridge two of them.

use tracing::debug;

use crate::geometry::{ImageSize, NormalizedRect};
use crate::models::{ClusterConfig, TextBlock, TextObservation};

/// Geometric block clusterer.
#[derive(Debug, Clone, Default)]
pub struct BlockClusterer {
    config: ClusterConfig,
}

impl BlockClusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Merge predicate, evaluated in pixel scale.
    ///
    /// Boxes merge when the gap between one box's top and the other's bottom
    /// is under the vertical threshold and either their left or their right
    /// edges line up within the horizontal threshold.
    pub fn should_merge(&self, a: &NormalizedRect, b: &NormalizedRect, size: ImageSize) -> bool {
        let a = a.scaled(size);
        let b = b.scaled(size);
        let max_dy = self.config.vertical_threshold * size.height as f32;
        let max_dx = self.config.horizontal_threshold * size.width as f32;

        let close_vertically =
            (a.max_y() - b.min_y()).abs() < max_dy || (b.max_y() - a.min_y()).abs() < max_dy;
        let same_column =
            (a.min_x() - b.min_x()).abs() < max_dx || (a.max_x() - b.max_x()).abs() < max_dx;

        close_vertically && same_column
    }

    /// Reduce observation boxes to merged cluster boxes.
    pub fn merge_boxes(
        &self,
        observations: &[TextObservation],
        size: ImageSize,
    ) -> Vec<NormalizedRect> {
        let mut merged: Vec<NormalizedRect> = Vec::new();

        for observation in observations {
            let new_box = observation.bounding_box;

            match merged
                .iter_mut()
                .find(|cluster| self.should_merge(cluster, &new_box, size))
            {
                Some(cluster) => *cluster = cluster.union(&new_box),
                None => merged.push(new_box),
            }
        }

        debug!(
            "Merged {} observations into {} blocks",
            observations.len(),
            merged.len()
        );

        merged
    }

    /// Cluster observations and recover each block's text.
    pub fn cluster(&self, observations: &[TextObservation], size: ImageSize) -> Vec<TextBlock> {
        let boxes = self.merge_boxes(observations, size);
        let texts = block_texts(&boxes, observations);

        boxes
            .into_iter()
            .zip(texts)
            .map(|(bounding_box, text)| TextBlock { bounding_box, text })
            .collect()
    }
}

/// Text of each merged box: every observation whose box intersects it,
/// joined with single spaces in observation order.
pub fn block_texts(boxes: &[NormalizedRect], observations: &[TextObservation]) -> Vec<String> {
    boxes
        .iter()
        .map(|block| {
            observations
                .iter()
                .filter(|o| o.bounding_box.intersects(block))
                .map(|o| o.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
