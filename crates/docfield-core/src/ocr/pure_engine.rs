//! OCR provider backed by `pure-onnx-ocr`.

use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::geometry::ImageSize;
use crate::models::{OcrConfig, Page, TextObservation};

use super::{OcrProvider, normalize_pixel_box};

/// OCR provider backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrProvider {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unk: bool,
}

impl PureOcrProvider {
    /// Load detection and recognition models from the configured directory.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine,
            keep_unk: config.keep_unk,
        })
    }
}

impl OcrProvider for PureOcrProvider {
    fn recognize(&self, image: &DynamicImage) -> Result<Page, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!("{}x{}", width, height)));
        }
        let size = ImageSize::new(width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let observations: Vec<TextObservation> = results
            .iter()
            .map(|r| {
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                let bounding_box = normalize_pixel_box(polygon_extent(&r.bounding_box), size);
                TextObservation::new(text.trim(), bounding_box)
            })
            .collect();

        info!(
            "OCR complete: {} observations in {}ms",
            observations.len(),
            start.elapsed().as_millis()
        );

        Ok(Page::new(size, observations))
    }
}

/// Axis-aligned extent `(min_x, min_y, max_x, max_y)` of a pixel polygon.
fn polygon_extent(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32, f32, f32) {
    let mut extent = (f32::INFINITY, f32::INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
    for coord in polygon.exterior().coords() {
        extent.0 = extent.0.min(coord.x as f32);
        extent.1 = extent.1.min(coord.y as f32);
        extent.2 = extent.2.max(coord.x as f32);
        extent.3 = extent.3.max(coord.y as f32);
    }
    if !extent.0.is_finite() {
        return (0.0, 0.0, 0.0, 0.0);
    }
    extent
}
