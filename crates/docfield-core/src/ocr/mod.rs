//! Boundary with the OCR collaborator.
//!
//! The engine never runs OCR itself. A provider turns an image into a
//! [`Page`] of observations in normalized, bottom-left-origin coordinates;
//! extraction starts only once that page exists.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrProvider;

use image::DynamicImage;

use crate::error::OcrError;
use crate::geometry::{ImageSize, NormalizedRect};
use crate::models::Page;

/// Anything able to recognize text in an image.
pub trait OcrProvider {
    /// Run OCR over one image.
    fn recognize(&self, image: &DynamicImage) -> Result<Page, OcrError>;
}

impl<P: OcrProvider + ?Sized> OcrProvider for &P {
    fn recognize(&self, image: &DynamicImage) -> Result<Page, OcrError> {
        (**self).recognize(image)
    }
}

/// Provider returning a fixed page, used for replaying recorded OCR output.
#[derive(Debug, Clone)]
pub struct RecordedOcr {
    page: Page,
}

impl RecordedOcr {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

impl OcrProvider for RecordedOcr {
    fn recognize(&self, _image: &DynamicImage) -> Result<Page, OcrError> {
        Ok(self.page.clone())
    }
}

/// Convert a top-left-origin pixel box to a normalized bottom-left rect,
/// clamped to the unit square.
pub fn normalize_pixel_box(
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
    size: ImageSize,
) -> NormalizedRect {
    let (w, h) = (size.width.max(1) as f32, size.height.max(1) as f32);

    let x0 = (min_x / w).clamp(0.0, 1.0);
    let x1 = (max_x / w).clamp(0.0, 1.0);
    let top = (min_y / h).clamp(0.0, 1.0);
    let bottom = (max_y / h).clamp(0.0, 1.0);

    NormalizedRect {
        x: x0,
        y: 1.0 - bottom,
        width: (x1 - x0).max(0.0),
        height: (bottom - top).max(0.0),
    }
}
