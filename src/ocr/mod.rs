pub mod tesseract;

pub use tesseract::TesseractOcr;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait every OCR text producer must implement.
///
/// The pipeline only needs raw text; an empty string means "nothing
/// recognized" and is handled downstream as a no-data batch, never as an
/// error. Keeping recognition behind this seam lets the reconciliation
/// pipeline run on synthetic text in tests.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Run recognition on the image at `image_path` and return raw text.
    async fn extract_text(&self, image_path: &Path) -> Result<String>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
