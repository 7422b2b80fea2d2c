//! OCR backends.
//!
//! A backend turns a rendered page image into text. Backends are selected by
//! name from [`OcrConfig`](crate::core::config::OcrConfig); the only built-in
//! backend shells out to the `tesseract` binary.

pub mod tesseract;

pub use tesseract::TesseractBackend;

use crate::Result;
use crate::core::config::OcrConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// An OCR engine capable of recognizing text in a rendered page image.
///
/// Backends must be `Send + Sync`; per-page recognition tasks run
/// concurrently under a bounded semaphore.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Unique backend name, matched against `OcrConfig::backend`.
    fn name(&self) -> &str;

    /// Recognize text in a PNG-encoded page image.
    async fn recognize(&self, image_png: &[u8], config: &OcrConfig) -> Result<String>;
}

/// Resolve the backend named in the config.
///
/// Unknown names are a `Validation` error; the acquisition stage degrades
/// them to per-page "OCR failed" records rather than failing the document.
pub fn backend_for(config: &OcrConfig) -> Result<Arc<dyn OcrBackend>> {
    match config.backend.as_str() {
        "tesseract" => Ok(Arc::new(TesseractBackend::new())),
        other => Err(crate::TaxorgError::validation(format!(
            "unknown OCR backend: {}",
            other
        ))),
    }
}
