//! Low-level PDF processing: per-page text-layer extraction and page
//! rendering for OCR input. Used internally by the organizer parser.

pub mod error;
pub mod rendering;
pub mod text;

pub use error::PdfError;
pub use rendering::{PdfRenderer, RenderOptions};
pub use text::PdfTextExtractor;

use pdfium_render::prelude::*;

/// Bind to the pdfium library, preferring a copy next to the executable and
/// falling back to the system library.
pub(crate) fn bind_pdfium(
    map_err: fn(String) -> PdfError,
    context: &'static str,
) -> Result<Box<dyn PdfiumLibraryBindings>, PdfError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| map_err(format!("Pdfium initialization failed ({}): {}", context, e)))
}
