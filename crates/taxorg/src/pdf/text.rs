//! Per-page PDF text-layer extraction via pdfium-render.

use super::bind_pdfium;
use super::error::{PdfError, Result};
use pdfium_render::prelude::*;

pub struct PdfTextExtractor {
    pdfium: Pdfium,
}

impl PdfTextExtractor {
    pub fn new() -> Result<Self> {
        let binding = bind_pdfium(PdfError::TextExtractionFailed, "text extraction")?;
        Ok(Self {
            pdfium: Pdfium::new(binding),
        })
    }

    fn load<'a>(&'a self, pdf_bytes: &'a [u8]) -> Result<PdfDocument<'a>> {
        self.pdfium.load_pdf_from_byte_slice(pdf_bytes, None).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("password") || err_msg.contains("Password") {
                PdfError::PasswordRequired
            } else {
                PdfError::InvalidPdf(err_msg)
            }
        })
    }

    /// Extract the text layer of every page, in page order.
    ///
    /// The returned vector always has exactly one entry per physical page.
    /// A page whose text layer cannot be read yields an empty string rather
    /// than failing the document; callers decide whether to fall back to OCR.
    pub fn extract_page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>> {
        let document = self.load(pdf_bytes)?;
        let page_count = document.pages().len() as usize;
        let mut pages = Vec::with_capacity(page_count);

        for page in document.pages().iter() {
            match page.text() {
                Ok(text) => pages.push(text.all()),
                Err(e) => {
                    tracing::debug!(error = %e, "page text layer unreadable, substituting empty text");
                    pages.push(String::new());
                }
            }
        }

        Ok(pages)
    }

    /// Extract the concatenated text layer of at most the first `max_pages`
    /// pages. Used by the cheap `can_parse` probe; never runs OCR.
    pub fn extract_prefix_text(&self, pdf_bytes: &[u8], max_pages: usize) -> Result<String> {
        let document = self.load(pdf_bytes)?;
        let mut content = String::new();

        for (page_idx, page) in document.pages().iter().enumerate() {
            if page_idx >= max_pages {
                break;
            }
            if page_idx > 0 {
                content.push_str("\n\n");
            }
            if let Ok(text) = page.text() {
                content.push_str(&text.all());
            }
        }

        Ok(content)
    }
}
