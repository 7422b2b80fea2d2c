//! Per-page text acquisition with OCR fallback.
//!
//! Organizers routinely mix digitally-generated cover pages with scanned
//! worksheets, so the OCR fallback decision is made per page, never for the
//! whole document. Pages are independent; OCR tasks run concurrently under a
//! bounded semaphore and a single deadline covers the whole OCR phase of one
//! document, so a stuck page can never hang the pipeline.

use crate::core::config::ExtractionConfig;
use crate::ocr;
use crate::pdf::error::PdfError;
use crate::pdf::{PdfRenderer, PdfTextExtractor};
use crate::types::{ErrorRecord, ErrorSink};
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use std::io::Cursor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{Duration, Instant, timeout_at};

/// Whether a page's text layer is "mostly empty" and should fall back to OCR.
pub(crate) fn needs_ocr(text: &str, config: &ExtractionConfig) -> bool {
    let total = text.chars().count();
    let non_whitespace = text.chars().filter(|c| !c.is_whitespace()).count();

    if non_whitespace < config.min_text_chars {
        return true;
    }
    if total > 0 {
        let whitespace_ratio = (total - non_whitespace) as f64 / total as f64;
        if whitespace_ratio > config.max_whitespace_ratio {
            return true;
        }
    }
    false
}

/// PNG-encode one rendered page for OCR input.
fn encode_page_png(image: &image::DynamicImage) -> Result<Vec<u8>, crate::TaxorgError> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut bytes = Cursor::new(Vec::new());
    PngEncoder::new(&mut bytes)
        .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| crate::TaxorgError::ocr_with_source("Failed to encode page image", e))?;
    Ok(bytes.into_inner())
}

/// Acquire one text string per physical page, in page order.
///
/// Direct text-layer extraction first; mostly-empty pages are rasterized and
/// OCRed. An OCR failure or a page unfinished at the phase deadline yields
/// an empty string plus an error record; the output length always equals the
/// page count. Only a document that cannot be opened at all is an `Err`.
pub async fn acquire_page_texts(
    content: &[u8],
    config: &ExtractionConfig,
    errors: &ErrorSink,
) -> Result<Vec<String>, PdfError> {
    // All pdfium work happens before the first await so the returned future
    // stays Send.
    let (mut pages, rendered) = extract_and_render(content, config, errors)?;

    if rendered.is_empty() {
        return Ok(pages);
    }

    let Some(ocr_config) = config.ocr.clone() else {
        tracing::debug!(pages = rendered.len(), "OCR disabled, leaving mostly-empty pages as-is");
        return Ok(pages);
    };

    let backend = match ocr::backend_for(&ocr_config) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::warn!(error = %e, "OCR backend unavailable");
            for (page_idx, _) in &rendered {
                pages[*page_idx] = String::new();
                errors.push(ErrorRecord::page(page_idx + 1, "OCR failed"));
            }
            return Ok(pages);
        }
    };

    let max_concurrent = config.max_concurrent_ocr.unwrap_or_else(num_cpus::get).max(1);
    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let deadline = Instant::now() + Duration::from_secs(config.ocr_timeout_secs);

    let mut tasks = Vec::with_capacity(rendered.len());
    for (page_idx, png) in rendered {
        let backend = Arc::clone(&backend);
        let semaphore = Arc::clone(&semaphore);
        let ocr_config = ocr_config.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| crate::TaxorgError::ocr("OCR semaphore closed"))?;
            backend.recognize(&png, &ocr_config).await
        });
        tasks.push((page_idx, handle));
    }

    for (page_idx, handle) in tasks {
        let abort = handle.abort_handle();
        match timeout_at(deadline, handle).await {
            Ok(Ok(Ok(text))) => {
                tracing::debug!(page = page_idx + 1, chars = text.len(), "OCR fallback succeeded");
                pages[page_idx] = text;
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!(page = page_idx + 1, error = %e, "OCR fallback failed");
                pages[page_idx] = String::new();
                errors.push(ErrorRecord::page(page_idx + 1, "OCR failed"));
            }
            Ok(Err(join_err)) => {
                tracing::warn!(page = page_idx + 1, error = %join_err, "OCR task panicked");
                pages[page_idx] = String::new();
                errors.push(ErrorRecord::page(page_idx + 1, "OCR failed"));
            }
            Err(_) => {
                abort.abort();
                pages[page_idx] = String::new();
                errors.push(ErrorRecord::page(page_idx + 1, "OCR timeout"));
            }
        }
    }

    Ok(pages)
}

/// Synchronous pdfium phase: text-layer extraction plus rasterization of the
/// pages that need OCR. Returns the page texts and `(page_index, png)` pairs
/// for the fallback pages.
#[allow(clippy::type_complexity)]
fn extract_and_render(
    content: &[u8],
    config: &ExtractionConfig,
    errors: &ErrorSink,
) -> Result<(Vec<String>, Vec<(usize, Vec<u8>)>), PdfError> {
    let extractor = PdfTextExtractor::new()?;
    let pages = extractor.extract_page_texts(content)?;

    let fallback: Vec<usize> = pages
        .iter()
        .enumerate()
        .filter(|(_, text)| needs_ocr(text, config))
        .map(|(idx, _)| idx)
        .collect();

    if fallback.is_empty() || config.ocr.is_none() {
        return Ok((pages, Vec::new()));
    }

    tracing::debug!(
        total = pages.len(),
        fallback = fallback.len(),
        "pages selected for OCR fallback"
    );

    let renderer = PdfRenderer::new()?;
    let mut rendered = Vec::with_capacity(fallback.len());
    for page_idx in fallback {
        match renderer
            .render_page_to_image(content, page_idx, &config.render)
            .map_err(crate::TaxorgError::from)
            .and_then(|image| encode_page_png(&image))
        {
            Ok(png) => rendered.push((page_idx, png)),
            Err(e) => {
                tracing::warn!(page = page_idx + 1, error = %e, "page rasterization failed");
                errors.push(ErrorRecord::page(page_idx + 1, "OCR failed"));
            }
        }
    }

    Ok((pages, rendered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_ocr_short_text() {
        let config = ExtractionConfig::default();
        assert!(needs_ocr("abc", &config));
        assert!(needs_ocr("", &config));
    }

    #[test]
    fn test_needs_ocr_whitespace_heavy() {
        let config = ExtractionConfig::default();
        // More than 20 non-whitespace chars but drowned in whitespace.
        let mut text = String::new();
        for _ in 0..25 {
            text.push('x');
            text.push_str(&" ".repeat(40));
        }
        assert!(needs_ocr(&text, &config));
    }

    #[test]
    fn test_needs_ocr_normal_page() {
        let config = ExtractionConfig::default();
        let text = "Interest Income worksheet for tax year 2023.\nName of Payer: FIRST REPUBLIC BANK";
        assert!(!needs_ocr(text, &config));
    }

    #[test]
    fn test_needs_ocr_respects_configured_minimum() {
        let config = ExtractionConfig {
            min_text_chars: 2,
            ..Default::default()
        };
        assert!(!needs_ocr("abc", &config));
        assert!(needs_ocr("a", &config));
    }

    #[tokio::test]
    async fn test_unreadable_input_is_err() {
        let config = ExtractionConfig::default();
        let errors = ErrorSink::new();
        let result = acquire_page_texts(b"not a pdf", &config, &errors).await;
        assert!(result.is_err());
    }
}
