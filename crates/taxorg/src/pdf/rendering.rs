//! Rendering single PDF pages to images for OCR.

use super::bind_pdfium;
use super::error::{PdfError, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;
use serde::{Deserialize, Serialize};

const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Rasterization options for OCR input pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Target rendering resolution.
    #[serde(default = "default_target_dpi")]
    pub target_dpi: i32,
    /// Cap on either rendered dimension; the DPI is scaled down for
    /// oversized pages so OCR input stays bounded.
    #[serde(default = "default_max_dimension")]
    pub max_image_dimension: i32,
}

fn default_target_dpi() -> i32 {
    300
}

fn default_max_dimension() -> i32 {
    8192
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target_dpi: default_target_dpi(),
            max_image_dimension: default_max_dimension(),
        }
    }
}

pub struct PdfRenderer {
    pdfium: Pdfium,
}

impl PdfRenderer {
    pub fn new() -> Result<Self> {
        let binding = bind_pdfium(PdfError::RenderingFailed, "page rendering")?;
        Ok(Self {
            pdfium: Pdfium::new(binding),
        })
    }

    /// Render one page (0-based index) to an image at the configured DPI.
    pub fn render_page_to_image(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        options: &RenderOptions,
    ) -> Result<DynamicImage> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| PdfError::InvalidPdf(e.to_string()))?;

        let page = document
            .pages()
            .get(page_index as u16)
            .map_err(|_| PdfError::PageNotFound(page_index))?;

        let width_points = page.width().value;
        let height_points = page.height().value;

        let dpi = clamp_dpi(width_points, height_points, options);
        let scale = dpi as f32 / PDF_POINTS_PER_INCH;

        let config = PdfRenderConfig::new()
            .set_target_width(((width_points * scale) as i32).max(1))
            .set_target_height(((height_points * scale) as i32).max(1))
            .rotate_if_landscape(PdfPageRenderRotation::None, false);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PdfError::RenderingFailed(format!("Failed to render page: {}", e)))?;

        Ok(bitmap.as_image())
    }
}

/// Scale the target DPI down until both rendered dimensions fit within
/// `max_image_dimension`.
fn clamp_dpi(width_points: f32, height_points: f32, options: &RenderOptions) -> i32 {
    let longest_points = width_points.max(height_points).max(1.0);
    let longest_pixels = longest_points * options.target_dpi as f32 / PDF_POINTS_PER_INCH;

    if longest_pixels <= options.max_image_dimension as f32 {
        return options.target_dpi;
    }

    let scaled = (options.max_image_dimension as f32 * PDF_POINTS_PER_INCH / longest_points) as i32;
    scaled.max(1)
}
