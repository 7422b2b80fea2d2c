//! Taxorg - Tax Organizer Extraction Library
//!
//! Taxorg parses multi-page tax-organizer PDFs (UltraTax, Lacerte, Drake)
//! into a structured, partially-tolerant JSON representation of the
//! document's sections, labeled fields, and referenced tax-document
//! attachments (W-2, 1099 variants, 1098, K-1).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use taxorg::{ExtractionConfig, parse_file_sync};
//!
//! # fn main() -> taxorg::Result<()> {
//! let config = ExtractionConfig::default();
//! let result = parse_file_sync("organizer.pdf", &config)?;
//! for section in &result.organizer_sections {
//!     println!("{} (page {}): {} fields", section.name, section.page_number, section.fields.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core** (`core`): configuration loading, the `can_parse`/`parse`
//!   parser contract, and the static parser registry
//! - **Organizer pipeline** (`organizer`): text/OCR acquisition, TOC
//!   extraction, section resolution, field/TSJ extraction, document
//!   reference detection
//! - **PDF** (`pdf`): pdfium-backed per-page text and rendering
//! - **OCR** (`ocr`): pluggable OCR backends (Tesseract subprocess built in)
//!
//! # Partial-failure semantics
//!
//! `parse` never fails for a readable document: every non-fatal problem
//! (failed OCR on one page, a duplicate TOC entry, an out-of-range page
//! reference) is recorded in `metadata.errors` and extraction continues
//! with best-effort substitutes. The hosting application surfaces those
//! records for manual completion rather than blocking on them.

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod ocr;
pub mod organizer;
pub mod pdf;
pub mod types;

pub use error::{Result, TaxorgError};
pub use types::*;

pub use crate::core::config::{ExtractionConfig, OcrConfig};
pub use crate::core::parser::{
    DocumentParser, can_parse_bytes, find_parser, parse_bytes, parse_bytes_sync, parse_file,
    parse_file_sync,
};
pub use pdf::RenderOptions;
