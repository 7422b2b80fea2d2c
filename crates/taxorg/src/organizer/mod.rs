//! Tax organizer parser.
//!
//! Implements the full document-to-structure pipeline over organizer-style
//! workbooks (UltraTax, Lacerte, Drake): text/OCR acquisition, TOC-based
//! page mapping, section resolution, field extraction with type inference,
//! TSJ annotation, and document-reference detection. The stages after
//! acquisition are pure string processing, exposed through
//! [`extract_structure`] so they can be exercised without PDF fixtures.

pub mod acquire;
pub mod documents;
pub mod fields;
pub mod sections;
pub mod toc;
pub mod tsj;

use crate::core::config::ExtractionConfig;
use crate::core::parser::DocumentParser;
use crate::pdf::PdfTextExtractor;
use crate::types::{
    DocumentReference, ErrorSink, ExtractionResult, ResultMetadata, Section, UnclassifiedFragment,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

/// Pages probed by `can_parse`. Kept independent of the TOC scan depth so
/// the probe stays cheap even under an expansive config.
const PROBE_PAGES: usize = 5;

/// Minimum TOC-shaped lines for the probe to treat a prefix as an index.
const PROBE_MIN_TOC_LINES: usize = 3;

static TAX_YEAR_CHECKLIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tax year\s+\d{4}\s+preparation checklist").expect("checklist regex must compile")
});

static SECTION_CODE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[A-G]\b").expect("probe section code regex must compile"));

/// Cheap indicator-phrase check over a text prefix.
///
/// Deliberately recall-oriented: the dispatcher probes parsers in a fixed
/// order and a false positive only costs one full parse that degrades to an
/// error ledger.
pub(crate) fn text_indicates_organizer(text: &str) -> bool {
    let lower = text.to_lowercase();

    if lower.contains("tax organizer") || lower.contains("income tax information worksheet") {
        return true;
    }

    let brand = ["ultratax", "lacerte", "drake"].iter().any(|b| lower.contains(b));
    if brand && lower.contains("tax software") {
        return true;
    }

    if TAX_YEAR_CHECKLIST_RE.is_match(text) {
        return true;
    }

    // A TOC-shaped block mentioning income or deductions.
    let toc_lines: usize = text.split("\n\n").map(toc::toc_line_count).sum();
    if toc_lines >= PROBE_MIN_TOC_LINES && (lower.contains("income") || lower.contains("deduction")) {
        return true;
    }

    // Vendor section codes (5A, 6A, 9A ...) near income vocabulary.
    for line in lower.lines() {
        if SECTION_CODE_LINE_RE.is_match(&line.to_uppercase())
            && (line.contains("income") || line.contains("interest") || line.contains("dividend"))
        {
            return true;
        }
    }

    false
}

/// Run every pipeline stage after acquisition over the ordered page texts.
///
/// Sections are independent read-only views over the pages, so the per-
/// section field/TSJ pass runs in parallel; the error sink is the only
/// shared mutable state.
pub fn extract_structure(
    pages: &[String],
    config: &ExtractionConfig,
    errors: &ErrorSink,
) -> (Vec<Section>, Vec<DocumentReference>, Vec<UnclassifiedFragment>) {
    let toc_entries = toc::extract_toc(pages, config.toc_scan_pages, errors);
    let (mut organizer_sections, covered) = sections::resolve_sections(&toc_entries, pages, errors);

    organizer_sections.par_iter_mut().for_each(|section| {
        section.fields = fields::extract_fields(&section.content);
        if let Some(letter) = tsj::detect_indicator(&section.content) {
            tsj::annotate_fields(&mut section.fields, letter);
        }
    });

    // Document references scan the full concatenation independently of the
    // section map.
    let full_text = pages.join("\n\n");
    let references = documents::extract_document_references(&full_text);

    let unclassified = sections::collect_unclassified(pages, &covered);

    (organizer_sections, references, unclassified)
}

/// Parser for tax organizer workbooks.
pub struct OrganizerParser;

impl OrganizerParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OrganizerParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentParser for OrganizerParser {
    fn name(&self) -> &str {
        "tax-organizer"
    }

    fn can_parse(&self, content: &[u8]) -> bool {
        let Ok(extractor) = PdfTextExtractor::new() else {
            return false;
        };
        let Ok(prefix) = extractor.extract_prefix_text(content, PROBE_PAGES) else {
            return false;
        };
        text_indicates_organizer(&prefix)
    }

    async fn parse(&self, content: &[u8], config: &ExtractionConfig) -> ExtractionResult {
        let errors = ErrorSink::new();

        let pages = match acquire::acquire_page_texts(content, config, &errors).await {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!(error = %e, "document could not be opened");
                return ExtractionResult::unreadable();
            }
        };

        let (organizer_sections, documents, unclassified_fields) = extract_structure(&pages, config, &errors);

        ExtractionResult {
            organizer_sections,
            documents,
            unclassified_fields,
            metadata: ResultMetadata {
                errors: errors.into_records(),
            },
        }
    }
}
