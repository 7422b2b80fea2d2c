//! Section resolution: turning TOC entries into bounded content spans.

use crate::organizer::fields::looks_like_field_line;
use crate::organizer::toc::{TocEntry, toc_line_count};
use crate::types::{ErrorRecord, ErrorSink, Section, UnclassifiedFragment};
use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[A-G]\b").expect("section code regex must compile"));

/// Resolve each TOC entry into a section whose content spans
/// `[page_i, page_{i+1} - 1]`, the last span running to the end of the
/// document. A single-page span is the degenerate case of consecutive TOC
/// entries.
///
/// Entries pointing outside `[1, page_count]` still emit a section (empty
/// content, `complete = false`) together with a `"page out of range"`
/// record; partial extraction beats silent loss. The returned mask marks
/// which pages were claimed by some span.
pub fn resolve_sections(toc: &[TocEntry], pages: &[String], errors: &ErrorSink) -> (Vec<Section>, Vec<bool>) {
    let page_count = pages.len();
    let mut covered = vec![false; page_count];

    // Start pages of all locatable entries, used to find each span's end.
    let mut span_starts: Vec<usize> = toc
        .iter()
        .map(|e| e.page_number)
        .filter(|&p| p >= 1 && p <= page_count)
        .collect();
    span_starts.sort_unstable();
    span_starts.dedup();

    let mut sections = Vec::with_capacity(toc.len());

    for entry in toc {
        let start = entry.page_number;

        if start < 1 || start > page_count {
            errors.push(ErrorRecord::section_page(
                entry.name.clone(),
                start,
                "page out of range",
            ));
            sections.push(Section {
                name: entry.name.clone(),
                page_number: start,
                content: String::new(),
                fields: Vec::new(),
                complete: false,
            });
            continue;
        }

        // Exclusive upper bound: the next higher TOC start, else document end.
        let end = span_starts
            .iter()
            .find(|&&p| p > start)
            .map(|&p| p - 1)
            .unwrap_or(page_count)
            .min(page_count);

        let content = pages[start - 1..end].join("\n\n");
        for flag in covered.iter_mut().take(end).skip(start - 1) {
            *flag = true;
        }

        let complete = section_name_present(&entry.name, &content);
        if !complete {
            errors.push(ErrorRecord::section_page(
                entry.name.clone(),
                start,
                "section content mismatch",
            ));
        }

        sections.push(Section {
            name: entry.name.clone(),
            page_number: start,
            content,
            fields: Vec::new(),
            complete,
        });
    }

    (sections, covered)
}

/// Case-insensitive presence check of the section name (or its leading
/// section code) inside the resolved span.
fn section_name_present(name: &str, content: &str) -> bool {
    let content_lower = content.to_lowercase();
    if content_lower.contains(&name.to_lowercase()) {
        return true;
    }
    // A name like "5A Interest Income" also counts as present when only its
    // code appears in the span.
    if let Some(code) = SECTION_CODE_RE.find(name) {
        return content_lower.contains(&code.as_str().to_lowercase());
    }
    false
}

/// Collect organizer-shaped text on pages no resolved span claimed.
///
/// A page counts as organizer-shaped when it carries a labeled field line or
/// a vendor section code. Index pages (two or more TOC-shaped lines) are the
/// TOC itself, already represented by the section map, and are skipped.
pub fn collect_unclassified(pages: &[String], covered: &[bool]) -> Vec<UnclassifiedFragment> {
    let mut fragments = Vec::new();

    for (idx, page_text) in pages.iter().enumerate() {
        if covered.get(idx).copied().unwrap_or(false) {
            continue;
        }
        let trimmed = page_text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if toc_line_count(page_text) >= 2 {
            continue;
        }

        let organizer_shaped =
            page_text.lines().any(looks_like_field_line) || SECTION_CODE_RE.is_match(page_text);
        if organizer_shaped {
            fragments.push(UnclassifiedFragment {
                text: trimmed.to_string(),
                page_number: idx + 1,
            });
        }
    }

    fragments
}
