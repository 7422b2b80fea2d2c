//! Table-of-contents extraction.
//!
//! Organizer workbooks open with an index mapping section names (and often
//! vendor section codes like `5A`) to page numbers. Only a bounded prefix of
//! pages is scanned; TOC-shaped lines are `<label> ... <page>` with either a
//! dot leader or a run of whitespace before the page number.

use crate::types::{ErrorRecord, ErrorSink};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// One `section name -> page number` mapping from the TOC pages.
///
/// `page_number` is 1-based and kept exactly as printed, even when it is
/// zero or beyond the end of the document; resolution flags those later so
/// downstream consumers still see "found but unlocatable" sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub name: String,
    pub page_number: usize,
}

static TOC_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<label>\d{0,2}[A-Za-z][A-Za-z0-9&/'(),\- ]*?)\s*(?:(?:\. *){2,}|\t+| {2,})(?P<page>\d{1,4})\s*$")
        .expect("TOC line regex must compile")
});

/// Match one line against the TOC shape, returning (label, page).
fn match_toc_line(line: &str) -> Option<(&str, usize)> {
    let caps = TOC_LINE_RE.captures(line)?;
    let label = caps.name("label")?.as_str().trim();
    let page = caps.name("page")?.as_str().parse().ok()?;
    Some((label, page))
}

/// Count of TOC-shaped lines in one page's text. Used both by the
/// `can_parse` probe and to recognize index pages during unclassified
/// fragment collection.
pub(crate) fn toc_line_count(page_text: &str) -> usize {
    page_text.lines().filter(|line| match_toc_line(line).is_some()).count()
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Scan the first `scan_pages` pages for TOC entries.
///
/// Tie-break: when the same normalized name appears again with a different
/// page number, the first occurrence wins and each conflicting occurrence
/// records a `"duplicate TOC entry"` error. Repeats with the same page are
/// ignored silently.
pub fn extract_toc(pages: &[String], scan_pages: usize, errors: &ErrorSink) -> Vec<TocEntry> {
    let mut entries: Vec<TocEntry> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for page_text in pages.iter().take(scan_pages) {
        for line in page_text.lines() {
            let Some((label, page)) = match_toc_line(line) else {
                continue;
            };

            let key = normalize_name(label);
            match seen.get(&key) {
                None => {
                    seen.insert(key, entries.len());
                    entries.push(TocEntry {
                        name: label.to_string(),
                        page_number: page,
                    });
                }
                Some(&first_idx) => {
                    if entries[first_idx].page_number != page {
                        errors.push(ErrorRecord::section(
                            entries[first_idx].name.clone(),
                            "duplicate TOC entry",
                        ));
                    }
                }
            }
        }
    }

    tracing::debug!(entries = entries.len(), "TOC extraction complete");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    #[test]
    fn test_dot_leader_line() {
        let errors = ErrorSink::new();
        let toc = extract_toc(&page("Interest Income ............ 13\n"), 5, &errors);
        assert_eq!(
            toc,
            vec![TocEntry {
                name: "Interest Income".to_string(),
                page_number: 13
            }]
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_whitespace_separated_line() {
        let errors = ErrorSink::new();
        let toc = extract_toc(&page("Dividend Income      15\n"), 5, &errors);
        assert_eq!(toc[0].name, "Dividend Income");
        assert_eq!(toc[0].page_number, 15);
    }

    #[test]
    fn test_spaced_dot_leader() {
        let errors = ErrorSink::new();
        let toc = extract_toc(&page("Wages and Salaries . . . . . 7\n"), 5, &errors);
        assert_eq!(toc[0].name, "Wages and Salaries");
        assert_eq!(toc[0].page_number, 7);
    }

    #[test]
    fn test_section_code_label() {
        let errors = ErrorSink::new();
        let toc = extract_toc(&page("5A Interest Income .... 13\n"), 5, &errors);
        assert_eq!(toc[0].name, "5A Interest Income");
    }

    #[test]
    fn test_ordinary_prose_ignored() {
        let errors = ErrorSink::new();
        let toc = extract_toc(&page("Please review the enclosed organizer.\n"), 5, &errors);
        assert!(toc.is_empty());
    }

    #[test]
    fn test_duplicate_tie_break_first_wins() {
        let errors = ErrorSink::new();
        let pages = page("Interest Income .... 13\nInterest Income .... 20\n");
        let toc = extract_toc(&pages, 5, &errors);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].page_number, 13);

        let records = errors.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].section.as_deref(), Some("Interest Income"));
        assert_eq!(records[0].reason, "duplicate TOC entry");
    }

    #[test]
    fn test_duplicate_same_page_silent() {
        let errors = ErrorSink::new();
        let pages = page("Interest Income .... 13\ninterest income .... 13\n");
        let toc = extract_toc(&pages, 5, &errors);
        assert_eq!(toc.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_scan_limit_respected() {
        let errors = ErrorSink::new();
        let pages = vec![
            "Cover page".to_string(),
            "Interest Income .... 13".to_string(),
            "Dividend Income .... 15".to_string(),
        ];
        let toc = extract_toc(&pages, 2, &errors);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].name, "Interest Income");
    }

    #[test]
    fn test_out_of_range_entry_retained() {
        let errors = ErrorSink::new();
        let toc = extract_toc(&page("Interest Income .... 999\n"), 5, &errors);
        // Retained here; flagged later during resolution.
        assert_eq!(toc[0].page_number, 999);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_toc_line_count() {
        assert_eq!(toc_line_count("Interest Income .... 13\nDividends .... 15\nhello\n"), 2);
        assert_eq!(toc_line_count("no index here"), 0);
    }
}
