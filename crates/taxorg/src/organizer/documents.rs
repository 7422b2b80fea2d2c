//! Document reference detection.
//!
//! Scans the full document text (not per-section) for mentions of attached
//! tax forms and pairs each mention with payer context from a bounded window
//! around it. Counts reflect mentions, not unique documents: duplicate
//! type/payer pairs are kept, and absence detection is out of scope.

use crate::types::DocumentReference;
use once_cell::sync::Lazy;
use regex::Regex;

/// Bytes of context inspected on each side of a form-type match.
const CONTEXT_WINDOW: usize = 100;

/// Fixed tax-form type set, hyphens optional. Longer alternatives first so
/// `Schedule K-1` beats `K-1` and `1098-T` beats `1098`.
static DOC_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Schedule\s+K-?1|K-?1|W-?2|1099-?INT|1099-?DIV|1099-?MISC|1099-?NEC|1099-?R|1098-?T|1098)\b")
        .expect("document type regex must compile")
});

/// Tier (a): payer introduced by a label word. The name capture is
/// case-sensitive on purpose: it stops at the first non-capitalized word.
static PAYER_LABELED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:from|by|payer|provider)[:\s]+(?P<name>[A-Z][A-Za-z0-9&.'\-]*(?:,?\s+[A-Z0-9][A-Za-z0-9&.'\-]*)*)")
        .expect("labeled payer regex must compile")
});

/// Tier (b) fallback: a run of two or more capitalized words of plausible
/// company-name shape.
static COMPANY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z0-9&.'\-]+(?:\s+[A-Z][A-Za-z0-9&.'\-]+)+\b")
        .expect("company name regex must compile")
});

/// Normalize a raw type match to its canonical uppercase form code.
fn normalize_doc_type(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    match compact.as_str() {
        "W2" => "W-2".to_string(),
        "K1" | "SCHEDULEK1" => "K-1".to_string(),
        "1099INT" => "1099-INT".to_string(),
        "1099DIV" => "1099-DIV".to_string(),
        "1099MISC" => "1099-MISC".to_string(),
        "1099NEC" => "1099-NEC".to_string(),
        "1099R" => "1099-R".to_string(),
        "1098T" => "1098-T".to_string(),
        "1098" => "1098".to_string(),
        other => other.to_string(),
    }
}

/// Clamp a byte offset down to the nearest char boundary.
fn floor_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Clamp a byte offset up to the nearest char boundary.
fn ceil_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Identify the payer within a context window.
///
/// `type_start..type_end` is the form mention's span inside `window`. Payer
/// wording usually follows the mention ("1099-INT from X"), so the trailing
/// half of the window is searched first; the leading half is the fallback,
/// taking the candidate closest to the mention.
fn payer_in_window(window: &str, type_start: usize, type_end: usize) -> String {
    let after = &window[type_end..];
    let before = &window[..type_start];

    if let Some(caps) = PAYER_LABELED_RE.captures(after) {
        return trim_payer(&caps["name"]);
    }
    if let Some(caps) = PAYER_LABELED_RE.captures_iter(before).last() {
        return trim_payer(&caps["name"]);
    }

    // Tier (b): capitalized runs of plausible company-name shape.
    if let Some(candidate) = COMPANY_RE.find(after) {
        return trim_payer(candidate.as_str());
    }
    if let Some(candidate) = COMPANY_RE.find_iter(before).last() {
        return trim_payer(candidate.as_str());
    }

    String::new()
}

fn trim_payer(raw: &str) -> String {
    raw.trim().trim_end_matches([',', '.', ';']).trim().to_string()
}

/// Scan the whole document text for tax-form references.
///
/// One `DocumentReference` per mention, `received` always true (detection is
/// presence-based), `details` carrying the payer when one was identified. A
/// mention with no extractable payer leaves `details` empty; that is not an
/// error condition.
pub fn extract_document_references(full_text: &str) -> Vec<DocumentReference> {
    let mut references = Vec::new();

    for m in DOC_TYPE_RE.find_iter(full_text) {
        let window_start = floor_boundary(full_text, m.start().saturating_sub(CONTEXT_WINDOW));
        let window_end = ceil_boundary(full_text, (m.end() + CONTEXT_WINDOW).min(full_text.len()));
        let window = &full_text[window_start..window_end];

        references.push(DocumentReference {
            doc_type: normalize_doc_type(m.as_str()),
            received: true,
            details: payer_in_window(window, m.start() - window_start, m.end() - window_start),
        });
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_payer() {
        let refs = extract_document_references("Enclosed: 1099-INT from FIRST REPUBLIC BANK for 2023.");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].doc_type, "1099-INT");
        assert!(refs[0].received);
        assert_eq!(refs[0].details, "FIRST REPUBLIC BANK");
    }

    #[test]
    fn test_hyphen_optional() {
        let refs = extract_document_references("Your W2 from ACME Corp is attached.");
        assert_eq!(refs[0].doc_type, "W-2");
        assert_eq!(refs[0].details, "ACME Corp");
    }

    #[test]
    fn test_schedule_k1_normalized() {
        let refs = extract_document_references("Schedule K-1 issued by Sunset Partners LP");
        assert_eq!(refs[0].doc_type, "K-1");
        assert_eq!(refs[0].details, "Sunset Partners LP");
    }

    #[test]
    fn test_1098t_beats_1098() {
        let refs = extract_document_references("1098-T provider: State University");
        assert_eq!(refs[0].doc_type, "1098-T");
        assert_eq!(refs[0].details, "State University");
    }

    #[test]
    fn test_fallback_company_shape() {
        let refs = extract_document_references("1099-DIV Vanguard Brokerage Services dividends");
        assert_eq!(refs[0].doc_type, "1099-DIV");
        assert_eq!(refs[0].details, "Vanguard Brokerage Services");
    }

    #[test]
    fn test_no_payer_leaves_details_empty() {
        let refs = extract_document_references("a 1099-misc was mentioned here");
        assert_eq!(refs[0].doc_type, "1099-MISC");
        assert_eq!(refs[0].details, "");
    }

    #[test]
    fn test_duplicates_not_deduplicated() {
        let text = "1099-INT from FIRST REPUBLIC BANK ... later again 1099-INT from FIRST REPUBLIC BANK";
        let refs = extract_document_references(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], refs[1]);
    }

    #[test]
    fn test_multiple_types() {
        let text = "W-2 from ACME Corp; 1099-R from Fidelity Investments; 1098 from First Mortgage Co";
        let refs = extract_document_references(text);
        let types: Vec<_> = refs.iter().map(|r| r.doc_type.as_str()).collect();
        assert_eq!(types, vec!["W-2", "1099-R", "1098"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_document_references("").is_empty());
    }
}
