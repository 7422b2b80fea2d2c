//! Taxpayer/Spouse/Joint (TSJ) annotation.
//!
//! Detection runs over a whole section's content and the resulting letter is
//! attached uniformly to every field of that section. A section mixing
//! distinct indicators for different rows will therefore misattribute one
//! letter to all of its fields; that is the product's accepted best-effort
//! behavior, not something to fix silently here. (A per-field text window
//! would change observable output.)

use crate::types::Field;
use once_cell::sync::Lazy;
use regex::Regex;

static TSJ_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bTSJ\s*[:=]?\s*([TSJ])\b").expect("TSJ token regex must compile"));

/// Detect a TSJ indicator in a section's content.
///
/// The abbreviated token form (`TSJ: T`) takes precedence over the
/// spelled-out words; among spelled-out words, the earliest occurrence in
/// the content wins.
pub fn detect_indicator(content: &str) -> Option<char> {
    if let Some(caps) = TSJ_TOKEN_RE.captures(content) {
        let letter = caps[1].chars().next()?;
        return Some(letter.to_ascii_uppercase());
    }

    let lower = content.to_lowercase();
    let words = [("taxpayer", 'T'), ("spouse", 'S'), ("joint", 'J')];
    words
        .iter()
        .filter_map(|&(word, letter)| lower.find(word).map(|pos| (pos, letter)))
        .min_by_key(|&(pos, _)| pos)
        .map(|(_, letter)| letter)
}

/// Write `notes = "TSJ: <letter>"` onto every field.
pub fn annotate_fields(fields: &mut [Field], letter: char) {
    let note = format!("TSJ: {}", letter);
    for field in fields.iter_mut() {
        field.notes = note.clone();
    }
}
