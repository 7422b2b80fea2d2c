//! Labeled field extraction and value type inference.
//!
//! Extraction is driven by an ordered table of label patterns matched
//! line-by-line; the tables are data, not control flow, so they can be
//! tested exhaustively. Type inference follows a fixed precedence
//! (number, date, checkbox, text) and never fails: anything ambiguous or
//! multi-valued degrades to `text`.

use crate::types::{Field, FieldType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered label-pattern table. Each pattern captures `label` and `value`
/// from a single line; the first matching pattern wins. Longer alternatives
/// come first within each alternation so "Interest Income" is not truncated
/// to "Interest".
static FIELD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Payer / institution name labels.
        r"(?i)^\s*(?P<label>Name of Payer|Payer'?s? Name|Payer|Employer Name|Employer|Financial Institution|Bank Name|Provider Name|Provider)\s*:\s*(?P<value>\S.*?)\s*$",
        // Amount / income / payment labels.
        r"(?i)^\s*(?P<label>Interest Income|Tax-?Exempt Interest|Interest|Ordinary Dividends|Qualified Dividends|Dividend Income|Dividends|Wages|Salaries|Federal (?:Income )?Tax Withheld|State (?:Income )?Tax Withheld|Amount Paid|Amount|Payments? Made|Payments?|Income|Balance Due|Refund)\s*:\s*(?P<value>\S.*?)\s*$",
        // Generic organizer labels.
        r"(?i)^\s*(?P<label>Account Number|Tax Year|Date of Payment|Date Paid|Date|Description|Social Security Number|SSN|Dependent Name|Address)\s*:\s*(?P<value>\S.*?)\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("field pattern must compile"))
    .collect()
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?\s*-?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$").expect("number regex must compile")
});

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}[/\-]\d{1,2}[/\-]\d{1,4}$").expect("date regex must compile"));

/// Fixed checkbox token set, matched case-insensitively.
const CHECKBOX_TOKENS: &[&str] = &["yes", "no", "true", "false", "x", "\u{2713}", "\u{2714}"];

/// Infer the type of a raw value string.
///
/// Precedence is fixed so the outcome is deterministic: monetary/numeric
/// shape, then date shape, then checkbox token, otherwise text.
pub fn infer_field_type(value: &str) -> FieldType {
    let trimmed = value.trim();
    if NUMBER_RE.is_match(trimmed) {
        return FieldType::Number;
    }
    if DATE_RE.is_match(trimmed) {
        return FieldType::Date;
    }
    let lower = trimmed.to_lowercase();
    if CHECKBOX_TOKENS.contains(&lower.as_str()) {
        return FieldType::Checkbox;
    }
    FieldType::Text
}

/// Whether a line matches any labeled pattern. Used to recognize
/// organizer-shaped text on pages outside every resolved section.
pub(crate) fn looks_like_field_line(line: &str) -> bool {
    FIELD_PATTERNS.iter().any(|p| p.is_match(line))
}

/// Extract labeled fields from one section's content.
///
/// One `Field` per matching line, in content order, with 1-based line
/// numbers. Absence of any field is not an error; a section of prose simply
/// yields an empty list.
pub fn extract_fields(content: &str) -> Vec<Field> {
    let mut fields = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        for pattern in FIELD_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let label = caps["label"].trim().to_string();
            let value = caps["value"].trim().to_string();
            let field_type = infer_field_type(&value);

            fields.push(Field {
                label,
                line_number: Some(line_idx as u32 + 1),
                value,
                field_type,
                notes: String::new(),
            });
            break;
        }
    }

    fields
}
