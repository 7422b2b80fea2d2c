//! Wire types for extraction results.
//!
//! The JSON field names on these types are the contract with the hosting
//! application and must not change. Everything here is a value object:
//! created once by its owning pipeline stage, then frozen and merged into
//! the final [`ExtractionResult`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Inferred type of an extracted field value.
///
/// Inference follows a fixed precedence (number, date, checkbox, text) so
/// the outcome is deterministic; anything ambiguous degrades to `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Checkbox,
}

/// One labeled value extracted from a section's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    /// 1-based line number within the section content, when position
    /// tracking is available.
    pub line_number: Option<u32>,
    pub value: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Free-form annotations, e.g. `"TSJ: T"`.
    #[serde(default)]
    pub notes: String,
}

/// One resolved organizer section with its extracted fields.
///
/// `content` is internal working state (the concatenated span text) and is
/// not part of the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// 1-based page number of the section's first page.
    pub page_number: usize,
    #[serde(skip)]
    pub content: String,
    pub fields: Vec<Field>,
    /// True only when the section name (case-insensitive) was found inside
    /// the resolved content.
    pub complete: bool,
}

/// A mention of an attached supporting tax form (W-2, 1099 variant, 1098, K-1).
///
/// Detection is presence-based: one reference per mention, duplicates
/// included. Absence detection is out of scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReference {
    /// Normalized form code, uppercased (e.g. `"1099-INT"`).
    #[serde(rename = "type")]
    pub doc_type: String,
    pub received: bool,
    /// Payer/provider context when one could be identified, otherwise empty.
    #[serde(default)]
    pub details: String,
}

/// Organizer-shaped text that could not be attributed to any mapped section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedFragment {
    pub text: String,
    /// 1-based page number the fragment was found on.
    pub page_number: usize,
}

/// One non-fatal error accumulated during a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub section: Option<String>,
    /// 1-based page number, when the error is page-scoped.
    pub page: Option<usize>,
    pub field: Option<String>,
    pub reason: String,
}

impl ErrorRecord {
    /// Document-level error with no section/page/field scope.
    pub fn document(reason: impl Into<String>) -> Self {
        Self {
            section: None,
            page: None,
            field: None,
            reason: reason.into(),
        }
    }

    /// Page-scoped error. `page` is 1-based.
    pub fn page(page: usize, reason: impl Into<String>) -> Self {
        Self {
            section: None,
            page: Some(page),
            field: None,
            reason: reason.into(),
        }
    }

    /// Section-scoped error.
    pub fn section(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            section: Some(name.into()),
            page: None,
            field: None,
            reason: reason.into(),
        }
    }

    /// Section-scoped error with a page.
    pub fn section_page(name: impl Into<String>, page: usize, reason: impl Into<String>) -> Self {
        Self {
            section: Some(name.into()),
            page: Some(page),
            field: None,
            reason: reason.into(),
        }
    }
}

/// Result metadata: currently just the accumulated error ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub errors: Vec<ErrorRecord>,
}

/// Complete output of one `parse` run.
///
/// `parse` always returns one of these, even when every stage degraded to
/// empty output. The contract is best-effort data plus a full error ledger,
/// never an error to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub organizer_sections: Vec<Section>,
    pub documents: Vec<DocumentReference>,
    pub unclassified_fields: Vec<UnclassifiedFragment>,
    pub metadata: ResultMetadata,
}

impl ExtractionResult {
    /// Result for a document that could not be opened or decoded at all:
    /// empty collections plus a single top-level error record.
    pub fn unreadable() -> Self {
        Self {
            metadata: ResultMetadata {
                errors: vec![ErrorRecord::document("unreadable document")],
            },
            ..Default::default()
        }
    }
}

/// Append-only, thread-safe sink for non-fatal errors.
///
/// The one piece of shared mutable state in a pipeline run. Order among
/// records is not semantically significant.
#[derive(Debug, Default)]
pub struct ErrorSink {
    records: Mutex<Vec<ErrorRecord>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: ErrorRecord) {
        self.records.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Consume the sink, yielding the accumulated records.
    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FieldType::Number).unwrap(), "\"number\"");
        assert_eq!(serde_json::to_string(&FieldType::Checkbox).unwrap(), "\"checkbox\"");
    }

    #[test]
    fn test_field_wire_shape() {
        let field = Field {
            label: "Interest".to_string(),
            line_number: Some(3),
            value: "$1,234.56".to_string(),
            field_type: FieldType::Number,
            notes: String::new(),
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["label"], "Interest");
        assert_eq!(json["line_number"], 3);
        assert_eq!(json["type"], "number");
        assert_eq!(json["notes"], "");
    }

    #[test]
    fn test_section_content_not_serialized() {
        let section = Section {
            name: "Interest Income".to_string(),
            page_number: 13,
            content: "internal".to_string(),
            fields: vec![],
            complete: true,
        };
        let json = serde_json::to_value(&section).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["page_number"], 13);
        assert_eq!(json["complete"], true);
    }

    #[test]
    fn test_document_reference_type_field_name() {
        let doc = DocumentReference {
            doc_type: "1099-INT".to_string(),
            received: true,
            details: "FIRST REPUBLIC BANK".to_string(),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "1099-INT");
        assert_eq!(json["received"], true);
    }

    #[test]
    fn test_error_record_null_scopes() {
        let record = ErrorRecord::document("unreadable document");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["section"].is_null());
        assert!(json["page"].is_null());
        assert!(json["field"].is_null());
        assert_eq!(json["reason"], "unreadable document");
    }

    #[test]
    fn test_unreadable_result_shape() {
        let result = ExtractionResult::unreadable();
        assert!(result.organizer_sections.is_empty());
        assert!(result.documents.is_empty());
        assert!(result.unclassified_fields.is_empty());
        assert_eq!(result.metadata.errors.len(), 1);
        assert_eq!(result.metadata.errors[0].reason, "unreadable document");
    }

    #[test]
    fn test_error_sink_concurrent_append() {
        use std::sync::Arc;

        let sink = Arc::new(ErrorSink::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        sink.push(ErrorRecord::page(i + 1, "OCR failed"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.len(), 800);
    }

    #[test]
    fn test_result_round_trips() {
        let result = ExtractionResult {
            organizer_sections: vec![],
            documents: vec![DocumentReference {
                doc_type: "W-2".to_string(),
                received: true,
                details: String::new(),
            }],
            unclassified_fields: vec![UnclassifiedFragment {
                text: "Wages: 100".to_string(),
                page_number: 2,
            }],
            metadata: ResultMetadata::default(),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.documents.len(), 1);
        assert_eq!(back.unclassified_fields[0].page_number, 2);
    }
}
