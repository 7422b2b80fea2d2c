//! Error types for taxorg.
//!
//! `TaxorgError` covers *infrastructure* failures: I/O, PDF decoding, OCR
//! backend invocation, configuration, serialization. Partial extraction
//! failures inside a pipeline run are never Rust errors; they are recorded
//! as [`ErrorRecord`](crate::types::ErrorRecord) entries in the result so
//! that `parse` can keep its best-effort contract.
//!
//! # Error Handling Philosophy
//!
//! **System errors MUST always bubble up unchanged:**
//! - `TaxorgError::Io` (from `std::io::Error`) - file system errors, permission errors
//! - These indicate real system problems and must surface to enable bug reports
//!
//! **Application errors are wrapped with context:**
//! - `Parsing` - PDF format errors, corrupt files
//! - `Ocr` - OCR backend failures
//! - `Validation` - invalid configuration or parameters
use thiserror::Error;

/// Result type alias using `TaxorgError`.
pub type Result<T> = std::result::Result<T, TaxorgError>;

/// Main error type for all taxorg operations.
#[derive(Debug, Error)]
pub enum TaxorgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for TaxorgError {
    fn from(err: serde_json::Error) -> Self {
        TaxorgError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<crate::pdf::error::PdfError> for TaxorgError {
    fn from(err: crate::pdf::error::PdfError) -> Self {
        TaxorgError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl TaxorgError {
    /// Create a Parsing error
    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parsing error with source
    pub fn parsing_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Parsing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an Ocr error
    pub fn ocr<S: Into<String>>(message: S) -> Self {
        Self::Ocr {
            message: message.into(),
            source: None,
        }
    }

    /// Create an Ocr error with source
    pub fn ocr_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Ocr {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Validation error with source
    pub fn validation_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TaxorgError = io_err.into();
        assert!(matches!(err, TaxorgError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_parsing_error() {
        let err = TaxorgError::parsing("invalid format");
        assert_eq!(err.to_string(), "Parsing error: invalid format");
    }

    #[test]
    fn test_parsing_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let err = TaxorgError::parsing_with_source("invalid format", source);
        assert_eq!(err.to_string(), "Parsing error: invalid format");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_ocr_error() {
        let err = TaxorgError::ocr("OCR failed");
        assert_eq!(err.to_string(), "OCR error: OCR failed");
    }

    #[test]
    fn test_validation_error() {
        let err = TaxorgError::validation("invalid input");
        assert_eq!(err.to_string(), "Validation error: invalid input");
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = TaxorgError::UnsupportedFormat("application/unknown".to_string());
        assert_eq!(err.to_string(), "Unsupported format: application/unknown");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TaxorgError = json_err.into();
        assert!(matches!(err, TaxorgError::Serialization { .. }));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_pdf_error_conversion() {
        let pdf_err = crate::pdf::error::PdfError::InvalidPdf("corrupt PDF".to_string());
        let err: TaxorgError = pdf_err.into();
        assert!(matches!(err, TaxorgError::Parsing { .. }));
    }

    #[test]
    fn test_io_error_bubbles_unchanged() {
        fn read_file() -> Result<String> {
            let content = std::fs::read_to_string("/nonexistent/file.txt")?;
            Ok(content)
        }

        let result = read_file();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), TaxorgError::Io(_)));
    }
}
