//! Configuration loading and management.
//!
//! `ExtractionConfig` can be created programmatically or loaded from a TOML
//! file (`taxorg.toml`). Every field carries a serde default so partial
//! config files work.

use crate::error::{Result, TaxorgError};
use crate::pdf::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main extraction configuration.
///
/// # Example
///
/// ```rust
/// use taxorg::ExtractionConfig;
///
/// let config = ExtractionConfig::default();
/// assert_eq!(config.min_text_chars, 20);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Pages whose text layer has fewer non-whitespace characters than this
    /// are considered mostly empty and fall back to OCR.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// Pages whose whitespace ratio exceeds this also fall back to OCR.
    #[serde(default = "default_max_whitespace_ratio")]
    pub max_whitespace_ratio: f64,

    /// Number of leading pages scanned for table-of-contents lines.
    #[serde(default = "default_toc_scan_pages")]
    pub toc_scan_pages: usize,

    /// OCR configuration (None = OCR fallback disabled).
    #[serde(default = "default_ocr")]
    pub ocr: Option<OcrConfig>,

    /// Maximum concurrent per-page OCR tasks (None = number of CPUs).
    #[serde(default)]
    pub max_concurrent_ocr: Option<usize>,

    /// Deadline in seconds for the whole OCR phase of one document. Pages
    /// unfinished at the deadline are substituted with empty text.
    #[serde(default = "default_ocr_timeout_secs")]
    pub ocr_timeout_secs: u64,

    /// Page rasterization options for OCR input.
    #[serde(default)]
    pub render: RenderOptions,
}

fn default_min_text_chars() -> usize {
    20
}

fn default_max_whitespace_ratio() -> f64 {
    0.95
}

fn default_toc_scan_pages() -> usize {
    5
}

fn default_ocr() -> Option<OcrConfig> {
    Some(OcrConfig::default())
}

fn default_ocr_timeout_secs() -> u64 {
    120
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_chars: default_min_text_chars(),
            max_whitespace_ratio: default_max_whitespace_ratio(),
            toc_scan_pages: default_toc_scan_pages(),
            ocr: default_ocr(),
            max_concurrent_ocr: None,
            ocr_timeout_secs: default_ocr_timeout_secs(),
            render: RenderOptions::default(),
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TaxorgError::validation_with_source("Invalid TOML configuration", e))
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

/// OCR configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR backend name; only "tesseract" is built in.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Tesseract language code (e.g., "eng", "deu").
    #[serde(default = "default_language")]
    pub language: String,

    /// Tesseract page segmentation mode.
    #[serde(default = "default_psm")]
    pub psm: u32,
}

fn default_backend() -> String {
    "tesseract".to_string()
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_psm() -> u32 {
    3
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            language: default_language(),
            psm: default_psm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_text_chars, 20);
        assert_eq!(config.max_whitespace_ratio, 0.95);
        assert_eq!(config.toc_scan_pages, 5);
        assert_eq!(config.ocr_timeout_secs, 120);
        assert!(config.ocr.is_some());
        assert!(config.max_concurrent_ocr.is_none());
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = ExtractionConfig::from_toml_str("min_text_chars = 40\n").unwrap();
        assert_eq!(config.min_text_chars, 40);
        // Unspecified fields keep their defaults.
        assert_eq!(config.toc_scan_pages, 5);
        assert_eq!(config.ocr.unwrap().language, "eng");
    }

    #[test]
    fn test_from_toml_str_ocr_table() {
        let toml = r#"
ocr_timeout_secs = 30

[ocr]
language = "deu"
psm = 6
"#;
        let config = ExtractionConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.ocr_timeout_secs, 30);
        let ocr = config.ocr.unwrap();
        assert_eq!(ocr.backend, "tesseract");
        assert_eq!(ocr.language, "deu");
        assert_eq!(ocr.psm, 6);
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = ExtractionConfig::from_toml_str("min_text_chars = \"lots\"");
        assert!(matches!(result, Err(TaxorgError::Validation { .. })));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "toc_scan_pages = 8").unwrap();
        let config = ExtractionConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.toc_scan_pages, 8);
    }

    #[test]
    fn test_from_toml_file_missing_is_io_error() {
        let result = ExtractionConfig::from_toml_file("/nonexistent/taxorg.toml");
        assert!(matches!(result, Err(TaxorgError::Io(_))));
    }
}
