//! Tesseract OCR backend.
//!
//! Invokes the system `tesseract` binary as a subprocess over a temporary
//! PNG file and reads the recognized text from stdout. Process lifetime is
//! owned by the per-page task; `kill_on_drop` ensures an aborted task (OCR
//! phase deadline) does not leak a running tesseract.

use crate::core::config::OcrConfig;
use crate::error::{Result, TaxorgError};
use crate::ocr::OcrBackend;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::process::Command;

/// RAII guard for automatic temporary file cleanup
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        // Best-effort cleanup - Drop can't be async
        let path = self.path.clone();
        tokio::spawn(async move {
            let _ = fs::remove_file(&path).await;
        });
    }
}

pub struct TesseractBackend;

impl TesseractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrBackend for TesseractBackend {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image_png: &[u8], config: &OcrConfig) -> Result<String> {
        let temp_path = std::env::temp_dir().join(format!(
            "taxorg_ocr_{}_{}.png",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        fs::write(&temp_path, image_png).await?;
        let _guard = TempFile::new(temp_path.clone());

        let child = Command::new("tesseract")
            .arg(&temp_path)
            .arg("stdout")
            .arg("-l")
            .arg(&config.language)
            .arg("--psm")
            .arg(config.psm.to_string())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TaxorgError::ocr_with_source("Failed to execute tesseract", e))?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| TaxorgError::ocr_with_source("Failed to wait for tesseract", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TaxorgError::ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recognize_invalid_image_fails() {
        let backend = TesseractBackend::new();
        let config = OcrConfig::default();
        // Not a PNG; either the binary is missing (spawn error) or tesseract
        // rejects the input. Both must surface as Ocr errors, never panic.
        let result = backend.recognize(b"not a png", &config).await;
        assert!(matches!(result, Err(TaxorgError::Ocr { .. })));
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(TesseractBackend::new().name(), "tesseract");
    }
}
