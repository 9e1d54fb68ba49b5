//! Optical Character Recognition (OCR)
//!
//! Runs the `tesseract` binary over image bytes (`tesseract stdin stdout`).
//! OCR is optional: when the binary is not installed the caller gets
//! [`AttachmentError::OcrUnavailable`] and degrades to empty text.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::attachment::AttachmentError;

#[derive(Debug, Clone)]
pub struct OcrService {
    binary: String,
}

impl OcrService {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Read all discernible text from an encoded image (PNG, JPEG, TIFF, ...).
    pub async fn extract_text(&self, image: &[u8]) -> Result<String, AttachmentError> {
        debug!(binary = %self.binary, size = image.len(), "Running OCR on image");

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    AttachmentError::OcrUnavailable(format!("{}: {e}", self.binary))
                }
                _ => AttachmentError::Ocr(e.to_string()),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A broken pipe here means tesseract exited early; its status tells us why.
            let _ = stdin.write_all(image).await;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AttachmentError::Ocr(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AttachmentError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(chars = text.len(), "OCR completed");
        Ok(text)
    }
}

impl Default for OcrService {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let ocr = OcrService::new("intake-test-no-such-ocr-binary");
        let err = ocr.extract_text(b"\x89PNG").await.unwrap_err();
        assert!(matches!(err, AttachmentError::OcrUnavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_binary_is_ocr_error() {
        // `false` ignores its arguments and exits 1.
        let ocr = OcrService::new("false");
        let err = ocr.extract_text(b"\x89PNG").await.unwrap_err();
        assert!(matches!(err, AttachmentError::Ocr(_)));
    }
}
