//! Attachment text extraction.
//!
//! Dispatches on the declared content type: PDF and Word documents are parsed
//! in-process, images go through OCR, anything else yields no text. Every
//! failure is typed; [`AttachmentExtractor::extract_best_effort`] turns them
//! into empty text for callers that must not fail.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use intake_core::{Attachment, FetchError, MediaFetcher};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::doc_parse::DocParser;
use crate::ocr::OcrService;

/// Formats we know how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Pdf,
    Word,
    Image,
    Unsupported,
}

impl AttachmentKind {
    /// Classify a MIME content type. Matching is case-insensitive and loose:
    /// any type mentioning `pdf` or `word` counts, so vendor variants work.
    pub fn from_content_type(content_type: &str) -> Self {
        let ct = content_type.trim().to_ascii_lowercase();
        if ct.contains("pdf") {
            Self::Pdf
        } else if ct.contains("word") {
            Self::Word
        } else if ct.starts_with("image/") {
            Self::Image
        } else {
            Self::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Image => "image",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("unsupported attachment type {0:?}")]
    Unsupported(String),

    #[error("failed to parse {kind} attachment: {message}")]
    Parse { kind: AttachmentKind, message: String },

    #[error("OCR unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR failed: {0}")]
    Ocr(String),
}

/// Result of a best-effort extraction: always some text (possibly empty),
/// plus the error that forced the fallback, if any.
#[derive(Debug)]
pub struct AttachmentText {
    pub kind: AttachmentKind,
    pub text: String,
    pub error: Option<AttachmentError>,
}

pub struct AttachmentExtractor {
    fetcher: Arc<dyn MediaFetcher>,
    ocr: OcrService,
}

impl AttachmentExtractor {
    pub fn new(fetcher: Arc<dyn MediaFetcher>, ocr: OcrService) -> Self {
        Self { fetcher, ocr }
    }

    /// Fetch and convert an attachment, surfacing every failure.
    ///
    /// Unsupported types are rejected before any download happens.
    pub async fn extract(&self, url: &str, content_type: &str) -> Result<String, AttachmentError> {
        let kind = AttachmentKind::from_content_type(content_type);
        if kind == AttachmentKind::Unsupported {
            return Err(AttachmentError::Unsupported(content_type.to_string()));
        }

        let data = self.fetcher.fetch(url).await?;
        let text = self.text_from_bytes(kind, data).await?;
        info!(%kind, chars = text.len(), "Extracted attachment text");
        Ok(text)
    }

    /// Like [`extract`](Self::extract), but every failure degrades to empty text.
    pub async fn extract_best_effort(&self, attachment: &Attachment) -> AttachmentText {
        let kind = AttachmentKind::from_content_type(&attachment.content_type);
        match self.extract(&attachment.url, &attachment.content_type).await {
            Ok(text) => AttachmentText { kind, text, error: None },
            Err(e) => {
                warn!(%kind, error = %e, "Attachment extraction failed, using empty text");
                AttachmentText {
                    kind,
                    text: String::new(),
                    error: Some(e),
                }
            }
        }
    }

    async fn text_from_bytes(&self, kind: AttachmentKind, data: Bytes) -> Result<String, AttachmentError> {
        match kind {
            AttachmentKind::Pdf => parse_blocking(kind, data, DocParser::parse_pdf).await,
            AttachmentKind::Word => parse_blocking(kind, data, DocParser::parse_docx).await,
            AttachmentKind::Image => self.ocr.extract_text(&data).await,
            AttachmentKind::Unsupported => Err(AttachmentError::Unsupported(kind.to_string())),
        }
    }
}

async fn parse_blocking(
    kind: AttachmentKind,
    data: Bytes,
    parse: fn(&[u8]) -> Result<String, AttachmentError>,
) -> Result<String, AttachmentError> {
    tokio::task::spawn_blocking(move || parse(&data))
        .await
        .map_err(|e| AttachmentError::Parse {
            kind,
            message: format!("parser task failed: {e}"),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{docx_with_paragraphs, pdf_with_pages};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFetcher {
        body: Result<Vec<u8>, u16>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn ok(body: Vec<u8>) -> Arc<Self> {
            Arc::new(Self { body: Ok(body), calls: AtomicUsize::new(0) })
        }

        fn status(status: u16) -> Arc<Self> {
            Arc::new(Self { body: Err(status), calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl MediaFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.body {
                Ok(body) => Ok(Bytes::from(body.clone())),
                Err(status) => Err(FetchError::Status { url: url.to_string(), status: *status }),
            }
        }
    }

    fn extractor(fetcher: Arc<StaticFetcher>) -> AttachmentExtractor {
        AttachmentExtractor::new(fetcher, OcrService::new("intake-test-no-such-ocr-binary"))
    }

    #[test]
    fn classifies_content_types() {
        assert_eq!(AttachmentKind::from_content_type("application/pdf"), AttachmentKind::Pdf);
        assert_eq!(AttachmentKind::from_content_type("Application/PDF"), AttachmentKind::Pdf);
        assert_eq!(
            AttachmentKind::from_content_type(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            AttachmentKind::Word
        );
        assert_eq!(AttachmentKind::from_content_type("application/msword"), AttachmentKind::Word);
        assert_eq!(AttachmentKind::from_content_type("image/jpeg"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::from_content_type("text/vcard"), AttachmentKind::Unsupported);
        assert_eq!(AttachmentKind::from_content_type(""), AttachmentKind::Unsupported);
    }

    #[tokio::test]
    async fn unsupported_types_yield_empty_text_without_fetching() {
        let fetcher = StaticFetcher::ok(b"BEGIN:VCARD".to_vec());
        let extractor = extractor(fetcher.clone());

        for ct in ["text/vcard", "audio/ogg", "video/mp4", "application/zip"] {
            let out = extractor
                .extract_best_effort(&Attachment { url: "https://m/1".into(), content_type: ct.into() })
                .await;
            assert_eq!(out.text, "");
            assert!(matches!(out.error, Some(AttachmentError::Unsupported(_))));
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn extracts_pdf_text() {
        let extractor = extractor(StaticFetcher::ok(pdf_with_pages(&["Alice alice@x.com"])));
        let text = extractor.extract("https://m/1", "application/pdf").await.unwrap();
        assert!(text.contains("Alice"));
    }

    #[tokio::test]
    async fn extracts_docx_text() {
        let extractor = extractor(StaticFetcher::ok(docx_with_paragraphs(&["Bob", "bob@x.com"])));
        let text = extractor
            .extract(
                "https://m/1",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            )
            .await
            .unwrap();
        assert_eq!(text, "Bob\nbob@x.com");
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_empty() {
        let extractor = extractor(StaticFetcher::status(404));
        let out = extractor
            .extract_best_effort(&Attachment { url: "https://m/1".into(), content_type: "application/pdf".into() })
            .await;
        assert_eq!(out.text, "");
        assert!(matches!(out.error, Some(AttachmentError::Fetch(FetchError::Status { status: 404, .. }))));
    }

    #[tokio::test]
    async fn missing_ocr_degrades_to_empty() {
        let extractor = extractor(StaticFetcher::ok(b"\x89PNG\r\n".to_vec()));
        let out = extractor
            .extract_best_effort(&Attachment { url: "https://m/1".into(), content_type: "image/png".into() })
            .await;
        assert_eq!(out.kind, AttachmentKind::Image);
        assert_eq!(out.text, "");
        assert!(matches!(out.error, Some(AttachmentError::OcrUnavailable(_))));
    }

    #[tokio::test]
    async fn corrupt_pdf_degrades_to_empty() {
        let extractor = extractor(StaticFetcher::ok(b"garbage, not a document".to_vec()));
        let out = extractor
            .extract_best_effort(&Attachment { url: "https://m/1".into(), content_type: "application/pdf".into() })
            .await;
        assert_eq!(out.text, "");
        assert!(matches!(out.error, Some(AttachmentError::Parse { kind: AttachmentKind::Pdf, .. })));
    }
}
