//! Attachment understanding: turn fetched documents and images into plain text.

pub mod attachment;
pub mod doc_parse;
#[cfg(any(test, feature = "test-util"))]
pub mod fixtures;
pub mod ocr;

pub use attachment::{AttachmentError, AttachmentExtractor, AttachmentKind, AttachmentText};
pub use doc_parse::DocParser;
pub use ocr::OcrService;
