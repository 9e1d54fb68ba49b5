//! Document Parsing
//!
//! Cracks open PDFs and Word documents held in memory and returns their
//! plain text. Parsing is CPU-bound and synchronous; async callers should
//! run it on a blocking thread.

use lopdf::Document;
use tracing::{debug, warn};

use crate::attachment::{AttachmentError, AttachmentKind};

pub struct DocParser;

impl DocParser {
    /// Page-by-page text, each non-empty page followed by a newline.
    ///
    /// A page whose text cannot be decoded is skipped; the document only fails
    /// when it cannot be loaded at all.
    pub fn parse_pdf(data: &[u8]) -> Result<String, AttachmentError> {
        let doc = Document::load_mem(data).map_err(|e| AttachmentError::Parse {
            kind: AttachmentKind::Pdf,
            message: e.to_string(),
        })?;

        let pages = doc.get_pages();
        debug!(page_count = pages.len(), "Parsing PDF document");

        let mut text = String::new();
        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) if !page_text.is_empty() => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Ok(_) => {}
                Err(e) => warn!(page = page_num, error = %e, "Failed to extract PDF page text"),
            }
        }
        Ok(text)
    }

    /// Paragraph text joined with newlines.
    pub fn parse_docx(data: &[u8]) -> Result<String, AttachmentError> {
        let docx = docx_rs::read_docx(data).map_err(|e| AttachmentError::Parse {
            kind: AttachmentKind::Word,
            message: e.to_string(),
        })?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                docx_rs::DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .collect();
        debug!(paragraphs = paragraphs.len(), "Parsed DOCX document");
        Ok(paragraphs.join("\n"))
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

/// Walks hyperlinks and tracked insertions as well as plain runs; deleted text is skipped.
fn push_children_text(children: &[docx_rs::ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, text),
            docx_rs::ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            docx_rs::ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = insert_child {
                        push_run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &docx_rs::Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            docx_rs::RunChild::Text(t) => text.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{docx_with_paragraphs, pdf_with_pages};

    #[test]
    fn pdf_pages_are_concatenated_in_order() {
        let pdf = pdf_with_pages(&["Alice alice@x.com", "Bob bob@x.com"]);
        let text = DocParser::parse_pdf(&pdf).unwrap();
        let alice = text.find("Alice").expect("first page text missing");
        let bob = text.find("Bob").expect("second page text missing");
        assert!(alice < bob);
    }

    #[test]
    fn garbage_is_not_a_pdf() {
        let err = DocParser::parse_pdf(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, AttachmentError::Parse { kind: AttachmentKind::Pdf, .. }));
    }

    #[test]
    fn docx_paragraphs_are_joined_by_newline() {
        let docx = docx_with_paragraphs(&["Alice, alice@x.com", "Bob, 9876543210"]);
        let text = DocParser::parse_docx(&docx).unwrap();
        assert_eq!(text, "Alice, alice@x.com\nBob, 9876543210");
    }

    fn pack(docx: docx_rs::Docx) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn docx_hyperlinked_email_is_kept() {
        let paragraph = docx_rs::Paragraph::new()
            .add_run(docx_rs::Run::new().add_text("Alice, "))
            .add_hyperlink(
                docx_rs::Hyperlink::new("mailto:alice@x.com", docx_rs::HyperlinkType::External)
                    .add_run(docx_rs::Run::new().add_text("alice@x.com")),
            );
        let docx = pack(docx_rs::Docx::new().add_paragraph(paragraph));
        assert_eq!(DocParser::parse_docx(&docx).unwrap(), "Alice, alice@x.com");
    }

    #[test]
    fn docx_line_break_becomes_newline() {
        let run = docx_rs::Run::new()
            .add_text("Alice")
            .add_break(docx_rs::BreakType::TextWrapping)
            .add_text("alice@x.com");
        let docx = pack(docx_rs::Docx::new().add_paragraph(docx_rs::Paragraph::new().add_run(run)));
        assert_eq!(DocParser::parse_docx(&docx).unwrap(), "Alice\nalice@x.com");
    }

    #[test]
    fn docx_tracked_insertion_is_kept() {
        let paragraph = docx_rs::Paragraph::new()
            .add_run(docx_rs::Run::new().add_text("Bob "))
            .add_insert(docx_rs::Insert::new(docx_rs::Run::new().add_text("9876543210")));
        let docx = pack(docx_rs::Docx::new().add_paragraph(paragraph));
        assert_eq!(DocParser::parse_docx(&docx).unwrap(), "Bob 9876543210");
    }

    #[test]
    fn garbage_is_not_a_docx() {
        let err = DocParser::parse_docx(b"PK\x03\x04 nope").unwrap_err();
        assert!(matches!(err, AttachmentError::Parse { kind: AttachmentKind::Word, .. }));
    }
}
