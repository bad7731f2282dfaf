use anyhow::{Context as _, anyhow};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use crate::models::DocumentKind;

/// Extracts plain text from raw document bytes of a known kind. The result
/// is trimmed; empty output means the document had no extractable text,
/// which the orchestrator treats as a content error.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> anyhow::Result<String> {
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(bytes)?,
        // Legacy .doc goes through the same reader; genuinely binary-format
        // files fail parsing and surface as an extraction error.
        DocumentKind::Docx | DocumentKind::Doc => extract_docx(bytes)?,
    };
    Ok(text.trim().to_string())
}

fn extract_pdf(bytes: &[u8]) -> anyhow::Result<String> {
    let doc = lopdf::Document::load_mem(bytes).context("failed to parse PDF")?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        // A page with no text layer (scanned/image-only) contributes an
        // empty string, not an error.
        let text = doc.extract_text(&[*page_number]).unwrap_or_default();
        pages.push(text);
    }

    Ok(pages.join("\n"))
}

fn extract_docx(bytes: &[u8]) -> anyhow::Result<String> {
    let docx =
        docx_rs::read_docx(bytes).map_err(|e| anyhow!("failed to parse Word document: {}", e))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let text = paragraph_text(paragraph);
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut out = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(text) = run_child {
                    out.push_str(&text.text);
                }
            }
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::test_docs::*;
    use super::*;

    #[test]
    fn docx_extracts_paragraphs_in_order() {
        let bytes = docx_with_paragraphs(&["First paragraph.", "Second paragraph."]);
        let text = extract_text(&bytes, DocumentKind::Docx).unwrap();
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn docx_skips_empty_paragraphs() {
        let bytes = docx_with_paragraphs(&["One.", "", "Two."]);
        let text = extract_text(&bytes, DocumentKind::Docx).unwrap();
        assert_eq!(text, "One.\nTwo.");
    }

    #[test]
    fn single_paragraph_docx_extracts_verbatim() {
        let bytes = docx_with_paragraphs(&["The cat sat."]);
        let text = extract_text(&bytes, DocumentKind::Docx).unwrap();
        assert_eq!(text, "The cat sat.");
    }

    #[test]
    fn pdf_with_text_layer_extracts_non_empty() {
        let bytes = pdf_with_text("Hello compliance");
        let text = extract_text(&bytes, DocumentKind::Pdf).unwrap();
        assert!(text.contains("Hello compliance"), "got: {text:?}");
    }

    #[test]
    fn pdf_without_text_layer_extracts_empty() {
        let bytes = pdf_without_text();
        let text = extract_text(&bytes, DocumentKind::Pdf).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn corrupt_bytes_fail_extraction() {
        assert!(extract_text(b"not a pdf", DocumentKind::Pdf).is_err());
        assert!(extract_text(b"not a docx", DocumentKind::Docx).is_err());
        // Legacy .doc bytes are not OOXML and fail the same way.
        assert!(extract_text(b"\xd0\xcf\x11\xe0legacy", DocumentKind::Doc).is_err());
    }
}
