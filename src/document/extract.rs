//! Text extraction from uploaded document payloads
//!
//! Turns a base64 payload into per-page plain text by walking the PDF
//! content streams. Plain text uploads skip the PDF path and flow through
//! as a single page, so the rest of the pipeline sees one shape.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use lopdf::content::Content;
use tracing::debug;

use crate::document::models::{Document, ExtractedText, PageText};
use crate::error::{EngineError, Result};

/// Strip an optional `data:<mime>;base64,` prefix and decode the payload.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Err(EngineError::Decode("empty payload".to_string()));
    }

    let encoded = match payload.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => payload,
    };

    Ok(STANDARD.decode(encoded.trim())?)
}

/// Extract per-page text from PDF bytes.
///
/// Fails with `Decode` when the bytes are not a readable PDF and with
/// `EmptyDocument` when no page yields any text.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText> {
    debug!(size = bytes.len(), "starting pdf text extraction");

    let doc = lopdf::Document::load_mem(bytes)?;

    if doc.is_encrypted() {
        return Err(EngineError::Decode(
            "PDF is encrypted and cannot be read".to_string(),
        ));
    }

    let page_map = doc.get_pages();
    if page_map.is_empty() {
        return Err(EngineError::EmptyDocument);
    }
    debug!(pages = page_map.len(), "pdf loaded");

    let mut pages = Vec::with_capacity(page_map.len());
    for (page_num, &page_id) in page_map.iter() {
        let text = page_text(&doc, page_id).unwrap_or_default();
        pages.push(PageText {
            number: *page_num as usize,
            text: text.trim().to_string(),
        });
    }

    if pages.iter().all(|p| p.text.is_empty()) {
        return Err(EngineError::EmptyDocument);
    }

    Ok(ExtractedText { pages })
}

/// Decode a payload and extract its text in one step.
pub fn extract_from_payload(payload: &str) -> Result<ExtractedText> {
    let bytes = decode_payload(payload)?;
    extract_text(&bytes)
}

/// Extract text from a stored document, dispatching on its mime type.
///
/// PDF content goes through the content-stream walk; anything textual is
/// passed through as a single page.
pub fn extract_from_document(document: &Document) -> Result<ExtractedText> {
    let looks_like_pdf = document.mime_type.contains("pdf")
        || document.content.starts_with("data:application/pdf;base64,");

    if looks_like_pdf {
        return extract_from_payload(&document.content);
    }

    // Textual uploads may still arrive base64-wrapped
    let text = if document.content.starts_with("data:") && document.content.contains(";base64,") {
        let bytes = decode_payload(&document.content)?;
        String::from_utf8(bytes)
            .map_err(|e| EngineError::Decode(format!("invalid text payload: {e}")))?
    } else {
        document.content.clone()
    };

    if text.trim().is_empty() {
        return Err(EngineError::EmptyDocument);
    }

    Ok(ExtractedText {
        pages: vec![PageText {
            number: 1,
            text: text.trim().to_string(),
        }],
    })
}

/// Walk one page's content stream collecting text-showing operators.
fn page_text(doc: &lopdf::Document, page_id: lopdf::ObjectId) -> Result<String> {
    let content_bytes = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_bytes)?;

    let mut text = String::new();
    for operation in &content.operations {
        match operation.operator.as_str() {
            // Text showing operators
            "Tj" | "TJ" | "'" | "\"" => {
                for operand in &operation.operands {
                    if let Some(s) = decode_text_object(operand) {
                        text.push_str(&s);
                        text.push(' ');
                    }
                }
            }
            // Text positioning starts a new line
            "Td" | "TD" | "T*" => {
                if !text.ends_with('\n') {
                    if text.ends_with(' ') {
                        text.pop();
                    }
                    text.push('\n');
                }
            }
            _ => {}
        }
    }

    Ok(text)
}

/// Decode a PDF string object, handling UTF-16BE and Latin-1 encodings.
fn decode_text_object(obj: &lopdf::Object) -> Option<String> {
    match obj {
        lopdf::Object::String(bytes, _) => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks(2)
                    .filter_map(|chunk| {
                        if chunk.len() == 2 {
                            Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                        } else {
                            None
                        }
                    })
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                Some(bytes.iter().map(|&b| b as char).collect())
            }
        }
        lopdf::Object::Array(arr) => {
            // TJ arrays mix strings with positioning numbers
            let mut result = String::new();
            for item in arr {
                if let Some(s) = decode_text_object(item) {
                    result.push_str(&s);
                }
            }
            if result.is_empty() { None } else { Some(result) }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_payload_strips_data_url_prefix() {
        let encoded = STANDARD.encode(b"hello");
        let with_prefix = format!("data:application/pdf;base64,{encoded}");
        assert_eq!(decode_payload(&with_prefix).unwrap(), b"hello");
        assert_eq!(decode_payload(&encoded).unwrap(), b"hello");
    }

    #[test]
    fn decode_payload_rejects_garbage() {
        assert!(decode_payload("not base64 at all!!!").is_err());
        assert!(decode_payload("").is_err());
    }

    #[test]
    fn non_pdf_bytes_fail_with_decode_error() {
        let err = extract_text(b"plain old text").unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
    }

    #[test]
    fn text_document_passes_through_as_single_page() {
        let doc = Document::new("notes.txt", "text/plain", "Skills\nRust, Python");
        let extracted = extract_from_document(&doc).unwrap();
        assert_eq!(extracted.page_count(), 1);
        assert!(extracted.full_text().contains("--- Page 1 ---"));
        assert!(extracted.full_text().contains("Rust, Python"));
    }

    #[test]
    fn base64_wrapped_text_is_decoded() {
        let encoded = STANDARD.encode(b"Experience\nBuilt things");
        let content = format!("data:text/plain;base64,{encoded}");
        let doc = Document::new("notes.txt", "text/plain", &content);
        let extracted = extract_from_document(&doc).unwrap();
        assert!(extracted.full_text().contains("Built things"));
    }

    #[test]
    fn empty_text_document_is_empty_document_error() {
        let doc = Document::new("empty.txt", "text/plain", "   ");
        assert!(matches!(
            extract_from_document(&doc),
            Err(EngineError::EmptyDocument)
        ));
    }
}
