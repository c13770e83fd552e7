//! Upload ingestion: turns a raw [`UploadedFile`] into a stored [`Document`].
//!
//! Ingestion runs a cheap keyword-based type detection, caps oversized
//! content, and derives search terms and lightweight metadata before the
//! document is handed to a store. It never decodes or parses the payload;
//! that is the extractor's job.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::document::models::{Document, UploadedFile};
use crate::document::survey::truncate_preview;
use crate::document::tables::DEFAULT_DOCUMENT_TYPE;

/// Upper bound on stored content, in bytes. Larger payloads are truncated.
const MAX_CONTENT_BYTES: usize = 10_000_000;

/// How many words of content feed the search-term list.
const SEARCH_TERM_WORD_CAP: usize = 50;

/// A fast document-type rule: match on filename or on raw content.
struct QuickTypeRule {
    name: &'static str,
    filename_words: &'static [&'static str],
    content_words: &'static [&'static str],
}

/// Ordered quick-detection rules. The first rule that matches wins, so the
/// more specific vocabularies sit ahead of the generic ones.
static QUICK_TYPE_RULES: &[QuickTypeRule] = &[
    QuickTypeRule {
        name: "resume",
        filename_words: &["resume", "cv", "curriculum"],
        content_words: &["resume", "experience", "education", "skills"],
    },
    QuickTypeRule {
        name: "patient",
        filename_words: &["patient", "medical", "health"],
        content_words: &["patient", "diagnosis", "medical record"],
    },
    QuickTypeRule {
        name: "financial",
        filename_words: &["invoice", "bill", "receipt"],
        content_words: &["invoice", "payment", "amount due"],
    },
    QuickTypeRule {
        name: "research",
        filename_words: &["research", "study", "paper"],
        content_words: &["research", "conclusion", "methodology"],
    },
];

// Splits a filename into searchable parts on underscores, dots, dashes,
// and whitespace.
static FILENAME_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[_\s.-]").unwrap()
});

// Lightweight field patterns for text uploads. Values stop at the first
// newline or comma.
static PATIENT_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)patient(?:\s+name)?[:=\s]+([^\n,]+)").unwrap()
});
static DATE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)date[:=\s]+([^\n,]+)").unwrap()
});
static DIAGNOSIS_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)diagnosis[:=\s]+([^\n,]+)").unwrap()
});

/// Build a [`Document`] from an uploaded file.
///
/// The content is stored as received (text stays text, binary payloads stay
/// base64), capped at [`MAX_CONTENT_BYTES`]. A quick type detection runs over
/// the filename and content, and the metadata map picks up a content kind,
/// search terms, and any recognizable text fields.
pub fn process_upload(file: &UploadedFile) -> Document {
    info!(
        filename = %file.filename,
        mime = %file.mime_type,
        size = file.size,
        "processing uploaded file"
    );

    let mut doc = Document::new(&file.filename, &file.mime_type, &file.content);
    if doc.content.len() > MAX_CONTENT_BYTES {
        let mut end = MAX_CONTENT_BYTES;
        while !doc.content.is_char_boundary(end) {
            end -= 1;
        }
        doc.content.truncate(end);
        debug!(filename = %file.filename, "content truncated to storage cap");
    }

    let detected = quick_detect_type(&file.filename, &doc.content);
    doc.document_type = Some(detected.to_string());

    let mut metadata = BTreeMap::new();
    metadata.insert("size".to_string(), file.size.to_string());

    if file.mime_type.starts_with("text/") {
        metadata.insert("content_kind".to_string(), "text".to_string());
        metadata.insert("preview".to_string(), truncate_preview(&doc.content));
        for (key, value) in extract_text_metadata(&doc.content) {
            metadata.insert(key, value);
        }
    } else if file.mime_type.contains("pdf") {
        metadata.insert("content_kind".to_string(), "pdf".to_string());
    } else if file.mime_type.starts_with("image/") {
        metadata.insert("content_kind".to_string(), "image".to_string());
    } else {
        metadata.insert("content_kind".to_string(), "file".to_string());
    }

    metadata.insert(
        "search_terms".to_string(),
        search_terms(file, detected).join(" "),
    );
    doc.metadata = metadata;

    debug!(filename = %file.filename, document_type = detected, "upload processed");
    doc
}

/// Guess a document type from the filename and raw content.
///
/// This is the ingest-time shortcut; the keyword classifier in
/// [`crate::document::classify`] gives the full scored answer once text has
/// been extracted.
pub fn quick_detect_type(filename: &str, content: &str) -> &'static str {
    let lower_name = filename.to_lowercase();
    let lower_content = content.to_lowercase();

    for rule in QUICK_TYPE_RULES {
        let name_hit = rule.filename_words.iter().any(|w| lower_name.contains(w));
        let content_hit = rule.content_words.iter().any(|w| lower_content.contains(w));
        if name_hit || content_hit {
            return rule.name;
        }
    }
    DEFAULT_DOCUMENT_TYPE
}

/// Derive a deduplicated, lowercased search-term list for a document.
///
/// Terms come from the full filename, its parts, the detected type, and the
/// first [`SEARCH_TERM_WORD_CAP`] content words of four or more characters.
pub fn search_terms(file: &UploadedFile, document_type: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();

    push_term(&mut terms, file.filename.to_lowercase());
    for part in FILENAME_SPLIT.split(&file.filename) {
        if part.len() > 2 {
            push_term(&mut terms, part.to_lowercase());
        }
    }
    push_term(&mut terms, document_type.to_lowercase());
    for word in file
        .content
        .split_whitespace()
        .filter(|word| word.len() >= 4)
        .take(SEARCH_TERM_WORD_CAP)
    {
        push_term(&mut terms, word.to_lowercase());
    }

    terms
}

/// Append a term unless it is empty or already present.
fn push_term(terms: &mut Vec<String>, term: String) {
    if !term.is_empty() && !terms.contains(&term) {
        terms.push(term);
    }
}

/// Pull recognizable fields out of plain-text content.
///
/// Currently understands patient names, dates, and diagnoses, which covers
/// the medical-record uploads the quick detector knows about. Unknown text
/// yields an empty map.
pub fn extract_text_metadata(text: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    if let Some(caps) = PATIENT_FIELD.captures(text) {
        fields.insert("patient_name".to_string(), caps[1].trim().to_string());
    }

    let dates: Vec<String> = DATE_FIELD
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect();
    if !dates.is_empty() {
        fields.insert("dates".to_string(), dates.join("; "));
    }

    if let Some(caps) = DIAGNOSIS_FIELD.captures(text) {
        fields.insert("diagnosis".to_string(), caps[1].trim().to_string());
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, mime: &str, content: &str) -> UploadedFile {
        UploadedFile {
            filename: filename.to_string(),
            mime_type: mime.to_string(),
            content: content.to_string(),
            size: content.len() as u64,
        }
    }

    #[test]
    fn detects_resume_from_filename() {
        assert_eq!(quick_detect_type("John_Resume.pdf", "base64data"), "resume");
        assert_eq!(quick_detect_type("cv-2024.docx", ""), "resume");
    }

    #[test]
    fn detects_patient_from_content() {
        let detected = quick_detect_type("notes.txt", "Diagnosis: seasonal flu");
        assert_eq!(detected, "patient");
    }

    #[test]
    fn detects_financial_from_receipt_filename() {
        assert_eq!(quick_detect_type("receipt.png", ""), "financial");
    }

    #[test]
    fn falls_back_to_generic_document() {
        assert_eq!(quick_detect_type("notes.txt", "hello world"), "document");
    }

    #[test]
    fn search_terms_start_with_filename_and_dedupe() {
        let file = upload(
            "John_Smith-Resume.pdf",
            "application/pdf",
            "Experienced engineer building reliable systems",
        );
        let terms = search_terms(&file, "resume");

        assert_eq!(terms[0], "john_smith-resume.pdf");
        assert!(terms.contains(&"john".to_string()));
        assert!(terms.contains(&"smith".to_string()));
        assert!(terms.contains(&"engineer".to_string()));
        assert_eq!(
            terms.iter().filter(|t| t.as_str() == "resume").count(),
            1,
            "filename part and document type must not duplicate"
        );
        assert!(terms.contains(&"pdf".to_string()));
    }

    #[test]
    fn search_terms_skip_short_words() {
        let file = upload("a.txt", "text/plain", "an ox ate the tall grass");
        let terms = search_terms(&file, "document");
        assert!(!terms.contains(&"ox".to_string()));
        assert!(!terms.contains(&"the".to_string()));
        assert!(terms.contains(&"tall".to_string()));
        assert!(terms.contains(&"grass".to_string()));
    }

    #[test]
    fn search_terms_scan_past_a_run_of_short_words() {
        let body = format!("{}significant closing remarks", "ab ".repeat(55));
        let file = upload("notes.txt", "text/plain", &body);
        let terms = search_terms(&file, "document");

        assert!(
            terms.contains(&"significant".to_string()),
            "Short filler must not use up the word cap: {terms:?}"
        );
        assert!(terms.contains(&"closing".to_string()));
        assert!(terms.contains(&"remarks".to_string()));
    }

    #[test]
    fn text_metadata_captures_medical_fields() {
        let text = "Patient Name: John Smith\nDate: 2024-01-05\nDiagnosis: Flu, mild";
        let fields = extract_text_metadata(text);

        assert_eq!(fields.get("patient_name").map(String::as_str), Some("John Smith"));
        assert_eq!(fields.get("dates").map(String::as_str), Some("2024-01-05"));
        assert_eq!(fields.get("diagnosis").map(String::as_str), Some("Flu"));
    }

    #[test]
    fn text_metadata_collects_every_date() {
        let text = "Date: 2024-01-05\nFollow-up\nDate: 2024-02-10";
        let fields = extract_text_metadata(text);
        assert_eq!(
            fields.get("dates").map(String::as_str),
            Some("2024-01-05; 2024-02-10")
        );
    }

    #[test]
    fn text_metadata_empty_for_plain_prose() {
        assert!(extract_text_metadata("Quarterly revenue grew by 4%.").is_empty());
    }

    #[test]
    fn process_upload_builds_typed_document() {
        let file = upload(
            "patient_record.txt",
            "text/plain",
            "Patient: Jane Roe\nDiagnosis: sprain",
        );
        let doc = process_upload(&file);

        assert!(doc.id.is_none());
        assert_eq!(doc.document_type.as_deref(), Some("patient"));
        assert_eq!(doc.metadata.get("content_kind").map(String::as_str), Some("text"));
        assert_eq!(doc.metadata.get("patient_name").map(String::as_str), Some("Jane Roe"));
        assert!(doc.metadata.contains_key("search_terms"));
        assert!(doc.metadata.contains_key("preview"));
    }

    #[test]
    fn process_upload_marks_pdf_content() {
        let file = upload("report.pdf", "application/pdf", "ZmFrZQ==");
        let doc = process_upload(&file);
        assert_eq!(doc.metadata.get("content_kind").map(String::as_str), Some("pdf"));
        assert!(!doc.metadata.contains_key("preview"));
    }

    #[test]
    fn process_upload_caps_oversized_content() {
        let big = "x".repeat(MAX_CONTENT_BYTES + 5);
        let file = upload("big.txt", "text/plain", &big);
        let doc = process_upload(&file);
        assert_eq!(doc.content.len(), MAX_CONTENT_BYTES);
    }
}
