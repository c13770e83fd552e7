//! Core data structures for document representation
//!
//! This module defines the public types flowing through the engine: stored
//! documents, extracted page text, detected sections, classification scores,
//! and the response payloads handed back to the chat layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Type aliases for convenience
pub type PreviewMap = BTreeMap<String, String>;
pub type ScoreMap = BTreeMap<String, u32>;

/// A document as held by the persistence layer.
///
/// `content` is the raw uploaded payload (base64 or plain text); derived
/// values like `document_type` are filled in by the caller after
/// classification. The engine itself never mutates a stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Assigned by the store on insert; `None` until persisted
    pub id: Option<String>,
    pub filename: String,
    pub mime_type: String,
    pub content: String,
    pub document_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(filename: &str, mime_type: &str, content: &str) -> Self {
        Document {
            id: None,
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            content: content.to_string(),
            document_type: None,
            uploaded_at: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }
}

/// An uploaded file before it becomes a stored document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
    pub size: u64,
}

/// Text recovered from a single page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number
    pub number: usize,
    pub text: String,
}

/// Full extraction result, ordered by page number
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText {
    pub pages: Vec<PageText>,
}

impl ExtractedText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Render all pages with their `--- Page N ---` markers.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(&format!("--- Page {} ---\n{}\n\n", page.number, page.text));
        }
        out
    }
}

/// A named span of document text located by the segmenter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub content: String,
    /// Header line the match anchored on, when a strategy identified one
    pub preceding_header: Option<String>,
}

/// All detected section headers with short content previews
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SectionSurvey {
    /// Header lines in document order, deduplicated by exact text
    pub sections: Vec<String>,
    /// Header line -> preview of the paragraph that follows it
    pub previews: PreviewMap,
}

impl SectionSurvey {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Outcome of document type classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    /// Winning type, or `"document"` when nothing scored
    pub document_type: String,
    pub score: u32,
    pub all_scores: ScoreMap,
}

/// Result of a full-text extraction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub text: String,
    pub page_count: usize,
}

/// Result of a single-section extraction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResponse {
    pub success: bool,
    pub section: String,
    pub content: Option<String>,
}

/// Result of a section survey request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub success: bool,
    pub sections: Vec<String>,
    pub previews: PreviewMap,
    pub document_type: String,
}
