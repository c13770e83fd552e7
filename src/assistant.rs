//! The assistant orchestrator: a natural-language query in, a prose reply
//! plus structured tool data out.
//!
//! Every request follows the same shape: translate the query, pick candidate
//! documents from the store, then answer per intent. Content requests walk
//! an explicit fallback chain (section, then survey, then excerpt) so the
//! worst case is still a useful reply, never a raw error.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::document::models::{Document, PreviewMap, Section, SectionSurvey};
use crate::document::tables::DEFAULT_DOCUMENT_TYPE;
use crate::document::{classify, extract_from_document, extract_section, identify_sections};
use crate::error::{EngineError, Result};
use crate::query::filter::{DocumentFilter, FindOptions};
use crate::query::translate::{ParsedQuery, QueryIntent, translate_query};
use crate::store::DocumentStore;

/// Default cap on full-text excerpts, in graphemes.
pub const DEFAULT_EXCERPT_LIMIT: usize = 2000;

/// One document in a reply payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: Option<String>,
    pub filename: String,
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extracted_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub extracted_content: Option<String>,
}

/// Structured payload riding alongside the prose reply, for chat layers
/// that render document content themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolData {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub documents: Vec<DocumentSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sections: Vec<String>,
    #[serde(skip_serializing_if = "PreviewMap::is_empty", default)]
    pub previews: PreviewMap,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub document_type: Option<String>,
}

/// What the assistant answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tool_data: Option<ToolData>,
}

/// How a content request got resolved, in fallback order.
enum ContentResolution {
    Section(Section),
    Survey(SectionSurvey),
    Excerpt(String),
}

/// Answers document queries against a store.
pub struct DocumentAssistant<S> {
    store: S,
    excerpt_limit: usize,
}

impl<S: DocumentStore> DocumentAssistant<S> {
    pub fn new(store: S) -> Self {
        DocumentAssistant {
            store,
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
        }
    }

    pub fn with_excerpt_limit(store: S, excerpt_limit: usize) -> Self {
        DocumentAssistant {
            store,
            excerpt_limit,
        }
    }

    /// Answer a natural-language query about the stored documents.
    pub fn respond(&self, query_text: &str) -> Result<AssistantReply> {
        let parsed = translate_query(query_text);
        info!(intent = ?parsed.intent, "answering document query");

        let candidates = self.candidates(&parsed)?;
        let Some(document) = candidates.first() else {
            return Ok(AssistantReply {
                message: "No documents found. Upload a document first.".to_string(),
                tool_data: None,
            });
        };

        match parsed.intent {
            QueryIntent::ListSections => self.answer_listing(document),
            QueryIntent::ExtractSection => {
                self.answer_content(document, parsed.section_hint.as_deref())
            }
            QueryIntent::ShowDocument => self.answer_document(document),
            QueryIntent::Search => Ok(Self::answer_search(&candidates)),
        }
    }

    /// Documents the query's hints select, newest first. An empty filter,
    /// an empty result, or hints that compile into an unusable pattern all
    /// fall back to the most recent upload.
    fn candidates(&self, parsed: &ParsedQuery) -> Result<Vec<Document>> {
        let filter = DocumentFilter::from_query(parsed);
        if !filter.is_empty() {
            match self.store.find(&filter, &FindOptions::default()) {
                Ok(found) if !found.is_empty() => return Ok(found),
                Ok(_) => {
                    debug!("no documents matched the query hints, falling back to most recent");
                }
                Err(err) => {
                    warn!(error = %err, "query lookup failed, falling back to most recent");
                }
            }
        }
        self.store.find(&DocumentFilter::default(), &FindOptions::latest(1))
    }

    /// Serve a content request, walking the section/survey/excerpt chain.
    fn answer_content(&self, document: &Document, hint: Option<&str>) -> Result<AssistantReply> {
        let extracted = match extract_from_document(document) {
            Ok(extracted) => extracted,
            Err(err) => return Ok(Self::unreadable_reply(document, &err)),
        };
        let full_text = extracted.full_text();

        let Some(section_name) = hint else {
            // No section named: survey rather than guess one.
            let survey = identify_sections(&full_text);
            if survey.is_empty() {
                return Ok(self.excerpt_reply(document, &full_text));
            }
            return Ok(Self::survey_reply(document, survey, None));
        };

        match self.resolve_content(&full_text, section_name)? {
            ContentResolution::Section(section) => Ok(Self::section_reply(document, section)),
            ContentResolution::Survey(survey) => {
                Ok(Self::survey_reply(document, survey, Some(section_name)))
            }
            ContentResolution::Excerpt(excerpt) => Ok(Self::excerpt_text_reply(document, excerpt)),
        }
    }

    /// Section extraction with its fallbacks as a typed outcome.
    fn resolve_content(&self, full_text: &str, section_name: &str) -> Result<ContentResolution> {
        match extract_section(full_text, section_name) {
            Ok(section) => Ok(ContentResolution::Section(section)),
            Err(err) if err.is_recoverable() => {
                debug!(section = section_name, "section not found, surveying instead");
                let survey = identify_sections(full_text);
                if survey.is_empty() {
                    Ok(ContentResolution::Excerpt(self.excerpt_of(full_text)))
                } else {
                    Ok(ContentResolution::Survey(survey))
                }
            }
            Err(err) => Err(err),
        }
    }

    fn answer_listing(&self, document: &Document) -> Result<AssistantReply> {
        let extracted = match extract_from_document(document) {
            Ok(extracted) => extracted,
            Err(err) => return Ok(Self::unreadable_reply(document, &err)),
        };
        let full_text = extracted.full_text();
        let survey = identify_sections(&full_text);
        let classified = classify(&full_text, &survey.sections);

        if survey.is_empty() {
            return Ok(AssistantReply {
                message: format!(
                    "I couldn't detect any named sections in \"{}\".",
                    document.filename
                ),
                tool_data: Some(ToolData {
                    documents: vec![Self::summarize(document)],
                    document_type: Some(classified.document_type),
                    ..Default::default()
                }),
            });
        }

        let message = format!(
            "\"{}\" looks like a {} with these sections: {}.",
            document.filename,
            classified.document_type,
            survey.sections.join(", ")
        );
        Ok(AssistantReply {
            message,
            tool_data: Some(ToolData {
                documents: vec![Self::summarize(document)],
                sections: survey.sections,
                previews: survey.previews,
                document_type: Some(classified.document_type),
                ..Default::default()
            }),
        })
    }

    fn answer_document(&self, document: &Document) -> Result<AssistantReply> {
        let extracted = match extract_from_document(document) {
            Ok(extracted) => extracted,
            Err(err) => return Ok(Self::unreadable_reply(document, &err)),
        };
        let excerpt = self.excerpt_of(&extracted.full_text());
        let doc_type = document
            .document_type
            .as_deref()
            .unwrap_or(DEFAULT_DOCUMENT_TYPE);

        Ok(AssistantReply {
            message: format!(
                "Here is \"{}\" ({}):\n\n{}",
                document.filename, doc_type, excerpt
            ),
            tool_data: Some(ToolData {
                documents: vec![Self::summarize(document)],
                excerpt: Some(excerpt),
                ..Default::default()
            }),
        })
    }

    fn answer_search(candidates: &[Document]) -> AssistantReply {
        let listing = candidates
            .iter()
            .map(|doc| {
                format!(
                    "\"{}\" ({})",
                    doc.filename,
                    doc.document_type.as_deref().unwrap_or(DEFAULT_DOCUMENT_TYPE)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        let plural = if candidates.len() == 1 { "" } else { "s" };

        AssistantReply {
            message: format!(
                "I found {} matching document{}: {}.",
                candidates.len(),
                plural,
                listing
            ),
            tool_data: Some(ToolData {
                documents: candidates.iter().map(Self::summarize).collect(),
                ..Default::default()
            }),
        }
    }

    /// First `excerpt_limit` graphemes of the text.
    fn excerpt_of(&self, text: &str) -> String {
        match text.grapheme_indices(true).nth(self.excerpt_limit) {
            Some((byte_idx, _)) => text[..byte_idx].to_string(),
            None => text.to_string(),
        }
    }

    fn excerpt_reply(&self, document: &Document, full_text: &str) -> AssistantReply {
        Self::excerpt_text_reply(document, self.excerpt_of(full_text))
    }

    fn excerpt_text_reply(document: &Document, excerpt: String) -> AssistantReply {
        AssistantReply {
            message: format!(
                "I extracted the full text from \"{}\":\n\n{}",
                document.filename, excerpt
            ),
            tool_data: Some(ToolData {
                documents: vec![Self::summarize(document)],
                excerpt: Some(excerpt),
                ..Default::default()
            }),
        }
    }

    fn section_reply(document: &Document, section: Section) -> AssistantReply {
        let mut summary = Self::summarize(document);
        summary.extracted_section = Some(section.name.clone());
        summary.extracted_content = Some(section.content.clone());

        AssistantReply {
            message: format!(
                "Here is the {} section from \"{}\":\n\n{}",
                section.name, document.filename, section.content
            ),
            tool_data: Some(ToolData {
                documents: vec![summary],
                section_name: Some(section.name),
                section_content: Some(section.content),
                ..Default::default()
            }),
        }
    }

    fn survey_reply(
        document: &Document,
        survey: SectionSurvey,
        missing: Option<&str>,
    ) -> AssistantReply {
        let listing = survey.sections.join(", ");
        let message = match missing {
            Some(name) => format!(
                "I couldn't find a '{name}' section. I found these sections in the document: {listing}."
            ),
            None => format!("I found these sections in the document: {listing}."),
        };

        AssistantReply {
            message,
            tool_data: Some(ToolData {
                documents: vec![Self::summarize(document)],
                sections: survey.sections,
                previews: survey.previews,
                ..Default::default()
            }),
        }
    }

    fn unreadable_reply(document: &Document, err: &EngineError) -> AssistantReply {
        warn!(filename = %document.filename, error = %err, "extraction failed");
        AssistantReply {
            message: format!(
                "I found the document \"{}\" but could not extract the requested content.",
                document.filename
            ),
            tool_data: Some(ToolData {
                documents: vec![Self::summarize(document)],
                ..Default::default()
            }),
        }
    }

    fn summarize(document: &Document) -> DocumentSummary {
        DocumentSummary {
            id: document.id.clone(),
            filename: document.filename.clone(),
            document_type: document.document_type.clone(),
            extracted_section: None,
            extracted_content: None,
        }
    }
}
