//! Structured document filters. The store matches against these; free text
//! never reaches it directly.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::models::Document;
use crate::error::Result;
use crate::query::translate::{ParsedQuery, QueryIntent};

/// Which end of the upload timeline comes first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// How a `find` call orders and bounds its results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindOptions {
    pub sort: SortOrder,
    /// 0 means unlimited
    pub limit: usize,
}

impl FindOptions {
    /// Newest first, at most `limit` results.
    pub fn latest(limit: usize) -> Self {
        FindOptions { sort: SortOrder::NewestFirst, limit }
    }
}

/// Criteria a stored document must meet. An empty filter matches everything.
///
/// The filename and content terms are treated as case-insensitive regular
/// expressions; an unparseable pattern surfaces as `BadFilter` when the
/// filter is compiled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub document_type: Option<String>,
    pub filename: Option<String>,
    pub content_terms: Vec<String>,
}

impl DocumentFilter {
    /// Build the store filter a parsed query implies.
    ///
    /// Filename and type hints always carry over. Content terms only apply
    /// to a plain search that no type hint already decided; a typed lookup
    /// matches on the stored type alone, and for the other intents the
    /// document choice falls to the hints and recency, not to term matching.
    pub fn from_query(query: &ParsedQuery) -> Self {
        let content_terms = if query.intent == QueryIntent::Search && query.type_hint.is_none() {
            query.content_terms.clone()
        } else {
            Vec::new()
        };
        DocumentFilter {
            document_type: query.type_hint.clone(),
            filename: query.filename_hint.clone(),
            content_terms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.document_type.is_none() && self.filename.is_none() && self.content_terms.is_empty()
    }

    /// Compile the regex criteria once, for matching many documents.
    pub fn compile(&self) -> Result<CompiledFilter> {
        let filename = match &self.filename {
            Some(pattern) => Some(Regex::new(&format!("(?i){pattern}"))?),
            None => None,
        };
        let content = if self.content_terms.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("(?i){}", self.content_terms.join("|")))?)
        };
        Ok(CompiledFilter {
            document_type: self.document_type.clone(),
            filename,
            content,
        })
    }
}

/// A [`DocumentFilter`] with its regexes built.
pub struct CompiledFilter {
    document_type: Option<String>,
    filename: Option<Regex>,
    content: Option<Regex>,
}

impl CompiledFilter {
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(wanted) = &self.document_type {
            if document.document_type.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }
        if let Some(re) = &self.filename {
            if !re.is_match(&document.filename) {
                return false;
            }
        }
        if let Some(re) = &self.content {
            if !re.is_match(&document.content) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::query::translate::translate_query;

    fn doc(filename: &str, doc_type: &str, content: &str) -> Document {
        let mut d = Document::new(filename, "application/pdf", content);
        d.document_type = Some(doc_type.to_string());
        d
    }

    #[test]
    fn empty_filter_matches_everything() {
        let compiled = DocumentFilter::default().compile().unwrap();
        assert!(compiled.matches(&doc("a.pdf", "resume", "text")));
    }

    #[test]
    fn type_filter_requires_equality() {
        let filter = DocumentFilter {
            document_type: Some("resume".to_string()),
            ..Default::default()
        };
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc("a.pdf", "resume", "")));
        assert!(!compiled.matches(&doc("b.pdf", "report", "")));
        assert!(!compiled.matches(&Document::new("c.pdf", "application/pdf", "")));
    }

    #[test]
    fn filename_filter_ignores_case() {
        let filter = DocumentFilter {
            filename: Some("report".to_string()),
            ..Default::default()
        };
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc("Quarterly_Report.pdf", "report", "")));
        assert!(!compiled.matches(&doc("notes.txt", "document", "")));
    }

    #[test]
    fn content_terms_match_as_a_disjunction() {
        let filter = DocumentFilter {
            content_terms: vec!["revenue".to_string(), "growth".to_string()],
            ..Default::default()
        };
        let compiled = filter.compile().unwrap();
        assert!(compiled.matches(&doc("a.pdf", "report", "Revenue rose this quarter")));
        assert!(compiled.matches(&doc("b.pdf", "report", "growth slowed")));
        assert!(!compiled.matches(&doc("c.pdf", "report", "nothing relevant")));
    }

    #[test]
    fn bad_filename_pattern_is_a_filter_error() {
        let filter = DocumentFilter {
            filename: Some("(".to_string()),
            ..Default::default()
        };
        let err = filter.compile().err().unwrap();
        assert!(matches!(err, EngineError::BadFilter(_)));
    }

    #[test]
    fn search_query_keeps_its_terms() {
        let parsed = translate_query("anything about quarterly revenue");
        let filter = DocumentFilter::from_query(&parsed);
        assert!(filter.content_terms.contains(&"revenue".to_string()));
    }

    #[test]
    fn type_hinted_search_drops_its_terms() {
        let parsed = translate_query("find my resume");
        let filter = DocumentFilter::from_query(&parsed);
        assert_eq!(filter.document_type.as_deref(), Some("resume"));
        assert!(
            filter.content_terms.is_empty(),
            "a typed lookup must not also require a content match"
        );
    }

    #[test]
    fn section_query_drops_terms_but_keeps_type_hint() {
        let parsed = translate_query("show me the skills section of the resume");
        let filter = DocumentFilter::from_query(&parsed);
        assert!(filter.content_terms.is_empty());
        assert_eq!(filter.document_type.as_deref(), Some("resume"));
    }
}
