//! Query translation: free chat text into a structured [`ParsedQuery`].
//!
//! The translator is a fixed rule ladder over the lower-cased query. Earlier
//! rules are more specific; the final rule always applies, so every query
//! gets an intent. Section, type, and filename hints are extracted whenever
//! their patterns appear, independent of which rule decides the intent, so
//! downstream lookups can combine them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::tables::{
    CONTENT_WORDS, DOCUMENT_WORDS, LIST_WORDS, RECENCY_WORDS, SECTION_HINTS, SKILLS_WORDS,
    STOP_WORDS, TYPE_HINTS, VALID_HINT_SECTIONS,
};

/// What the caller wants done, inferred from their words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// Show a particular document, picked by filename or recency
    ShowDocument,
    /// Pull one named section out of a document
    ExtractSection,
    /// List the sections a document contains
    ListSections,
    /// Find documents matching a type or content terms
    Search,
}

/// A natural-language query reduced to structured fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub raw_text: String,
    pub intent: QueryIntent,
    /// Canonical section name the query points at, if any
    pub section_hint: Option<String>,
    /// Stored document type the query points at, if any
    pub type_hint: Option<String>,
    /// Filename the query names explicitly, if any
    pub filename_hint: Option<String>,
    /// Significant words for a content search, first-seen order, deduplicated
    pub content_terms: Vec<String>,
}

// "find/get/extract/show/display the X (section)" requests. The optional
// "the" sits between two required whitespace runs, so bare "show X" is not
// captured here; the whole-text hint scan picks those up instead.
static ACTION_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:find|get|extract|show|display)\s+(?:the)?\s+(\w+)(?:\s+section)?").unwrap()
});

// "from/in the X (section)" requests
static LOCATED_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:from|in)\s+(?:the)?\s+(\w+)(?:\s+section)?").unwrap()
});

// "the file called report.pdf" / "filename named 'x'"
static NAMED_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)file(?:name)?\s+(?:called|named)\s+["']?([^"']+)["']?"#).unwrap()
});

/// Translate a free-text query into an intent plus lookup hints.
pub fn translate_query(raw: &str) -> ParsedQuery {
    let lower = raw.to_lowercase();

    let section_hint = find_section_hint(&lower);
    let type_hint = find_type_hint(&lower);
    let filename_hint = find_filename_hint(raw);
    let content_terms = collect_content_terms(&lower);

    let wants_listing =
        lower.contains("sections") && LIST_WORDS.iter().any(|w| lower.contains(w));
    let wants_content = DOCUMENT_WORDS.iter().any(|w| lower.contains(w))
        && CONTENT_WORDS.iter().any(|w| lower.contains(w));
    let wants_skills = SKILLS_WORDS.iter().any(|w| lower.contains(w));

    let intent = if wants_listing {
        QueryIntent::ListSections
    } else if wants_content || wants_skills || section_hint.is_some() {
        QueryIntent::ExtractSection
    } else if filename_hint.is_some() {
        QueryIntent::ShowDocument
    } else if RECENCY_WORDS.iter().any(|w| lower.contains(w)) {
        QueryIntent::ShowDocument
    } else {
        // Type-hinted and free-text searches share one intent; the hint and
        // the terms ride along in either case.
        QueryIntent::Search
    };

    debug!(
        ?intent,
        section = section_hint.as_deref(),
        doc_type = type_hint.as_deref(),
        "translated query"
    );

    ParsedQuery {
        raw_text: raw.to_string(),
        intent,
        section_hint,
        type_hint,
        filename_hint,
        content_terms,
    }
}

/// Resolve the section a query asks about, if any.
///
/// Capture patterns run first; a captured word counts only when it names a
/// section directly. Otherwise the ordered keyword table is scanned over the
/// whole query, so phrasings like "work history" still land on `experience`.
fn find_section_hint(lower: &str) -> Option<String> {
    for pattern in [&ACTION_SECTION, &LOCATED_SECTION] {
        if let Some(caps) = pattern.captures(lower) {
            let word = &caps[1];
            if VALID_HINT_SECTIONS.contains(&word) {
                return Some(word.to_string());
            }
        }
    }
    SECTION_HINTS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, section)| (*section).to_string())
}

fn find_type_hint(lower: &str) -> Option<String> {
    TYPE_HINTS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, name)| (*name).to_string())
}

fn find_filename_hint(raw: &str) -> Option<String> {
    NAMED_FILE
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Words worth searching for: longer than three characters after trimming
/// punctuation, not in the stop list, first occurrence only.
fn collect_content_terms(lower: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in lower.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if word.len() > 3
            && !STOP_WORDS.contains(&word)
            && !terms.iter().any(|t| t == word)
        {
            terms.push(word.to_string());
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_request_is_a_section_extraction() {
        let parsed = translate_query("show me the skills section");
        assert_eq!(parsed.intent, QueryIntent::ExtractSection);
        assert_eq!(parsed.section_hint.as_deref(), Some("skills"));
    }

    #[test]
    fn extract_request_captures_the_named_section() {
        let parsed = translate_query("extract the education section from the pdf");
        assert_eq!(parsed.intent, QueryIntent::ExtractSection);
        assert_eq!(parsed.section_hint.as_deref(), Some("education"));
    }

    #[test]
    fn work_history_phrasing_maps_to_experience() {
        let parsed = translate_query("tell me about their work history");
        assert_eq!(parsed.section_hint.as_deref(), Some("experience"));
        assert_eq!(parsed.intent, QueryIntent::ExtractSection);
    }

    #[test]
    fn section_listing_request() {
        let parsed = translate_query("what sections does this document contain");
        assert_eq!(parsed.intent, QueryIntent::ListSections);
    }

    #[test]
    fn patient_lookup_gets_a_type_hint() {
        let parsed = translate_query("find documents about patient medical history");
        assert_eq!(parsed.intent, QueryIntent::Search);
        assert_eq!(parsed.type_hint.as_deref(), Some("patient"));
    }

    #[test]
    fn filename_reference_shows_that_document() {
        let parsed = translate_query("open the file called 'quarterly_report.pdf'");
        assert_eq!(parsed.intent, QueryIntent::ShowDocument);
        assert_eq!(parsed.filename_hint.as_deref(), Some("quarterly_report.pdf"));
    }

    #[test]
    fn recency_words_show_the_latest_document() {
        let parsed = translate_query("show me my most recent upload");
        assert_eq!(parsed.intent, QueryIntent::ShowDocument);
        assert!(parsed.filename_hint.is_none());
    }

    #[test]
    fn plain_text_search_collects_significant_terms() {
        let parsed = translate_query("anything about quarterly revenue growth");
        assert_eq!(parsed.intent, QueryIntent::Search);
        assert!(parsed.content_terms.contains(&"quarterly".to_string()));
        assert!(parsed.content_terms.contains(&"revenue".to_string()));
        assert!(parsed.content_terms.contains(&"growth".to_string()));
        assert!(!parsed.content_terms.contains(&"about".to_string()));
    }

    #[test]
    fn hints_populate_even_when_intent_is_recency() {
        let parsed = translate_query("show me the recent resume");
        assert_eq!(parsed.intent, QueryIntent::ShowDocument);
        assert_eq!(parsed.type_hint.as_deref(), Some("resume"));
    }

    #[test]
    fn captured_word_outside_the_known_sections_is_not_a_hint() {
        let parsed = translate_query("extract the budget section");
        assert!(parsed.section_hint.is_none());
        assert_eq!(parsed.intent, QueryIntent::Search);
    }

    #[test]
    fn punctuation_is_trimmed_from_content_terms() {
        let parsed = translate_query("what are the skills?");
        assert_eq!(parsed.section_hint.as_deref(), Some("skills"));
        assert!(parsed.content_terms.contains(&"skills".to_string()));
    }
}
