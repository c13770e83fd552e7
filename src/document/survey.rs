//! Section discovery across a whole document
//!
//! Scans extracted text for short header-like lines naming any known
//! section and pairs each with a preview of the paragraph that follows.
//! Discovery is best-effort and never fails; an empty survey is a valid
//! answer.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::document::models::SectionSurvey;
use crate::document::segment::PARAGRAPH_SPLIT;
use crate::document::tables::SECTION_ALIASES;

/// Longest preview kept per section, in graphemes
const PREVIEW_LIMIT: usize = 200;

// Numbered section heading, e.g. "3. Results"
static NUMBERED_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+\w+").unwrap());
// Title with trailing colon, e.g. "Education:"
static TITLED_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+:").unwrap());

/// Scan text for section headers and previews.
///
/// A line counts as a header when it is short, names a known section
/// phrase, and looks like a header: all caps, followed by a blank line,
/// numbered, or title-with-colon. Results keep document order with exact
/// duplicates removed.
pub fn identify_sections(text: &str) -> SectionSurvey {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut survey = SectionSurvey::default();

    for (i, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.len() >= 50 {
            continue;
        }

        let line_lower = line.to_lowercase();
        let names_a_section = SECTION_ALIASES
            .iter()
            .flat_map(|group| group.aliases.iter())
            .any(|alias| line_lower.contains(alias));
        if !names_a_section {
            continue;
        }

        let next_is_blank = lines
            .get(i + 1)
            .map(|next| next.trim().is_empty())
            .unwrap_or(false);
        let likely_header = line == line.to_uppercase()
            || next_is_blank
            || NUMBERED_HEADER.is_match(line)
            || TITLED_COLON.is_match(line);

        if likely_header && !survey.sections.iter().any(|s| s == line) {
            survey.sections.push(line.to_string());
        }
    }

    let paragraphs: Vec<&str> = PARAGRAPH_SPLIT.split(text).collect();
    for section in &survey.sections {
        let preview = paragraphs
            .iter()
            .position(|p| p.trim().starts_with(section.as_str()))
            .and_then(|idx| paragraphs.get(idx + 1))
            .map(|following| truncate_preview(following))
            .unwrap_or_default();
        survey.previews.insert(section.clone(), preview);
    }

    survey
}

/// Cut a preview at the grapheme limit, marking the cut with an ellipsis.
pub(crate) fn truncate_preview(paragraph: &str) -> String {
    let graphemes: Vec<&str> = paragraph.graphemes(true).collect();
    if graphemes.len() <= PREVIEW_LIMIT {
        return paragraph.to_string();
    }
    let mut preview: String = graphemes[..PREVIEW_LIMIT - 3].concat();
    preview.push_str("...");
    preview
}
