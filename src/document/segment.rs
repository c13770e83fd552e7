//! Multi-strategy section extraction
//!
//! Three strategies run in order against the extracted text; the first one
//! producing non-empty content wins. Header patterns handle well-formatted
//! documents, the line scanner handles loosely formatted ones, and the
//! keyword filter is the last resort for running prose.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::document::models::Section;
use crate::document::tables::{self, SECTION_ALIASES};
use crate::error::{EngineError, Result};

/// Resolved extraction target: canonical name plus its header phrasings
#[derive(Debug, Clone)]
pub(crate) struct SectionTarget {
    /// Canonical table name, or the lower-cased raw name when unknown
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
}

impl SectionTarget {
    pub(crate) fn resolve(section_name: &str) -> Self {
        let name = tables::canonical_for(section_name)
            .map(|n| n.to_string())
            .unwrap_or_else(|| section_name.to_lowercase());
        SectionTarget {
            name,
            aliases: tables::aliases_for(section_name),
        }
    }
}

/// A strategy's successful result
struct SectionHit {
    content: String,
    header: Option<String>,
}

type Strategy = fn(&str, &SectionTarget) -> Option<SectionHit>;

/// Ordered strategy list; first non-empty result wins
static STRATEGIES: &[(&str, Strategy)] = &[
    ("header-pattern", by_header_pattern),
    ("line-scan", by_line_scan),
    ("keyword-paragraphs", by_keyword_paragraphs),
];

// Pattern shapes tried per alias, `{alias}` replaced with the escaped
// header phrase. Whole patterns are case-insensitive.
static HEADER_PATTERN_SHAPES: &[&str] = &[
    // Header line, content up to the next capitalized header line
    r"(?i)(?:^|\n)\s*({alias})\s*(?:\n|:)([\s\S]*?)(?:(?:^|\n)\s*[A-Z][A-Za-z\s]+(?:\n|:)|$)",
    // Header with colon, content up to the next `word:` line
    r"(?i)(?:^|\n)\s*({alias})\s*:([\s\S]*?)(?:(?:^|\n)\s*\w+\s*:|$)",
    // Header line, content up to the next numbered or bulleted line
    r"(?i)(?:^|\n)\s*({alias})\s*(?:\n|:)([\s\S]*?)(?:(?:^|\n)\s*[\d\.\-•\*]\s+|$)",
];

pub(crate) static PARAGRAPH_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Extract a named section from extracted document text.
///
/// The name expands through the alias table; unknown names fall back to a
/// single alias of the raw name. Returns `SectionNotFound` when every
/// strategy comes up empty, so callers can offer section discovery next.
pub fn extract_section(text: &str, section_name: &str) -> Result<Section> {
    let target = SectionTarget::resolve(section_name);

    for (label, strategy) in STRATEGIES {
        if let Some(hit) = strategy(text, &target) {
            if !hit.content.is_empty() {
                debug!(section = %target.name, strategy = label, "section located");
                return Ok(Section {
                    name: target.name,
                    content: hit.content,
                    preceding_header: hit.header,
                });
            }
        }
        debug!(section = %target.name, strategy = label, "strategy produced nothing");
    }

    Err(EngineError::SectionNotFound(section_name.to_string()))
}

/// Try the three header pattern shapes for each alias in order.
fn by_header_pattern(text: &str, target: &SectionTarget) -> Option<SectionHit> {
    for alias in &target.aliases {
        let escaped = regex::escape(alias);
        for shape in HEADER_PATTERN_SHAPES {
            let pattern = shape.replace("{alias}", &escaped);
            if let Ok(re) = Regex::new(&pattern) {
                if let Some(caps) = re.captures(text) {
                    let content = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                    if !content.is_empty() {
                        return Some(SectionHit {
                            content: content.to_string(),
                            header: caps.get(1).map(|m| m.as_str().to_string()),
                        });
                    }
                }
            }
        }
    }
    None
}

/// Scan line by line, entering the target section on a short header-like
/// line and leaving when a short line names any other known section.
fn by_line_scan(text: &str, target: &SectionTarget) -> Option<SectionHit> {
    let mut in_section = false;
    let mut collected: Vec<&str> = Vec::new();
    let mut current_header = "";
    let mut first_header: Option<String> = None;

    for raw_line in text.split('\n') {
        let line = raw_line.trim();
        let line_lower = line.to_lowercase();

        for group in SECTION_ALIASES {
            if in_section && group.name != target.name {
                // Short line naming a different section ends ours
                let opens_other = group
                    .aliases
                    .iter()
                    .any(|alias| line_lower.contains(alias) && line.len() < 50);
                if opens_other {
                    in_section = false;
                    break;
                }
            } else if !in_section && group.name == target.name {
                let opens_target = target
                    .aliases
                    .iter()
                    .any(|alias| line_lower.contains(alias.as_str()) && line.len() < 50);
                if opens_target {
                    in_section = true;
                    current_header = line;
                    if first_header.is_none() {
                        first_header = Some(line.to_string());
                    }
                    break;
                }
            }
        }

        if in_section && line != current_header {
            collected.push(line);
        }
    }

    if collected.is_empty() {
        return None;
    }
    Some(SectionHit {
        content: collected.join("\n"),
        header: first_header,
    })
}

/// Keep every paragraph mentioning the section by any of its names.
fn by_keyword_paragraphs(text: &str, target: &SectionTarget) -> Option<SectionHit> {
    let mut keywords: Vec<String> = target.aliases.clone();
    keywords.push(target.name.clone());

    let relevant: Vec<&str> = PARAGRAPH_SPLIT
        .split(text)
        .filter(|para| {
            let para_lower = para.to_lowercase();
            keywords.iter().any(|k| para_lower.contains(k.as_str()))
        })
        .collect();

    if relevant.is_empty() {
        return None;
    }
    Some(SectionHit {
        content: relevant.join("\n\n"),
        header: None,
    })
}
