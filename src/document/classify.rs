//! Bag-of-keywords document type classification
//!
//! Scores every known type against the lower-cased text and the detected
//! section names. The weights are part of the observable contract: a body
//! hit adds one, a section-name hit adds two, and scores are not normalized
//! by text length or keyword-set size.

use crate::document::models::{ClassificationResult, ScoreMap};
use crate::document::tables::{DEFAULT_DOCUMENT_TYPE, TYPE_KEYWORDS};

/// Classify a document by keyword occurrence.
///
/// Deterministic for a given input; ties resolve to the type declared
/// earlier in the keyword table, and a total blank scores as `"document"`.
pub fn classify(text: &str, section_names: &[String]) -> ClassificationResult {
    let lower_text = text.to_lowercase();
    let lower_sections: Vec<String> = section_names.iter().map(|s| s.to_lowercase()).collect();

    let mut all_scores = ScoreMap::new();
    let mut best_type = DEFAULT_DOCUMENT_TYPE;
    let mut best_score = 0u32;

    for entry in TYPE_KEYWORDS {
        let mut score = 0u32;

        for keyword in entry.keywords {
            if lower_text.contains(keyword) {
                score += 1;
            }
        }

        // Section names are stronger indicators
        for section in &lower_sections {
            for keyword in entry.keywords {
                if section.contains(keyword) {
                    score += 2;
                }
            }
        }

        all_scores.insert(entry.name.to_string(), score);
        if score > best_score {
            best_score = score;
            best_type = entry.name;
        }
    }

    ClassificationResult {
        document_type: best_type.to_string(),
        score: best_score,
        all_scores,
    }
}
