//! Static vocabulary tables for section detection and classification
//!
//! One shared vocabulary drives the segmenter, the surveyor, the classifier,
//! and the query translator. Everything here is immutable compile-time data;
//! no component mutates shared state at runtime.

/// Canonical section name paired with the header phrasings that identify it
#[derive(Debug, Clone, Copy)]
pub struct SectionAliases {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

/// Document type paired with its indicator keywords
#[derive(Debug, Clone, Copy)]
pub struct TypeKeywords {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ordered alias table shared by section extraction and the header survey.
///
/// Order matters: the line scanner checks groups in this order when deciding
/// whether a short line opens a different section.
pub static SECTION_ALIASES: &[SectionAliases] = &[
    // Resume sections
    SectionAliases {
        name: "skills",
        aliases: &[
            "skills",
            "technical skills",
            "core competencies",
            "key skills",
            "expertise",
            "abilities",
            "competencies",
        ],
    },
    SectionAliases {
        name: "experience",
        aliases: &[
            "experience",
            "work experience",
            "professional experience",
            "employment history",
            "employment",
            "work history",
        ],
    },
    SectionAliases {
        name: "education",
        aliases: &["education", "academic background", "qualifications", "academic"],
    },
    // Report sections
    SectionAliases {
        name: "summary",
        aliases: &["summary", "executive summary", "abstract", "overview", "objective"],
    },
    SectionAliases {
        name: "introduction",
        aliases: &["introduction", "background", "context"],
    },
    SectionAliases {
        name: "methodology",
        aliases: &["methodology", "methods", "approach", "procedure"],
    },
    SectionAliases {
        name: "results",
        aliases: &["results", "findings", "analysis", "data analysis"],
    },
    SectionAliases {
        name: "conclusion",
        aliases: &["conclusion", "conclusions", "final remarks"],
    },
    SectionAliases {
        name: "recommendations",
        aliases: &["recommendations", "next steps", "proposed actions"],
    },
    // Legal document sections
    SectionAliases {
        name: "parties",
        aliases: &["parties", "between", "this agreement"],
    },
    SectionAliases {
        name: "terms",
        aliases: &["terms", "conditions", "provisions"],
    },
    SectionAliases {
        name: "payment",
        aliases: &["payment", "compensation", "fees", "financial terms"],
    },
    // Academic paper sections
    SectionAliases {
        name: "abstract",
        aliases: &["abstract", "summary"],
    },
    SectionAliases {
        name: "literature",
        aliases: &["literature review", "related work", "previous work"],
    },
    SectionAliases {
        name: "discussion",
        aliases: &["discussion", "interpretation", "evaluation"],
    },
    SectionAliases {
        name: "references",
        aliases: &["references", "bibliography", "works cited"],
    },
    // Additional resume sections
    SectionAliases {
        name: "projects",
        aliases: &["projects", "portfolio", "achievements"],
    },
    SectionAliases {
        name: "certifications",
        aliases: &["certifications", "licenses", "credentials"],
    },
    SectionAliases {
        name: "languages",
        aliases: &["languages"],
    },
    SectionAliases {
        name: "publications",
        aliases: &["publications"],
    },
    SectionAliases {
        name: "contact",
        aliases: &["contact", "contact information"],
    },
    // Business document sections
    SectionAliases {
        name: "scope",
        aliases: &["scope", "purpose", "goals"],
    },
    SectionAliases {
        name: "strategy",
        aliases: &["strategy", "market analysis", "competition", "implementation"],
    },
    SectionAliases {
        name: "budget",
        aliases: &["budget", "financials", "timeline"],
    },
    SectionAliases {
        name: "risks",
        aliases: &["risks", "assumptions", "constraints"],
    },
    // Additional legal sections
    SectionAliases {
        name: "confidentiality",
        aliases: &["confidentiality", "termination"],
    },
    SectionAliases {
        name: "signatures",
        aliases: &["signatures", "governing law"],
    },
    SectionAliases {
        name: "appendix",
        aliases: &["appendix", "glossary"],
    },
];

/// Ordered document type keyword sets.
///
/// Classification ties resolve to the earlier entry, so the order here is
/// part of the observable behavior.
pub static TYPE_KEYWORDS: &[TypeKeywords] = &[
    TypeKeywords {
        name: "resume",
        keywords: &[
            "resume",
            "cv",
            "curriculum vitae",
            "work experience",
            "education",
            "skills",
            "professional experience",
        ],
    },
    TypeKeywords {
        name: "report",
        keywords: &[
            "report",
            "executive summary",
            "findings",
            "conclusion",
            "recommendations",
        ],
    },
    TypeKeywords {
        name: "business_plan",
        keywords: &[
            "business plan",
            "market analysis",
            "financials",
            "executive summary",
            "competition",
        ],
    },
    TypeKeywords {
        name: "research_paper",
        keywords: &[
            "abstract",
            "methodology",
            "literature review",
            "results",
            "discussion",
            "references",
        ],
    },
    TypeKeywords {
        name: "legal",
        keywords: &[
            "agreement",
            "contract",
            "terms",
            "parties",
            "provisions",
            "governing law",
        ],
    },
    TypeKeywords {
        name: "presentation",
        keywords: &["slide", "presentation", "agenda", "introduction", "thank you"],
    },
    TypeKeywords {
        name: "letter",
        keywords: &["dear", "sincerely", "regards", "to whom it may concern"],
    },
    TypeKeywords {
        name: "invoice",
        keywords: &[
            "invoice",
            "bill",
            "payment",
            "amount due",
            "total",
            "paid",
            "item",
            "quantity",
            "price",
        ],
    },
    TypeKeywords {
        name: "manual",
        keywords: &[
            "manual",
            "guide",
            "instructions",
            "step",
            "procedure",
            "troubleshooting",
        ],
    },
];

/// Fallback type when no keyword set scores at all
pub const DEFAULT_DOCUMENT_TYPE: &str = "document";

/// Query scaffolding words excluded from content search terms
pub static STOP_WORDS: &[&str] = &[
    "what", "where", "when", "which", "this", "that", "with", "from", "about",
    "tell", "show", "find", "give", "list", "have", "does", "please", "their",
    "your", "document", "documents", "file", "files", "section", "sections",
    "contain", "contains",
];

/// Query keyword to canonical section name, checked in order.
///
/// Multi-word phrases come before their single-word stems so the longer
/// match wins.
pub static SECTION_HINTS: &[(&str, &str)] = &[
    ("work history", "experience"),
    ("skills", "skills"),
    ("skill", "skills"),
    ("abilities", "skills"),
    ("competencies", "skills"),
    ("qualifications", "skills"),
    ("experience", "experience"),
    ("employment", "experience"),
    ("education", "education"),
    ("academic", "education"),
    ("summary", "summary"),
    ("overview", "summary"),
    ("certification", "certifications"),
    ("project", "projects"),
    ("language", "languages"),
    ("contact", "contact"),
];

/// Section names a bare captured word may resolve to
pub static VALID_HINT_SECTIONS: &[&str] = &[
    "skills",
    "experience",
    "education",
    "summary",
    "contact",
    "projects",
    "certifications",
    "languages",
];

/// Query keywords indicating a stored document type, checked in order
pub static TYPE_HINTS: &[(&[&str], &str)] = &[
    (&["patient", "medical"], "patient"),
    (&["invoice", "bill", "financial"], "financial"),
    (&["research", "paper", "study"], "research"),
    (&["resume", "cv", "job"], "resume"),
];

/// Words that ask for the most recent upload
pub static RECENCY_WORDS: &[&str] = &["recent", "upload", "latest"];

/// Words referring to a document in a content request
pub static DOCUMENT_WORDS: &[&str] = &["pdf", "document"];

/// Words asking for content out of a document
pub static CONTENT_WORDS: &[&str] = &["content", "extract", "read", "from", "in the", "inside"];

/// Words that make a prompt a skills lookup on their own
pub static SKILLS_WORDS: &[&str] = &["skills", "abilities", "competencies", "qualifications"];

/// Words that turn a "sections" mention into a listing request
pub static LIST_WORDS: &[&str] = &["list", "what", "which", "show", "identify", "all"];

/// Header phrasings for a section name, falling back to the raw name when
/// the table has no entry for it.
pub fn aliases_for(section_name: &str) -> Vec<String> {
    let wanted = section_name.to_lowercase();
    for group in SECTION_ALIASES {
        if group.name == wanted {
            return group.aliases.iter().map(|a| a.to_string()).collect();
        }
    }
    vec![wanted]
}

/// Canonical name owning this alias group, if any
pub fn canonical_for(section_name: &str) -> Option<&'static str> {
    let wanted = section_name.to_lowercase();
    SECTION_ALIASES
        .iter()
        .find(|group| group.name == wanted)
        .map(|group| group.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_section_expands_to_aliases() {
        let aliases = aliases_for("skills");
        assert!(aliases.contains(&"technical skills".to_string()));
        assert!(aliases.contains(&"core competencies".to_string()));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(aliases_for("SKILLS"), aliases_for("skills"));
    }

    #[test]
    fn unknown_section_falls_back_to_raw_name() {
        assert_eq!(aliases_for("Hobbies"), vec!["hobbies".to_string()]);
    }

    #[test]
    fn resume_is_the_first_declared_type() {
        assert_eq!(TYPE_KEYWORDS[0].name, "resume");
    }

    #[test]
    fn every_alias_group_contains_its_own_name_or_a_phrase() {
        for group in SECTION_ALIASES {
            assert!(!group.aliases.is_empty(), "empty alias group {}", group.name);
        }
    }
}
