//! docsense: document understanding for chat applications
//!
//! This library extracts page-marked text from uploaded documents, finds
//! named sections with a layered strategy chain, classifies document types
//! from their vocabulary, and turns natural-language questions into
//! structured lookups against a document store.

pub mod assistant;
pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use assistant::{AssistantReply, DocumentAssistant, ToolData};
pub use document::{
    ClassificationResult, Document, ExtractedText, Section, SectionSurvey, UploadedFile,
};
pub use error::{EngineError, Result};
pub use query::{ParsedQuery, QueryIntent};
pub use store::{DocumentStore, MemoryStore};
