//! Document understanding: extraction, segmentation, survey, classification.
//!
//! This module takes uploaded documents (base64-wrapped PDFs or plain text),
//! extracts page-marked text, finds named sections, surveys the section
//! layout, and classifies the document type from its vocabulary.

pub mod classify;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod segment;
pub mod survey;
pub(crate) mod tables;

// Re-export the data model and the main entry points
pub use classify::classify;
pub use extract::{decode_payload, extract_from_document, extract_from_payload, extract_text};
pub use ingest::process_upload;
pub use models::*;
pub use segment::extract_section;
pub use survey::identify_sections;
