//! Engine error types
//!
//! Distinguishes fatal failures (the payload itself is unreadable) from
//! recoverable ones that callers answer with the next fallback step.

use thiserror::Error;

/// Unified error type for the document-understanding engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Payload could not be decoded into a readable document
    #[error("failed to decode document: {0}")]
    Decode(String),

    /// Document decoded but contains no pages or text
    #[error("document contains no extractable text")]
    EmptyDocument,

    /// Requested section not found by any extraction strategy
    #[error("section '{0}' not found in document")]
    SectionNotFound(String),

    /// Header scan found no sections at all
    #[error("no sections detected in document")]
    NoSectionsDetected,

    /// A filter built from query hints produced an invalid pattern
    #[error("invalid document filter: {0}")]
    BadFilter(String),
}

impl EngineError {
    /// Whether callers should answer this with the next content fallback.
    ///
    /// `SectionNotFound` degrades to a section survey and
    /// `NoSectionsDetected` to a bounded excerpt.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::SectionNotFound(_) | EngineError::NoSectionsDetected
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<base64::DecodeError> for EngineError {
    fn from(err: base64::DecodeError) -> Self {
        EngineError::Decode(format!("invalid base64 payload: {err}"))
    }
}

impl From<lopdf::Error> for EngineError {
    fn from(err: lopdf::Error) -> Self {
        EngineError::Decode(format!("unreadable PDF: {err}"))
    }
}

impl From<regex::Error> for EngineError {
    fn from(err: regex::Error) -> Self {
        EngineError::BadFilter(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_not_found_is_recoverable() {
        assert!(EngineError::SectionNotFound("skills".to_string()).is_recoverable());
        assert!(EngineError::NoSectionsDetected.is_recoverable());
    }

    #[test]
    fn decode_failures_are_fatal() {
        assert!(!EngineError::Decode("bad".to_string()).is_recoverable());
        assert!(!EngineError::EmptyDocument.is_recoverable());
    }
}
