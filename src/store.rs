//! Document persistence behind a small trait, with an in-memory default.

use std::sync::RwLock;

use tracing::debug;

use crate::document::models::Document;
use crate::error::Result;
use crate::query::filter::{DocumentFilter, FindOptions, SortOrder};

/// Where documents live once ingested. The engine only ever talks to this
/// trait; swapping in a persistent backend is a store concern.
pub trait DocumentStore {
    /// Documents matching the filter, ordered and bounded by the options.
    fn find(&self, filter: &DocumentFilter, options: &FindOptions) -> Result<Vec<Document>>;

    /// Persist a document, returning its assigned id.
    fn insert(&self, document: Document) -> Result<String>;

    /// Look a document up by id.
    fn get(&self, id: &str) -> Result<Option<Document>>;
}

/// In-memory store backing the CLI and tests. Insertion order is kept; finds
/// sort by upload time.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.read_documents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_documents(&self) -> std::sync::RwLockReadGuard<'_, Vec<Document>> {
        self.documents
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, filter: &DocumentFilter, options: &FindOptions) -> Result<Vec<Document>> {
        let compiled = filter.compile()?;
        let documents = self.read_documents();

        let mut results: Vec<Document> = documents
            .iter()
            .filter(|doc| compiled.matches(doc))
            .cloned()
            .collect();

        match options.sort {
            SortOrder::NewestFirst => {
                results.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
            }
            SortOrder::OldestFirst => {
                results.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
            }
        }
        if options.limit > 0 && results.len() > options.limit {
            results.truncate(options.limit);
        }

        debug!(matched = results.len(), "store find");
        Ok(results)
    }

    fn insert(&self, mut document: Document) -> Result<String> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = format!("doc-{}", documents.len() + 1);
        document.id = Some(id.clone());
        debug!(id = %id, filename = %document.filename, "store insert");
        documents.push(document);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<Option<Document>> {
        let documents = self.read_documents();
        Ok(documents
            .iter()
            .find(|doc| doc.id.as_deref() == Some(id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn doc_uploaded_days_ago(filename: &str, doc_type: &str, days: i64) -> Document {
        let mut d = Document::new(filename, "application/pdf", "content");
        d.document_type = Some(doc_type.to_string());
        d.uploaded_at = Utc::now() - Duration::days(days);
        d
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store
            .insert(Document::new("a.pdf", "application/pdf", ""))
            .unwrap();
        let second = store
            .insert(Document::new("b.pdf", "application/pdf", ""))
            .unwrap();
        assert_eq!(first, "doc-1");
        assert_eq!(second, "doc-2");

        let fetched = store.get(&second).unwrap().unwrap();
        assert_eq!(fetched.filename, "b.pdf");
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("doc-99").unwrap().is_none());
    }

    #[test]
    fn find_filters_by_type() {
        let store = MemoryStore::new();
        store.insert(doc_uploaded_days_ago("cv.pdf", "resume", 2)).unwrap();
        store.insert(doc_uploaded_days_ago("q3.pdf", "report", 1)).unwrap();

        let filter = DocumentFilter {
            document_type: Some("resume".to_string()),
            ..Default::default()
        };
        let found = store.find(&filter, &FindOptions::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].filename, "cv.pdf");
    }

    #[test]
    fn find_sorts_newest_first_by_default() {
        let store = MemoryStore::new();
        store.insert(doc_uploaded_days_ago("old.pdf", "report", 5)).unwrap();
        store.insert(doc_uploaded_days_ago("new.pdf", "report", 1)).unwrap();
        store.insert(doc_uploaded_days_ago("mid.pdf", "report", 3)).unwrap();

        let found = store
            .find(&DocumentFilter::default(), &FindOptions::default())
            .unwrap();
        let names: Vec<&str> = found.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, ["new.pdf", "mid.pdf", "old.pdf"]);
    }

    #[test]
    fn find_honors_the_limit() {
        let store = MemoryStore::new();
        store.insert(doc_uploaded_days_ago("old.pdf", "report", 5)).unwrap();
        store.insert(doc_uploaded_days_ago("new.pdf", "report", 1)).unwrap();

        let found = store
            .find(&DocumentFilter::default(), &FindOptions::latest(1))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].filename, "new.pdf");
    }

    #[test]
    fn zero_limit_returns_everything() {
        let store = MemoryStore::new();
        store.insert(doc_uploaded_days_ago("a.pdf", "report", 1)).unwrap();
        store.insert(doc_uploaded_days_ago("b.pdf", "report", 2)).unwrap();

        let found = store
            .find(&DocumentFilter::default(), &FindOptions::default())
            .unwrap();
        assert_eq!(found.len(), 2);
    }
}
