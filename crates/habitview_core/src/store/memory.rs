//! In-memory document store.
//!
//! # Responsibility
//! - Hold documents and a colour palette in ordered maps.
//! - Journal every write into a pending [`ChangeSet`].
//!
//! # Invariants
//! - `take_changes` returns each change exactly once.

use crate::change::{ChangeKind, ChangeSet};
use crate::model::document::Document;
use crate::store::{DocumentStore, StoreResult};
use std::collections::BTreeMap;

/// Ordered-map store used by tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, Document>,
    palette: BTreeMap<String, String>,
    pending: ChangeSet,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a document and records the change.
    pub fn put_document(&mut self, doc: Document) {
        let kind = if self.documents.contains_key(doc.title()) {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        self.pending.record(doc.title(), kind);
        self.documents.insert(doc.title().to_string(), doc);
    }

    /// Sets one field on an existing document. Returns `false` if absent.
    pub fn set_field(&mut self, title: &str, name: &str, value: &str) -> bool {
        match self.documents.get_mut(title) {
            Some(doc) => {
                doc.fields.insert(name.to_string(), value.to_string());
                self.pending.record(title, ChangeKind::Updated);
                true
            }
            None => false,
        }
    }

    /// Removes a document. Returns the removed value, if any.
    pub fn remove_document(&mut self, title: &str) -> Option<Document> {
        let removed = self.documents.remove(title);
        if removed.is_some() {
            self.pending.record(title, ChangeKind::Removed);
        }
        removed
    }

    /// Sets or replaces a theme colour. Not recorded as a change.
    pub fn set_palette_colour(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.palette.insert(name.into(), value.into());
    }

    /// Drains changes recorded since the previous call.
    pub fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.pending)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn get_document(&self, title: &str) -> StoreResult<Option<Document>> {
        Ok(self.documents.get(title).cloned())
    }

    fn titles(&self) -> StoreResult<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn titles_tagged(&self, tag: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .documents
            .values()
            .filter(|doc| doc.has_tag(tag))
            .map(|doc| doc.title().to_string())
            .collect())
    }

    fn palette_colour(&self, name: &str) -> StoreResult<Option<String>> {
        Ok(self.palette.get(name).cloned())
    }
}
