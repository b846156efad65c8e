//! Titled document model.
//!
//! # Responsibility
//! - Represent one stored record: title, field mapping and tag set.
//! - Offer read helpers that treat absent fields as absent, never as errors.
//!
//! # Invariants
//! - `title` never changes after construction.
//! - Field and tag iteration order is deterministic (sorted).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One record in the document store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    title: String,
    /// Free-form string fields keyed by field name.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Tag names attached to this document.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Document {
    /// Creates an empty document with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: BTreeMap::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Builder-style helper for setting one field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style helper for adding one tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Builder-style helper for adding several tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Title that keys this document in its store.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the raw field value, if present.
    ///
    /// `title` is a virtual field that always resolves to the document title.
    pub fn field(&self, name: &str) -> Option<&str> {
        if name == "title" {
            return Some(self.title.as_str());
        }
        self.fields.get(name).map(String::as_str)
    }

    /// Returns the field value only when it is present and non-empty.
    pub fn non_empty_field(&self, name: &str) -> Option<&str> {
        self.field(name).filter(|value| !value.is_empty())
    }

    /// Whether the tag set contains `tag` exactly.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;

    #[test]
    fn title_is_readable_as_virtual_field() {
        let doc = Document::new("2024-03-01").with_field("steps", "10");
        assert_eq!(doc.field("title"), Some("2024-03-01"));
        assert_eq!(doc.field("steps"), Some("10"));
        assert_eq!(doc.field("missing"), None);
    }

    #[test]
    fn non_empty_field_hides_blank_values() {
        let doc = Document::new("habit").with_field("caption", "");
        assert_eq!(doc.non_empty_field("caption"), None);
    }
}
