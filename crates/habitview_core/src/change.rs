//! Change sets delivered to views on each refresh pass.
//!
//! # Responsibility
//! - Record which titles were created, updated or removed in one interval.
//! - Merge repeated changes to the same title within that interval.
//!
//! # Invariants
//! - A title appears at most once.
//! - `removed` followed by `created` collapses to `updated`.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Removed,
}

impl ChangeKind {
    /// Name stored in the change journal.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Removed => "removed",
        }
    }

    /// Reads a journal name back; unknown names give `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }

    fn merge(self, next: Self) -> Self {
        match (self, next) {
            (Self::Created, Self::Updated) => Self::Created,
            (Self::Removed, Self::Created) => Self::Updated,
            (_, next) => next,
        }
    }
}

/// Titles changed since the previous observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    entries: BTreeMap<String, ChangeKind>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one change, merging with any earlier change to the same title.
    pub fn record(&mut self, title: impl Into<String>, kind: ChangeKind) {
        let title = title.into();
        let merged = match self.entries.get(&title) {
            Some(previous) => previous.merge(kind),
            None => kind,
        };
        self.entries.insert(title, merged);
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    /// Merged kind recorded for `title` in this interval.
    pub fn kind(&self, title: &str) -> Option<ChangeKind> {
        self.entries.get(title).copied()
    }

    /// Returns the first of `titles` present in this change set.
    pub fn first_hit<'a, I>(&self, titles: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        titles
            .into_iter()
            .find(|title| self.contains(title))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in title order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ChangeKind)> {
        self.entries
            .iter()
            .map(|(title, kind)| (title.as_str(), *kind))
    }
}

impl<S: Into<String>> FromIterator<(S, ChangeKind)> for ChangeSet {
    fn from_iter<T: IntoIterator<Item = (S, ChangeKind)>>(iter: T) -> Self {
        let mut changes = Self::new();
        for (title, kind) in iter {
            changes.record(title, kind);
        }
        changes
    }
}
