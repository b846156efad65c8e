//! Document store contracts and implementations.
//!
//! # Responsibility
//! - Define the read interface the views consume ([`DocumentStore`]).
//! - Provide in-memory and SQLite-backed stores that also journal changes.
//!
//! # Invariants
//! - Views only ever read through [`DocumentStore`]; mutation lives on the
//!   concrete store types.
//! - `titles` and `titles_tagged` return titles in ascending title order.

use crate::db::DbError;
use crate::model::document::Document;
use crate::query::filter::{Bindings, Filter, FilterError};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

static COLOUR_MACRO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*<<colour\s+([^\s>]+)\s*>>\s*$").expect("valid colour macro regex")
});

pub type StoreResult<T> = Result<T, StoreError>;

/// Read/write failure of a document store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Filter(FilterError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Filter(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored document data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Filter(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<FilterError> for StoreError {
    fn from(value: FilterError) -> Self {
        Self::Filter(value)
    }
}

/// Read-only view of a tagged document store.
pub trait DocumentStore {
    /// Gets one document by title.
    fn get_document(&self, title: &str) -> StoreResult<Option<Document>>;
    /// Lists every title in ascending order.
    fn titles(&self) -> StoreResult<Vec<String>>;
    /// Lists titles carrying `tag` in ascending order.
    fn titles_tagged(&self, tag: &str) -> StoreResult<Vec<String>>;
    /// Looks up a named theme colour.
    fn palette_colour(&self, name: &str) -> StoreResult<Option<String>>;

    /// Evaluates a filter fragment into an ordered title list.
    fn filter(&self, fragment: &str, bindings: &Bindings) -> StoreResult<Vec<String>> {
        let filter = Filter::parse(fragment)?;
        filter.evaluate(self, bindings)
    }

    /// Renders an inline markup fragment to plain text.
    ///
    /// Only the `<<colour name>>` macro is understood; anything else renders
    /// as the fragment text itself, and unknown colours render empty.
    fn render_inline_markup(&self, fragment: &str) -> StoreResult<String> {
        match COLOUR_MACRO_RE.captures(fragment) {
            Some(captures) => {
                let name = captures.get(1).map_or("", |m| m.as_str());
                Ok(self.palette_colour(name)?.unwrap_or_default())
            }
            None => Ok(fragment.to_string()),
        }
    }
}

/// Absorbs a store failure into an empty value.
///
/// Views never propagate store errors; they log them and render as if the
/// data were absent.
pub(crate) fn absorb<T: Default>(result: StoreResult<T>, operation: &str) -> T {
    result.unwrap_or_else(|err| {
        warn!("event=store_read module=store status=error operation={operation} error={err}");
        T::default()
    })
}
