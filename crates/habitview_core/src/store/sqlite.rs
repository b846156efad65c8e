//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist documents as title rows with field and tag link tables.
//! - Journal writes into `document_changes` and drain them as a [`ChangeSet`].
//!
//! # Invariants
//! - `put_document` replaces fields and tags in one immediate transaction.
//! - Every write appends exactly one journal row in the same transaction.
//! - `take_changes` reads and clears the journal atomically.

use crate::change::{ChangeKind, ChangeSet};
use crate::db::{open_db, open_db_in_memory};
use crate::model::document::Document;
use crate::store::{DocumentStore, StoreError, StoreResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;

const REQUIRED_TABLES: &[&str] = &[
    "documents",
    "document_fields",
    "document_tags",
    "palette",
    "document_changes",
];

/// Document store over one owned SQLite connection.
#[derive(Debug)]
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Opens a database file, applying migrations first.
    ///
    /// # Errors
    /// - `StoreError::Db` when the file cannot be opened or migrated.
    /// - `StoreError::InvalidData` when document tables are missing.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory database with the current schema.
    ///
    /// # Errors
    /// - Propagates migration failures as `StoreError::Db`.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps a migrated connection, rejecting one missing document tables.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        for table in REQUIRED_TABLES {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
                [table],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(StoreError::InvalidData(format!(
                    "missing required table `{table}`"
                )));
            }
        }
        Ok(Self { conn })
    }

    /// Inserts or fully replaces a document.
    ///
    /// # Side effects
    /// - Replaces fields and tags and appends to the change journal in one
    ///   immediate transaction.
    /// - Emits a `document_write` debug event.
    pub fn put_document(&mut self, doc: &Document) -> StoreResult<ChangeKind> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let kind = if document_exists(&tx, doc.title())? {
            ChangeKind::Updated
        } else {
            tx.execute("INSERT INTO documents (title) VALUES (?1);", [doc.title()])?;
            ChangeKind::Created
        };

        tx.execute(
            "DELETE FROM document_fields WHERE title = ?1;",
            [doc.title()],
        )?;
        for (name, value) in &doc.fields {
            tx.execute(
                "INSERT INTO document_fields (title, name, value) VALUES (?1, ?2, ?3);",
                params![doc.title(), name, value],
            )?;
        }

        tx.execute("DELETE FROM document_tags WHERE title = ?1;", [doc.title()])?;
        for tag in &doc.tags {
            tx.execute(
                "INSERT INTO document_tags (title, tag) VALUES (?1, ?2);",
                params![doc.title(), tag],
            )?;
        }

        journal(&tx, doc.title(), kind)?;
        tx.commit()?;
        debug!(
            "event=document_write module=store status=ok kind={} fields={} tags={}",
            kind.as_str(),
            doc.fields.len(),
            doc.tags.len()
        );
        Ok(kind)
    }

    /// Removes a document. Returns whether it existed.
    pub fn remove_document(&mut self, title: &str) -> StoreResult<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM documents WHERE title = ?1;", [title])? > 0;
        if removed {
            journal(&tx, title, ChangeKind::Removed)?;
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Sets or replaces a theme colour.
    ///
    /// # Side effects
    /// - Writes the `palette` table; palette edits are not journaled.
    pub fn set_palette_colour(&self, name: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO palette (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value;",
            params![name, value],
        )?;
        Ok(())
    }

    /// Drains journaled changes in write order.
    ///
    /// # Side effects
    /// - Clears the journal in the same transaction that reads it.
    pub fn take_changes(&mut self) -> StoreResult<ChangeSet> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut changes = ChangeSet::new();
        {
            let mut stmt = tx.prepare("SELECT title, kind FROM document_changes ORDER BY seq;")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let title: String = row.get(0)?;
                let kind_text: String = row.get(1)?;
                let kind = ChangeKind::parse(&kind_text).ok_or_else(|| {
                    StoreError::InvalidData(format!("unknown change kind `{kind_text}`"))
                })?;
                changes.record(title, kind);
            }
        }
        tx.execute("DELETE FROM document_changes;", [])?;
        tx.commit()?;
        Ok(changes)
    }

    fn collect_titles(&self, sql: &str, tag: Option<&str>) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match tag {
            Some(tag) => stmt.query([tag])?,
            None => stmt.query([])?,
        };
        let mut titles = Vec::new();
        while let Some(row) = rows.next()? {
            titles.push(row.get(0)?);
        }
        Ok(titles)
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn get_document(&self, title: &str) -> StoreResult<Option<Document>> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT title FROM documents WHERE title = ?1;",
                [title],
                |row| row.get(0),
            )
            .optional()?;
        let Some(found) = found else {
            return Ok(None);
        };

        let mut doc = Document::new(found);
        let mut fields = self
            .conn
            .prepare("SELECT name, value FROM document_fields WHERE title = ?1;")?;
        let mut rows = fields.query([title])?;
        while let Some(row) = rows.next()? {
            doc.fields.insert(row.get(0)?, row.get(1)?);
        }

        let mut tags = self
            .conn
            .prepare("SELECT tag FROM document_tags WHERE title = ?1;")?;
        let mut rows = tags.query([title])?;
        while let Some(row) = rows.next()? {
            doc.tags.insert(row.get(0)?);
        }

        Ok(Some(doc))
    }

    fn titles(&self) -> StoreResult<Vec<String>> {
        self.collect_titles("SELECT title FROM documents ORDER BY title ASC;", None)
    }

    fn titles_tagged(&self, tag: &str) -> StoreResult<Vec<String>> {
        self.collect_titles(
            "SELECT title FROM document_tags WHERE tag = ?1 ORDER BY title ASC;",
            Some(tag),
        )
    }

    fn palette_colour(&self, name: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM palette WHERE name = ?1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

fn document_exists(tx: &Transaction<'_>, title: &str) -> StoreResult<bool> {
    let exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM documents WHERE title = ?1);",
        [title],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn journal(tx: &Transaction<'_>, title: &str, kind: ChangeKind) -> StoreResult<()> {
    tx.execute(
        "INSERT INTO document_changes (title, kind) VALUES (?1, ?2);",
        params![title, kind.as_str()],
    )?;
    Ok(())
}
