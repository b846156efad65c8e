//! Domain model for journal documents and habit definitions.
//!
//! # Responsibility
//! - Define the titled document shape shared by stores and views.
//! - Interpret habit-definition documents into typed field accessors.
//!
//! # Invariants
//! - Every document is identified by its unique, immutable title.
//! - Value-type dispatch is exhaustive over [`habit::ValueType`].

pub mod document;
pub mod habit;
