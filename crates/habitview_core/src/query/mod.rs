//! Query fragments over the document store.
//!
//! # Responsibility
//! - Parse and evaluate filter fragments ([`filter`]).
//! - Build the fixed journal query shapes from configuration ([`fragments`]).
//! - Interpret habit-definition documents into an ordered roster ([`registry`]).
//!
//! # Invariants
//! - Nothing in this module mutates a store.

pub mod filter;
pub mod fragments;
pub mod registry;

use serde::Serialize;

/// Period granularity of a summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeMode {
    /// Week-like scope, one row per day record.
    Daily,
    /// Year-like scope, one row per month record.
    Yearly,
}

impl ScopeMode {
    /// Parses a mode attribute; anything but `yearly` means daily.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "yearly" => Self::Yearly,
            _ => Self::Daily,
        }
    }

    /// Mode name as written in view attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Yearly => "yearly",
        }
    }
}
