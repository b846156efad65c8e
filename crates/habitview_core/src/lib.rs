//! Dependency-tracked habit views over a tagged document store.
//!
//! Views (indicator strip, entry form, summary table) build render trees from
//! habit definitions and journal records, remember which titles they read,
//! and rebuild only when a change set touches those titles or their defining
//! queries start returning different lists.

pub mod aggregate;
pub mod change;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod render;
pub mod store;
pub mod view;

pub use aggregate::{aggregate, aggregate_values, parse_number};
pub use change::{ChangeKind, ChangeSet};
pub use config::{AppConfig, ConfigError, JournalSchema, LogConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::Document;
pub use model::habit::{FieldAccessor, HabitDefinition, ValueType};
pub use query::filter::{Bindings, Filter, FilterError};
pub use query::fragments::JournalQueries;
pub use query::registry::{HabitRegistry, HabitRoster};
pub use query::ScopeMode;
pub use render::RenderNode;
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteDocumentStore;
pub use store::{DocumentStore, StoreError, StoreResult};
pub use view::entry_form::EntryForm;
pub use view::host::{ViewHost, ViewId};
pub use view::indicator::IndicatorStrip;
pub use view::summary_table::SummaryTable;
pub use view::{
    lists_differ, Built, DependencySnapshot, Invalidation, RefreshState, RenderContext, View, ViewEnv,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
