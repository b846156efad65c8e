//! The fixed journal query shapes.
//!
//! # Responsibility
//! - Render the filter fragments for habits, scope rows and scope/period days
//!   from a [`JournalSchema`].
//! - Evaluate them with explicit bindings.
//!
//! # Invariants
//! - Day lists (`days_in_period`, `days_in_scope`) carry no sort step; their
//!   order is the store's title order and callers must not depend on it.

use crate::config::JournalSchema;
use crate::query::filter::Bindings;
use crate::query::ScopeMode;
use crate::store::{DocumentStore, StoreResult};

/// Variable bound to the scope key in scope queries.
pub const MATCH_TITLE_VAR: &str = "matchTitle";
/// Variable bound to the period title in per-period queries.
pub const PERIOD_VAR: &str = "period";

/// Prepared fragments for one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalQueries {
    schema: JournalSchema,
    habits: String,
    daily_rows: String,
    yearly_rows: String,
    scope_days: String,
    period_days: String,
}

impl JournalQueries {
    /// Builds every fragment from the schema's tag and field names.
    pub fn new(schema: JournalSchema) -> Self {
        let habits = format!(
            "[tag[{}]!has[{}]sort[{}]]",
            schema.habit_tag, schema.draft_field, schema.caption_field
        );
        let daily_rows = format!(
            "[tag[{}]tag[{}]tag<{MATCH_TITLE_VAR}>sort[title]]",
            schema.daily_tag, schema.journal_tag
        );
        let yearly_rows = format!(
            "[tag[{}]tag[{}]tag<{MATCH_TITLE_VAR}>sort[{}]]",
            schema.monthly_tag, schema.journal_tag, schema.date_field
        );
        let scope_days = format!(
            "[tag[{}]tag[{}]tag<{MATCH_TITLE_VAR}>]",
            schema.daily_tag, schema.journal_tag
        );
        let period_days = format!(
            "[tag[{}]tag[{}]tag<{PERIOD_VAR}>]",
            schema.daily_tag, schema.journal_tag
        );

        Self {
            schema,
            habits,
            daily_rows,
            yearly_rows,
            scope_days,
            period_days,
        }
    }

    pub fn schema(&self) -> &JournalSchema {
        &self.schema
    }

    /// Titles of non-draft habit definitions, including inert ones.
    pub fn habit_titles(&self, store: &dyn DocumentStore) -> StoreResult<Vec<String>> {
        store.filter(&self.habits, &Bindings::new())
    }

    /// Row titles for a summary table scope.
    pub fn rows_for_scope(
        &self,
        store: &dyn DocumentStore,
        mode: ScopeMode,
        scope_key: &str,
    ) -> StoreResult<Vec<String>> {
        let fragment = match mode {
            ScopeMode::Daily => &self.daily_rows,
            ScopeMode::Yearly => &self.yearly_rows,
        };
        store.filter(fragment, &Bindings::new().with(MATCH_TITLE_VAR, scope_key))
    }

    /// Day records tagged with a period (month) title.
    pub fn days_in_period(
        &self,
        store: &dyn DocumentStore,
        period_title: &str,
    ) -> StoreResult<Vec<String>> {
        store.filter(
            &self.period_days,
            &Bindings::new().with(PERIOD_VAR, period_title),
        )
    }

    /// Day records tagged with the scope key.
    pub fn days_in_scope(
        &self,
        store: &dyn DocumentStore,
        scope_key: &str,
    ) -> StoreResult<Vec<String>> {
        store.filter(
            &self.scope_days,
            &Bindings::new().with(MATCH_TITLE_VAR, scope_key),
        )
    }
}

impl Default for JournalQueries {
    fn default() -> Self {
        Self::new(JournalSchema::default())
    }
}
