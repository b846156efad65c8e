//! Habit registry: the ordered roster of active habit definitions.
//!
//! # Responsibility
//! - Load non-draft habit-definition documents and interpret them.
//! - Order them by effective caption (caption, else title).
//!
//! # Invariants
//! - `titles` lists every loaded definition, inert ones included, in roster
//!   order; views snapshot it for invalidation.
//! - `habits` is the subsequence of `titles` that names a target field.
//! - Ordering is case-insensitive by caption with a title tie-break, so it is
//!   stable across calls absent changes.

use crate::model::habit::HabitDefinition;
use crate::query::fragments::JournalQueries;
use crate::store::{DocumentStore, StoreResult};

/// Snapshot of the habit roster at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitRoster {
    pub titles: Vec<String>,
    pub habits: Vec<HabitDefinition>,
}

/// Read-only access to habit definitions.
#[derive(Debug, Clone, Copy)]
pub struct HabitRegistry<'q> {
    queries: &'q JournalQueries,
}

impl<'q> HabitRegistry<'q> {
    /// Registry reading definitions through `queries`.
    pub fn new(queries: &'q JournalQueries) -> Self {
        Self { queries }
    }

    /// Loads the full roster.
    pub fn roster(&self, store: &dyn DocumentStore) -> StoreResult<HabitRoster> {
        let schema = self.queries.schema();
        let mut entries = Vec::new();
        for title in self.queries.habit_titles(store)? {
            // Vanished between filter and read: skip.
            let Some(doc) = store.get_document(&title)? else {
                continue;
            };
            let caption = doc
                .non_empty_field(schema.caption_field.as_str())
                .unwrap_or(doc.title())
                .to_lowercase();
            let habit = HabitDefinition::from_document(&doc, schema);
            entries.push((caption, title, habit));
        }

        entries.sort_by(|left, right| left.0.cmp(&right.0).then_with(|| left.1.cmp(&right.1)));

        let mut roster = HabitRoster::default();
        for (_, title, habit) in entries {
            roster.titles.push(title);
            roster.habits.extend(habit);
        }
        Ok(roster)
    }

    /// Active habits in roster order.
    pub fn active_habits(&self, store: &dyn DocumentStore) -> StoreResult<Vec<HabitDefinition>> {
        self.roster(store).map(|roster| roster.habits)
    }
}
