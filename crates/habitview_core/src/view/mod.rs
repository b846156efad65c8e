//! Dependency-tracked view nodes.
//!
//! # Responsibility
//! - Define the [`View`] contract shared by the indicator strip, entry form
//!   and summary table.
//! - Own the refresh decision: a view is rebuilt in full when a change hits
//!   its [`DependencySnapshot`] or its defining queries return different
//!   lists, and otherwise delegates to its children.
//!
//! # Invariants
//! - A view's render tree and snapshot are stored together in one
//!   [`Built`] value and are replaced or discarded together.
//! - Building and refreshing only read the store.
//! - Store failures are absorbed (logged, treated as absent), never returned.

use crate::change::ChangeSet;
use crate::query::fragments::JournalQueries;
use crate::render::RenderNode;
use crate::store::DocumentStore;
use log::debug;
use std::time::Instant;

pub mod entry_form;
pub mod host;
pub mod indicator;
pub mod summary_table;

/// Explicit context for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Record being viewed or edited.
    pub current_subject: Option<String>,
    /// Story-level record the view is embedded in, if any.
    pub story_subject: Option<String>,
}

impl RenderContext {
    /// Context with only a current subject.
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self {
            current_subject: Some(subject.into()),
            story_subject: None,
        }
    }

    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        self.story_subject = Some(story.into());
        self
    }

    /// Current subject, ignoring an empty title.
    pub fn subject(&self) -> Option<&str> {
        non_empty(self.current_subject.as_deref())
    }

    /// Scope key for period views: the story subject, else the current subject.
    pub fn match_title(&self) -> Option<&str> {
        non_empty(self.story_subject.as_deref()).or_else(|| self.subject())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Everything a view may read while building or refreshing.
#[derive(Clone, Copy)]
pub struct ViewEnv<'a> {
    pub store: &'a dyn DocumentStore,
    pub queries: &'a JournalQueries,
    pub context: &'a RenderContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// Render tree matches current data.
    Fresh,
    /// Must rebuild before the next paint.
    Stale,
}

/// Titles a view used for its last build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySnapshot {
    /// Habit-definition titles in roster order.
    pub habit_titles: Vec<String>,
    /// Row titles in display order.
    pub row_titles: Vec<String>,
    /// Day-record titles read for aggregation.
    pub day_titles: Vec<String>,
    pub scope_key: Option<String>,
    /// Whether a change to the scope key document itself invalidates.
    pub watch_scope_key: bool,
}

impl DependencySnapshot {
    /// Checks the change set against tracked titles and the scope key.
    pub fn hit(&self, changes: &ChangeSet) -> Option<Invalidation> {
        if let Some(title) = changes.first_hit(&self.habit_titles) {
            return Some(Invalidation::HabitChanged(title.to_string()));
        }
        if let Some(title) = changes
            .first_hit(&self.row_titles)
            .or_else(|| changes.first_hit(&self.day_titles))
        {
            return Some(Invalidation::RowChanged(title.to_string()));
        }
        match self.scope_key.as_deref() {
            Some(key) if self.watch_scope_key && changes.contains(key) => {
                Some(Invalidation::ScopeKeyChanged)
            }
            _ => None,
        }
    }
}

/// Why a view went stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// Never built, or explicitly discarded.
    Unbuilt,
    HabitChanged(String),
    RowChanged(String),
    /// A defining query now returns a different ordered list.
    ListChanged(&'static str),
    ScopeKeyChanged,
    /// The render context resolves to a different scope key.
    ContextChanged,
}

impl Invalidation {
    /// Stable reason code used in `view_refresh` log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unbuilt => "unbuilt",
            Self::HabitChanged(_) => "habit_changed",
            Self::RowChanged(_) => "row_changed",
            Self::ListChanged(_) => "list_changed",
            Self::ScopeKeyChanged => "scope_key_changed",
            Self::ContextChanged => "context_changed",
        }
    }
}

/// Ordered-sequence inequality used by every view's list check.
///
/// Reordering counts as a difference.
pub fn lists_differ(cached: &[String], fresh: &[String]) -> bool {
    cached.len() != fresh.len()
        || cached
            .iter()
            .zip(fresh)
            .any(|(cached, fresh)| cached != fresh)
}

/// A view's last output and the dependencies that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Built {
    pub tree: Vec<RenderNode>,
    pub snapshot: DependencySnapshot,
}

/// A node in the view tree.
pub trait View {
    /// Stable name used in log events.
    fn name(&self) -> &'static str;

    /// Computes a fresh tree and snapshot from the store.
    fn compute(&self, env: &ViewEnv<'_>) -> Built;

    /// Re-evaluates defining queries against a fresh snapshot.
    ///
    /// Called only while fresh, after tracked-title checks pass.
    fn lists_changed(&self, built: &Built, env: &ViewEnv<'_>) -> Option<Invalidation>;

    /// Scope key this view would use under `context`.
    fn scope_key(&self, context: &RenderContext) -> Option<String>;

    fn built(&self) -> Option<&Built>;

    fn replace(&mut self, built: Option<Built>);

    /// Delegates a refresh pass to child views that this view owns.
    ///
    /// The three journal views are leaves: their delegate nodes name views
    /// the compositor instantiates and refreshes itself, so they keep the
    /// default. Sibling fan-out happens in [`host::ViewHost::refresh`].
    fn refresh_children(&mut self, _changes: &ChangeSet, _env: &ViewEnv<'_>) -> bool {
        false
    }

    fn state(&self) -> RefreshState {
        match self.built() {
            Some(_) => RefreshState::Fresh,
            None => RefreshState::Stale,
        }
    }

    fn tree(&self) -> &[RenderNode] {
        self.built().map(|built| built.tree.as_slice()).unwrap_or(&[])
    }

    /// Discards the tree and snapshot together.
    fn mark_stale(&mut self) {
        self.replace(None);
    }

    /// Full rebuild, replacing tree and snapshot together.
    fn build(&mut self, env: &ViewEnv<'_>) {
        let started_at = Instant::now();
        let built = self.compute(env);
        debug!(
            "event=view_build module=view status=ok view={} habits={} rows={} days={} duration_us={}",
            self.name(),
            built.snapshot.habit_titles.len(),
            built.snapshot.row_titles.len(),
            built.snapshot.day_titles.len(),
            started_at.elapsed().as_micros()
        );
        self.replace(Some(built));
    }

    /// Decides whether `changes` invalidate this view.
    fn invalidation(&self, changes: &ChangeSet, env: &ViewEnv<'_>) -> Option<Invalidation> {
        let Some(built) = self.built() else {
            return Some(Invalidation::Unbuilt);
        };
        if built.snapshot.scope_key != self.scope_key(env.context) {
            return Some(Invalidation::ContextChanged);
        }
        built
            .snapshot
            .hit(changes)
            .or_else(|| self.lists_changed(built, env))
    }

    /// Runs one refresh pass. Returns whether anything was rebuilt.
    fn refresh(&mut self, changes: &ChangeSet, env: &ViewEnv<'_>) -> bool {
        match self.invalidation(changes, env) {
            Some(reason) => {
                debug!(
                    "event=view_refresh module=view status=stale view={} reason={}",
                    self.name(),
                    reason.code()
                );
                self.build(env);
                true
            }
            None => self.refresh_children(changes, env),
        }
    }
}
