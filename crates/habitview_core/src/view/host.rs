//! View host: owns a set of views sharing one render context.
//!
//! # Responsibility
//! - Build every view on first render.
//! - Fan each change set out to the views, which rebuild or stay fresh on
//!   their own.
//!
//! # Invariants
//! - Every view observes the same change set and store within one pass.
//! - Changing the context never rebuilds eagerly; the next pass does.

use crate::change::ChangeSet;
use crate::query::fragments::JournalQueries;
use crate::render::RenderNode;
use crate::store::DocumentStore;
use crate::view::{RefreshState, RenderContext, View, ViewEnv};
use log::debug;

/// Identifies a view inside one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

pub struct ViewHost {
    queries: JournalQueries,
    context: RenderContext,
    views: Vec<Box<dyn View>>,
}

impl std::fmt::Debug for ViewHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHost")
            .field("context", &self.context)
            .field("views", &self.views.len())
            .finish()
    }
}

impl ViewHost {
    pub fn new(queries: JournalQueries, context: RenderContext) -> Self {
        Self {
            queries,
            context,
            views: Vec::new(),
        }
    }

    /// Adds an unbuilt view.
    pub fn add(&mut self, view: Box<dyn View>) -> ViewId {
        self.views.push(view);
        ViewId(self.views.len() - 1)
    }

    /// Context the next pass renders against.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Replaces the render context, e.g. after navigation.
    ///
    /// Views whose scope key differs rebuild on the next [`Self::refresh`].
    pub fn set_context(&mut self, context: RenderContext) {
        self.context = context;
    }

    /// Builds every stale view.
    pub fn render(&mut self, store: &dyn DocumentStore) {
        let env = ViewEnv {
            store,
            queries: &self.queries,
            context: &self.context,
        };
        for view in &mut self.views {
            if view.state() == RefreshState::Stale {
                view.build(&env);
            }
        }
    }

    /// Runs one refresh pass. Returns whether any view rebuilt.
    ///
    /// # Side effects
    /// - Emits one `host_refresh` debug event per pass.
    pub fn refresh(&mut self, store: &dyn DocumentStore, changes: &ChangeSet) -> bool {
        let env = ViewEnv {
            store,
            queries: &self.queries,
            context: &self.context,
        };
        let mut rebuilt = 0usize;
        for view in &mut self.views {
            if view.refresh(changes, &env) {
                rebuilt += 1;
            }
        }
        debug!(
            "event=host_refresh module=view status=ok changes={} views={} rebuilt={}",
            changes.len(),
            self.views.len(),
            rebuilt
        );
        rebuilt > 0
    }

    /// Looks up a view added to this host.
    pub fn view(&self, id: ViewId) -> Option<&dyn View> {
        self.views.get(id.0).map(|view| &**view)
    }

    /// Last built tree of a view; empty when unbuilt or unknown.
    pub fn tree(&self, id: ViewId) -> &[RenderNode] {
        self.view(id).map(|view| view.tree()).unwrap_or(&[])
    }

    /// Number of hosted views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
