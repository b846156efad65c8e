//! Indicator strip: one small glyph per habit the subject has marked.
//!
//! Habits render as `span.habit-dot` with the shorthand as text and the
//! caption as tooltip, in roster order. Habits without a shorthand never
//! render here.

use crate::model::habit::ValueType;
use crate::query::registry::HabitRegistry;
use crate::render::RenderNode;
use crate::store::absorb;
use crate::view::{
    lists_differ, Built, DependencySnapshot, Invalidation, RenderContext, View, ViewEnv,
};

/// Whether a subject's value marks the habit as done.
pub fn shows_indicator(value_type: ValueType, value: Option<&str>) -> bool {
    match value_type {
        ValueType::Checkbox => value == Some("yes"),
        ValueType::Number => value.is_some_and(|value| !value.is_empty() && value != "0"),
        ValueType::Text => value.is_some_and(|value| !value.is_empty()),
    }
}

#[derive(Debug, Default)]
pub struct IndicatorStrip {
    built: Option<Built>,
}

impl IndicatorStrip {
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for IndicatorStrip {
    fn name(&self) -> &'static str {
        "indicator_strip"
    }

    fn compute(&self, env: &ViewEnv<'_>) -> Built {
        let roster = absorb(
            HabitRegistry::new(env.queries).roster(env.store),
            "habit_roster",
        );
        let subject = env
            .context
            .subject()
            .and_then(|title| absorb(env.store.get_document(title), "subject"));

        let tree = roster
            .habits
            .iter()
            .filter(|habit| !habit.shorthand.is_empty())
            .filter(|habit| shows_indicator(habit.value_type(), habit.accessor.read(subject.as_ref())))
            .map(|habit| {
                RenderNode::element("span")
                    .attr("class", "habit-dot")
                    .attr("title", habit.caption.as_str())
                    .child(RenderNode::text(habit.shorthand.as_str()))
            })
            .collect();

        Built {
            tree,
            snapshot: DependencySnapshot {
                habit_titles: roster.titles,
                scope_key: self.scope_key(env.context),
                watch_scope_key: true,
                ..DependencySnapshot::default()
            },
        }
    }

    fn lists_changed(&self, built: &Built, env: &ViewEnv<'_>) -> Option<Invalidation> {
        let fresh = absorb(
            HabitRegistry::new(env.queries).roster(env.store),
            "habit_roster",
        );
        lists_differ(&built.snapshot.habit_titles, &fresh.titles)
            .then_some(Invalidation::ListChanged("habits"))
    }

    fn scope_key(&self, context: &RenderContext) -> Option<String> {
        context.subject().map(str::to_string)
    }

    fn built(&self) -> Option<&Built> {
        self.built.as_ref()
    }

    fn replace(&mut self, built: Option<Built>) {
        self.built = built;
    }
}
