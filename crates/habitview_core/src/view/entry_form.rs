//! Entry form: one labeled input per active habit.
//!
//! Inputs are delegate nodes bound to the habit's field on the current
//! subject; the compositor keeps them live, so edits to the subject itself do
//! not rebuild this view. Only roster changes and navigation do.

use crate::aggregate::{CHECKED_VALUE, UNCHECKED_VALUE};
use crate::model::habit::{HabitDefinition, ValueType};
use crate::query::registry::HabitRegistry;
use crate::render::RenderNode;
use crate::store::absorb;
use crate::view::{
    lists_differ, Built, DependencySnapshot, Invalidation, RenderContext, View, ViewEnv,
};

/// Class shared with the stock text editor so theme styles apply.
const INPUT_CLASS: &str = "tc-edit-texteditor habit-input";

#[derive(Debug, Default)]
pub struct EntryForm {
    built: Option<Built>,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }
}

fn input_for(habit: &HabitDefinition, subject: Option<&str>) -> RenderNode {
    let field = habit.accessor.field.as_str();
    let control = match habit.value_type() {
        ValueType::Checkbox => RenderNode::delegate("checkbox")
            .attr("field", field)
            .attr("checked", CHECKED_VALUE)
            .attr("unchecked", UNCHECKED_VALUE)
            .attr("default", UNCHECKED_VALUE),
        ValueType::Number => RenderNode::delegate("edit-text")
            .attr("field", field)
            .attr("class", INPUT_CLASS)
            .attr("type", "number")
            .attr("size", "5")
            .attr("placeholder", "0"),
        ValueType::Text => RenderNode::delegate("edit-text")
            .attr("field", field)
            .attr("class", INPUT_CLASS)
            .attr("placeholder", ""),
    };
    match subject {
        Some(subject) => control.attr("tiddler", subject),
        None => control,
    }
}

impl View for EntryForm {
    fn name(&self) -> &'static str {
        "entry_form"
    }

    fn compute(&self, env: &ViewEnv<'_>) -> Built {
        let roster = absorb(
            HabitRegistry::new(env.queries).roster(env.store),
            "habit_roster",
        );
        let subject = env.context.subject();

        let tree = roster
            .habits
            .iter()
            .filter(|habit| !habit.accessor.field.is_empty())
            .map(|habit| {
                RenderNode::element("div")
                    .child(
                        RenderNode::element("span")
                            .attr("class", "habit-label")
                            .child(RenderNode::text(habit.caption.as_str())),
                    )
                    .child(input_for(habit, subject))
            })
            .collect();

        Built {
            tree,
            snapshot: DependencySnapshot {
                habit_titles: roster.titles,
                scope_key: self.scope_key(env.context),
                watch_scope_key: false,
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
