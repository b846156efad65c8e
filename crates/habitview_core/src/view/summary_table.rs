//! Summary table over a week-like or year-like scope.
//!
//! # Responsibility
//! - Render a header row, one row per scope record and a trailing totals row.
//! - Track habit, row and day titles so that any edit to data the table read
//!   triggers a rebuild.
//!
//! # Invariants
//! - Daily rows show raw day values; yearly rows aggregate the month's days.
//! - The totals row always aggregates every day record in scope, whatever the
//!   mode.
//! - A row title without a backing document stays tracked but renders no row.

use crate::aggregate::{aggregate, CHECKED_VALUE, UNCHECKED_VALUE};
use crate::model::document::Document;
use crate::model::habit::{HabitDefinition, ValueType};
use crate::query::registry::HabitRegistry;
use crate::query::ScopeMode;
use crate::render::RenderNode;
use crate::store::absorb;
use crate::view::{
    lists_differ, Built, DependencySnapshot, Invalidation, RenderContext, View, ViewEnv,
};
use chrono::NaiveDate;

const CHECKED_GLYPH: &str = "\u{2705}";
const UNCHECKED_GLYPH: &str = "\u{274c}";
const TOTALS_LABEL: &str = "TOTALS";

/// Weekday abbreviation (`Mon`) for a `YYYY-MM-DD` title, or empty.
pub fn weekday_label(title: &str) -> String {
    NaiveDate::parse_from_str(title.trim(), "%Y-%m-%d")
        .map(|date| date.format("%a").to_string())
        .unwrap_or_default()
}

/// Final `-`-delimited segment of a period title (`2024-03` -> `03`).
pub fn period_label(title: &str) -> &str {
    match title.rsplit('-').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => title,
    }
}

#[derive(Debug)]
pub struct SummaryTable {
    mode: ScopeMode,
    built: Option<Built>,
}

impl SummaryTable {
    pub fn new(mode: ScopeMode) -> Self {
        Self { mode, built: None }
    }

    /// Row granularity this table was created with.
    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    fn rows(&self, env: &ViewEnv<'_>, scope_key: Option<&str>) -> Vec<String> {
        scope_key
            .map(|key| {
                absorb(
                    env.queries.rows_for_scope(env.store, self.mode, key),
                    "rows_for_scope",
                )
            })
            .unwrap_or_default()
    }

    fn scope_days(&self, env: &ViewEnv<'_>, scope_key: Option<&str>) -> Vec<String> {
        scope_key
            .map(|key| absorb(env.queries.days_in_scope(env.store, key), "days_in_scope"))
            .unwrap_or_default()
    }

    /// Day titles per row; empty in daily mode where rows are the days.
    fn period_days(&self, env: &ViewEnv<'_>, rows: &[String]) -> Vec<Vec<String>> {
        match self.mode {
            ScopeMode::Daily => Vec::new(),
            ScopeMode::Yearly => rows
                .iter()
                .map(|row| absorb(env.queries.days_in_period(env.store, row), "days_in_period"))
                .collect(),
        }
    }

    fn colour(env: &ViewEnv<'_>, name: &str) -> String {
        absorb(
            env.store
                .render_inline_markup(&format!("<<colour {name}>>")),
            "render_inline_markup",
        )
    }

    fn row_cells(
        &self,
        env: &ViewEnv<'_>,
        habits: &[HabitDefinition],
        row: &Document,
        period_days: Option<&[String]>,
    ) -> Vec<RenderNode> {
        let label = match self.mode {
            ScopeMode::Daily => weekday_label(row.title()),
            ScopeMode::Yearly => period_label(row.title()).to_string(),
        };
        let mut cells = vec![RenderNode::element("td")
            .attr("style", "padding: 6px;")
            .child(
                RenderNode::delegate("link")
                    .attr("to", row.title())
                    .child(RenderNode::text(label)),
            )];

        for habit in habits {
            let content = match (self.mode, period_days) {
                (ScopeMode::Yearly, Some(days)) => Some(aggregate(env.store, habit, days)),
                (ScopeMode::Yearly, None) => None,
                (ScopeMode::Daily, _) => daily_cell(habit, row),
            };
            cells.push(
                RenderNode::element("td")
                    .attr("style", "text-align:center; padding: 6px;")
                    .children_from(content.map(RenderNode::text)),
            );
        }
        cells
    }
}

fn daily_cell(habit: &HabitDefinition, row: &Document) -> Option<String> {
    let value = habit.accessor.read(Some(row));
    match habit.value_type() {
        ValueType::Checkbox => match value {
            Some(CHECKED_VALUE) => Some(CHECKED_GLYPH.to_string()),
            Some(UNCHECKED_VALUE) => Some(UNCHECKED_GLYPH.to_string()),
            _ => None,
        },
        ValueType::Number | ValueType::Text => value.map(str::to_string),
    }
}

fn header_cell(text: &str, align: &str) -> RenderNode {
    RenderNode::element("th")
        .attr("style", format!("text-align:{align}; padding: 8px;"))
        .child(RenderNode::text(text))
}

/// Scope days followed by each row's period days, in row order.
fn flatten_days(scope_days: Vec<String>, period_days: &[Vec<String>]) -> Vec<String> {
    let mut days = scope_days;
    for period in period_days {
        days.extend(period.iter().cloned());
    }
    days
}

impl View for SummaryTable {
    fn name(&self) -> &'static str {
        match self.mode {
            ScopeMode::Daily => "summary_table_daily",
            ScopeMode::Yearly => "summary_table_yearly",
        }
    }

    fn compute(&self, env: &ViewEnv<'_>) -> Built {
        let scope_key = self.scope_key(env.context);
        let roster = absorb(
            HabitRegistry::new(env.queries).roster(env.store),
            "habit_roster",
        );
        let rows = self.rows(env, scope_key.as_deref());
        let scope_days = self.scope_days(env, scope_key.as_deref());
        let period_days = self.period_days(env, &rows);

        let border = Self::colour(env, "table-border");
        let header_background = Self::colour(env, "table-header-background");

        let first_column = match self.mode {
            ScopeMode::Daily => "Day",
            ScopeMode::Yearly => "Month",
        };
        let mut header = vec![header_cell(first_column, "left")];
        header.extend(
            roster
                .habits
                .iter()
                .map(|habit| header_cell(&habit.caption, "center")),
        );

        let mut body = Vec::with_capacity(rows.len() + 1);
        for (index, row_title) in rows.iter().enumerate() {
            let Some(row) = absorb(env.store.get_document(row_title), "row") else {
                continue;
            };
            let days = period_days.get(index).map(Vec::as_slice);
            body.push(
                RenderNode::element("tr")
                    .attr("style", format!("border-bottom: 1px solid {border};"))
                    .children_from(self.row_cells(env, &roster.habits, &row, days)),
            );
        }

        let mut totals = vec![RenderNode::element("td")
            .attr("style", "padding: 8px;")
            .child(RenderNode::text(TOTALS_LABEL))];
        totals.extend(roster.habits.iter().map(|habit| {
            RenderNode::element("td")
                .attr("style", "text-align:center; padding: 8px;")
                .child(RenderNode::text(aggregate(env.store, habit, &scope_days)))
        }));
        body.push(
            RenderNode::element("tr")
                .attr(
                    "style",
                    format!("font-weight: bold; background-color: {header_background};"),
                )
                .children_from(totals),
        );

        let table = RenderNode::element("table")
            .attr("style", "width:100%; border-collapse: collapse;")
            .child(
                RenderNode::element("thead").child(
                    RenderNode::element("tr")
                        .attr("style", format!("border-bottom: 2px solid {border};"))
                        .children_from(header),
                ),
            )
            .child(RenderNode::element("tbody").children_from(body));

        Built {
            tree: vec![table],
            snapshot: DependencySnapshot {
                habit_titles: roster.titles,
                row_titles: rows,
                day_titles: flatten_days(scope_days, &period_days),
                scope_key,
                watch_scope_key: true,
            },
        }
    }

    fn lists_changed(&self, built: &Built, env: &ViewEnv<'_>) -> Option<Invalidation> {
        let snapshot = &built.snapshot;
        let roster = absorb(
            HabitRegistry::new(env.queries).roster(env.store),
            "habit_roster",
        );
        if lists_differ(&snapshot.habit_titles, &roster.titles) {
            return Some(Invalidation::ListChanged("habits"));
        }

        let scope_key = snapshot.scope_key.as_deref();
        let rows = self.rows(env, scope_key);
        if lists_differ(&snapshot.row_titles, &rows) {
            return Some(Invalidation::ListChanged("rows"));
        }

        let days = flatten_days(
            self.scope_days(env, scope_key),
            &self.period_days(env, &rows),
        );
        lists_differ(&snapshot.day_titles, &days).then_some(Invalidation::ListChanged("days"))
    }

    fn scope_key(&self, context: &RenderContext) -> Option<String> {
        context.match_title().map(str::to_string)
    }

    fn built(&self) -> Option<&Built> {
        self.built.as_ref()
    }

    fn replace(&mut self, built: Option<Built>) {
        self.built = built;
    }
}
