//! Filter fragment parser and evaluator.
//!
//! # Responsibility
//! - Parse the bracketed filter runs the views rely on
//!   (`[tag[Daily]tag<matchTitle>!has[draft.of]sort[title]]`).
//! - Evaluate a parsed [`Filter`] against any [`DocumentStore`].
//!
//! # Invariants
//! - Evaluation is a pure read of the store.
//! - Output is deterministic: candidates start in title order and `sort`
//!   steps are stable with a title tie-break.
//! - Positive `tag` steps are intersected on titles first; only surviving
//!   candidates are loaded.
//! - Variables resolve only from explicit [`Bindings`]; there is no ambient
//!   lookup.

use crate::model::document::Document;
use crate::store::{DocumentStore, StoreResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

static STEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(!?)([a-z][a-z0-9.\-]*)(?:\[([^\]]*)\]|<([^>]*)>)")
        .expect("valid filter step regex")
});

pub type FilterResult<T> = Result<T, FilterError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Fragment is not a single bracketed run of steps.
    Syntax { fragment: String, offset: usize },
    UnknownOperator(String),
    /// A `<name>` operand has no binding.
    UnboundVariable(String),
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax { fragment, offset } => {
                write!(f, "invalid filter `{fragment}` at offset {offset}")
            }
            Self::UnknownOperator(name) => write!(f, "unknown filter operator `{name}`"),
            Self::UnboundVariable(name) => write!(f, "unbound filter variable `{name}`"),
        }
    }
}

impl Error for FilterError {}

/// Explicit variable bindings for `<name>` operands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` for `<name>` operands, replacing any earlier value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(String),
    Variable(String),
}

impl Operand {
    fn resolve<'a>(&'a self, bindings: &'a Bindings) -> FilterResult<&'a str> {
        match self {
            Self::Literal(value) => Ok(value.as_str()),
            Self::Variable(name) => bindings
                .get(name)
                .ok_or_else(|| FilterError::UnboundVariable(name.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Tag,
    Has,
    Sort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub negated: bool,
    pub operator: Operator,
    pub operand: Operand,
}

/// One parsed filter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    steps: Vec<Step>,
}

impl Filter {
    /// Parses one bracketed run of steps.
    ///
    /// # Errors
    /// - `Syntax` when the fragment is not a single `[...]` run.
    /// - `UnknownOperator` for steps other than `tag`, `has` and `sort`.
    pub fn parse(fragment: &str) -> FilterResult<Self> {
        let syntax_error = |offset: usize| FilterError::Syntax {
            fragment: fragment.to_string(),
            offset,
        };

        let trimmed = fragment.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| syntax_error(0))?;

        let mut steps = Vec::new();
        let mut offset = 0;
        while offset < inner.len() {
            let rest = &inner[offset..];
            if rest.trim().is_empty() {
                break;
            }
            let captures = STEP_RE
                .captures(rest)
                .ok_or_else(|| syntax_error(offset + 1))?;
            let whole = captures.get(0).map_or(0, |m| m.end());
            let negated = captures.get(1).is_some_and(|m| m.as_str() == "!");
            let name = captures.get(2).map_or("", |m| m.as_str());
            let operator = match name {
                "tag" => Operator::Tag,
                "has" => Operator::Has,
                "sort" => Operator::Sort,
                other => return Err(FilterError::UnknownOperator(other.to_string())),
            };
            let operand = match (captures.get(3), captures.get(4)) {
                (Some(literal), _) => Operand::Literal(literal.as_str().to_string()),
                (None, Some(variable)) => Operand::Variable(variable.as_str().to_string()),
                (None, None) => return Err(syntax_error(offset + 1)),
            };
            steps.push(Step {
                negated,
                operator,
                operand,
            });
            offset += whole;
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Evaluates this filter into an ordered title list.
    pub fn evaluate<S>(&self, store: &S, bindings: &Bindings) -> StoreResult<Vec<String>>
    where
        S: DocumentStore + ?Sized,
    {
        // Variables name a single scope and are the narrowest tags.
        let mut tag_steps: Vec<&Step> = self
            .steps
            .iter()
            .filter(|step| step.operator == Operator::Tag && !step.negated)
            .collect();
        tag_steps.sort_by_key(|step| !matches!(step.operand, Operand::Variable(_)));

        let candidates = match tag_steps.split_first() {
            Some((seed, rest)) => {
                let mut titles = store.titles_tagged(seed.operand.resolve(bindings)?)?;
                for step in rest {
                    if titles.is_empty() {
                        break;
                    }
                    let tagged: BTreeSet<String> = store
                        .titles_tagged(step.operand.resolve(bindings)?)?
                        .into_iter()
                        .collect();
                    titles.retain(|title| tagged.contains(title));
                }
                titles
            }
            None => store.titles()?,
        };

        let mut selected: Vec<Document> = Vec::with_capacity(candidates.len());
        for title in candidates {
            if let Some(doc) = store.get_document(&title)? {
                selected.push(doc);
            }
        }

        for step in &self.steps {
            let operand = step.operand.resolve(bindings)?;
            match step.operator {
                Operator::Tag => selected.retain(|doc| doc.has_tag(operand) != step.negated),
                Operator::Has => {
                    selected.retain(|doc| doc.non_empty_field(operand).is_some() != step.negated)
                }
                Operator::Sort => selected.sort_by(|left, right| {
                    let ordering = compare_by_field(left, right, operand);
                    if step.negated {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                }),
            }
        }

        Ok(selected
            .into_iter()
            .map(|doc| doc.title().to_string())
            .collect())
    }
}

fn compare_by_field(left: &Document, right: &Document, field: &str) -> Ordering {
    let left_key = left.field(field).unwrap_or("").to_lowercase();
    let right_key = right.field(field).unwrap_or("").to_lowercase();
    left_key
        .cmp(&right_key)
        .then_with(|| left.title().cmp(right.title()))
}

#[cfg(test)]
mod tests {
    use super::{Bindings, Filter, FilterError, Operand, Operator};
    use crate::model::document::Document;
    use crate::store::memory::MemoryStore;
    use crate::store::{DocumentStore, StoreError};

    #[test]
    fn parses_literal_variable_and_negated_steps() {
        let filter = Filter::parse("[tag[Daily]tag<matchTitle>!has[draft.of]sort[title]]").unwrap();
        let steps = filter.steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].operator, Operator::Tag);
        assert_eq!(steps[1].operand, Operand::Variable("matchTitle".to_string()));
        assert!(steps[2].negated);
        assert_eq!(steps[2].operator, Operator::Has);
        assert_eq!(steps[3].operand, Operand::Literal("title".to_string()));
    }

    #[test]
    fn tag_operands_may_contain_path_characters() {
        let filter = Filter::parse("[tag[$:/tags/Journal/Habit]]").unwrap();
        assert_eq!(
            filter.steps()[0].operand,
            Operand::Literal("$:/tags/Journal/Habit".to_string())
        );
    }

    #[test]
    fn rejects_unknown_operators_and_bad_syntax() {
        assert_eq!(
            Filter::parse("[field[x]]").unwrap_err(),
            FilterError::UnknownOperator("field".to_string())
        );
        assert!(matches!(
            Filter::parse("tag[x]").unwrap_err(),
            FilterError::Syntax { .. }
        ));
        assert!(matches!(
            Filter::parse("[tag[x]???]").unwrap_err(),
            FilterError::Syntax { .. }
        ));
    }

    #[test]
    fn evaluates_tags_has_and_sort() {
        let mut store = MemoryStore::new();
        store.put_document(
            Document::new("b")
                .with_tags(["Daily", "W1"])
                .with_field("rank", "1"),
        );
        store.put_document(
            Document::new("a")
                .with_tags(["Daily", "W1"])
                .with_field("rank", "2"),
        );
        store.put_document(Document::new("c").with_tags(["Daily", "W2"]));
        store.put_document(
            Document::new("d")
                .with_tags(["Daily", "W1"])
                .with_field("draft.of", "a"),
        );

        let bindings = Bindings::new().with("week", "W1");
        let titles = store
            .filter("[tag[Daily]tag<week>!has[draft.of]sort[title]]", &bindings)
            .unwrap();
        assert_eq!(titles, vec!["a", "b"]);

        let by_rank = store
            .filter("[tag<week>!has[draft.of]!sort[rank]]", &bindings)
            .unwrap();
        assert_eq!(by_rank, vec!["a", "b"]);
    }

    #[test]
    fn unbound_variable_is_reported() {
        let store = MemoryStore::new();
        let err = store
            .filter("[tag<matchTitle>]", &Bindings::new())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Filter(FilterError::UnboundVariable(ref name)) if name == "matchTitle"
        ));
    }
}
