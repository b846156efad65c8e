//! Per-habit aggregation over day records.
//!
//! # Responsibility
//! - Reduce day-record values into a summary string by value type.
//!
//! # Invariants
//! - `number`: sum of leading-numeric prefixes; unparsable or absent is 0.
//! - `checkbox`: count of values exactly equal to `yes`.
//! - `text`: no aggregate; renders as an empty cell.
//! - Results do not depend on day order.

use crate::model::document::Document;
use crate::model::habit::{FieldAccessor, HabitDefinition, ValueType};
use crate::store::{absorb, DocumentStore};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid number regex")
});

/// Checkbox value counted as done.
pub const CHECKED_VALUE: &str = "yes";
/// Checkbox value for an explicit miss.
pub const UNCHECKED_VALUE: &str = "no";

/// Parses the leading decimal number of `value`, ignoring trailing text.
///
/// `"12 steps"` reads as 12; `"bad"` and `""` read as `None`.
pub fn parse_number(value: &str) -> Option<f64> {
    let captures = NUMBER_PREFIX_RE.captures(value)?;
    captures.get(1)?.as_str().parse::<f64>().ok()
}

/// Formats a sum the way cells display it (`100`, `1.5`, `1e+21`).
///
/// Plain decimal notation is used for magnitudes in `[1e-6, 1e21)`; outside
/// that range the shortest exponent form with an explicit sign is used.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Avoids rendering negative zero.
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}Infinity");
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

/// Aggregates raw values of one field.
pub fn aggregate_values<'v, I>(value_type: ValueType, values: I) -> String
where
    I: IntoIterator<Item = Option<&'v str>>,
{
    match value_type {
        ValueType::Number => {
            let sum: f64 = values
                .into_iter()
                .map(|value| value.and_then(parse_number).unwrap_or(0.0))
                .sum();
            format_number(sum)
        }
        ValueType::Checkbox => values
            .into_iter()
            .filter(|value| *value == Some(CHECKED_VALUE))
            .count()
            .to_string(),
        ValueType::Text => String::new(),
    }
}

/// Aggregates one habit over loaded day records.
pub fn aggregate_records(accessor: &FieldAccessor, records: &[Document]) -> String {
    aggregate_values(
        accessor.value_type,
        records.iter().map(|record| accessor.read(Some(record))),
    )
}

/// Aggregates one habit over day titles, reading each from `store`.
///
/// Missing documents and read failures contribute nothing.
pub fn aggregate(store: &dyn DocumentStore, habit: &HabitDefinition, day_titles: &[String]) -> String {
    let records: Vec<Document> = day_titles
        .iter()
        .filter_map(|title| absorb(store.get_document(title), "aggregate_day"))
        .collect();
    aggregate_records(&habit.accessor, &records)
}
