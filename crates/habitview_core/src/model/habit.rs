//! Habit definition model.
//!
//! # Responsibility
//! - Interpret a habit-definition document into a typed [`HabitDefinition`].
//! - Resolve the target field once into a reusable [`FieldAccessor`].
//!
//! # Invariants
//! - A definition without a target field is inert: [`HabitDefinition::from_document`]
//!   returns `None` for it.
//! - An unknown declared type falls back to [`ValueType::Text`].

use crate::config::JournalSchema;
use crate::model::document::Document;
use serde::Serialize;

/// Closed set of value types a habit field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// `yes`/`no` toggle.
    Checkbox,
    /// Floating-point quantity.
    Number,
    /// Free text. Also the fallback for unrecognized declared types.
    Text,
}

impl ValueType {
    /// Parses a declared type string.
    ///
    /// Absent or empty declarations mean `number`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("number") => Self::Number,
            Some("checkbox") => Self::Checkbox,
            Some(_) => Self::Text,
        }
    }

    /// Value written to the type field for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Number => "number",
            Self::Text => "text",
        }
    }
}

/// Target field name paired with its value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAccessor {
    pub field: String,
    pub value_type: ValueType,
}

impl FieldAccessor {
    /// Binds a field name to the type its values are read as.
    pub fn new(field: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            field: field.into(),
            value_type,
        }
    }

    /// Reads this accessor's field from a record; a missing record reads as absent.
    pub fn read<'doc>(&self, record: Option<&'doc Document>) -> Option<&'doc str> {
        record.and_then(|doc| doc.fields.get(self.field.as_str()).map(String::as_str))
    }
}

/// One active habit, as rendered by the views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitDefinition {
    /// Title of the backing definition document.
    pub title: String,
    pub accessor: FieldAccessor,
    /// Short glyph label; may be empty.
    pub shorthand: String,
    /// Display label; defaults to the title.
    pub caption: String,
}

impl HabitDefinition {
    /// Interprets a definition document using the configured field names.
    ///
    /// Returns `None` when the document names no target field.
    pub fn from_document(doc: &Document, schema: &JournalSchema) -> Option<Self> {
        let field = doc.non_empty_field(schema.field_field.as_str())?;
        let value_type = ValueType::parse(doc.field(schema.type_field.as_str()));
        let shorthand = doc
            .field(schema.shorthand_field.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        let caption = doc
            .non_empty_field(schema.caption_field.as_str())
            .unwrap_or(doc.title())
            .to_string();

        Some(Self {
            title: doc.title().to_string(),
            accessor: FieldAccessor::new(field, value_type),
            shorthand,
            caption,
        })
    }

    /// Shorthand for the accessor's value type.
    pub fn value_type(&self) -> ValueType {
        self.accessor.value_type
    }
}
