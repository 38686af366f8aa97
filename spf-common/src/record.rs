//! Source record model
//!
//! A [`Record`] is one row of the source table keyed by physical column name.
//! Logical fields ([`Field`]) are resolved through a
//! [`ColumnMapping`](crate::config::ColumnMapping) by [`RecordView`], so the
//! classifier never sees physical column names.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ColumnMapping;

static EMPTY: FieldValue = FieldValue::Empty;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    #[default]
    Empty,
}

impl FieldValue {
    /// True for absent values, empty strings and empty lists
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Render the value as display text; absent values become `""`
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// Convert a JSON value (e.g. an Airtable field) into a cell value
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Empty,
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Empty),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::Object(_) => FieldValue::Text(value.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One source row keyed by physical column name
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for tests and adapters
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Cell for `column`, or [`FieldValue::Empty`] when the column is absent
    pub fn get(&self, column: &str) -> &FieldValue {
        self.fields.get(column).unwrap_or(&EMPTY)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Logical fields the classifier reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Tags,
    Rating,
    EngagementRating,
    Notes,
    Comments,
    Abstract,
    Region,
    Company,
    Name,
    ExclusionNotes,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Tags,
        Field::Rating,
        Field::EngagementRating,
        Field::Notes,
        Field::Comments,
        Field::Abstract,
        Field::Region,
        Field::Company,
        Field::Name,
        Field::ExclusionNotes,
    ];

    /// Key used for this field in the `[columns]` config section
    pub fn config_key(self) -> &'static str {
        match self {
            Field::Tags => "tags",
            Field::Rating => "rating",
            Field::EngagementRating => "engagement_rating",
            Field::Notes => "notes",
            Field::Comments => "comments",
            Field::Abstract => "abstract",
            Field::Region => "region",
            Field::Company => "company",
            Field::Name => "name",
            Field::ExclusionNotes => "exclusion_notes",
        }
    }
}

/// Tag column content, either one free-text cell or a multi-select list
#[derive(Debug, Clone, PartialEq)]
pub enum TagField {
    Scalar(String),
    List(Vec<String>),
}

impl TagField {
    /// `None` when the cell is empty or absent
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        match value {
            FieldValue::List(items) => Some(TagField::List(items.clone())),
            other => Some(TagField::Scalar(other.to_text())),
        }
    }

    /// Space-joined, lowercased tag text that all tag matching runs against
    pub fn normalized(&self) -> String {
        match self {
            TagField::Scalar(s) => s.to_lowercase(),
            TagField::List(items) => items.join(" ").to_lowercase(),
        }
    }
}

/// Logical-field view over a [`Record`]
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    record: &'a Record,
    columns: &'a ColumnMapping,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a Record, columns: &'a ColumnMapping) -> Self {
        Self { record, columns }
    }

    pub fn get(&self, field: Field) -> &'a FieldValue {
        self.record.get(self.columns.column(field))
    }

    /// Field rendered as text, `""` when absent
    pub fn text(&self, field: Field) -> String {
        self.get(field).to_text()
    }

    pub fn tags(&self) -> Option<TagField> {
        TagField::from_value(self.get(Field::Tags))
    }
}
