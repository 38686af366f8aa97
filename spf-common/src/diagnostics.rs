//! Source table diagnostics
//!
//! Helps work out why a classification returned nothing: which mapped
//! columns are missing, which event names the tag column actually carries,
//! and how many rows mention each status keyword.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::ColumnMapping;
use crate::record::{Field, FieldValue, TagField};

/// Status keywords that follow the event name in tag values
pub const STATUS_KEYWORDS: [&str; 3] = ["Confirmed", "Intended", "Endorsed"];

/// Presence of one mapped column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCheck {
    pub field: &'static str,
    pub column: String,
    pub present: bool,
    /// Source columns whose name contains the expected one (case-insensitive)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Check every mapped column against the columns the source actually has
pub fn check_columns<S: AsRef<str>>(columns: &[S], mapping: &ColumnMapping) -> Vec<ColumnCheck> {
    Field::ALL
        .iter()
        .map(|&field| {
            let expected = mapping.column(field);
            let present = columns.iter().any(|c| c.as_ref() == expected);
            let suggestions = if present {
                Vec::new()
            } else {
                let needle = expected.to_lowercase();
                columns
                    .iter()
                    .map(|c| c.as_ref())
                    .filter(|c| c.to_lowercase().contains(&needle))
                    .map(str::to_string)
                    .collect()
            };
            ColumnCheck {
                field: field.config_key(),
                column: expected.to_string(),
                present,
                suggestions,
            }
        })
        .collect()
}

/// Event names found in front of a status keyword, sorted and deduplicated
pub fn suggest_event_names<'a>(tags: impl IntoIterator<Item = &'a FieldValue>) -> Vec<String> {
    let mut names = BTreeSet::new();

    for value in tags {
        let entries = match TagField::from_value(value) {
            Some(TagField::List(items)) => items,
            Some(TagField::Scalar(text)) => vec![text],
            None => continue,
        };
        for entry in entries {
            for keyword in STATUS_KEYWORDS {
                if let Some((prefix, _)) = entry.split_once(keyword) {
                    let name = prefix.trim();
                    if !name.is_empty() {
                        names.insert(name.to_string());
                    }
                }
            }
        }
    }

    names.into_iter().collect()
}

/// Rows mentioning a status keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub keyword: &'static str,
    pub rows: usize,
}

/// Count rows whose tag text contains each status keyword (case-insensitive)
pub fn tag_distribution<'a>(tags: impl IntoIterator<Item = &'a FieldValue>) -> Vec<TagCount> {
    let normalized: Vec<String> = tags
        .into_iter()
        .filter_map(TagField::from_value)
        .map(|t| t.normalized())
        .collect();

    STATUS_KEYWORDS
        .iter()
        .map(|&keyword| {
            let needle = keyword.to_lowercase();
            TagCount {
                keyword,
                rows: normalized.iter().filter(|t| t.contains(&needle)).count(),
            }
        })
        .collect()
}
