//! CSV table parsing
//!
//! The header row names the columns. Cells are typed loosely: blank cells
//! become [`FieldValue::Empty`], cells that read as finite numbers become
//! [`FieldValue::Number`], everything else stays text.

use std::path::Path;
use tracing::debug;

use crate::rating::parse_numeric;
use crate::record::{FieldValue, Record};
use crate::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A parsed CSV upload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsvTable {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl CsvTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        parse_csv(&bytes)
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// First `n` rows
    pub fn sample(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// Every row's value for `column`, in row order
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a FieldValue> {
        self.records.iter().map(move |r| r.get(column))
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Parse CSV bytes into a [`CsvTable`]
pub fn parse_csv(bytes: &[u8]) -> Result<CsvTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.iter().all(|c| c.is_empty()) {
        return Err(Error::EmptyInput("CSV file is empty".to_string()));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), cell_value(row.get(i).unwrap_or(""))))
            .collect();
        records.push(record);
    }

    debug!(rows = records.len(), columns = columns.len(), "Parsed CSV table");
    Ok(CsvTable { columns, records })
}

fn cell_value(cell: &str) -> FieldValue {
    if cell.trim().is_empty() {
        return FieldValue::Empty;
    }
    match parse_numeric(cell) {
        Some(n) if n.is_finite() => FieldValue::Number(n),
        _ => FieldValue::Text(cell.to_string()),
    }
}
