//! Record sources
//!
//! Adapters that turn an uploaded CSV table or a remote Airtable table into
//! [`Record`]s keyed by physical column name.

pub mod airtable;
pub mod csv_table;

use std::path::PathBuf;
use tracing::info;

use crate::config::AirtableSettings;
use crate::record::Record;
use crate::Result;

pub use airtable::AirtableClient;
pub use csv_table::{parse_csv, CsvTable};

/// Where a record batch comes from
#[derive(Debug, Clone)]
pub enum RecordSource {
    /// Local CSV export
    CsvFile(PathBuf),
    /// Airtable table
    Airtable(AirtableSettings),
}

impl RecordSource {
    /// Load the full batch
    pub async fn fetch(&self) -> Result<Vec<Record>> {
        let records = match self {
            RecordSource::CsvFile(path) => CsvTable::from_path(path)?.records,
            RecordSource::Airtable(settings) => {
                AirtableClient::new(settings.clone())?
                    .fetch_all_records()
                    .await?
            }
        };
        info!("Loaded {} records from {}", records.len(), self);
        Ok(records)
    }
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::CsvFile(path) => write!(f, "CSV file {}", path.display()),
            RecordSource::Airtable(settings) => write!(
                f,
                "Airtable table '{}' (base {})",
                settings.table_name, settings.base_id
            ),
        }
    }
}
