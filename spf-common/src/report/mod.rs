//! Report rendering (CSV, JSON, plain text)

mod csv_output;
mod json_output;
mod text_output;

use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;

use crate::classify::{Classification, DetailedSpeaker};
use crate::extract::generate_content_fit_analysis;
use crate::{Error, Result};

pub use json_output::{EnhancedSpeaker, JsonReport};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Csv,
    Json,
    Text,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Csv, ReportFormat::Json, ReportFormat::Text];

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Text => "txt",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv",
            ReportFormat::Json => "application/json",
            ReportFormat::Text => "text/plain",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            "text" | "txt" => Ok(ReportFormat::Text),
            other => Err(Error::InvalidInput(format!(
                "Invalid format '{}'. Must be csv, json, or text",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Text => "text",
        })
    }
}

/// A classification result ready for rendering
#[derive(Debug, Clone)]
pub struct Report {
    pub event_name: String,
    pub event_title: String,
    pub generated_at: DateTime<Local>,
    pub classification: Classification,
}

impl Report {
    pub fn new(
        event_name: impl Into<String>,
        event_title: impl Into<String>,
        classification: Classification,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            event_title: event_title.into(),
            generated_at: Local::now(),
            classification,
        }
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Csv => self.to_csv(),
            ReportFormat::Json => self.to_json(),
            ReportFormat::Text => Ok(self.to_text()),
        }
    }

    /// `speaker_report_<timestamp>.<ext>` style file name
    pub fn file_name(&self, base: &str, format: ReportFormat) -> String {
        format!(
            "{}_{}.{}",
            base,
            self.generated_at.format("%Y%m%d_%H%M%S"),
            format.extension()
        )
    }

    fn content_fit(&self, speaker: &DetailedSpeaker) -> String {
        generate_content_fit_analysis(&speaker.full_abstract, &self.event_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_file_name() {
        use chrono::TimeZone;

        let at = Local.with_ymd_and_hms(2025, 3, 15, 9, 5, 0).unwrap();
        let report = Report::new("2511 Barclays", "", Classification::default()).with_generated_at(at);
        assert_eq!(
            report.file_name("speaker_report", ReportFormat::Text),
            "speaker_report_20250315_090500.txt"
        );
    }
}
