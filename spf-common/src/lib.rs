//! # SPF Common Library
//!
//! Shared code for the speaker prospect filter service and CLI:
//! - Record model and column mapping
//! - Text extraction heuristics for notes, comments and abstracts
//! - Rating evaluation (admission and rating flags)
//! - Speaker classification into Confirmed / Intended / Endorsed
//! - Record sources (CSV uploads, Airtable)
//! - Report rendering (CSV, JSON, plain text)
//! - Configuration loading

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod rating;
pub mod record;
pub mod report;
pub mod source;

pub use classify::{Category, Classification, Classifier, ConfirmedSpeaker, DetailedSpeaker};
pub use config::{ClassifierConfig, ColumnMapping, RatingThresholds};
pub use error::{Error, Result};
pub use record::{Field, FieldValue, Record};
