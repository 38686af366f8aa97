//! JSON rendering
//!
//! Shape matches what the web front end reads: `summary`, and the three
//! `*_speakers` arrays, with a `content_fit_analysis` on detailed speakers.

use serde::Serialize;

use super::Report;
use crate::classify::{ConfirmedSpeaker, DetailedSpeaker, Summary};
use crate::Result;

/// Detailed speaker plus its content-fit analysis
#[derive(Debug, Serialize)]
pub struct EnhancedSpeaker<'a> {
    #[serde(flatten)]
    pub speaker: &'a DetailedSpeaker,
    pub content_fit_analysis: String,
}

/// Serializable report body
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub event_name: &'a str,
    pub event_title: &'a str,
    pub generated_at: String,
    pub summary: Summary,
    pub confirmed_speakers: &'a [ConfirmedSpeaker],
    pub intended_speakers: Vec<EnhancedSpeaker<'a>>,
    pub endorsed_speakers: Vec<EnhancedSpeaker<'a>>,
}

impl Report {
    pub fn json_body(&self) -> JsonReport<'_> {
        JsonReport {
            event_name: &self.event_name,
            event_title: &self.event_title,
            generated_at: self.generated_at.to_rfc3339(),
            summary: self.classification.summary(),
            confirmed_speakers: &self.classification.confirmed,
            intended_speakers: self.enhance(&self.classification.intended),
            endorsed_speakers: self.enhance(&self.classification.endorsed),
        }
    }

    fn enhance<'a>(&'a self, speakers: &'a [DetailedSpeaker]) -> Vec<EnhancedSpeaker<'a>> {
        speakers
            .iter()
            .map(|speaker| EnhancedSpeaker {
                speaker,
                content_fit_analysis: self.content_fit(speaker),
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.json_body())?)
    }
}
