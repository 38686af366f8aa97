//! CSV rendering

use super::Report;
use crate::classify::DetailedSpeaker;
use crate::record::format_number;
use crate::{Error, Result};

const HEADER: [&str; 14] = [
    "Category",
    "Speaker Name",
    "Company",
    "Rating Flag",
    "Axel Rating",
    "IR Rating",
    "Analysis",
    "Call Date",
    "In Sum",
    "Jelena Rating",
    "Jelena Comments",
    "Abstract Title",
    "Region",
    "IR Engagement Full",
];

impl Report {
    /// One row per speaker: Confirmed first (name and company only), then
    /// Intended, then Endorsed.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;

        for speaker in &self.classification.confirmed {
            let mut row = vec![String::new(); HEADER.len()];
            row[0] = speaker.category.to_string();
            row[1] = speaker.speaker_name.clone();
            row[2] = speaker.company.clone();
            writer.write_record(&row)?;
        }

        let detailed = self
            .classification
            .intended
            .iter()
            .chain(self.classification.endorsed.iter());
        for speaker in detailed {
            writer.write_record(self.detailed_row(speaker))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::InvalidInput(format!("CSV output is not UTF-8: {}", e)))
    }

    fn detailed_row(&self, speaker: &DetailedSpeaker) -> [String; 14] {
        [
            speaker.category.to_string(),
            speaker.speaker_name.clone(),
            speaker.company.clone(),
            speaker.rating_flag.clone(),
            speaker.raw_rating.to_text(),
            speaker.engagement_rating.map(format_number).unwrap_or_default(),
            self.content_fit(speaker),
            speaker.call_date.clone().unwrap_or_default(),
            speaker.in_sum.clone().unwrap_or_default(),
            speaker.reviewer_rating.clone().unwrap_or_default(),
            speaker.reviewer_comments.clone().unwrap_or_default(),
            speaker.abstract_title.clone().unwrap_or_default(),
            speaker.region.clone(),
            speaker.engagement_text.to_text(),
        ]
    }
}
