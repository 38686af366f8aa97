//! Plain-text rendering

use std::fmt::{self, Display, Formatter, Write};

use super::Report;
use crate::classify::{ConfirmedSpeaker, DetailedSpeaker};

const RULE_WIDTH: usize = 80;

impl Report {
    /// Human-readable report with one section per category
    pub fn to_text(&self) -> String {
        TextReport(self).to_string()
    }
}

struct TextReport<'a>(&'a Report);

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let rule = "=".repeat(RULE_WIDTH);
        let c = &report.classification;

        writeln!(f, "{}", rule)?;
        writeln!(f, "SPEAKER PROSPECT FILTERING REPORT")?;
        writeln!(f, "Event: {}", report.event_name)?;
        if !report.event_title.is_empty() {
            writeln!(f, "Title: {}", report.event_title)?;
        }
        writeln!(f, "Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "{}\n", rule)?;

        writeln!(f, "### CONFIRMED SPEAKERS ###")?;
        writeln!(f, "Count: {}\n", c.confirmed.len())?;
        if c.confirmed.is_empty() {
            writeln!(f, "No confirmed speakers found.\n")?;
        }
        for (i, speaker) in c.confirmed.iter().enumerate() {
            write_confirmed(f, speaker, i + 1)?;
        }
        writeln!(f, "\n{}\n", rule)?;

        writeln!(f, "### INTENDED SPEAKERS ###")?;
        writeln!(f, "Count: {}\n", c.intended.len())?;
        if c.intended.is_empty() {
            writeln!(f, "No intended speakers found.\n")?;
        }
        for (i, speaker) in c.intended.iter().enumerate() {
            report.write_detailed(f, speaker, i + 1)?;
        }
        writeln!(f, "\n{}\n", rule)?;

        writeln!(f, "### ENDORSED SPEAKERS ###")?;
        writeln!(f, "Count: {}\n", c.endorsed.len())?;
        if c.endorsed.is_empty() {
            writeln!(f, "No endorsed speakers found.\n")?;
        }
        for (i, speaker) in c.endorsed.iter().enumerate() {
            report.write_detailed(f, speaker, i + 1)?;
        }
        Ok(())
    }
}

fn write_confirmed(f: &mut Formatter<'_>, speaker: &ConfirmedSpeaker, index: usize) -> fmt::Result {
    write!(f, "{}. {}", index, speaker.speaker_name)?;
    if !speaker.company.is_empty() {
        write!(f, " - {}", speaker.company)?;
    }
    writeln!(f, "\n   Tag: {}\n", speaker.tag)
}

impl Report {
    fn write_detailed(
        &self,
        out: &mut impl Write,
        speaker: &DetailedSpeaker,
        index: usize,
    ) -> fmt::Result {
        write!(out, "{}. {}", index, speaker.speaker_name)?;
        if !speaker.company.is_empty() {
            write!(out, " - {}", speaker.company)?;
        }
        out.write_char('\n')?;

        if !speaker.rating_flag.is_empty() {
            write!(out, "   Rating: {}", speaker.rating_flag)?;
            if !speaker.raw_rating.is_empty() {
                write!(out, " (Axel: {})", speaker.raw_rating.to_text())?;
            }
            out.write_char('\n')?;
        }

        if speaker.in_sum.is_some() || speaker.call_date.is_some() {
            out.write_str("\n   Call Notes:\n")?;
            if let Some(date) = &speaker.call_date {
                writeln!(out, "   Date: {}", date)?;
            }
            if let Some(in_sum) = &speaker.in_sum {
                writeln!(out, "   In Sum: {}", in_sum)?;
            }
        }

        if speaker.reviewer_rating.is_some() || speaker.reviewer_comments.is_some() {
            out.write_str("\n   Jelena's Comments:\n")?;
            if let Some(rating) = &speaker.reviewer_rating {
                writeln!(out, "   Rating: {}", rating)?;
            }
            if let Some(comments) = &speaker.reviewer_comments {
                writeln!(out, "   {}", comments)?;
            }
        }

        if let Some(title) = speaker.abstract_title.as_deref().filter(|t| !t.is_empty()) {
            writeln!(out, "\n   Abstract Title: {}", title)?;
        }

        writeln!(out, "\n   Content Fit Analysis:\n   {}", self.content_fit(speaker))?;

        if !speaker.engagement_text.is_empty() {
            writeln!(out, "\n   IR Speaking Engagement: {}", speaker.engagement_text.to_text())?;
        }
        if !speaker.region.is_empty() {
            writeln!(out, "   Region: {}", speaker.region)?;
        }

        write!(out, "\n{}\n\n", "-".repeat(RULE_WIDTH))
    }
}
