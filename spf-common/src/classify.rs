//! Speaker classification into Confirmed / Intended / Endorsed
//!
//! Each category is an independent pass over the same batch, so a record can
//! land in several categories. Output order follows source order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use crate::config::ClassifierConfig;
use crate::extract::{
    extract_abstract_title, extract_in_sum_section, extract_ir_rating, extract_reviewer_comments,
};
use crate::rating::RatingEvaluator;
use crate::record::{Field, FieldValue, Record, RecordView};
use crate::{Error, Result};

const UNKNOWN_SPEAKER: &str = "Unknown";

static DO_NOT_CONTACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)do(?:n['’]?t| not) contact").expect("valid do-not-contact regex")
});

/// Speaker category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Confirmed,
    Intended,
    Endorsed,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Confirmed => "Confirmed",
            Category::Intended => "Intended",
            Category::Endorsed => "Endorsed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confirmed speaker entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmedSpeaker {
    pub speaker_name: String,
    pub tag: String,
    pub company: String,
    pub category: Category,
}

/// Intended / Endorsed speaker entry with extracted details
///
/// Serialized keys follow the column names the web front end expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedSpeaker {
    pub speaker_name: String,
    pub company: String,
    pub category: Category,
    pub rating_flag: String,
    #[serde(rename = "axel_rating")]
    pub raw_rating: FieldValue,
    pub in_sum: Option<String>,
    pub call_date: Option<String>,
    pub full_notes: String,
    #[serde(rename = "jelena_rating")]
    pub reviewer_rating: Option<String>,
    #[serde(rename = "jelena_comments")]
    pub reviewer_comments: Option<String>,
    pub abstract_title: Option<String>,
    pub full_abstract: String,
    pub region: String,
    #[serde(rename = "ir_engagement")]
    pub engagement_text: FieldValue,
    #[serde(rename = "ir_rating")]
    pub engagement_rating: Option<f64>,
}

/// Per-category counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub confirmed_count: usize,
    pub intended_count: usize,
    pub endorsed_count: usize,
    pub total_count: usize,
}

/// Output of one classification run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    pub confirmed: Vec<ConfirmedSpeaker>,
    pub intended: Vec<DetailedSpeaker>,
    pub endorsed: Vec<DetailedSpeaker>,
}

impl Classification {
    pub fn summary(&self) -> Summary {
        Summary {
            confirmed_count: self.confirmed.len(),
            intended_count: self.intended.len(),
            endorsed_count: self.endorsed.len(),
            total_count: self.confirmed.len() + self.intended.len() + self.endorsed.len(),
        }
    }
}

/// Lowercased tag strings for one event
#[derive(Debug, Clone)]
struct EventTags {
    confirmed: String,
    intended: String,
    endorsed: String,
    not_reached: String,
    not_available: String,
}

impl EventTags {
    fn new(event_name: &str) -> Self {
        let tag = |status: &str| format!("{} {}", event_name, status).to_lowercase();
        Self {
            confirmed: tag("Confirmed"),
            intended: tag("Intended"),
            endorsed: tag("Endorsed"),
            not_reached: tag("not reached"),
            not_available: tag("not available"),
        }
    }
}

/// Classifies record batches for one event
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// callers and repeated runs give identical results.
#[derive(Debug, Clone)]
pub struct Classifier {
    event_name: String,
    config: ClassifierConfig,
    ratings: RatingEvaluator,
    tags: EventTags,
}

impl Classifier {
    /// Fails with [`Error::Config`] for an empty event name or invalid config
    pub fn new(event_name: &str, config: ClassifierConfig) -> Result<Self> {
        let event_name = event_name.trim();
        if event_name.is_empty() {
            return Err(Error::Config("event name must not be empty".to_string()));
        }
        config.validate()?;

        Ok(Self {
            event_name: event_name.to_string(),
            ratings: RatingEvaluator::new(config.thresholds.clone()),
            tags: EventTags::new(event_name),
            config,
        })
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn ratings(&self) -> &RatingEvaluator {
        &self.ratings
    }

    /// Run all three category passes
    pub fn classify(&self, records: &[Record]) -> Classification {
        let classification = Classification {
            confirmed: self.classify_confirmed(records),
            intended: self.classify_intended(records),
            endorsed: self.classify_endorsed(records),
        };

        let summary = classification.summary();
        info!(
            event = %self.event_name,
            records = records.len(),
            confirmed = summary.confirmed_count,
            intended = summary.intended_count,
            endorsed = summary.endorsed_count,
            "Classification complete"
        );

        classification
    }

    pub fn classify_confirmed(&self, records: &[Record]) -> Vec<ConfirmedSpeaker> {
        let label = format!("{} {}", self.event_name, Category::Confirmed);

        self.views(records)
            .filter(|view| self.tags_contain(view, &self.tags.confirmed))
            .map(|view| ConfirmedSpeaker {
                speaker_name: speaker_name(&view),
                tag: label.clone(),
                company: view.text(Field::Company),
                category: Category::Confirmed,
            })
            .collect()
    }

    pub fn classify_intended(&self, records: &[Record]) -> Vec<DetailedSpeaker> {
        self.views(records)
            .filter(|view| {
                let Some(tags) = view.tags().map(|t| t.normalized()) else {
                    return false;
                };
                if !tags.contains(&self.tags.intended) {
                    return false;
                }
                if tags.contains(&self.tags.not_reached) || tags.contains(&self.tags.not_available)
                {
                    debug!(speaker = %speaker_name(view), "Intended: not reached / not available");
                    return false;
                }
                self.contactable_and_admitted(view, Category::Intended)
            })
            .map(|view| self.detailed_speaker(&view, Category::Intended))
            .collect()
    }

    /// Unlike Intended, no not-reached / not-available exclusion applies here
    pub fn classify_endorsed(&self, records: &[Record]) -> Vec<DetailedSpeaker> {
        self.views(records)
            .filter(|view| {
                self.tags_contain(view, &self.tags.endorsed)
                    && self.contactable_and_admitted(view, Category::Endorsed)
            })
            .map(|view| self.detailed_speaker(&view, Category::Endorsed))
            .collect()
    }

    fn views<'a>(&'a self, records: &'a [Record]) -> impl Iterator<Item = RecordView<'a>> + 'a {
        records
            .iter()
            .map(move |record| RecordView::new(record, &self.config.columns))
    }

    fn tags_contain(&self, view: &RecordView<'_>, tag: &str) -> bool {
        view.tags().is_some_and(|t| t.normalized().contains(tag))
    }

    fn contactable_and_admitted(&self, view: &RecordView<'_>, category: Category) -> bool {
        if is_do_not_contact(&view.text(Field::ExclusionNotes)) {
            debug!(speaker = %speaker_name(view), %category, "Excluded: do not contact");
            return false;
        }
        if !self.ratings.passes_admission(view) {
            debug!(speaker = %speaker_name(view), %category, "Excluded: below rating thresholds");
            return false;
        }
        true
    }

    fn detailed_speaker(&self, view: &RecordView<'_>, category: Category) -> DetailedSpeaker {
        let notes = view.text(Field::Notes);
        let comments = view.text(Field::Comments);
        let abstract_text = view.text(Field::Abstract);
        let engagement = view.get(Field::EngagementRating);

        let (in_sum, call_date) = extract_in_sum_section(&notes);
        let (reviewer_rating, reviewer_comments) = extract_reviewer_comments(&comments);

        DetailedSpeaker {
            speaker_name: speaker_name(view),
            company: view.text(Field::Company),
            category,
            rating_flag: self.ratings.rating_flag(view).to_string(),
            raw_rating: view.get(Field::Rating).clone(),
            in_sum,
            call_date,
            reviewer_rating,
            reviewer_comments,
            abstract_title: extract_abstract_title(&abstract_text),
            full_notes: notes,
            full_abstract: abstract_text,
            region: view.text(Field::Region),
            engagement_text: engagement.clone(),
            engagement_rating: extract_ir_rating(engagement),
        }
    }
}

fn speaker_name(view: &RecordView<'_>) -> String {
    let name = view.text(Field::Name);
    if name.is_empty() {
        UNKNOWN_SPEAKER.to_string()
    } else {
        name
    }
}

/// "don't contact" / "dont contact" / "do not contact", any case
pub fn is_do_not_contact(notes: &str) -> bool {
    DO_NOT_CONTACT.is_match(notes)
}
