//! Heuristic text extraction for notes, comments and abstracts
//!
//! Every function here is pure and total: empty input yields an empty
//! result, and nothing panics on malformed text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::record::FieldValue;

/// Longest first line still treated as an abstract title (exclusive)
const TITLE_MAX_CHARS: usize = 200;

/// Event-title words never used as content-fit keywords
const STOP_WORDS: [&str; 5] = ["this", "that", "with", "from", "will"];

/// Marker is case-insensitive; the terminating `\n[A-Z]` is not.
static IN_SUM_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:in sum)[:\s]+(?s:(.*?))(?:\n\n|\n[A-Z]|$)").expect("valid in-sum regex")
});

static CALL_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}",
        r"|\d{4}[/-]\d{1,2}[/-]\d{1,2}",
        r"|(?:January|February|March|April|May|June|July|August|September|October|November|December)",
        r" \d{1,2},? \d{4})"
    ))
    .expect("valid date regex")
});

static REVIEWER_RATING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)in?\s*sum[:\s]*(\d+(?:\.\d+)?)").expect("valid reviewer rating regex")
});

static NUMERIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+|\d+").expect("valid numeric regex"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Pull the "In sum" excerpt and the first call date out of call notes.
///
/// The two results are independent: the date is searched for in the whole
/// text, not only inside the excerpt.
///
/// ```
/// use spf_common::extract::extract_in_sum_section;
///
/// let (excerpt, date) = extract_in_sum_section("Call 2025-01-20\nIn sum: strong pick");
/// assert_eq!(excerpt.as_deref(), Some("strong pick"));
/// assert_eq!(date.as_deref(), Some("2025-01-20"));
/// ```
pub fn extract_in_sum_section(text: &str) -> (Option<String>, Option<String>) {
    if text.is_empty() {
        return (None, None);
    }

    let excerpt = IN_SUM_SECTION.captures(text).map(|caps| {
        let body = caps.get(1).map_or("", |m| m.as_str()).trim();
        first_lines(body, 2)
    });

    let date = CALL_DATE.find(text).map(|m| m.as_str().to_string());

    (excerpt, date)
}

/// Pull the "In sum <rating>" value and the opening two lines out of the
/// reviewer's comments.
pub fn extract_reviewer_comments(text: &str) -> (Option<String>, Option<String>) {
    if text.is_empty() {
        return (None, None);
    }

    let rating = REVIEWER_RATING
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    (rating, Some(first_lines(text.trim(), 2)))
}

/// Title for an abstract: its first line when short enough, otherwise a
/// truncated prefix of the whole text.
pub fn extract_abstract_title(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let first_line = text.trim().split('\n').next().unwrap_or("").trim();
    if first_line.chars().count() < TITLE_MAX_CHARS {
        return Some(first_line.to_string());
    }

    if text.chars().count() > TITLE_MAX_CHARS {
        let prefix: String = text.chars().take(TITLE_MAX_CHARS).collect();
        Some(format!("{}...", prefix))
    } else {
        Some(text.to_string())
    }
}

/// Engagement rating from a numeric cell or the first number in free text
pub fn extract_ir_rating(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Empty => None,
        FieldValue::Number(n) => n.is_finite().then_some(*n),
        FieldValue::Text(s) => first_number(s),
        FieldValue::List(items) => first_number(&items.join(" ")),
    }
}

fn first_number(text: &str) -> Option<f64> {
    NUMERIC_TOKEN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn first_lines(text: &str, count: usize) -> String {
    text.split('\n').take(count).collect::<Vec<_>>().join("\n")
}

/// Content-fit verdict between a speaker abstract and the event title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFit {
    /// Abstract or event title missing
    Unavailable,
    /// Two or more keywords matched; holds up to the first three
    Strong(Vec<String>),
    /// Exactly one keyword matched
    Moderate(String),
    /// No keyword matched
    NeedsReview,
}

impl fmt::Display for ContentFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentFit::Unavailable => {
                write!(f, "Content fit analysis not available due to missing information.")
            }
            ContentFit::Strong(keywords) => write!(
                f,
                "Strong content fit: Speaker's expertise aligns with event focus on {}. \
                 Abstract demonstrates relevant experience.",
                keywords.join(", ")
            ),
            ContentFit::Moderate(keyword) => write!(
                f,
                "Moderate fit: Abstract touches on {}, relevant to event theme. \
                 May need to confirm specific angle.",
                keyword
            ),
            ContentFit::NeedsReview => write!(
                f,
                "Content fit requires review: Abstract covers different focus area. \
                 Recommend verifying alignment with event objectives."
            ),
        }
    }
}

/// Keyword-overlap verdict between an abstract and an event title.
///
/// Whitespace-only input counts as missing. A keyword repeated in the title
/// is matched once.
pub fn assess_content_fit(abstract_text: &str, event_title: &str) -> ContentFit {
    if abstract_text.trim().is_empty() || event_title.trim().is_empty() {
        return ContentFit::Unavailable;
    }

    let abstract_lower = abstract_text.to_lowercase();
    let title_lower = event_title.to_lowercase();

    let mut matches: Vec<String> = Vec::new();
    for word in WORD.find_iter(&title_lower).map(|m| m.as_str()) {
        if word.chars().count() <= 3 || STOP_WORDS.contains(&word) {
            continue;
        }
        if abstract_lower.contains(word) && !matches.iter().any(|m| m == word) {
            matches.push(word.to_string());
        }
    }

    match matches.len() {
        0 => ContentFit::NeedsReview,
        1 => ContentFit::Moderate(matches.remove(0)),
        _ => {
            matches.truncate(3);
            ContentFit::Strong(matches)
        }
    }
}

/// Rendered content-fit message
pub fn generate_content_fit_analysis(abstract_text: &str, event_title: &str) -> String {
    assess_content_fit(abstract_text, event_title).to_string()
}
