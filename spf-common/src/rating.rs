//! Rating evaluation: admission filter and rating flags

use crate::config::RatingThresholds;
use crate::extract::extract_ir_rating;
use crate::record::{Field, FieldValue, RecordView};

pub const GOOD_OPTION: &str = "Good option";
pub const LOWER_RATING: &str = "Lower rating";

/// Parse a number, treating anything unparseable as absent.
///
/// Surrounding whitespace is ignored.
pub fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Numeric value of a rating cell; lists never count as numbers
pub fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => parse_numeric(s),
        FieldValue::List(_) | FieldValue::Empty => None,
    }
}

/// Applies [`RatingThresholds`] to records
#[derive(Debug, Clone)]
pub struct RatingEvaluator {
    thresholds: RatingThresholds,
}

impl RatingEvaluator {
    pub fn new(thresholds: RatingThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RatingThresholds {
        &self.thresholds
    }

    /// Numeric primary rating of the record, if any
    pub fn rating(&self, record: &RecordView<'_>) -> Option<f64> {
        numeric_value(record.get(Field::Rating))
    }

    /// Engagement rating of the record, if any
    pub fn engagement_rating(&self, record: &RecordView<'_>) -> Option<f64> {
        extract_ir_rating(record.get(Field::EngagementRating))
    }

    /// Admit when either the rating or the engagement rating clears its threshold
    pub fn passes_admission(&self, record: &RecordView<'_>) -> bool {
        if let Some(rating) = self.rating(record) {
            if rating >= self.thresholds.lower {
                return true;
            }
        }

        match self.engagement_rating(record) {
            Some(engagement) => engagement >= self.thresholds.engagement,
            None => false,
        }
    }

    /// Display flag for the primary rating.
    ///
    /// "Lower rating" is an exact match against `lower_marks`, not a range.
    pub fn rating_flag(&self, record: &RecordView<'_>) -> &'static str {
        self.flag_for(self.rating(record))
    }

    pub fn flag_for(&self, rating: Option<f64>) -> &'static str {
        match rating {
            Some(r) if r >= self.thresholds.good => GOOD_OPTION,
            Some(r) if self.thresholds.lower_marks.contains(&r) => LOWER_RATING,
            _ => "",
        }
    }
}

impl Default for RatingEvaluator {
    fn default() -> Self {
        Self::new(RatingThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnMapping;
    use crate::record::Record;

    fn admitted(record: &Record) -> bool {
        let columns = ColumnMapping::default();
        RatingEvaluator::default().passes_admission(&RecordView::new(record, &columns))
    }

    fn flag(record: &Record) -> &'static str {
        let columns = ColumnMapping::default();
        RatingEvaluator::default().rating_flag(&RecordView::new(record, &columns))
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("92"), Some(92.0));
        assert_eq!(parse_numeric(" 93.5 "), Some(93.5));
        assert_eq!(parse_numeric("ninety"), None);
        assert_eq!(parse_numeric(""), None);
    }

    #[test]
    fn test_admission_boundary() {
        assert!(!admitted(&Record::new().with("Axel's rating", 91.0)));
        assert!(admitted(&Record::new().with("Axel's rating", 92.0)));
        assert!(admitted(&Record::new().with("Axel's rating", "92")));
    }

    #[test]
    fn test_admission_via_engagement_only() {
        let record = Record::new()
            .with("Axel's rating", "pending")
            .with("IR Speaking engagement", "Talk rated 4.2 at last conference");
        assert!(admitted(&record));

        let record = Record::new().with("IR Speaking engagement", 3.7);
        assert!(!admitted(&record));

        let record = Record::new().with("IR Speaking engagement", 3.8);
        assert!(admitted(&record));
    }

    #[test]
    fn test_nothing_admits_empty_record() {
        assert!(!admitted(&Record::new()));
    }

    #[test]
    fn test_rating_flag_exact_marks() {
        assert_eq!(flag(&Record::new().with("Axel's rating", 92.0)), LOWER_RATING);
        assert_eq!(flag(&Record::new().with("Axel's rating", "93")), LOWER_RATING);
        assert_eq!(flag(&Record::new().with("Axel's rating", 94.0)), GOOD_OPTION);
        assert_eq!(flag(&Record::new().with("Axel's rating", 95.0)), GOOD_OPTION);
        assert_eq!(flag(&Record::new().with("Axel's rating", 91.0)), "");
        assert_eq!(flag(&Record::new().with("Axel's rating", 92.5)), "");
        assert_eq!(flag(&Record::new()), "");
    }

    #[test]
    fn test_list_rating_is_not_numeric() {
        assert_eq!(numeric_value(&FieldValue::List(vec!["95".to_string()])), None);
    }
}
