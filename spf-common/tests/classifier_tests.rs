//! Classification pipeline tests
//!
//! Covers category membership, exclusion rules, admission thresholds and the
//! detailed extraction for Intended / Endorsed speakers, driven through the
//! public `Classifier` API with the default column mapping.

use spf_common::extract::{assess_content_fit, extract_in_sum_section, ContentFit};
use spf_common::{Category, Classifier, ClassifierConfig, ColumnMapping, FieldValue, Record};

const EVENT: &str = "2511 Barclays";

fn classifier() -> Classifier {
    Classifier::new(EVENT, ClassifierConfig::default()).expect("default config is valid")
}

fn speaker(name: &str, tags: &str) -> Record {
    Record::new().with("Name", name).with("Workshops", tags)
}

// =============================================================================
// Confirmed
// =============================================================================

#[test]
fn test_confirmed_single_entry() {
    let records = vec![speaker("Jane Doe", "2511 Barclays Confirmed").with("Company", "Acme")];

    let confirmed = classifier().classify_confirmed(&records);

    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].speaker_name, "Jane Doe");
    assert_eq!(confirmed[0].company, "Acme");
    assert_eq!(confirmed[0].tag, "2511 Barclays Confirmed");
    assert_eq!(confirmed[0].category, Category::Confirmed);
}

#[test]
fn test_confirmed_case_insensitive() {
    let records = vec![speaker("Jane Doe", "2511 BARCLAYS CONFIRMED, 2602 HSBC Intended")];
    assert_eq!(classifier().classify_confirmed(&records).len(), 1);
}

#[test]
fn test_other_event_not_confirmed() {
    let records = vec![speaker("Jane Doe", "2602 HSBC Confirmed")];
    assert!(classifier().classify_confirmed(&records).is_empty());
}

#[test]
fn test_empty_tags_excluded_everywhere() {
    let records = vec![
        Record::new()
            .with("Name", "No Tags")
            .with("Axel's rating", 99.0)
            .with("IR Speaking engagement", 5.0),
        Record::new().with("Name", "Blank Tags").with("Workshops", ""),
        Record::new().with("Name", "Empty List").with("Workshops", Vec::<String>::new()),
    ];

    let result = classifier().classify(&records);
    assert!(result.confirmed.is_empty());
    assert!(result.intended.is_empty());
    assert!(result.endorsed.is_empty());
}

// =============================================================================
// Intended
// =============================================================================

#[test]
fn test_intended_not_reached_excluded() {
    let records = vec![speaker("Jane Doe", "2511 Barclays Intended, 2511 Barclays not reached")
        .with("Axel's rating", 96.0)];
    assert!(classifier().classify_intended(&records).is_empty());
}

#[test]
fn test_intended_do_not_contact_excluded() {
    let records = vec![
        speaker("A", "2511 Barclays Intended")
            .with("Axel's rating", 96.0)
            .with("Activity notes", "DON'T CONTACT"),
        speaker("B", "2511 Barclays Intended")
            .with("Axel's rating", 96.0)
            .with("Activity notes", "Do not contact before June"),
        speaker("C", "2511 Barclays Intended")
            .with("Axel's rating", 96.0)
            .with("Activity notes", "Contacted in May"),
    ];

    let intended = classifier().classify_intended(&records);
    assert_eq!(intended.len(), 1);
    assert_eq!(intended[0].speaker_name, "C");
}

#[test]
fn test_intended_below_threshold_dropped() {
    let records = vec![speaker("Jane Doe", "2511 Barclays Intended")
        .with("Axel's rating", 91.0)
        .with("IR Speaking engagement", "3.5")];
    assert!(classifier().classify_intended(&records).is_empty());
}

#[test]
fn test_admission_boundary_91_to_92() {
    let mut record = speaker("Jane Doe", "2511 Barclays Intended").with("Axel's rating", 91.0);
    assert!(classifier().classify_intended(std::slice::from_ref(&record)).is_empty());

    record.insert("Axel's rating", 92.0);
    assert_eq!(classifier().classify_intended(std::slice::from_ref(&record)).len(), 1);
}

#[test]
fn test_admission_via_engagement_text() {
    let records = vec![speaker("Jane Doe", "2511 Barclays Intended")
        .with("Axel's rating", "tbd")
        .with("IR Speaking engagement", "Talk rated 4.2 at last conference")];

    let intended = classifier().classify_intended(&records);
    assert_eq!(intended.len(), 1);
    assert_eq!(intended[0].engagement_rating, Some(4.2));
    assert_eq!(intended[0].rating_flag, "");
}

// =============================================================================
// Endorsed
// =============================================================================

#[test]
fn test_endorsed_keeps_not_available() {
    let records = vec![speaker("Jane Doe", "2511 Barclays Endorsed 2511 Barclays not available")
        .with("Axel's rating", 94.0)];

    let endorsed = classifier().classify_endorsed(&records);
    assert_eq!(endorsed.len(), 1);
    assert_eq!(endorsed[0].rating_flag, "Good option");
}

#[test]
fn test_endorsed_do_not_contact_excluded() {
    let records = vec![speaker("Jane Doe", "2511 Barclays Endorsed")
        .with("Axel's rating", 94.0)
        .with("Activity notes", "dont contact")];
    assert!(classifier().classify_endorsed(&records).is_empty());
}

#[test]
fn test_membership_is_not_exclusive() {
    let records = vec![speaker(
        "Jane Doe",
        "2511 Barclays Confirmed, 2511 Barclays Intended, 2511 Barclays Endorsed",
    )
    .with("Axel's rating", 95.0)];

    let result = classifier().classify(&records);
    assert_eq!(result.confirmed.len(), 1);
    assert_eq!(result.intended.len(), 1);
    assert_eq!(result.endorsed.len(), 1);
    assert_eq!(result.summary().total_count, 3);
}

// =============================================================================
// Detailed extraction
// =============================================================================

#[test]
fn test_in_sum_excerpt_and_date() {
    let notes = "Call summary.\nIn sum: great speaker,\nvery engaging.\nNext steps: follow up.\nCall date 3/15/2025";
    let (excerpt, date) = extract_in_sum_section(notes);

    assert_eq!(excerpt.as_deref(), Some("great speaker,\nvery engaging."));
    assert_eq!(date.as_deref(), Some("3/15/2025"));
}

#[test]
fn test_content_fit_strong() {
    match assess_content_fit("Climate Finance in 2025", "Global Climate and Finance Summit") {
        ContentFit::Strong(keywords) => {
            assert!(keywords.iter().any(|k| k == "climate"));
            assert!(keywords.iter().any(|k| k == "finance"));
        }
        other => panic!("expected strong fit, got {:?}", other),
    }
}

#[test]
fn test_detailed_speaker_extraction() {
    let records = vec![speaker("Sam Lee", "2511 Barclays Intended")
        .with("Company", "Globex")
        .with("Axel's rating", 92.0)
        .with(
            "Notes speaker calls",
            "Call summary.\nIn sum: great speaker,\nvery engaging.\nNext steps: follow up.\n3/15/2025",
        )
        .with("Jelena's comments", "In sum: 4\nStrong on macro\nThird line")
        .with("Abstract", "Rates after the pivot\nA longer description")
        .with("Region", "UK")];

    let intended = classifier().classify_intended(&records);
    assert_eq!(intended.len(), 1);

    let s = &intended[0];
    assert_eq!(s.category, Category::Intended);
    assert_eq!(s.rating_flag, "Lower rating");
    assert_eq!(s.raw_rating, FieldValue::Number(92.0));
    assert_eq!(s.in_sum.as_deref(), Some("great speaker,\nvery engaging."));
    assert_eq!(s.call_date.as_deref(), Some("3/15/2025"));
    assert_eq!(s.reviewer_rating.as_deref(), Some("4"));
    assert_eq!(s.reviewer_comments.as_deref(), Some("In sum: 4\nStrong on macro"));
    assert_eq!(s.abstract_title.as_deref(), Some("Rates after the pivot"));
    assert_eq!(s.full_abstract, "Rates after the pivot\nA longer description");
    assert_eq!(s.region, "UK");
    assert_eq!(s.engagement_text, FieldValue::Empty);
    assert_eq!(s.engagement_rating, None);
}

// =============================================================================
// Configuration and determinism
// =============================================================================

#[test]
fn test_custom_column_mapping() {
    let config = ClassifierConfig {
        columns: ColumnMapping {
            tags: "Tags".to_string(),
            name: "Speaker".to_string(),
            ..ColumnMapping::default()
        },
        ..ClassifierConfig::default()
    };
    let classifier = Classifier::new(EVENT, config).unwrap();

    let records = vec![Record::new()
        .with("Speaker", "Jane Doe")
        .with("Tags", "2511 Barclays Confirmed")
        .with("Workshops", "ignored")];

    let confirmed = classifier.classify_confirmed(&records);
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].speaker_name, "Jane Doe");
}

#[test]
fn test_custom_thresholds() {
    let mut config = ClassifierConfig::default();
    config.thresholds.lower = 80.0;
    let classifier = Classifier::new(EVENT, config).unwrap();

    let records = vec![speaker("Jane Doe", "2511 Barclays Endorsed").with("Axel's rating", 85.0)];
    assert_eq!(classifier.classify_endorsed(&records).len(), 1);
}

#[test]
fn test_source_order_preserved() {
    let records: Vec<Record> = ["C", "A", "B"]
        .iter()
        .map(|name| speaker(name, "2511 Barclays Confirmed"))
        .collect();

    let names: Vec<String> = classifier()
        .classify_confirmed(&records)
        .into_iter()
        .map(|s| s.speaker_name)
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[test]
fn test_classification_is_idempotent() {
    let records = vec![
        speaker("Jane Doe", "2511 Barclays Confirmed"),
        speaker("Sam Lee", "2511 Barclays Intended").with("Axel's rating", 95.0),
        speaker("Ana Ruiz", "2511 Barclays Endorsed").with("IR Speaking engagement", 4.1),
        speaker("Bad Data", "2511 Barclays Intended").with("Axel's rating", "??"),
    ];

    let classifier = classifier();
    let first = classifier.classify(&records);
    let second = classifier.classify(&records);

    assert_eq!(first, second);
    assert_eq!(first.summary().confirmed_count, 1);
    assert_eq!(first.summary().intended_count, 1);
    assert_eq!(first.summary().endorsed_count, 1);
}
