//! Configuration resolution tests
//!
//! Tests that touch SPF_CONFIG or AIRTABLE_* are marked #[serial] so they do
//! not race on process environment variables.

use serial_test::serial;
use spf_common::config::{
    AirtableSettings, AirtableToml, TomlConfig, AIRTABLE_API_KEY_ENV, AIRTABLE_BASE_ID_ENV,
    AIRTABLE_TABLE_NAME_ENV, CONFIG_ENV_VAR,
};
use spf_common::Error;
use std::env;
use std::io::Write;

fn clear_airtable_env() {
    env::remove_var(AIRTABLE_API_KEY_ENV);
    env::remove_var(AIRTABLE_BASE_ID_ENV);
    env::remove_var(AIRTABLE_TABLE_NAME_ENV);
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
        [columns]
        tags = "Event tags"
        rating = "Score"

        [thresholds]
        good = 95.0
        lower = 90.0
        engagement = 4.0
        lower_marks = [90.0, 91.0]

        [airtable]
        base_id = "appBASE"
        table_name = "Prospects"

        [server]
        port = 9000
        "#,
    );

    let config = TomlConfig::load(file.path()).unwrap();
    assert_eq!(config.columns.tags, "Event tags");
    assert_eq!(config.columns.rating, "Score");
    assert_eq!(config.columns.company, "Company");
    assert_eq!(config.thresholds.lower_marks, vec![90.0, 91.0]);
    assert_eq!(config.airtable.base_id.as_deref(), Some("appBASE"));
    assert_eq!(config.server.port, Some(9000));

    let classifier_config = config.classifier_config();
    assert!(classifier_config.validate().is_ok());
    assert_eq!(classifier_config.thresholds.good, 95.0);
}

#[test]
fn test_malformed_config_is_error() {
    let file = write_config("[thresholds]\ngood = \"high\"\n");
    assert!(matches!(TomlConfig::load(file.path()), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let result = TomlConfig::resolve(Some(std::path::Path::new("/nonexistent/spf.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_env_var_config_path() {
    let file = write_config("[columns]\nname = \"Full name\"\n");
    env::set_var(CONFIG_ENV_VAR, file.path());

    let config = TomlConfig::resolve(None).unwrap();
    assert_eq!(config.columns.name, "Full name");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    let env_file = write_config("[columns]\nname = \"From env\"\n");
    let cli_file = write_config("[columns]\nname = \"From cli\"\n");
    env::set_var(CONFIG_ENV_VAR, env_file.path());

    let config = TomlConfig::resolve(Some(cli_file.path())).unwrap();
    assert_eq!(config.columns.name, "From cli");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_airtable_from_toml() {
    clear_airtable_env();
    let toml = AirtableToml {
        api_key: Some("patTOML".to_string()),
        base_id: Some("appTOML".to_string()),
        table_name: Some("Speakers".to_string()),
    };

    let settings = AirtableSettings::resolve(&toml).unwrap();
    assert_eq!(settings.api_key, "patTOML");
    assert_eq!(settings.base_id, "appTOML");
    assert_eq!(settings.table_name, "Speakers");
}

#[test]
#[serial]
fn test_airtable_env_overrides_toml() {
    clear_airtable_env();
    env::set_var(AIRTABLE_API_KEY_ENV, "patENV");

    let toml = AirtableToml {
        api_key: Some("patTOML".to_string()),
        base_id: Some("appTOML".to_string()),
        table_name: Some("Speakers".to_string()),
    };
    let settings = AirtableSettings::resolve(&toml).unwrap();
    assert_eq!(settings.api_key, "patENV");

    clear_airtable_env();
}

#[test]
#[serial]
fn test_airtable_missing_key_is_config_error() {
    clear_airtable_env();
    let toml = AirtableToml {
        api_key: Some("   ".to_string()),
        base_id: Some("appTOML".to_string()),
        table_name: Some("Speakers".to_string()),
    };

    match AirtableSettings::resolve(&toml) {
        Err(Error::Config(msg)) => assert!(msg.contains(AIRTABLE_API_KEY_ENV)),
        other => panic!("expected config error, got {:?}", other),
    }
}
