//! Configuration loading and validation
//!
//! Column mapping and rating thresholds are plain values handed to the
//! [`Classifier`](crate::classify::Classifier) at construction time. The TOML
//! file is optional; resolution priority for its location is:
//! 1. Command-line argument (highest priority)
//! 2. `SPF_CONFIG` environment variable
//! 3. `<config dir>/spf/config.toml`
//! 4. Compiled defaults (fallback)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::record::Field;
use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SPF_CONFIG";

pub const AIRTABLE_API_KEY_ENV: &str = "AIRTABLE_API_KEY";
pub const AIRTABLE_BASE_ID_ENV: &str = "AIRTABLE_BASE_ID";
pub const AIRTABLE_TABLE_NAME_ENV: &str = "AIRTABLE_TABLE_NAME";

/// Physical column name for each logical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub tags: String,
    pub rating: String,
    pub engagement_rating: String,
    pub notes: String,
    pub comments: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub region: String,
    pub company: String,
    pub name: String,
    pub exclusion_notes: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            tags: "Workshops".to_string(),
            rating: "Axel's rating".to_string(),
            engagement_rating: "IR Speaking engagement".to_string(),
            notes: "Notes speaker calls".to_string(),
            comments: "Jelena's comments".to_string(),
            abstract_text: "Abstract".to_string(),
            region: "Region".to_string(),
            company: "Company".to_string(),
            name: "Name".to_string(),
            exclusion_notes: "Activity notes".to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn column(&self, field: Field) -> &str {
        match field {
            Field::Tags => &self.tags,
            Field::Rating => &self.rating,
            Field::EngagementRating => &self.engagement_rating,
            Field::Notes => &self.notes,
            Field::Comments => &self.comments,
            Field::Abstract => &self.abstract_text,
            Field::Region => &self.region,
            Field::Company => &self.company,
            Field::Name => &self.name,
            Field::ExclusionNotes => &self.exclusion_notes,
        }
    }
}

/// Rating thresholds used for admission and rating flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    /// Ratings at or above this are flagged "Good option"
    pub good: f64,
    /// Minimum rating for admission
    pub lower: f64,
    /// Minimum engagement rating for admission
    pub engagement: f64,
    /// Exact ratings flagged "Lower rating"
    pub lower_marks: Vec<f64>,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            good: 94.0,
            lower: 92.0,
            engagement: 3.8,
            lower_marks: vec![92.0, 93.0],
        }
    }
}

/// Everything the classifier needs besides the event name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub columns: ColumnMapping,
    pub thresholds: RatingThresholds,
}

impl ClassifierConfig {
    /// Reject mappings and thresholds that cannot drive a classification
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            if self.columns.column(field).trim().is_empty() {
                return Err(Error::Config(format!(
                    "column mapping for '{}' is empty",
                    field.config_key()
                )));
            }
        }

        let t = &self.thresholds;
        for (name, value) in [("good", t.good), ("lower", t.lower), ("engagement", t.engagement)] {
            if !value.is_finite() {
                return Err(Error::Config(format!("threshold '{}' must be a finite number", name)));
            }
        }
        if t.lower_marks.iter().any(|m| !m.is_finite()) {
            return Err(Error::Config("lower_marks must be finite numbers".to_string()));
        }
        if t.good < t.lower {
            return Err(Error::Config(format!(
                "good threshold ({}) is below lower threshold ({})",
                t.good, t.lower
            )));
        }
        Ok(())
    }
}

/// `[airtable]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirtableToml {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub table_name: Option<String>,
}

/// `[server]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerToml {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// On-disk configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub columns: ColumnMapping,
    pub thresholds: RatingThresholds,
    pub airtable: AirtableToml,
    pub server: ServerToml,
}

impl TomlConfig {
    /// Parse a config file; missing sections fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve and load the config file, falling back to defaults when no
    /// file exists at the default location.
    ///
    /// An explicitly requested file (CLI or env) that cannot be read is an error.
    pub fn resolve(cli_arg: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_arg {
            info!("Loading config from {}", path.display());
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                info!("Loading config from {} ({})", path, CONFIG_ENV_VAR);
                return Self::load(Path::new(&path));
            }
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                info!("Loading config from {}", path.display());
                return Self::load(&path);
            }
            debug!("No config file at {}", path.display());
        }

        info!("No config file found, using compiled defaults");
        Ok(Self::default())
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            columns: self.columns.clone(),
            thresholds: self.thresholds.clone(),
        }
    }
}

/// `<config dir>/spf/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spf").join("config.toml"))
}

/// Airtable connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct AirtableSettings {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
}

impl AirtableSettings {
    /// Resolve credentials with environment → TOML priority
    pub fn resolve(toml: &AirtableToml) -> Result<Self> {
        Ok(Self {
            api_key: resolve_setting(AIRTABLE_API_KEY_ENV, toml.api_key.as_deref())?,
            base_id: resolve_setting(AIRTABLE_BASE_ID_ENV, toml.base_id.as_deref())?,
            table_name: resolve_setting(AIRTABLE_TABLE_NAME_ENV, toml.table_name.as_deref())?,
        })
    }
}

fn resolve_setting(env_var: &str, toml_value: Option<&str>) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_value(v));
    let toml_value = toml_value.filter(|v| is_valid_value(v));

    match (env_value, toml_value) {
        (Some(env), Some(_)) => {
            warn!(
                "{} set in both environment and TOML config. Using environment (highest priority).",
                env_var
            );
            Ok(env)
        }
        (Some(env), None) => Ok(env),
        (None, Some(toml)) => Ok(toml.to_string()),
        (None, None) => Err(Error::Config(format!(
            "{} not configured. Set the environment variable or the [airtable] section of the config file",
            env_var
        ))),
    }
}

/// Non-empty, non-whitespace
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
