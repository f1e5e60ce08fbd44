// src/config.rs
use crate::data_model::{EventField, EventType};
use crate::error::{LensError, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// `${VAR_NAME}` placeholders in string settings.
static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env placeholder regex is valid"));

/// Represents the overall dashboard configuration read from YAML.
///
/// Every section has defaults, so an empty document is a valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub metadata: MetadataConfig,
    pub data: DataConfig,
    pub search: SearchConfig,
    pub timeline: TimelineConfig,
    pub country_mapping: CountryMappingConfig,
    pub export: ExportConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct MetadataConfig {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig {
            name: "Event Dashboard".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceConfig,
    pub column_mapping: ColumnMapping,
    pub validation: ValidationConfig,
    /// Type code -> display metadata.
    pub types: BTreeMap<String, TypeConfig>,
    pub processing: ProcessingConfig,
}

impl Default for DataConfig {
    fn default() -> Self {
        let types = [
            (EventType::Econ, "Economic", "#2e7d32"),
            (EventType::Sec, "Security", "#c62828"),
            (EventType::Dip, "Diplomatic", "#1565c0"),
            (EventType::Info, "Information", "#6a1b9a"),
        ]
        .into_iter()
        .map(|(code, label, color)| {
            (
                code.code().to_string(),
                TypeConfig {
                    label: label.to_string(),
                    color: color.to_string(),
                    enabled: true,
                },
            )
        })
        .collect();

        DataConfig {
            source: SourceConfig::default(),
            column_mapping: ColumnMapping::default(),
            validation: ValidationConfig::default(),
            types,
            processing: ProcessingConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SourceConfig {
    /// HTTP(S) URL, `file://` URL or local path of the CSV document.
    pub url: String,
    pub caching: CachingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct CachingConfig {
    pub enabled: bool,
    pub duration_secs: u64,
    /// Where the payload cache lives. Defaults to a file in the system temp dir.
    pub path: Option<PathBuf>,
}

impl Default for CachingConfig {
    fn default() -> Self {
        CachingConfig {
            enabled: true,
            duration_secs: 60 * 60,
            path: None,
        }
    }
}

impl CachingConfig {
    pub fn cache_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("eventlens-payload-cache.json"))
    }
}

/// Canonical field -> CSV column header.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ColumnMapping {
    pub source_url: String,
    pub date: String,
    pub event_name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub cluster: String,
    pub actor1_countries: String,
    pub actor2_countries: String,
    pub event_locations: String,
    pub entities: String,
    pub entity_types: String,
    pub keywords: String,
    pub first_event_date: String,
    pub title: String,
    pub description: String,
    pub event_count: String,
    pub goldstein_score: String,
    pub site_name: String,
    pub language: String,
    pub actor1_names: String,
    pub actor2_names: String,
    pub event_descriptions: String,
    pub author: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            source_url: "SOURCEURL".to_string(),
            date: "Date".to_string(),
            event_name: "Event name".to_string(),
            event_type: "Type".to_string(),
            cluster: "cluster".to_string(),
            actor1_countries: "actor1_countries".to_string(),
            actor2_countries: "actor2_countries".to_string(),
            event_locations: "event_locations".to_string(),
            entities: "combined_text_entities".to_string(),
            entity_types: "combined_text_entity_types".to_string(),
            keywords: "keywords".to_string(),
            first_event_date: "first_event_date".to_string(),
            title: "title".to_string(),
            description: "description".to_string(),
            event_count: "event_count".to_string(),
            goldstein_score: "avg_goldstein_score".to_string(),
            site_name: "site_name".to_string(),
            language: "language".to_string(),
            actor1_names: "actor1_names".to_string(),
            actor2_names: "actor2_names".to_string(),
            event_descriptions: "event_descriptions".to_string(),
            author: "author".to_string(),
        }
    }
}

impl ColumnMapping {
    /// CSV header the given canonical field is read from.
    pub fn column(&self, field: EventField) -> &str {
        match field {
            EventField::SourceUrl => &self.source_url,
            EventField::Date => &self.date,
            EventField::EventName => &self.event_name,
            EventField::Type => &self.event_type,
            EventField::Cluster => &self.cluster,
            EventField::Actor1Countries => &self.actor1_countries,
            EventField::Actor2Countries => &self.actor2_countries,
            EventField::EventLocations => &self.event_locations,
            EventField::Entities => &self.entities,
            EventField::EntityTypes => &self.entity_types,
            EventField::Keywords => &self.keywords,
            EventField::FirstEventDate => &self.first_event_date,
            EventField::Title => &self.title,
            EventField::Description => &self.description,
            EventField::EventCount => &self.event_count,
            EventField::GoldsteinScore => &self.goldstein_score,
            EventField::SiteName => &self.site_name,
            EventField::Language => &self.language,
            EventField::Actor1Names => &self.actor1_names,
            EventField::Actor2Names => &self.actor2_names,
            EventField::EventDescriptions => &self.event_descriptions,
            EventField::Author => &self.author,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ValidationConfig {
    /// Rows missing any of these (after trimming) are dropped at load time.
    pub required_fields: Vec<EventField>,
    /// Drop events with an empty or placeholder title from every view.
    pub filter_empty_titles: bool,
    pub title_placeholders: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig {
            required_fields: vec![EventField::Date, EventField::Type],
            filter_empty_titles: true,
            title_placeholders: vec!["N/A".to_string()],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TypeConfig {
    pub label: String,
    pub color: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ProcessingConfig {
    pub location_delimiter: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        ProcessingConfig {
            location_delimiter: "|".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub fields: Vec<EventField>,
    pub case_sensitive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            fields: vec![
                EventField::Title,
                EventField::Description,
                EventField::EventName,
            ],
            case_sensitive: false,
        }
    }
}

/// Default plotting window of the timeline chart.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct TimelineConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        TimelineConfig {
            start: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CountryMappingConfig {
    /// Location code -> display name.
    pub inline: BTreeMap<String, String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub filename_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            filename_prefix: "events".to_string(),
        }
    }
}

impl ExportConfig {
    /// `<prefix>-<YYYY-MM-DD>.csv`
    pub fn filename(&self, date: NaiveDate) -> String {
        format!("{}-{}.csv", self.filename_prefix, date.format("%Y-%m-%d"))
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        self.data.validate()?;

        if self.search.fields.is_empty() {
            return Err(LensError::ConfigValidationError(
                "search: fields cannot be empty".to_string(),
            ));
        }
        if self.timeline.start >= self.timeline.end {
            return Err(LensError::ConfigValidationError(format!(
                "timeline: start ({}) must be before end ({})",
                self.timeline.start, self.timeline.end
            )));
        }
        Ok(())
    }

    /// Display metadata for a type code. None for unknown or disabled types.
    pub fn type_display(&self, code: &str) -> Option<&TypeConfig> {
        self.data.types.get(code).filter(|t| t.enabled)
    }

    /// Type codes that are enabled for display.
    pub fn enabled_types(&self) -> Vec<&str> {
        self.data
            .types
            .iter()
            .filter(|(_, t)| t.enabled)
            .map(|(code, _)| code.as_str())
            .collect()
    }

    /// Display name for a location code, falling back to the code itself.
    pub fn country_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.country_mapping
            .inline
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }
}

impl DataConfig {
    pub fn validate(&self) -> Result<()> {
        if self.processing.location_delimiter.is_empty() {
            return Err(LensError::ConfigValidationError(
                "processing: location_delimiter cannot be empty".to_string(),
            ));
        }

        for field in [
            EventField::Date,
            EventField::Type,
            EventField::Title,
            EventField::Description,
        ] {
            if self.column_mapping.column(field).trim().is_empty() {
                return Err(LensError::ConfigValidationError(format!(
                    "column_mapping: missing column for '{}'",
                    field
                )));
            }
        }

        for field in &self.validation.required_fields {
            if self.column_mapping.column(*field).trim().is_empty() {
                return Err(LensError::ConfigValidationError(format!(
                    "validation: required field '{}' has no mapped column",
                    field
                )));
            }
        }

        if self.types.is_empty() {
            return Err(LensError::ConfigValidationError(
                "types: no event types configured".to_string(),
            ));
        }

        if self.source.caching.enabled && self.source.caching.duration_secs == 0 {
            return Err(LensError::ConfigValidationError(
                "source.caching: duration_secs must be greater than 0 when caching is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Replaces `${VAR}` with the variable's value. Unset variables are left as written.
pub fn substitute_env_vars(input: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Loads, env-substitutes and validates the dashboard configuration YAML file.
pub fn load_dashboard_config<P: AsRef<Path>>(config_path: P) -> Result<DashboardConfig> {
    let path_ref = config_path.as_ref();
    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        LensError::ConfigError(format!(
            "Failed to read dashboard config file '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    let config = parse_dashboard_config(&config_content).map_err(|e| match e {
        LensError::ConfigError(msg) => {
            LensError::ConfigError(format!("{} (in '{}')", msg, path_ref.display()))
        }
        other => other,
    })?;
    Ok(config)
}

/// Parses and validates a dashboard configuration from YAML text.
pub fn parse_dashboard_config(yaml: &str) -> Result<DashboardConfig> {
    // An empty document deserializes to unit, not to an empty mapping.
    let mut config: DashboardConfig = if yaml.trim().is_empty() {
        DashboardConfig::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|e| {
            LensError::ConfigError(format!("Failed to parse dashboard config YAML: {}", e))
        })?
    };

    if config.data.source.url.contains("${") {
        config.data.source.url = substitute_env_vars(&config.data.source.url);
    }

    config.validate()?;
    Ok(config)
}
