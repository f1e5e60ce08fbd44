use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::dates;

/// A flat, ordered, string-keyed row. Later cells win on duplicate keys.
///
/// Used both for rows coming out of the CSV parser and for rows handed to the
/// export collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRow {
    cells: Vec<(String, String)>,
}

/// A row exactly as the CSV parser produced it: keys may carry padding.
pub type RawRow = FlatRow;

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.cells.push((key.into(), value.into()));
    }

    /// Value of the last cell whose key equals `key` exactly.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FlatRow {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Canonical fields of an [`Event`]. The column mapping maps each of these to a CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    SourceUrl,
    Date,
    EventName,
    Type,
    Cluster,
    Actor1Countries,
    Actor2Countries,
    EventLocations,
    Entities,
    EntityTypes,
    Keywords,
    FirstEventDate,
    Title,
    Description,
    EventCount,
    GoldsteinScore,
    SiteName,
    Language,
    Actor1Names,
    Actor2Names,
    EventDescriptions,
    Author,
}

impl EventField {
    /// All fields, in export column order.
    pub const ALL: [EventField; 22] = [
        EventField::SourceUrl,
        EventField::Date,
        EventField::EventName,
        EventField::Type,
        EventField::Cluster,
        EventField::Actor1Countries,
        EventField::Actor2Countries,
        EventField::EventLocations,
        EventField::Entities,
        EventField::EntityTypes,
        EventField::Keywords,
        EventField::FirstEventDate,
        EventField::Title,
        EventField::Description,
        EventField::EventCount,
        EventField::GoldsteinScore,
        EventField::SiteName,
        EventField::Language,
        EventField::Actor1Names,
        EventField::Actor2Names,
        EventField::EventDescriptions,
        EventField::Author,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventField::SourceUrl => "source_url",
            EventField::Date => "date",
            EventField::EventName => "event_name",
            EventField::Type => "type",
            EventField::Cluster => "cluster",
            EventField::Actor1Countries => "actor1_countries",
            EventField::Actor2Countries => "actor2_countries",
            EventField::EventLocations => "event_locations",
            EventField::Entities => "entities",
            EventField::EntityTypes => "entity_types",
            EventField::Keywords => "keywords",
            EventField::FirstEventDate => "first_event_date",
            EventField::Title => "title",
            EventField::Description => "description",
            EventField::EventCount => "event_count",
            EventField::GoldsteinScore => "goldstein_score",
            EventField::SiteName => "site_name",
            EventField::Language => "language",
            EventField::Actor1Names => "actor1_names",
            EventField::Actor2Names => "actor2_names",
            EventField::EventDescriptions => "event_descriptions",
            EventField::Author => "author",
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One canonical event. Absent columns are empty strings, never missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
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

impl Event {
    pub fn get(&self, field: EventField) -> &str {
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

    pub fn set(&mut self, field: EventField, value: String) {
        let slot = match field {
            EventField::SourceUrl => &mut self.source_url,
            EventField::Date => &mut self.date,
            EventField::EventName => &mut self.event_name,
            EventField::Type => &mut self.event_type,
            EventField::Cluster => &mut self.cluster,
            EventField::Actor1Countries => &mut self.actor1_countries,
            EventField::Actor2Countries => &mut self.actor2_countries,
            EventField::EventLocations => &mut self.event_locations,
            EventField::Entities => &mut self.entities,
            EventField::EntityTypes => &mut self.entity_types,
            EventField::Keywords => &mut self.keywords,
            EventField::FirstEventDate => &mut self.first_event_date,
            EventField::Title => &mut self.title,
            EventField::Description => &mut self.description,
            EventField::EventCount => &mut self.event_count,
            EventField::GoldsteinScore => &mut self.goldstein_score,
            EventField::SiteName => &mut self.site_name,
            EventField::Language => &mut self.language,
            EventField::Actor1Names => &mut self.actor1_names,
            EventField::Actor2Names => &mut self.actor2_names,
            EventField::EventDescriptions => &mut self.event_descriptions,
            EventField::Author => &mut self.author,
        };
        *slot = value;
    }
}

/// A parsed timestamp, or the invalid sentinel for unparseable input.
///
/// Ordering puts the invalid sentinel before every valid timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParsedDate(Option<NaiveDateTime>);

impl ParsedDate {
    pub fn new(datetime: NaiveDateTime) -> Self {
        ParsedDate(Some(datetime))
    }

    pub fn invalid() -> Self {
        ParsedDate(None)
    }

    /// Lenient parse; never fails, yields [`ParsedDate::invalid`] instead.
    pub fn parse(raw: &str) -> Self {
        ParsedDate(dates::parse_lenient(raw))
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.0
    }

    /// `YYYY-MM-DD` of the Sunday starting this date's week. None when invalid.
    pub fn week_key(&self) -> Option<String> {
        self.0.and_then(|dt| dates::week_key(dt.date()))
    }
}

/// The four event categories the histogram and location matrix count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "ECON")]
    Econ,
    #[serde(rename = "SEC")]
    Sec,
    #[serde(rename = "DIP")]
    Dip,
    #[serde(rename = "INFO")]
    Info,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Econ,
        EventType::Sec,
        EventType::Dip,
        EventType::Info,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            EventType::Econ => "ECON",
            EventType::Sec => "SEC",
            EventType::Dip => "DIP",
            EventType::Info => "INFO",
        }
    }

    /// Exact, case-sensitive match on the type code.
    pub fn from_code(code: &str) -> Option<Self> {
        EventType::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An [`Event`] plus the fields derived from it once at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedEvent {
    /// Position of the event in the loaded dataset; stable for the session.
    pub row_id: usize,
    pub event: Event,
    pub locations: Vec<String>,
    pub parsed_date: ParsedDate,
    pub parsed_first_event_date: ParsedDate,
    /// 0 when the score column is missing or unparseable.
    pub parsed_score: f64,
    pub score_present: bool,
}

impl ProcessedEvent {
    pub fn known_type(&self) -> Option<EventType> {
        EventType::from_code(&self.event.event_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Date,
    Type,
    Title,
    Description,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Every user selection that shapes the derived views.
///
/// Updates return a new value; nothing mutates a state in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected_type: Option<String>,
    pub selected_country: Option<String>,
    /// `YYYY-MM-DD` of the week's first day (Sunday).
    pub selected_week: Option<String>,
    pub search_query: String,
    pub sort: Option<SortSpec>,
}

fn toggle(current: &Option<String>, value: &str) -> Option<String> {
    match current {
        Some(active) if active == value => None,
        _ => Some(value.to_string()),
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_type(&self, event_type: &str) -> Self {
        FilterState {
            selected_type: toggle(&self.selected_type, event_type),
            ..self.clone()
        }
    }

    pub fn toggle_country(&self, country: &str) -> Self {
        FilterState {
            selected_country: toggle(&self.selected_country, country),
            ..self.clone()
        }
    }

    pub fn toggle_week(&self, week: &str) -> Self {
        FilterState {
            selected_week: toggle(&self.selected_week, week),
            ..self.clone()
        }
    }

    pub fn with_search(&self, query: impl Into<String>) -> Self {
        FilterState {
            search_query: query.into(),
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: Option<SortSpec>) -> Self {
        FilterState {
            sort,
            ..self.clone()
        }
    }

    /// Clicking the active column flips direction; a new column starts ascending.
    pub fn sort_by(&self, column: SortColumn) -> Self {
        let direction = match self.sort {
            Some(active) if active.column == column => active.direction.flipped(),
            _ => SortDirection::Asc,
        };
        self.with_sort(Some(SortSpec { column, direction }))
    }

    /// Clears type, country and week. Search and sort are kept.
    pub fn clear_filters(&self) -> Self {
        FilterState {
            selected_type: None,
            selected_country: None,
            selected_week: None,
            ..self.clone()
        }
    }

    pub fn has_filters(&self) -> bool {
        self.selected_type.is_some()
            || self.selected_country.is_some()
            || self.selected_week.is_some()
    }
}
