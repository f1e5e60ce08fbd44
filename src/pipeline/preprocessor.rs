// src/pipeline/preprocessor.rs

use crate::config::DataConfig;
use crate::data_model::{Event, ParsedDate, ProcessedEvent};
use crate::utils::parse_score;

/// Computes the derived fields of an event. Runs once per row at load time.
#[derive(Debug, Clone)]
pub struct RowPreprocessor {
    delimiter: String,
}

impl RowPreprocessor {
    pub fn new(config: &DataConfig) -> Self {
        RowPreprocessor {
            delimiter: config.processing.location_delimiter.clone(),
        }
    }

    /// Pure in `(row_id, event)` for a fixed delimiter.
    pub fn process(&self, row_id: usize, event: Event) -> ProcessedEvent {
        let locations = self.split_locations(&event.event_locations);
        let parsed_date = ParsedDate::parse(&event.date);
        let parsed_first_event_date = ParsedDate::parse(&event.first_event_date);
        let score = parse_score(&event.goldstein_score);

        ProcessedEvent {
            row_id,
            locations,
            parsed_date,
            parsed_first_event_date,
            parsed_score: score.unwrap_or(0.0),
            score_present: score.is_some(),
            event,
        }
    }

    /// Empty segments (e.g. from a trailing delimiter) are kept as empty strings.
    pub fn split_locations(&self, raw: &str) -> Vec<String> {
        if raw.is_empty() {
            return Vec::new();
        }
        raw.split(self.delimiter.as_str())
            .map(|code| code.trim().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocessor() -> RowPreprocessor {
        RowPreprocessor::new(&DataConfig::default())
    }

    fn event(locations: &str, score: &str) -> Event {
        Event {
            date: "2025-06-01".to_string(),
            first_event_date: "2025-05-28".to_string(),
            event_type: "ECON".to_string(),
            event_locations: locations.to_string(),
            goldstein_score: score.to_string(),
            ..Event::default()
        }
    }

    #[test]
    fn test_splits_and_trims_locations() {
        let p = preprocessor().process(0, event(" GH | NI ", "1"));
        assert_eq!(p.locations, vec!["GH", "NI"]);
    }

    #[test]
    fn test_empty_location_field_gives_no_locations() {
        let p = preprocessor().process(0, event("", "1"));
        assert!(p.locations.is_empty());
    }

    #[test]
    fn test_trailing_delimiter_keeps_empty_segment() {
        let p = preprocessor().process(0, event("GH|", "1"));
        assert_eq!(p.locations, vec!["GH".to_string(), String::new()]);
    }

    #[test]
    fn test_custom_delimiter() {
        let mut config = DataConfig::default();
        config.processing.location_delimiter = ";".to_string();
        let p = RowPreprocessor::new(&config).process(0, event("GH;NI|X", "1"));
        assert_eq!(p.locations, vec!["GH", "NI|X"]);
    }

    #[test]
    fn test_score_defaults_to_zero() {
        let p = preprocessor().process(0, event("GH", ""));
        assert_eq!(p.parsed_score, 0.0);
        assert!(!p.score_present);

        let p = preprocessor().process(0, event("GH", "garbage"));
        assert_eq!(p.parsed_score, 0.0);
        assert!(!p.score_present);

        let p = preprocessor().process(0, event("GH", "0"));
        assert_eq!(p.parsed_score, 0.0);
        assert!(p.score_present);

        let p = preprocessor().process(0, event("GH", "-4.5"));
        assert_eq!(p.parsed_score, -4.5);
    }

    #[test]
    fn test_dates_are_parsed_independently() {
        let mut e = event("GH", "1");
        e.date = "not a date".to_string();
        let p = preprocessor().process(0, e);
        assert!(!p.parsed_date.is_valid());
        assert!(p.parsed_first_event_date.is_valid());
        assert_eq!(p.parsed_first_event_date.week_key().as_deref(), Some("2025-05-25"));
    }

    #[test]
    fn test_processing_is_deterministic() {
        let e = event("GH|NI|", "4.2");
        let first = preprocessor().process(7, e.clone());
        let second = preprocessor().process(7, e);
        assert_eq!(first, second);
        assert_eq!(first.parsed_score.to_bits(), second.parsed_score.to_bits());
    }
}
