// src/pipeline/filters/cross_filter.rs

use crate::config::ValidationConfig;
use crate::data_model::{FilterState, ProcessedEvent};
use crate::pipeline::filters::{CountryFilter, TitleQualityFilter, TypeFilter, WeekFilter};

use tracing::debug;

/// A single keep/drop predicate over processed events.
pub trait EventFilter: Send + Sync {
    fn name(&self) -> &'static str; // For logging

    fn keep(&self, event: &ProcessedEvent) -> bool;
}

/// Applies every active predicate (logical AND) in one pass, preserving input order.
pub struct CrossFilterEngine {
    filters: Vec<Box<dyn EventFilter>>,
}

impl CrossFilterEngine {
    pub fn new(filters: Vec<Box<dyn EventFilter>>) -> Self {
        if filters.is_empty() {
            debug!("Cross filter has no predicates; every event passes.");
        }
        CrossFilterEngine { filters }
    }

    /// Builds the engine for the type, country and week selections of `state`.
    /// Search and sort are not this stage's concern.
    pub fn from_state(state: &FilterState, validation: &ValidationConfig) -> Self {
        let mut filters: Vec<Box<dyn EventFilter>> = Vec::with_capacity(4);
        if validation.filter_empty_titles {
            filters.push(Box::new(TitleQualityFilter::new(
                validation.title_placeholders.clone(),
            )));
        }
        if let Some(event_type) = &state.selected_type {
            filters.push(Box::new(TypeFilter::new(event_type.clone())));
        }
        if let Some(country) = &state.selected_country {
            filters.push(Box::new(CountryFilter::new(country.clone())));
        }
        if let Some(week) = &state.selected_week {
            filters.push(Box::new(WeekFilter::new(week.clone())));
        }
        CrossFilterEngine::new(filters)
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn matches(&self, event: &ProcessedEvent) -> bool {
        self.filters.iter().all(|f| f.keep(event))
    }

    /// Returns a fresh sequence; `events` is never touched.
    pub fn apply(&self, events: &[ProcessedEvent]) -> Vec<ProcessedEvent> {
        let kept: Vec<ProcessedEvent> = events
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect();
        debug!(
            filters = ?self.filter_names(),
            input = events.len(),
            kept = kept.len(),
            "Cross filter applied"
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_utils::processed;

    fn dataset() -> Vec<ProcessedEvent> {
        vec![
            processed(0, "2025-06-03", "ECON", "Port deal", "GH|NI"),
            processed(1, "2025-06-05", "SEC", "N/A", "GH"),
            processed(2, "2025-06-05", "SEC", "Border clash", "INFO|US"),
            processed(3, "2025-06-10", "DIP", "Summit", "IN"),
            processed(4, "2025-06-12", "ECON", "   ", "GH"),
            processed(5, "2025-06-12", "ECON", "Mining licence", "NI"),
        ]
    }

    fn ids(events: &[ProcessedEvent]) -> Vec<usize> {
        events.iter().map(|e| e.row_id).collect()
    }

    fn run(state: &FilterState) -> Vec<usize> {
        let engine = CrossFilterEngine::from_state(state, &ValidationConfig::default());
        ids(&engine.apply(&dataset()))
    }

    #[test]
    fn test_no_selection_applies_title_filter_only() {
        assert_eq!(run(&FilterState::new()), vec![0, 2, 3, 5]);
    }

    #[test]
    fn test_title_filter_can_be_disabled() {
        let validation = ValidationConfig {
            filter_empty_titles: false,
            ..ValidationConfig::default()
        };
        let engine = CrossFilterEngine::from_state(&FilterState::new(), &validation);
        assert!(engine.filter_names().is_empty());
        assert_eq!(ids(&engine.apply(&dataset())), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let state = FilterState::new().toggle_type("ECON").toggle_country("NI");
        assert_eq!(run(&state), vec![0, 5]);

        let state = state.toggle_week("2025-06-08");
        assert_eq!(run(&state), vec![5]);
    }

    #[test]
    fn test_country_is_exact_element_match() {
        let state = FilterState::new().toggle_country("IN");
        // "INFO|US" must not match "IN".
        assert_eq!(run(&state), vec![3]);
    }

    #[test]
    fn test_output_is_ordered_subset_of_input() {
        let states = [
            FilterState::new(),
            FilterState::new().toggle_type("SEC"),
            FilterState::new().toggle_country("GH"),
            FilterState::new().toggle_week("2025-06-01"),
            FilterState::new().toggle_type("ECON").toggle_week("2025-06-08"),
        ];
        for state in &states {
            let out = run(state);
            let mut sorted = out.clone();
            sorted.sort_unstable();
            assert_eq!(out, sorted, "order changed for {:?}", state);
        }
    }

    #[test]
    fn test_apply_is_idempotent_and_leaves_input_alone() {
        let data = dataset();
        let before = data.clone();
        let engine =
            CrossFilterEngine::from_state(&FilterState::new().toggle_type("ECON"), &ValidationConfig::default());
        let first = engine.apply(&data);
        let second = engine.apply(&data);
        assert_eq!(first, second);
        assert_eq!(data, before);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let state = FilterState::new().toggle_type("INFO");
        assert!(run(&state).is_empty());
    }
}
