// src/pipeline/filters/selection_filters.rs

use crate::data_model::ProcessedEvent;
use crate::pipeline::filters::EventFilter;

/// Keeps events whose type equals the selection exactly (case-sensitive).
pub struct TypeFilter {
    selected: String,
}

impl TypeFilter {
    pub fn new(selected: String) -> Self {
        TypeFilter { selected }
    }
}

impl EventFilter for TypeFilter {
    fn name(&self) -> &'static str {
        "TypeFilter"
    }

    fn keep(&self, event: &ProcessedEvent) -> bool {
        event.event.event_type == self.selected
    }
}

/// Keeps events listing the selected location code as one of their split locations.
///
/// Matching is on whole elements, never on the raw delimited string, so "IN"
/// does not match "INFO|US".
pub struct CountryFilter {
    selected: String,
}

impl CountryFilter {
    pub fn new(selected: String) -> Self {
        CountryFilter { selected }
    }
}

impl EventFilter for CountryFilter {
    fn name(&self) -> &'static str {
        "CountryFilter"
    }

    fn keep(&self, event: &ProcessedEvent) -> bool {
        event.locations.iter().any(|code| *code == self.selected)
    }
}

/// Keeps events whose first-event date falls in the selected week bucket.
/// Events with an invalid first-event date never match.
pub struct WeekFilter {
    selected: String,
}

impl WeekFilter {
    pub fn new(selected: String) -> Self {
        WeekFilter { selected }
    }
}

impl EventFilter for WeekFilter {
    fn name(&self) -> &'static str {
        "WeekFilter"
    }

    fn keep(&self, event: &ProcessedEvent) -> bool {
        event
            .parsed_first_event_date
            .week_key()
            .is_some_and(|key| key == self.selected)
    }
}
