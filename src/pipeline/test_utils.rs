// Shared builders for pipeline unit tests.

use crate::config::DataConfig;
use crate::data_model::{Event, ProcessedEvent};
use crate::pipeline::RowPreprocessor;

/// Event dated `date` (both date columns) with the given type, title and locations.
pub(crate) fn processed(
    row_id: usize,
    date: &str,
    event_type: &str,
    title: &str,
    locations: &str,
) -> ProcessedEvent {
    let event = Event {
        date: date.to_string(),
        first_event_date: date.to_string(),
        event_type: event_type.to_string(),
        title: title.to_string(),
        event_locations: locations.to_string(),
        ..Event::default()
    };
    RowPreprocessor::new(&DataConfig::default()).process(row_id, event)
}

/// Same as [`processed`] with a Goldstein score column value.
pub(crate) fn scored(
    row_id: usize,
    event_type: &str,
    locations: &str,
    score: &str,
) -> ProcessedEvent {
    let event = Event {
        date: "2025-06-01".to_string(),
        first_event_date: "2025-06-01".to_string(),
        event_type: event_type.to_string(),
        title: format!("Event {}", row_id),
        event_locations: locations.to_string(),
        goldstein_score: score.to_string(),
        ..Event::default()
    };
    RowPreprocessor::new(&DataConfig::default()).process(row_id, event)
}
