// src/pipeline/search.rs

use crate::config::SearchConfig;
use crate::data_model::{FilterState, ProcessedEvent, SortColumn, SortDirection, SortSpec};
use crate::utils::contains_query;

use std::cmp::Ordering;
use tracing::debug;

/// Free-text search and ordering over the cross-filtered events.
#[derive(Debug, Clone)]
pub struct SearchStage {
    config: SearchConfig,
}

impl SearchStage {
    pub fn new(config: SearchConfig) -> Self {
        SearchStage { config }
    }

    /// Search, then sort. Returns a fresh sequence.
    pub fn run(&self, events: &[ProcessedEvent], state: &FilterState) -> Vec<ProcessedEvent> {
        let mut result = self.search(events, &state.search_query);
        if let Some(spec) = state.sort {
            sort_events(&mut result, spec);
        }
        debug!(
            input = events.len(),
            output = result.len(),
            query = %state.search_query,
            sort = ?state.sort,
            "Search stage applied"
        );
        result
    }

    /// Keeps events where any configured field contains the query.
    ///
    /// A blank query keeps everything. Otherwise the query is matched as typed
    /// (lowercased unless case-sensitive); surrounding spaces are significant.
    pub fn search(&self, events: &[ProcessedEvent], query: &str) -> Vec<ProcessedEvent> {
        if query.trim().is_empty() {
            return events.to_vec();
        }
        let needle = if self.config.case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };

        events
            .iter()
            .filter(|e| {
                self.config.fields.iter().any(|field| {
                    contains_query(e.event.get(*field), &needle, self.config.case_sensitive)
                })
            })
            .cloned()
            .collect()
    }
}

impl Default for SearchStage {
    fn default() -> Self {
        SearchStage::new(SearchConfig::default())
    }
}

/// Compares two events on one column, ascending.
pub fn compare_on(column: SortColumn, a: &ProcessedEvent, b: &ProcessedEvent) -> Ordering {
    match column {
        SortColumn::Date => a.parsed_date.cmp(&b.parsed_date),
        SortColumn::Type => a.event.event_type.cmp(&b.event.event_type),
        SortColumn::Title => a.event.title.cmp(&b.event.title),
        SortColumn::Description => a.event.description.cmp(&b.event.description),
        SortColumn::Source => a.event.source_url.cmp(&b.event.source_url),
    }
}

/// Stable sort: rows equal on the column keep their relative order in both directions.
pub fn sort_events(events: &mut [ProcessedEvent], spec: SortSpec) {
    match spec.direction {
        SortDirection::Asc => events.sort_by(|a, b| compare_on(spec.column, a, b)),
        SortDirection::Desc => events.sort_by(|a, b| compare_on(spec.column, b, a)),
    }
}
