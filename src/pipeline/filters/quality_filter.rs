// src/pipeline/filters/quality_filter.rs

use crate::data_model::ProcessedEvent;
use crate::pipeline::filters::EventFilter;
use crate::utils::is_placeholder_title;

/// Baseline data-quality filter: drops events whose title is empty, blank or a
/// placeholder such as `N/A`. Always on, not a user selection.
pub struct TitleQualityFilter {
    placeholders: Vec<String>,
}

impl TitleQualityFilter {
    pub fn new(placeholders: Vec<String>) -> Self {
        TitleQualityFilter { placeholders }
    }
}

impl Default for TitleQualityFilter {
    fn default() -> Self {
        TitleQualityFilter::new(vec!["N/A".to_string()])
    }
}

impl EventFilter for TitleQualityFilter {
    fn name(&self) -> &'static str {
        "TitleQualityFilter"
    }

    fn keep(&self, event: &ProcessedEvent) -> bool {
        !is_placeholder_title(&event.event.title, &self.placeholders)
    }
}
