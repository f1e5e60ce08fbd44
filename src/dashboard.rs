use crate::config::DashboardConfig;
use crate::data_model::{EventField, FilterState, FlatRow, ProcessedEvent};
use crate::executor::LoadReport;
use crate::pipeline::aggregators::{
    location_matrix, timeline_series, type_histogram, LocationStats, PlotWindow, TimelinePoint,
    TypeCounts,
};
use crate::pipeline::filters::CrossFilterEngine;
use crate::pipeline::search::SearchStage;

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// The loaded event collection. Immutable once built; clones share the rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    events: Arc<[ProcessedEvent]>,
    report: LoadReport,
}

impl Dataset {
    pub fn new(events: Vec<ProcessedEvent>, report: LoadReport) -> Self {
        Dataset {
            events: events.into(),
            report,
        }
    }

    pub fn events(&self) -> &[ProcessedEvent] {
        &self.events
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// The four derived outputs for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Cross-filtered, searched and sorted.
    pub events: Vec<ProcessedEvent>,
    pub type_counts: TypeCounts,
    pub locations: Vec<LocationStats>,
    pub timeline: Vec<TimelinePoint>,
}

impl DashboardView {
    /// The "zero results" state. Aggregates may still be non-empty when only
    /// the search narrowed the feed to nothing.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Pure queries of (dataset, filter state).
///
/// Aggregates read the cross-filtered set; only the event feed sees search and sort.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    config: Arc<DashboardConfig>,
    search: SearchStage,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: Arc<DashboardConfig>) -> Self {
        let search = SearchStage::new(config.search.clone());
        Dashboard {
            dataset,
            config,
            search,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cross_filtered(&self, state: &FilterState) -> Vec<ProcessedEvent> {
        CrossFilterEngine::from_state(state, &self.config.data.validation)
            .apply(self.dataset.events())
    }

    pub fn displayed(&self, state: &FilterState) -> Vec<ProcessedEvent> {
        self.search.run(&self.cross_filtered(state), state)
    }

    pub fn type_counts(&self, state: &FilterState) -> TypeCounts {
        type_histogram(&self.cross_filtered(state))
    }

    pub fn locations(&self, state: &FilterState) -> Vec<LocationStats> {
        location_matrix(&self.cross_filtered(state))
    }

    pub fn timeline(&self, state: &FilterState) -> Vec<TimelinePoint> {
        timeline_series(&self.cross_filtered(state))
    }

    /// All four outputs from a single cross-filter pass.
    pub fn view(&self, state: &FilterState) -> DashboardView {
        let filtered = self.cross_filtered(state);
        DashboardView {
            events: self.search.run(&filtered, state),
            type_counts: type_histogram(&filtered),
            locations: location_matrix(&filtered),
            timeline: timeline_series(&filtered),
        }
    }

    /// Export header: the mapped source column of every canonical field.
    /// Fields mapped to no column are exported under their canonical name.
    pub fn export_headers(&self) -> Vec<String> {
        EventField::ALL
            .iter()
            .map(|field| self.export_column(*field).to_string())
            .collect()
    }

    /// The displayed rows as flat records keyed by [`Dashboard::export_headers`].
    pub fn export_rows(&self, state: &FilterState) -> Vec<FlatRow> {
        self.displayed(state)
            .iter()
            .map(|e| {
                EventField::ALL
                    .iter()
                    .map(|field| (self.export_column(*field), e.event.get(*field)))
                    .collect::<FlatRow>()
            })
            .collect()
    }

    pub fn export_filename(&self, date: NaiveDate) -> String {
        self.config.export.filename(date)
    }

    pub fn plot_window(&self) -> PlotWindow {
        PlotWindow::from_config(&self.config.timeline)
    }

    fn export_column(&self, field: EventField) -> &str {
        let column = self.config.data.column_mapping.column(field).trim();
        if column.is_empty() {
            field.name()
        } else {
            column
        }
    }
}

/// Position of the row with `row_id` in a displayed sequence, for highlighting.
pub fn locate_row(events: &[ProcessedEvent], row_id: usize) -> Option<usize> {
    events.iter().position(|e| e.row_id == row_id)
}

/// Whether the dashboard has data to show.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Failed(String),
    Ready(Dashboard),
}

impl LoadState {
    pub fn from_result(result: crate::error::Result<Dashboard>) -> Self {
        match result {
            Ok(dashboard) => LoadState::Ready(dashboard),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            LoadState::Ready(dashboard) => Some(dashboard),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}
