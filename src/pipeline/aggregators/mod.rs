// src/pipeline/aggregators/mod.rs
//
// Summary views over the cross-filtered events. None of these see the search
// query or the sort order.

mod location_matrix;
mod timeline;
mod type_histogram;

pub use location_matrix::{location_matrix, LocationStats};
pub use timeline::{timeline_series, PlotWindow, TimelinePoint};
pub use type_histogram::{type_histogram, TypeCounts};
