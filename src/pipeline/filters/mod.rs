// src/pipeline/filters/mod.rs

mod cross_filter;
mod quality_filter;
mod selection_filters;

pub use cross_filter::{CrossFilterEngine, EventFilter};
pub use quality_filter::TitleQualityFilter;
pub use selection_filters::{CountryFilter, TypeFilter, WeekFilter};
