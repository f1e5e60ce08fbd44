use crate::config::TimelineConfig;
use crate::data_model::{ParsedDate, ProcessedEvent};

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Title shown when an event has neither a title nor an event name.
pub const FALLBACK_TITLE: &str = "Event";
/// Description shown when an event has none.
pub const FALLBACK_DESCRIPTION: &str = "No description available";

/// One plotted event on the timeline chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub row_id: usize,
    pub event_type: String,
    pub date: ParsedDate,
    pub title: String,
    pub description: String,
}

fn first_non_empty<'a>(candidates: &[&'a str], fallback: &'a str) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|s| !s.is_empty())
        .unwrap_or(fallback)
}

/// One point per event with a non-empty first-event date, in input order.
///
/// Points are produced whether or not they fall inside the current plot window;
/// see [`PlotWindow::visible`].
pub fn timeline_series(events: &[ProcessedEvent]) -> Vec<TimelinePoint> {
    events
        .iter()
        .filter(|e| !e.event.first_event_date.is_empty())
        .map(|e| TimelinePoint {
            row_id: e.row_id,
            event_type: e.event.event_type.clone(),
            date: e.parsed_first_event_date,
            title: first_non_empty(&[&e.event.title, &e.event.event_name], FALLBACK_TITLE)
                .to_string(),
            description: first_non_empty(&[&e.event.description], FALLBACK_DESCRIPTION)
                .to_string(),
        })
        .collect()
}

/// The user-adjustable zoom range of the timeline chart. Inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    default_start: NaiveDateTime,
    default_end: NaiveDateTime,
}

impl PlotWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        PlotWindow {
            start,
            end,
            default_start: start,
            default_end: end,
        }
    }

    pub fn from_config(config: &TimelineConfig) -> Self {
        PlotWindow::new(
            config.start.and_time(NaiveTime::MIN),
            config.end.and_time(NaiveTime::MIN),
        )
    }

    /// Narrows to `[start, end]`. Empty or inverted selections leave the window as is.
    pub fn zoom(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start >= end {
            return *self;
        }
        PlotWindow {
            start,
            end,
            ..*self
        }
    }

    /// Back to the window this one was created with.
    pub fn reset(&self) -> Self {
        PlotWindow::new(self.default_start, self.default_end)
    }

    pub fn is_zoomed(&self) -> bool {
        self.start != self.default_start || self.end != self.default_end
    }

    /// Invalid dates are never inside a window.
    pub fn contains(&self, date: &ParsedDate) -> bool {
        date.datetime()
            .is_some_and(|dt| dt >= self.start && dt <= self.end)
    }

    pub fn visible<'a>(&self, points: &'a [TimelinePoint]) -> Vec<&'a TimelinePoint> {
        points.iter().filter(|p| self.contains(&p.date)).collect()
    }
}
