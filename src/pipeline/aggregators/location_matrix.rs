use crate::data_model::{EventType, ProcessedEvent};
use crate::pipeline::aggregators::TypeCounts;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-location summary of the cross-filtered events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStats {
    pub location: String,
    pub counts: TypeCounts,
    /// Sum of the four known-type counts.
    pub total: usize,
    /// Mean of the non-zero scores seen for this location, 0 when there are none.
    pub avg_goldstein: f64,
}

#[derive(Default)]
struct Accumulator {
    counts: TypeCounts,
    scores: Vec<f64>,
}

/// Builds the location x type matrix.
///
/// An event contributes to every location it lists. A score of exactly 0 is
/// treated as "no score" and left out of the average, so a genuine neutral
/// score and a missing one look the same here.
///
/// Rows are sorted by `total`, descending; equal totals keep the order in
/// which the locations were first seen.
pub fn location_matrix(events: &[ProcessedEvent]) -> Vec<LocationStats> {
    let mut order: Vec<String> = Vec::new();
    let mut by_location: HashMap<String, Accumulator> = HashMap::new();

    for event in events {
        let known_type = event.known_type();
        for location in &event.locations {
            let acc = by_location.entry(location.clone()).or_insert_with(|| {
                order.push(location.clone());
                Accumulator::default()
            });
            if let Some(event_type) = known_type {
                acc.counts.increment(event_type);
            }
            if event.parsed_score != 0.0 {
                acc.scores.push(event.parsed_score);
            }
        }
    }

    let mut rows: Vec<LocationStats> = order
        .into_iter()
        .filter_map(|location| {
            let acc = by_location.remove(&location)?;
            let avg_goldstein = if acc.scores.is_empty() {
                0.0
            } else {
                acc.scores.iter().sum::<f64>() / acc.scores.len() as f64
            };
            Some(LocationStats {
                total: acc.counts.total(),
                counts: acc.counts,
                avg_goldstein,
                location,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

impl LocationStats {
    pub fn count(&self, event_type: EventType) -> usize {
        self.counts.get(event_type)
    }
}
