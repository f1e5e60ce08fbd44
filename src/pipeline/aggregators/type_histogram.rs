use crate::data_model::{EventType, ProcessedEvent};

use serde::{Deserialize, Serialize};

/// Event count per known type. All four are always present, possibly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    #[serde(rename = "ECON")]
    pub econ: usize,
    #[serde(rename = "SEC")]
    pub sec: usize,
    #[serde(rename = "DIP")]
    pub dip: usize,
    #[serde(rename = "INFO")]
    pub info: usize,
}

impl TypeCounts {
    pub fn get(&self, event_type: EventType) -> usize {
        match event_type {
            EventType::Econ => self.econ,
            EventType::Sec => self.sec,
            EventType::Dip => self.dip,
            EventType::Info => self.info,
        }
    }

    pub fn increment(&mut self, event_type: EventType) {
        match event_type {
            EventType::Econ => self.econ += 1,
            EventType::Sec => self.sec += 1,
            EventType::Dip => self.dip += 1,
            EventType::Info => self.info += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.econ + self.sec + self.dip + self.info
    }

    /// `(type, count)` in ECON, SEC, DIP, INFO order.
    pub fn iter(&self) -> impl Iterator<Item = (EventType, usize)> + '_ {
        EventType::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}

/// Counts events per known type. Unknown type codes are skipped.
pub fn type_histogram(events: &[ProcessedEvent]) -> TypeCounts {
    let mut counts = TypeCounts::default();
    for event_type in events.iter().filter_map(ProcessedEvent::known_type) {
        counts.increment(event_type);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_utils::processed;

    #[test]
    fn test_all_four_types_present_when_empty() {
        let counts = type_histogram(&[]);
        assert_eq!(counts, TypeCounts::default());
        assert_eq!(counts.iter().count(), 4);
    }

    #[test]
    fn test_counts_known_types_and_skips_unknown() {
        let events = vec![
            processed(0, "2025-06-01", "ECON", "a", "GH"),
            processed(1, "2025-06-01", "ECON", "b", "GH"),
            processed(2, "2025-06-01", "DIP", "c", "GH"),
            processed(3, "2025-06-01", "MIL", "d", "GH"),
            processed(4, "2025-06-01", "info", "e", "GH"),
        ];
        let counts = type_histogram(&events);
        assert_eq!(counts.get(EventType::Econ), 2);
        assert_eq!(counts.get(EventType::Dip), 1);
        assert_eq!(counts.get(EventType::Sec), 0);
        assert_eq!(counts.get(EventType::Info), 0);
        assert!(counts.total() <= events.len());
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_serializes_with_type_codes() {
        let counts = TypeCounts {
            econ: 1,
            ..TypeCounts::default()
        };
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["ECON"], 1);
        assert_eq!(json["INFO"], 0);
    }
}
