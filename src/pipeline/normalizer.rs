// src/pipeline/normalizer.rs

use crate::config::{ColumnMapping, DataConfig};
use crate::data_model::{Event, EventField, RawRow};

use std::collections::HashMap;
use std::fmt;

/// Why a raw row did not make it into the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    /// A required field was absent, empty or whitespace-only.
    MissingField(EventField),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::MissingField(field) => write!(f, "missing required field '{}'", field),
        }
    }
}

/// Turns parser rows into canonical [`Event`]s through the configured column mapping.
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    mapping: ColumnMapping,
    required: Vec<EventField>,
}

impl RowNormalizer {
    pub fn new(config: &DataConfig) -> Self {
        RowNormalizer {
            mapping: config.column_mapping.clone(),
            required: config.validation.required_fields.clone(),
        }
    }

    /// Keys are matched after trimming; values are copied verbatim. Columns the row
    /// lacks become empty strings.
    pub fn normalize(&self, raw: &RawRow) -> Result<Event, RowRejection> {
        let mut cells: HashMap<&str, &str> = HashMap::with_capacity(raw.len());
        for (key, value) in raw.iter() {
            cells.insert(key.trim(), value);
        }

        let lookup = |field: EventField| {
            let column = self.mapping.column(field).trim();
            if column.is_empty() {
                None
            } else {
                cells.get(column).copied()
            }
        };

        if let Some(missing) = self
            .required
            .iter()
            .find(|field| lookup(**field).map_or(true, |v| v.trim().is_empty()))
        {
            return Err(RowRejection::MissingField(*missing));
        }

        let mut event = Event::default();
        for field in EventField::ALL {
            if let Some(value) = lookup(field) {
                event.set(field, value.to_string());
            }
        }
        Ok(event)
    }
}
