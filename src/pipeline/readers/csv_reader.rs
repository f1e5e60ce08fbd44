// src/pipeline/readers/csv_reader.rs

use crate::data_model::RawRow;
use crate::error::{LensError, Result};
use crate::pipeline::readers::BaseReader;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

/// Reads header-keyed rows out of an in-memory CSV document.
///
/// Keys are the header cells exactly as written (padding included); trimming
/// is the normalizer's job. Short rows simply lack the trailing keys and cells
/// beyond the header are ignored. Blank lines are skipped.
#[derive(Debug, Clone)]
pub struct CsvReader {
    payload: String,
}

impl CsvReader {
    pub fn new(payload: impl Into<String>) -> Self {
        CsvReader {
            payload: payload.into(),
        }
    }

    /// Reads every row or fails on the first malformed record.
    #[cfg(test)]
    pub fn read_all(self) -> Result<Vec<RawRow>> {
        self.read_rows()?.collect()
    }
}

impl BaseReader for CsvReader {
    fn read_rows(self) -> Result<Box<dyn Iterator<Item = Result<RawRow>>>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(std::io::Cursor::new(self.payload.into_bytes()));

        let headers: StringRecord = reader.headers()?.clone();
        if headers.is_empty() {
            return Err(LensError::Unexpected(
                "CSV document has no header row".to_string(),
            ));
        }
        debug!(columns = headers.len(), "Read CSV header");

        let iterator = reader
            .into_records()
            .map(move |record_result| -> Result<RawRow> {
                let record = record_result?;
                Ok(headers
                    .iter()
                    .zip(record.iter())
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect::<RawRow>())
            });

        Ok(Box::new(iterator))
    }
}
