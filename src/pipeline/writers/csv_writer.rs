use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use tracing::debug;

use crate::data_model::FlatRow;
use crate::error::{LensError, Result};
use crate::pipeline::writers::BaseWriter;

/// Writes flat rows as CSV under a fixed header.
///
/// Cells are looked up by header name, so rows may list their keys in any order.
/// A key the row lacks is written as an empty cell. The header is written even
/// when no rows follow.
pub struct CsvWriter<W: Write> {
    headers: Vec<String>,
    writer: Option<Writer<W>>,
    rows_written: usize,
}

impl CsvWriter<File> {
    pub fn create(path: impl AsRef<Path>, headers: Vec<String>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        CsvWriter::from_writer(file, headers)
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn from_writer(inner: W, headers: Vec<String>) -> Result<Self> {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record(&headers)?;
        Ok(CsvWriter {
            headers,
            writer: Some(writer),
            rows_written: 0,
        })
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and hands back the underlying sink.
    pub fn into_inner(mut self) -> Result<W> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| LensError::Unexpected("CSV writer already closed".to_string()))?;
        writer
            .into_inner()
            .map_err(|e| LensError::Unexpected(format!("Failed to flush CSV output: {}", e)))
    }
}

impl<W: Write> BaseWriter for CsvWriter<W> {
    fn write_rows(&mut self, rows: &[FlatRow]) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LensError::Unexpected("CSV writer already closed".to_string()))?;
        for row in rows {
            let record = self.headers.iter().map(|h| row.get(h).unwrap_or(""));
            writer.write_record(record)?;
        }
        self.rows_written += rows.len();
        debug!(batch = rows.len(), total = self.rows_written, "Wrote CSV rows");
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
