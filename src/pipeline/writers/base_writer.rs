use crate::data_model::FlatRow;
use crate::error::Result;

/// Trait for writing batches of flat rows to an output sink (e.g. file).
pub trait BaseWriter {
    /// Write a batch of rows to the sink.
    fn write_rows(&mut self, rows: &[FlatRow]) -> Result<()>;

    /// Finalize and close the output writer.
    fn close(self) -> Result<()>;
}
