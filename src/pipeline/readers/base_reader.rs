use crate::data_model::RawRow;
use crate::error::Result;

/// Trait for sources that yield raw, header-keyed rows.
pub trait BaseReader {
    fn read_rows(self) -> Result<Box<dyn Iterator<Item = Result<RawRow>>>>;
}
