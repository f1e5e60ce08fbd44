use crate::config::DataConfig;
use crate::data_model::{EventField, ProcessedEvent, RawRow};
use crate::error::Result;
use crate::pipeline::{RowNormalizer, RowPreprocessor, RowRejection};

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Counts from one pass of the load pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rejected rows per missing required field.
    pub rejected: BTreeMap<EventField, usize>,
}

impl LoadReport {
    pub fn rows_rejected(&self) -> usize {
        self.rejected.values().sum()
    }

    fn record_rejection(&mut self, rejection: RowRejection) {
        match rejection {
            RowRejection::MissingField(field) => *self.rejected.entry(field).or_insert(0) += 1,
        }
    }
}

/// Runs raw rows through the normalizer and preprocessor, once, at load time.
///
/// Rejected rows are counted and dropped. A row-source error aborts the whole
/// run so that no partial dataset is ever produced.
#[derive(Debug, Clone)]
pub struct LoadExecutor {
    normalizer: RowNormalizer,
    preprocessor: RowPreprocessor,
}

impl LoadExecutor {
    pub fn new(config: &DataConfig) -> Self {
        LoadExecutor {
            normalizer: RowNormalizer::new(config),
            preprocessor: RowPreprocessor::new(config),
        }
    }

    /// Row ids are assigned densely in kept order, starting at 0.
    pub fn run<I>(&self, rows: I) -> Result<(Vec<ProcessedEvent>, LoadReport)>
    where
        I: IntoIterator<Item = Result<RawRow>>,
    {
        let mut report = LoadReport::default();
        let mut events = Vec::new();

        for row in rows {
            let row = row?;
            report.rows_read += 1;
            match self.normalizer.normalize(&row) {
                Ok(event) => {
                    let row_id = events.len();
                    events.push(self.preprocessor.process(row_id, event));
                }
                Err(rejection) => {
                    debug!(row = report.rows_read, reason = %rejection, "Row rejected");
                    report.record_rejection(rejection);
                }
            }
        }
        report.rows_kept = events.len();

        if report.rows_rejected() > 0 {
            warn!(
                rejected = report.rows_rejected(),
                by_field = ?report.rejected,
                "Rows dropped for missing required fields"
            );
        }
        info!(
            rows_read = report.rows_read,
            rows_kept = report.rows_kept,
            "Load pipeline finished"
        );
        Ok((events, report))
    }
}
