// src/pipeline/mod.rs

pub mod aggregators;
pub mod filters;
pub mod normalizer;
pub mod preprocessor;
pub mod readers;
pub mod search;
pub mod writers;

pub use normalizer::{RowNormalizer, RowRejection};
pub use preprocessor::RowPreprocessor;

#[cfg(test)]
pub(crate) mod test_utils;
