#![allow(non_snake_case)]

pub mod config;
pub mod dashboard;
pub mod data_model;
pub mod error;
pub mod executor;
pub mod loader;
pub mod pipeline;
pub mod source;
pub mod utils;

pub use dashboard::{Dashboard, DashboardView, Dataset, LoadState};
pub use error::{LensError, Result};
