// Utils

pub mod dates;
pub mod text;

pub use dates::{parse_lenient, week_key};
pub use text::{contains_query, is_placeholder_title, parse_score};
