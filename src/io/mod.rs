//! File adapters at the edges of the pipeline.

pub mod reader;
pub mod writer;

pub use reader::{parse_timestamp, read_observations};
pub use writer::write_forecast;
