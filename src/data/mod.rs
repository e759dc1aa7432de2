//! Data sources other than the user's file.

pub mod sample;

pub use sample::{SampleConfig, generate_rows, write_sample};
