//! Input helpers.
//!
//! - raw CSV ingest with encoding fallback (`ingest`)

pub mod ingest;

pub use ingest::*;
