//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the normalized record and dataset (`Transaction`, `Dataset`)
//! - the filter selection (`CategoryFilter`)
//! - aggregation outputs (`MonthlySales`, `CategoryProfit`, `SummaryMetrics`, `Analysis`)

pub mod types;

pub use types::*;
