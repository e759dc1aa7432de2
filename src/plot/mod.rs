//! Terminal plotting for the static report.

pub mod ascii;

pub use ascii::*;
