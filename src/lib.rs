//! `superstore-dash` library crate.
//!
//! The binary (`superstore`) is a thin wrapper around this library so that:
//!
//! - the load → normalize → filter → aggregate pipeline is testable without a terminal
//! - the report and the dashboard share one implementation of it
//! - presentation code never touches raw tables

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod prep;
pub mod report;
pub mod tui;
