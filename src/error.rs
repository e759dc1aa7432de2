//! Error taxonomy for the pipeline and the binary.
//!
//! Ingestion and parse failures are fatal and carry an exit code so `main`
//! can report them the same way regardless of which front-end hit them.
//! An empty working subset is *not* an error and never shows up here.

use std::path::PathBuf;

use thiserror::Error;

use crate::io::ingest::TextEncoding;

/// The source file could not be read, decoded, or split into records.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Failed to decode '{}': invalid {primary} byte at offset {primary_offset}, \
         invalid {fallback} byte at offset {fallback_offset}",
        path.display()
    )]
    Undecodable {
        path: PathBuf,
        primary: TextEncoding,
        primary_offset: usize,
        fallback: TextEncoding,
        fallback_offset: usize,
    },

    #[error("Malformed CSV in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A date field that none of the accepted formats could parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: cannot parse `{column}` value '{value}' as a date")]
pub struct DateParseError {
    pub line: u64,
    pub column: String,
    pub value: String,
}

/// Top-level error returned by the pipeline and the front-ends.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    DateParse(#[from] DateParseError),

    #[error("Missing required column: `{0}`")]
    MissingColumn(String),

    #[error("Line {line}: cannot parse `{column}` value '{value}' as a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    /// Terminal or stdout failure in a front-end.
    #[error("{0}")]
    Output(String),
}

impl AppError {
    pub fn output(message: impl Into<String>) -> Self {
        AppError::Output(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Ingestion(_) | AppError::MissingColumn(_) => 2,
            AppError::DateParse(_) | AppError::InvalidNumber { .. } => 3,
            AppError::Output(_) => 4,
        }
    }
}
