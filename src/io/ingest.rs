//! Raw CSV ingest.
//!
//! This module turns the bytes of the source file into a `RawTable`: a header
//! row plus text records, nothing more. Field-level semantics (dates, numbers,
//! required columns) are the normalizer's job.
//!
//! Decoding is strict: the primary encoding is tried first and, only if it
//! hits an invalid byte, the fallback encoding is tried once.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;

use crate::error::IngestionError;

/// Bytes that have no mapping in Windows-1252.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Text encodings the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TextEncoding {
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    /// ISO-8859-1. Every byte is valid, so decoding never fails.
    #[value(name = "latin-1", alias = "latin1")]
    Latin1,
    #[value(name = "windows-1252", alias = "cp1252")]
    Windows1252,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Strictly decode `bytes`; on failure returns the offset of the first invalid byte.
    pub fn decode(self, bytes: &[u8]) -> Result<String, usize> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| e.valid_up_to()),
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Windows1252 => {
                if let Some(offset) = bytes.iter().position(|b| CP1252_UNDEFINED.contains(b)) {
                    return Err(offset);
                }
                let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                Ok(text.into_owned())
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How to read the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    pub primary: TextEncoding,
    pub fallback: TextEncoding,
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            primary: TextEncoding::Utf8,
            fallback: TextEncoding::Windows1252,
            delimiter: b',',
        }
    }
}

/// Successfully decoded text plus the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Both encodings rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeFailure {
    pub primary_offset: usize,
    pub fallback_offset: usize,
}

/// One data record, with the 1-based line it started on in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub fields: Vec<String>,
}

/// The source file as text: headers plus records, uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub encoding: TextEncoding,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read and decode `path` into a `RawTable`.
pub fn load_raw_table(path: &Path, options: &LoadOptions) -> Result<RawTable, IngestionError> {
    let bytes = std::fs::read(path).map_err(|source| IngestionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = decode_text(&bytes, options).map_err(|failure| IngestionError::Undecodable {
        path: path.to_path_buf(),
        primary: options.primary,
        primary_offset: failure.primary_offset,
        fallback: options.fallback,
        fallback_offset: failure.fallback_offset,
    })?;

    if decoded.encoding != options.primary {
        log::warn!(
            "'{}' is not valid {}; decoded as {}",
            path.display(),
            options.primary,
            decoded.encoding
        );
    }

    let table = parse_raw_table(&decoded.text, options.delimiter, decoded.encoding).map_err(|source| {
        IngestionError::Csv {
            path: path.to_path_buf(),
            source,
        }
    })?;

    log::info!(
        "Read {} rows x {} columns from '{}' ({})",
        table.len(),
        table.headers.len(),
        path.display(),
        table.encoding
    );
    Ok(table)
}

/// Decode with the primary encoding, retrying once with the fallback.
pub fn decode_text(bytes: &[u8], options: &LoadOptions) -> Result<Decoded, DecodeFailure> {
    let primary_offset = match options.primary.decode(bytes) {
        Ok(text) => {
            return Ok(Decoded {
                text,
                encoding: options.primary,
            });
        }
        Err(offset) => offset,
    };

    log::debug!(
        "{} decode failed at byte {primary_offset}; retrying with {}",
        options.primary,
        options.fallback
    );

    options
        .fallback
        .decode(bytes)
        .map(|text| Decoded {
            text,
            encoding: options.fallback,
        })
        .map_err(|fallback_offset| DecodeFailure {
            primary_offset,
            fallback_offset,
        })
}

/// Split decoded text into headers and records.
pub fn parse_raw_table(text: &str, delimiter: u8, encoding: TextEncoding) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(normalize_header_name)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(RawRow {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(RawTable {
        headers,
        rows,
        encoding,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM; without
    // stripping it, `Row ID` would never match.
    name.trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn utf8_input_uses_primary_encoding() {
        let decoded = decode_text("Category\nCafé\n".as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert_eq!(decoded.text, "Category\nCafé\n");
    }

    #[test]
    fn cp1252_bytes_fall_back() {
        // 0x93/0x94 are curly quotes and 0xE9 is 'é' in Windows-1252.
        let bytes = b"Order ID,Category\nA1,Caf\xe9 \x93Deluxe\x94\n";
        let decoded = decode_text(bytes, &LoadOptions::default()).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Windows1252);
        assert_eq!(decoded.text, "Order ID,Category\nA1,Café \u{201c}Deluxe\u{201d}\n");
    }

    #[test]
    fn undecodable_bytes_report_both_offsets() {
        let bytes = b"ab\xe9c\x81";
        let failure = decode_text(bytes, &LoadOptions::default()).unwrap_err();
        assert_eq!(
            failure,
            DecodeFailure {
                primary_offset: 2,
                fallback_offset: 4,
            }
        );
    }

    #[test]
    fn latin1_never_fails() {
        let text = TextEncoding::Latin1.decode(b"\x81\xe9").unwrap();
        assert_eq!(text, "\u{81}é");
    }

    #[test]
    fn parse_strips_bom_and_tracks_lines() {
        let table = parse_raw_table(
            "\u{feff}Row ID,Category\n1,Furniture\n2,Technology\n",
            b',',
            TextEncoding::Utf8,
        )
        .unwrap();
        assert_eq!(table.headers, vec!["Row ID", "Category"]);
        assert_eq!(table.column_index("Row ID"), Some(0));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].fields, vec!["2", "Technology"]);
    }

    #[test]
    fn semicolon_delimiter_is_honored() {
        let table = parse_raw_table("a;b\n1;2\n", b';', TextEncoding::Utf8).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0].fields, vec!["1", "2"]);
    }

    #[test]
    fn load_reads_cp1252_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Order ID,Product Name\nCA-1,Eldon \x93Base\x94\n").unwrap();

        let table = load_raw_table(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(table.encoding, TextEncoding::Windows1252);
        assert_eq!(table.rows[0].fields[1], "Eldon \u{201c}Base\u{201d}");
    }

    #[test]
    fn ragged_rows_are_ingestion_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a,b\n1,2\n3\n").unwrap();

        let err = load_raw_table(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::Csv { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_raw_table(&dir.path().join("nope.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::Io { .. }));
    }

    #[test]
    fn undecodable_file_names_both_encodings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\n\x81\n").unwrap();

        let err = load_raw_table(file.path(), &LoadOptions::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid utf-8 byte at offset 2"), "{msg}");
        assert!(msg.contains("invalid windows-1252 byte at offset 2"), "{msg}");
    }
}
