//! Normalization of the raw table.
//!
//! Steps, in order:
//! 1. resolve the interpreted columns and parse dates/amounts (fail fast)
//! 2. drop exact duplicate rows, keeping the first occurrence
//! 3. derive the calendar fields from `order_date`
//!
//! Nothing here skips a bad row: a date or amount that does not parse aborts
//! the whole run with the offending line.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{ColumnNames, Dataset, Transaction};
use crate::error::{AppError, DateParseError};
use crate::io::ingest::{RawRow, RawTable};

const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// `%Y` also accepts one- to three-digit years; those are never meant literally.
const MIN_YEAR: i32 = 1000;

/// Build the normalized dataset from a raw table.
pub fn normalize(raw: &RawTable, columns: &ColumnNames) -> Result<Dataset, AppError> {
    let layout = ColumnLayout::resolve(raw, columns)?;

    let parsed = raw
        .rows
        .iter()
        .map(|row| parse_row(row, &layout, columns))
        .collect::<Result<Vec<_>, _>>()?;

    let before = parsed.len();
    let records = dedup_records(parsed);

    if records.len() < before {
        log::info!("Dropped {} duplicate rows", before - records.len());
    }
    log::debug!("Normalized {} records", records.len());

    Ok(Dataset {
        source_columns: raw.headers.clone(),
        passthrough_columns: layout
            .passthrough
            .iter()
            .map(|&idx| raw.headers[idx].clone())
            .collect(),
        records,
    })
}

/// Remove rows identical in every column, keeping the first of each.
///
/// Amounts compare by value (so `-0` equals `0`), dates as dates and every
/// pass-through column as text.
pub fn dedup_records(records: Vec<Transaction>) -> Vec<Transaction> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(records.len());
        records.iter().map(|r| seen.insert(RowKey::of(r))).collect()
    };

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(record, keep)| keep.then_some(record))
        .collect()
}

/// Parse a date in any of the accepted formats.
///
/// Years must have four digits: `1/5/23` is rejected rather than read as year 23.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .filter(|d| d.year() >= MIN_YEAR)
}

#[derive(Hash, PartialEq, Eq)]
struct RowKey<'a> {
    order_id: &'a str,
    order_date: NaiveDate,
    ship_date: NaiveDate,
    category: &'a str,
    sales: u64,
    profit: u64,
    passthrough: &'a [String],
}

impl<'a> RowKey<'a> {
    fn of(r: &'a Transaction) -> Self {
        Self {
            order_id: &r.order_id,
            order_date: r.order_date,
            ship_date: r.ship_date,
            category: &r.category,
            sales: amount_bits(r.sales),
            profit: amount_bits(r.profit),
            passthrough: &r.passthrough,
        }
    }
}

fn amount_bits(v: f64) -> u64 {
    // `-0.0 + 0.0` is `+0.0`.
    (v + 0.0).to_bits()
}

/// Column positions resolved once against the header row.
struct ColumnLayout {
    order_id: usize,
    order_date: usize,
    ship_date: usize,
    category: usize,
    sales: usize,
    profit: usize,
    passthrough: Vec<usize>,
}

impl ColumnLayout {
    fn resolve(raw: &RawTable, columns: &ColumnNames) -> Result<Self, AppError> {
        let find = |name: &str| {
            raw.column_index(name)
                .ok_or_else(|| AppError::MissingColumn(name.to_string()))
        };

        let order_id = find(&columns.order_id)?;
        let order_date = find(&columns.order_date)?;
        let ship_date = find(&columns.ship_date)?;
        let category = find(&columns.category)?;
        let sales = find(&columns.sales)?;
        let profit = find(&columns.profit)?;

        let interpreted = [order_id, order_date, ship_date, category, sales, profit];
        let passthrough = (0..raw.headers.len())
            .filter(|idx| !interpreted.contains(idx))
            .collect();

        Ok(Self {
            order_id,
            order_date,
            ship_date,
            category,
            sales,
            profit,
            passthrough,
        })
    }
}

fn parse_row(row: &RawRow, layout: &ColumnLayout, columns: &ColumnNames) -> Result<Transaction, AppError> {
    let field = |idx: usize| row.fields.get(idx).map(String::as_str).unwrap_or("");

    let date = |idx: usize, column: &str| {
        parse_date(field(idx)).ok_or_else(|| DateParseError {
            line: row.line,
            column: column.to_string(),
            value: field(idx).to_string(),
        })
    };
    let order_date = date(layout.order_date, &columns.order_date)?;
    let ship_date = date(layout.ship_date, &columns.ship_date)?;

    let amount = |idx: usize, column: &str| {
        field(idx)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| AppError::InvalidNumber {
                line: row.line,
                column: column.to_string(),
                value: field(idx).to_string(),
            })
    };
    let sales = amount(layout.sales, &columns.sales)?;
    let profit = amount(layout.profit, &columns.profit)?;

    Ok(Transaction {
        order_id: field(layout.order_id).to_string(),
        order_date,
        ship_date,
        category: field(layout.category).to_string(),
        sales,
        profit,
        order_year: order_date.year(),
        order_month: order_date.month(),
        passthrough: layout
            .passthrough
            .iter()
            .map(|&idx| field(idx).to_string())
            .collect(),
    })
}
