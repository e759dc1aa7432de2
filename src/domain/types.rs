//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - produced by the normalizer and shared read-only with every front-end
//! - filtered and aggregated without copying records
//! - emitted as JSON by `superstore report --format json`

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{Month, NaiveDate};
use serde::Serialize;

/// Names of the columns the pipeline interprets. Everything else passes through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnNames {
    pub order_id: String,
    pub order_date: String,
    pub ship_date: String,
    pub category: String,
    pub sales: String,
    pub profit: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            order_id: "Order ID".to_string(),
            order_date: "Order Date".to_string(),
            ship_date: "Ship Date".to_string(),
            category: "Category".to_string(),
            sales: "Sales".to_string(),
            profit: "Profit".to_string(),
        }
    }
}

/// Headers of the columns added by normalization, in output order.
pub const DERIVED_COLUMNS: [&str; 3] = ["Order Year", "Order Month", "Order Month Name"];

/// English calendar name for a month number (1–12); empty for anything else.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// One normalized line item.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub category: String,
    pub sales: f64,
    pub profit: f64,
    pub order_year: i32,
    pub order_month: u32,
    /// Values of the uninterpreted columns, aligned with `Dataset::passthrough_columns`.
    pub passthrough: Vec<String>,
}

impl Transaction {
    /// Always derived from `order_month`, so the two can never disagree.
    pub fn order_month_name(&self) -> &'static str {
        month_name(self.order_month)
    }
}

/// The normalized, deduplicated dataset. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Header row of the source file, in source order.
    pub source_columns: Vec<String>,
    /// The subset of `source_columns` that are not interpreted.
    pub passthrough_columns: Vec<String>,
    pub records: Vec<Transaction>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source columns followed by the derived calendar columns.
    pub fn column_names(&self) -> Vec<String> {
        self.source_columns
            .iter()
            .cloned()
            .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.category.as_str()))
            .map(|r| r.category.clone())
            .collect()
    }
}

/// Equality predicate on `category`, or the "select everything" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub const ALL_LABEL: &'static str = "All";

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(want) => want == category,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategoryFilter::All)
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::ALL_LABEL) {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(Self::ALL_LABEL),
            CategoryFilter::Category(c) => f.write_str(c),
        }
    }
}

/// Total sales for one calendar month of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month_name: &'static str,
    pub month: u32,
    pub total_sales: f64,
}

/// Total profit for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProfit {
    pub category: String,
    pub total_profit: f64,
}

/// Headline numbers over a working subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_profit: f64,
    pub total_sales: f64,
    /// Distinct order ids, not line items.
    pub total_orders: usize,
}

/// Everything a front-end may render for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub filter: CategoryFilter,
    /// Line items in the working subset.
    pub rows: usize,
    pub metrics: SummaryMetrics,
    pub monthly_sales: Vec<MonthlySales>,
    pub category_profit: Vec<CategoryProfit>,
}

impl Analysis {
    /// The "no data to display" state. Not an error.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_cover_the_calendar() {
        let expected = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        for (i, name) in expected.iter().enumerate() {
            assert_eq!(month_name(i as u32 + 1), *name);
        }
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn filter_parses_all_sentinel_case_insensitively() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Technology".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Category("Technology".to_string())
        );
        assert_eq!(CategoryFilter::All.to_string(), "All");
    }

    #[test]
    fn category_match_is_exact() {
        let filter = CategoryFilter::Category("Technology".to_string());
        assert!(filter.matches("Technology"));
        assert!(!filter.matches("technology"));
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn analysis_serializes_to_json() {
        let analysis = Analysis {
            filter: CategoryFilter::All,
            rows: 3,
            metrics: SummaryMetrics {
                total_profit: 25.0,
                total_sales: 180.0,
                total_orders: 2,
            },
            monthly_sales: vec![MonthlySales {
                year: 2023,
                month_name: month_name(1),
                month: 1,
                total_sales: 150.0,
            }],
            category_profit: vec![CategoryProfit {
                category: "Tech".to_string(),
                total_profit: 30.0,
            }],
        };

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["rows"], 3);
        assert_eq!(json["metrics"]["total_orders"], 2);
        assert_eq!(json["monthly_sales"][0]["month_name"], "January");
        assert_eq!(json["category_profit"][0]["category"], "Tech");
    }
}
