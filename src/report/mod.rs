//! Aggregations over a working subset, plus formatted terminal output.
//!
//! Every function here is total: an empty subset yields empty sequences and
//! zero metrics, never an error. Front-ends rely on that to render a
//! "no data" state through the same path as real results.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::{Analysis, CategoryProfit, MonthlySales, SummaryMetrics, month_name};
use crate::prep::filter::WorkingSubset;

pub mod format;

pub use format::*;

/// Total sales per `(year, month)`, ascending by year then month number.
pub fn monthly_sales_trend(subset: &WorkingSubset<'_>) -> Vec<MonthlySales> {
    // Keyed on the numeric month so ordering never depends on month names.
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for r in subset.iter() {
        *totals.entry((r.order_year, r.order_month)).or_insert(0.0) += r.sales;
    }

    totals
        .into_iter()
        .map(|((year, month), total_sales)| MonthlySales {
            year,
            month_name: month_name(month),
            month,
            total_sales,
        })
        .collect()
}

/// Total profit per category, highest first. Ties keep first-seen order.
pub fn category_profit_ranking(subset: &WorkingSubset<'_>) -> Vec<CategoryProfit> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CategoryProfit> = Vec::new();

    for r in subset.iter() {
        let slot = *index.entry(r.category.as_str()).or_insert_with(|| {
            out.push(CategoryProfit {
                category: r.category.clone(),
                total_profit: 0.0,
            });
            out.len() - 1
        });
        out[slot].total_profit += r.profit;
    }

    // `sort_by` is stable.
    out.sort_by(|a, b| b.total_profit.total_cmp(&a.total_profit));
    out
}

/// Total profit, total sales and distinct order count.
pub fn summary_metrics(subset: &WorkingSubset<'_>) -> SummaryMetrics {
    let mut orders = HashSet::new();
    let mut metrics = SummaryMetrics::default();
    for r in subset.iter() {
        metrics.total_profit += r.profit;
        metrics.total_sales += r.sales;
        orders.insert(r.order_id.as_str());
    }
    metrics.total_orders = orders.len();
    metrics
}

/// Run every aggregation for one subset.
pub fn analyze(subset: &WorkingSubset<'_>) -> Analysis {
    Analysis {
        filter: subset.filter.clone(),
        rows: subset.len(),
        metrics: summary_metrics(subset),
        monthly_sales: monthly_sales_trend(subset),
        category_profit: category_profit_ranking(subset),
    }
}
