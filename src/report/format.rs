//! Formatted terminal output for the static report.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (snapshot tests below)

use crate::domain::{Analysis, CategoryFilter};

pub const NO_DATA_MESSAGE: &str = "No data for the selected category.";

/// Title used for the filter in headings (`All` reads as "all categories").
pub fn filter_title(filter: &CategoryFilter) -> String {
    match filter {
        CategoryFilter::All => "all categories".to_string(),
        CategoryFilter::Category(c) => c.clone(),
    }
}

/// Headline metrics block.
pub fn format_summary(analysis: &Analysis, source: &str) -> String {
    let mut out = String::new();
    out.push_str("=== Superstore Sales Report ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!("Category: {}\n", filter_title(&analysis.filter)));
    out.push_str(&format!("Line items: {}\n", fmt_count(analysis.rows)));
    out.push('\n');
    out.push_str(&format!("Total profit: {}\n", fmt_money(analysis.metrics.total_profit)));
    out.push_str(&format!("Total sales : {}\n", fmt_money(analysis.metrics.total_sales)));
    out.push_str(&format!("Orders      : {}\n", fmt_count(analysis.metrics.total_orders)));
    out
}

/// Category profit ranking table.
pub fn format_category_profit(analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Profit by category ({}):\n",
        filter_title(&analysis.filter)
    ));
    if analysis.category_profit.is_empty() {
        out.push_str(NO_DATA_MESSAGE);
        out.push('\n');
        return out;
    }

    out.push_str(&format!("{:<24} {:>16}\n", "category", "profit"));
    out.push_str(&format!("{:-<24} {:-<16}\n", "", ""));
    for row in &analysis.category_profit {
        out.push_str(&format!(
            "{:<24} {:>16}\n",
            truncate(&row.category, 24),
            fmt_money(row.total_profit)
        ));
    }
    out
}

/// Monthly sales trend table.
pub fn format_monthly_sales(analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Monthly sales ({}):\n",
        filter_title(&analysis.filter)
    ));
    if analysis.monthly_sales.is_empty() {
        out.push_str(NO_DATA_MESSAGE);
        out.push('\n');
        return out;
    }

    out.push_str(&format!("{:<6} {:<10} {:>16}\n", "year", "month", "sales"));
    out.push_str(&format!("{:-<6} {:-<10} {:-<16}\n", "", "", ""));
    for row in &analysis.monthly_sales {
        out.push_str(&format!(
            "{:<6} {:<10} {:>16}\n",
            row.year,
            row.month_name,
            fmt_money(row.total_sales)
        ));
    }
    out
}

/// `$1,234.56`, `-$5.00`.
pub fn fmt_money(v: f64) -> String {
    let cents = (v.abs() * 100.0).round() as u64;
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// `12,345`.
pub fn fmt_count(n: usize) -> String {
    group_thousands(n as u64)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prep::filter::apply_filter;
    use crate::prep::fixtures::{SCENARIO, dataset};
    use crate::report::analyze;

    #[test]
    fn money_and_count_formatting() {
        assert_eq!(fmt_money(0.0), "$0.00");
        assert_eq!(fmt_money(1234.5), "$1,234.50");
        assert_eq!(fmt_money(-5.0), "-$5.00");
        assert_eq!(fmt_money(-0.001), "$0.00");
        assert_eq!(fmt_money(2_297_200.8603), "$2,297,200.86");
        assert_eq!(fmt_count(5009), "5,009");
        assert_eq!(fmt_count(999), "999");
    }

    #[test]
    fn tables_snapshot() {
        let ds = dataset(SCENARIO);
        let a = analyze(&apply_filter(&ds, &CategoryFilter::All));

        let expected_profit = concat!(
            "Profit by category (all categories):\n",
            "category                           profit\n",
            "------------------------ ----------------\n",
            "Tech                               $30.00\n",
            "Office                             -$5.00\n",
        );
        assert_eq!(format_category_profit(&a), expected_profit);

        let expected_trend = concat!(
            "Monthly sales (all categories):\n",
            "year   month                 sales\n",
            "------ ---------- ----------------\n",
            "2023   January             $150.00\n",
            "2023   February             $30.00\n",
        );
        assert_eq!(format_monthly_sales(&a), expected_trend);

        let summary = format_summary(&a, "superstore.csv");
        assert!(summary.contains("Total profit: $25.00\n"));
        assert!(summary.contains("Orders      : 2\n"));
    }

    #[test]
    fn empty_subset_prints_no_data() {
        let ds = dataset(SCENARIO);
        let a = analyze(&apply_filter(&ds, &CategoryFilter::Category("Toys".to_string())));
        assert_eq!(
            format_category_profit(&a),
            format!("Profit by category (Toys):\n{NO_DATA_MESSAGE}\n")
        );
        assert!(format_monthly_sales(&a).ends_with(&format!("{NO_DATA_MESSAGE}\n")));
        assert!(format_summary(&a, "x.csv").contains("Total sales : $0.00\n"));
    }
}
