//! ASCII plotting for the static report.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Charts:
//! - monthly sales: one line per year, months on the x axis
//! - category profit: diverging horizontal bars around a zero axis

use std::collections::BTreeMap;

use crate::domain::{Analysis, MonthlySales};
use crate::report::{NO_DATA_MESSAGE, fmt_money};

/// Series markers, assigned to years in ascending order.
const MARKERS: [char; 8] = ['*', 'o', '+', 'x', '#', '@', '%', '&'];
const MONTH_INITIALS: [char; 12] = ['J', 'F', 'M', 'A', 'M', 'J', 'J', 'A', 'S', 'O', 'N', 'D'];

/// Monthly sales as one line per year.
pub fn render_monthly_sales(analysis: &Analysis, width: usize, height: usize) -> String {
    if analysis.monthly_sales.is_empty() {
        return format!("Monthly sales chart: {NO_DATA_MESSAGE}\n");
    }

    let width = width.max(12);
    let height = height.max(5);

    let (y_min, y_max) = sales_range(&analysis.monthly_sales);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut by_year: BTreeMap<i32, Vec<(usize, usize)>> = BTreeMap::new();
    for m in &analysis.monthly_sales {
        let x = map_x(m.month as f64, 1.0, 12.0, width);
        let y = map_y(m.total_sales, y_min, y_max, height);
        by_year.entry(m.year).or_default().push((x, y));
    }

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so the markers of every year stay visible on top.
    for (i, points) in by_year.values().enumerate() {
        let ch = MARKERS[i % MARKERS.len()];
        for pair in points.windows(2) {
            draw_line(&mut grid, pair[0].0, pair[0].1, pair[1].0, pair[1].1, ch);
        }
    }
    for (i, points) in by_year.values().enumerate() {
        let ch = MARKERS[i % MARKERS.len()];
        for &(x, y) in points {
            grid[y][x] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: monthly sales | y=[{}, {}]\n",
        fmt_money(y_min),
        fmt_money(y_max)
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let mut axis = vec![' '; width];
    for (i, initial) in MONTH_INITIALS.iter().enumerate() {
        axis[map_x(i as f64 + 1.0, 1.0, 12.0, width)] = *initial;
    }
    out.push_str(&axis.into_iter().collect::<String>());
    out.push('\n');

    let legend: Vec<String> = by_year
        .keys()
        .enumerate()
        .map(|(i, year)| format!("{} {year}", MARKERS[i % MARKERS.len()]))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join("  ")));

    out
}

/// Category profit as horizontal bars; losses extend left of the axis.
pub fn render_category_profit(analysis: &Analysis, width: usize) -> String {
    if analysis.category_profit.is_empty() {
        return format!("Category profit chart: {NO_DATA_MESSAGE}\n");
    }

    let width = width.max(10);
    let label_width = analysis
        .category_profit
        .iter()
        .map(|c| c.category.chars().count())
        .max()
        .unwrap_or(0);

    let neg_max = analysis
        .category_profit
        .iter()
        .map(|c| (-c.total_profit).max(0.0))
        .fold(0.0, f64::max);
    let pos_max = analysis
        .category_profit
        .iter()
        .map(|c| c.total_profit.max(0.0))
        .fold(0.0, f64::max);

    let span = neg_max + pos_max;
    let neg_cols = if span > 0.0 {
        ((width as f64) * neg_max / span).round() as usize
    } else {
        0
    };
    let pos_cols = width - neg_cols;

    let mut out = String::new();
    for c in &analysis.category_profit {
        let (left, right) = if c.total_profit < 0.0 {
            (bar_len(-c.total_profit, neg_max, neg_cols), 0)
        } else {
            (0, bar_len(c.total_profit, pos_max, pos_cols))
        };
        out.push_str(&format!(
            "{:<label_width$} {}{}|{}{} {}\n",
            c.category,
            " ".repeat(neg_cols - left),
            "#".repeat(left),
            "#".repeat(right),
            " ".repeat(pos_cols - right),
            fmt_money(c.total_profit),
        ));
    }
    out
}

fn bar_len(value: f64, max: f64, cols: usize) -> usize {
    if max <= 0.0 {
        return 0;
    }
    ((cols as f64) * (value / max)).round().clamp(0.0, cols as f64) as usize
}

fn sales_range(months: &[MonthlySales]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for m in months {
        min_y = min_y.min(m.total_sales);
        max_y = max_y.max(m.total_sales);
    }
    if max_y > min_y {
        (min_y, max_y)
    } else {
        // A single distinct value: anchor the axis at zero.
        let lo = min_y.min(0.0);
        let hi = if max_y > lo { max_y } else { lo + 1.0 };
        (lo, hi)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryFilter;
    use crate::prep::filter::apply_filter;
    use crate::prep::fixtures::{SCENARIO, dataset};
    use crate::report::analyze;

    fn scenario() -> Analysis {
        analyze(&apply_filter(&dataset(SCENARIO), &CategoryFilter::All))
    }

    #[test]
    fn monthly_plot_golden_snapshot_small() {
        let txt = render_monthly_sales(&scenario(), 12, 5);
        let expected = concat!(
            "Plot: monthly sales | y=[$24.00, $156.00]\n",
            "*           \n",
            "*           \n",
            " *          \n",
            " *          \n",
            " *          \n",
            "JFMAMJJASOND\n",
            "Legend: * 2023\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn profit_bars_golden_snapshot() {
        let txt = render_category_profit(&scenario(), 14);
        let expected = concat!(
            "Tech     |############ $30.00\n",
            "Office ##|             -$5.00\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn each_year_gets_its_own_marker() {
        let csv = "\
Row ID,Order ID,Order Date,Ship Date,Category,Sales,Profit
1,A,2022-03-01,2022-03-02,Tech,10,1
2,B,2023-03-01,2023-03-02,Tech,20,1
";
        let a = analyze(&apply_filter(&dataset(csv), &CategoryFilter::All));
        let txt = render_monthly_sales(&a, 24, 6);
        assert!(txt.contains('*'));
        assert!(txt.contains('o'));
        assert!(txt.ends_with("Legend: * 2022  o 2023\n"));
    }

    #[test]
    fn empty_analysis_renders_message() {
        let a = analyze(&apply_filter(
            &dataset(SCENARIO),
            &CategoryFilter::Category("Toys".to_string()),
        ));
        assert_eq!(
            render_monthly_sales(&a, 40, 10),
            format!("Monthly sales chart: {NO_DATA_MESSAGE}\n")
        );
        assert_eq!(
            render_category_profit(&a, 40),
            format!("Category profit chart: {NO_DATA_MESSAGE}\n")
        );
    }
}
