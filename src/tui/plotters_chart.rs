//! Plotters-powered chart widgets for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart`/`BarChart` widgets?
//! - nicer axis + mesh rendering
//! - bars can go below zero (Ratatui's `BarChart` only takes `u64`)
//! - less manual work for ticks/labels
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
// `ratatui::style::Color` below shadows the prelude's trait of the same name.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::month_name;

/// One line per year, high-contrast first.
const YEAR_COLORS: [RGBColor; 6] = [
    RGBColor(0, 255, 255),
    RGBColor(255, 255, 0),
    RGBColor(255, 0, 255),
    RGBColor(0, 255, 0),
    RGBColor(255, 128, 0),
    RGBColor(128, 128, 255),
];

const PROFIT_COLOR: RGBColor = RGBColor(0, 200, 0);
const LOSS_COLOR: RGBColor = RGBColor(255, 0, 0);

/// Monthly sales, x = month number (1–12), one series per year.
pub struct TrendChart<'a> {
    pub series: &'a [(i32, Vec<(f64, f64)>)],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) {
            return;
        }
        let [y0, y1] = self.y_bounds;
        if !valid_bounds(y0, y1) {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(0.5f64..12.5f64, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(12)
                .y_labels(5)
                .x_label_formatter(&|v| short_month(*v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(WHITE)
                .draw()?;

            for (i, (_, points)) in self.series.iter().enumerate() {
                let color = YEAR_COLORS[i % YEAR_COLORS.len()];
                chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Category profit as vertical bars around a zero baseline.
pub struct ProfitChart<'a> {
    pub bars: &'a [(String, f64)],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for ProfitChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) {
            return;
        }
        let [y0, y1] = self.y_bounds;
        if !valid_bounds(y0, y1) || self.bars.is_empty() {
            return;
        }
        let n = self.bars.len() as f64;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(-0.5f64..(n - 0.5), y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(self.bars.len())
                .y_labels(5)
                .x_label_formatter(&|v| bar_label(self.bars, *v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(WHITE)
                .draw()?;

            chart.draw_series(self.bars.iter().enumerate().map(|(i, (_, profit))| {
                let x = i as f64;
                let color = if *profit < 0.0 { LOSS_COLOR } else { PROFIT_COLOR };
                Rectangle::new([(x - 0.3, 0.0), (x + 0.3, *profit)], color.filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn too_small(area: Rect, buf: &mut Buffer) -> bool {
    // Plotters may fail to build a chart in a tiny area; show a hint instead.
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}

fn valid_bounds(lo: f64, hi: f64) -> bool {
    lo.is_finite() && hi.is_finite() && hi > lo
}

fn short_month(v: f64) -> String {
    let name = month_name(v.round().clamp(0.0, 13.0) as u32);
    name.chars().take(3).collect()
}

fn bar_label(bars: &[(String, f64)], v: f64) -> String {
    let idx = v.round();
    if idx < 0.0 || (v - idx).abs() > 0.25 {
        return String::new();
    }
    bars.get(idx as usize)
        .map(|(name, _)| name.chars().take(12).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_ticks_are_abbreviated() {
        assert_eq!(short_month(1.0), "Jan");
        assert_eq!(short_month(9.04), "Sep");
        assert_eq!(short_month(0.5), "Jan");
        assert_eq!(short_month(12.5), "");
    }

    #[test]
    fn bar_labels_only_on_bar_centers() {
        let bars = vec![
            ("Technology".to_string(), 10.0),
            ("Office Supplies".to_string(), -2.0),
        ];
        assert_eq!(bar_label(&bars, 0.0), "Technology");
        assert_eq!(bar_label(&bars, 1.02), "Office Suppl");
        assert_eq!(bar_label(&bars, 0.5), "");
        assert_eq!(bar_label(&bars, 2.0), "");
        assert_eq!(bar_label(&bars, -0.5), "");
    }
}
