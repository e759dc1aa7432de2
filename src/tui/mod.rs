//! Ratatui-based dashboard.
//!
//! A category selector on the left, metric cards and two charts on the right.
//! Every selection change goes back through the shared pipeline, which hands
//! out the cached dataset instead of re-reading the file.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::cache::DatasetCache;
use crate::app::pipeline::{self, RunOutput, SourceConfig};
use crate::domain::{Analysis, CategoryFilter};
use crate::error::AppError;
use crate::report::{NO_DATA_MESSAGE, filter_title, fmt_count, fmt_money};

mod plotters_chart;

use plotters_chart::{ProfitChart, TrendChart};

/// Start the dashboard with `initial` selected.
pub fn run(source: SourceConfig, initial: CategoryFilter) -> Result<(), AppError> {
    // Load before taking over the terminal so ingestion errors print normally.
    let mut cache = DatasetCache::new();
    let first = pipeline::run(&mut cache, &source, &initial)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::output(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(source, cache, first, initial);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::output(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::output(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    source: SourceConfig,
    cache: DatasetCache,
    run: RunOutput,
    choices: Vec<CategoryFilter>,
    selected: usize,
    status: String,
}

impl App {
    fn new(source: SourceConfig, cache: DatasetCache, run: RunOutput, initial: CategoryFilter) -> Self {
        let (choices, selected) = selector_entries(&run.choices, &initial);
        let status = if run.analysis.is_empty() && !initial.is_all() {
            format!("'{initial}' does not occur in this dataset")
        } else {
            format!("{} transactions loaded", fmt_count(run.dataset.len()))
        };
        Self {
            source,
            cache,
            run,
            choices,
            selected,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::output(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::output(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::output(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.select(self.selected - 1);
                }
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                if self.selected + 1 < self.choices.len() {
                    self.select(self.selected + 1);
                }
            }
            KeyCode::Home => self.select(0),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn select(&mut self, idx: usize) {
        self.selected = idx;
        let filter = self.choices[idx].clone();
        match pipeline::run(&mut self.cache, &self.source, &filter) {
            Ok(run) => {
                self.status = format!("{}: {} rows", filter_title(&filter), fmt_count(run.analysis.rows));
                self.run = run;
            }
            Err(err) => {
                log::error!("{err}");
                self.status = err.to_string();
            }
        }
    }

    /// Drop the cached dataset and read the file again.
    fn reload(&mut self) {
        self.cache = DatasetCache::new();
        let current = self.choices[self.selected].clone();
        match pipeline::run(&mut self.cache, &self.source, &current) {
            Ok(run) => {
                let (choices, selected) = selector_entries(&run.choices, &current);
                self.choices = choices;
                self.selected = selected;
                self.status = format!("Reloaded {} transactions", fmt_count(run.dataset.len()));
                self.run = run;
            }
            Err(err) => {
                // Keep showing the previous analysis.
                log::error!("{err}");
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let analysis = &self.run.analysis;
        let lines = vec![
            Line::from(vec![
                Span::styled("superstore", Style::default().fg(Color::Cyan)),
                Span::raw(" sales dashboard"),
            ]),
            Line::from(Span::styled(
                format!(
                    "file: {} | {} | {} of {} rows",
                    self.source.path.display(),
                    filter_title(&analysis.filter),
                    fmt_count(analysis.rows),
                    fmt_count(self.run.dataset.len()),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(0)])
            .split(area);

        self.draw_selector(frame, columns[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(45),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        draw_metrics(frame, rows[0], &self.run.analysis);
        draw_profit_chart(frame, rows[1], &self.run.analysis);
        draw_trend_chart(frame, rows[2], &self.run.analysis);
    }

    fn draw_selector(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .choices
            .iter()
            .map(|c| ListItem::new(c.to_string()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Category").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ category  Home all  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_metrics(frame: &mut ratatui::Frame<'_>, area: Rect, analysis: &Analysis) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let m = analysis.metrics;
    let profit_color = if m.total_profit < 0.0 { Color::Red } else { Color::Green };
    let values = [
        ("Total Profit", fmt_money(m.total_profit), profit_color),
        ("Total Sales", fmt_money(m.total_sales), Color::Cyan),
        ("Total Orders", fmt_count(m.total_orders), Color::White),
    ];

    for ((title, value, color), rect) in values.into_iter().zip(cards.iter()) {
        let p = Paragraph::new(value)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, *rect);
    }
}

fn draw_profit_chart(frame: &mut ratatui::Frame<'_>, area: Rect, analysis: &Analysis) {
    let Some(inner) = chart_frame(frame, area, "Profit by Category", analysis) else {
        return;
    };
    let bars = profit_bars(analysis);
    let y_bounds = padded_bounds(bars.iter().map(|(_, v)| *v), true);
    frame.render_widget(ProfitChart { bars: &bars, y_bounds }, inner);
}

fn draw_trend_chart(frame: &mut ratatui::Frame<'_>, area: Rect, analysis: &Analysis) {
    let series = trend_series(analysis);
    let legend = series
        .iter()
        .map(|(year, _)| year.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let title = format!("Monthly Sales Trend  {legend}");
    let Some(inner) = chart_frame(frame, area, &title, analysis) else {
        return;
    };
    let y_bounds = padded_bounds(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1)), false);
    frame.render_widget(TrendChart { series: &series, y_bounds }, inner);
}

/// Draw the chart border; for an empty subset also the no-data notice, in
/// which case there is nothing left to plot.
fn chart_frame(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, analysis: &Analysis) -> Option<Rect> {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if analysis.is_empty() {
        let msg = Paragraph::new(NO_DATA_MESSAGE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return None;
    }
    Some(inner)
}

/// Selector values plus the index of `current`.
///
/// A filter naming a category the data lacks is appended so the selection
/// stays visible (and empty) instead of silently snapping to `All`.
fn selector_entries(choices: &[CategoryFilter], current: &CategoryFilter) -> (Vec<CategoryFilter>, usize) {
    let mut entries = choices.to_vec();
    let idx = match entries.iter().position(|c| c == current) {
        Some(idx) => idx,
        None => {
            entries.push(current.clone());
            entries.len() - 1
        }
    };
    (entries, idx)
}

/// Trend rows grouped into one `(month, sales)` line per year.
fn trend_series(analysis: &Analysis) -> Vec<(i32, Vec<(f64, f64)>)> {
    let mut series: Vec<(i32, Vec<(f64, f64)>)> = Vec::new();
    for m in &analysis.monthly_sales {
        let point = (f64::from(m.month), m.total_sales);
        match series.last_mut() {
            Some((year, points)) if *year == m.year => points.push(point),
            _ => series.push((m.year, vec![point])),
        }
    }
    series
}

fn profit_bars(analysis: &Analysis) -> Vec<(String, f64)> {
    analysis
        .category_profit
        .iter()
        .map(|c| (c.category.clone(), c.total_profit))
        .collect()
}

/// Value range padded by 5%; bar charts always include the zero baseline.
fn padded_bounds(values: impl Iterator<Item = f64>, include_zero: bool) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi <= lo {
        let half = lo.abs().max(1.0) * 0.5;
        return [lo - half, hi + half];
    }
    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}
