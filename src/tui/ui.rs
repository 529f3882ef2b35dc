//! # Module: Dashboard Rendering
//!
//! ## Responsibility
//! Divides the terminal into panels and renders the current
//! [`MetricsSnapshot`](crate::MetricsSnapshot): complexity summary, expert
//! utilisation bars, and a recent-complexity sparkline. Handles the minimum
//! size guard and the help overlay.
//!
//! ## Guarantees
//! - No panics during rendering regardless of terminal dimensions
//! - Empty metrics render as placeholders, never as garbage values

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{BarChart, Block, Borders, Clear, Paragraph, Sparkline, Wrap};
use ratatui::Frame;

use super::app::{App, MIN_COLS, MIN_ROWS};

/// Render the complete dashboard into the given frame.
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    if size.width < MIN_COLS || size.height < MIN_ROWS {
        draw_too_small(f, size);
        return;
    }

    if app.show_help {
        draw_help_overlay(f, size);
        return;
    }

    let title = format!(
        " moe-router dashboard {:>width$} ",
        chrono::Local::now().format("%H:%M:%S"),
        width = (size.width as usize).saturating_sub(24),
    );

    let outer = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let footer = Line::from(vec![
        Span::styled(
            " [q]uit  [p]ause  [h]elp ",
            Style::default().fg(Color::DarkGray),
        ),
        if app.paused {
            Span::styled(
                " PAUSED ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        },
    ]);
    let footer_block = Block::default().title_bottom(footer).borders(Borders::NONE);

    let inner = outer.inner(size);
    f.render_widget(outer, size);
    f.render_widget(footer_block, size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // summary + utilisation
            Constraint::Min(6),    // sparkline
        ])
        .split(inner);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[0]);

    draw_summary(f, top[0], app);
    draw_utilisation(f, top[1], app);
    draw_sparkline(f, rows[1], app);
}

/// Format an optional mean, or a placeholder dash when no samples exist.
fn fmt_mean(value: Option<f64>) -> String {
    value.map_or_else(|| "   --".to_string(), |v| format!("{v:5.3}"))
}

/// Complexity and timing summary panel.
fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
    let snap = &app.snapshot;

    let staleness = snap
        .since_last_update
        .map_or_else(|| "never".to_string(), |d| format!("{:.1}s ago", d.as_secs_f64()));

    let mean_time_ms = snap.mean_processing_time().map(|s| s * 1000.0);

    let lines = vec![
        Line::from(format!(
            "mean text complexity   {}",
            fmt_mean(snap.mean_text_complexity())
        )),
        Line::from(format!(
            "mean image complexity  {}",
            fmt_mean(snap.mean_image_complexity())
        )),
        Line::from(format!(
            "mean processing time   {} ms",
            fmt_mean(mean_time_ms)
        )),
        Line::from(format!("updates                {:>5}", snap.updates)),
        Line::from(Span::styled(
            format!("last update  {staleness}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Complexity ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Expert assignment counts as a bar chart.
fn draw_utilisation(f: &mut Frame, area: Rect, app: &App) {
    let snap = &app.snapshot;

    let labels: Vec<String> = snap
        .expert_assignments
        .keys()
        .map(|e| format!("E{e}"))
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .map(String::as_str)
        .zip(snap.expert_assignments.values().copied())
        .collect();

    let block = Block::default()
        .title(format!(
            " Expert Utilisation ({} total) ",
            snap.total_assignments()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    if data.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "no assignments yet",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(placeholder, area);
        return;
    }

    let chart = BarChart::default()
        .block(block)
        .data(&data)
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    f.render_widget(chart, area);
}

/// Recent text complexity samples as a sparkline (scaled ×100 for the
/// integer-valued widget).
fn draw_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let samples: Vec<u64> = app
        .snapshot
        .text_complexity
        .iter()
        .map(|&s| (s.max(0.0) * 100.0) as u64)
        .collect();

    let block = Block::default()
        .title(format!(
            " Text Complexity (last {} samples, ×100) ",
            samples.len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let spark = Sparkline::default()
        .block(block)
        .data(&samples)
        .style(Style::default().fg(Color::Magenta));
    f.render_widget(spark, area);
}

/// "Terminal too small" warning.
fn draw_too_small(f: &mut Frame, area: Rect) {
    let msg = format!("Terminal too small, resize to at least {MIN_COLS}x{MIN_ROWS}");
    let current = format!("Current size: {}x{}", area.width, area.height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            msg,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(current, Style::default().fg(Color::DarkGray))),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(para, area);
}

/// Help overlay.
fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 12.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup = Rect::new(popup_x, popup_y, popup_width, popup_height);

    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  moe-router dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("  Keybindings:", Style::default().fg(Color::White))),
        Line::from(Span::styled(
            "    [q] Quit          [Esc] Quit",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "    [Ctrl+C] Force quit",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "    [p] Pause / Resume",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "    [h] Close this overlay",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
