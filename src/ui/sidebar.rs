use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use super::helpers::{format_result, spinner, truncate_string};
use super::{View, theme};

/// Rows reserved for key hints at the bottom of the sidebar
const SIDEBAR_HELP_HEIGHT: u16 = 7;

pub fn render_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let base_style = Style::default().bg(theme::bg_base());

    let sidebar_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                      // History list
            Constraint::Length(SIDEBAR_HELP_HEIGHT), // Help hints
        ])
        .split(area);

    let history = &view.ctx.history;
    let mut header = vec![Span::styled("  ", base_style), Span::styled("HISTORY", Style::default().fg(theme::text_muted()).bold())];
    if history.is_loading() {
        header.push(Span::styled(format!(" {}", spinner()), Style::default().fg(theme::warning())));
    }
    let mut lines: Vec<Line> = vec![Line::from(header), Line::from("")];

    if let Some(err) = history.error() {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_string(&err, area.width.saturating_sub(3) as usize)),
            Style::default().fg(theme::error()),
        )));
        lines.push(Line::from(""));
    }

    let entries = history.entries();
    if entries.is_empty() {
        lines.push(Line::from(Span::styled("  nothing yet", Style::default().fg(theme::text_muted()).italic())));
    }

    let width = area.width.saturating_sub(4) as usize;
    for entry in entries.iter().take(sidebar_layout[0].height.saturating_sub(2) as usize) {
        let (mark, color) = if entry.status.is_failure() {
            ("✗", theme::error())
        } else if entry.result.is_some() {
            ("✓", theme::success())
        } else {
            ("·", theme::text_muted())
        };
        let result = format_result(entry.result);
        let expr_width = width.saturating_sub(result.chars().count() + 5);
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", mark), Style::default().fg(color)),
            Span::styled(truncate_string(&entry.expression, expr_width), Style::default().fg(theme::text())),
            Span::styled(" = ", Style::default().fg(theme::text_muted())),
            Span::styled(result, Style::default().fg(theme::accent())),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).style(base_style), sidebar_layout[0]);
    render_help(frame, sidebar_layout[1]);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(theme::accent());
    let desc_style = Style::default().fg(theme::text_muted());
    let hints = [
        ("Enter", "evaluate"),
        ("Ctrl+R", "refresh history"),
        ("Ctrl+L", "login"),
        ("Ctrl+O", "logout"),
        ("Ctrl+T", "theme"),
        ("Ctrl+Q", "quit"),
    ];

    let lines: Vec<Line> = hints
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![Span::styled(format!("  {:<8}", key), key_style), Span::styled(*desc, desc_style)])
        })
        .collect();

    let block = Block::default().borders(Borders::TOP).border_style(Style::default().fg(theme::border()));
    frame.render_widget(Paragraph::new(lines).block(block).style(Style::default().bg(theme::bg_base())), area);
}
