use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use calc_mod_eval::Phase;

use super::helpers::{format_result, spinner};
use super::{View, theme};

pub fn render_calculator(frame: &mut Frame, view: &View, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Min(1),    // Outcome
        ])
        .split(area);

    render_input(frame, view, layout[0]);
    render_outcome(frame, view, layout[1]);
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { theme::accent() } else { theme::border() }))
        .style(Style::default().bg(theme::bg_surface()))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(theme::text_muted()).bold()))
}

fn render_input(frame: &mut Frame, view: &View, area: Rect) {
    let state = view.state;
    let block = panel_block("EXPRESSION", true);
    let inner = block.inner(area);

    let paragraph = Paragraph::new(Line::from(Span::styled(state.input.as_str(), Style::default().fg(theme::text()))))
        .block(block);
    frame.render_widget(paragraph, area);

    let cursor_x = state.input[..state.input_cursor].width() as u16;
    frame.set_cursor_position((inner.x + cursor_x.min(inner.width.saturating_sub(1)), inner.y));
}

fn label(name: &str) -> Span<'static> {
    Span::styled(format!("  {:<8}", name), Style::default().fg(theme::text_muted()))
}

fn render_outcome(frame: &mut Frame, view: &View, area: Rect) {
    let snap = &view.evaluation;
    let text_style = Style::default().fg(theme::text());

    let phase_style = match snap.phase {
        Phase::Succeeded => Style::default().fg(theme::success()).bold(),
        Phase::Failed | Phase::Aborted | Phase::TransportError => Style::default().fg(theme::error()).bold(),
        Phase::Submitting | Phase::Polling => Style::default().fg(theme::warning()).bold(),
        Phase::Idle => Style::default().fg(theme::text_muted()),
    };
    let phase_text = if snap.is_loading {
        format!("{} {}", spinner(), snap.phase.label())
    } else {
        snap.phase.label().to_string()
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![label("phase"), Span::styled(phase_text, phase_style)]),
    ];

    if let Some(id) = &snap.id {
        lines.push(Line::from(vec![label("id"), Span::styled(id.to_string(), text_style)]));
    }
    if let Some(status) = snap.status {
        lines.push(Line::from(vec![label("status"), Span::styled(status.label(), text_style)]));
    }
    if snap.result.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            label("result"),
            Span::styled(format_result(snap.result), Style::default().fg(theme::accent()).bold()),
        ]));
    }
    if let Some(err) = &snap.error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![label("error"), Span::styled(err.as_str(), Style::default().fg(theme::error()))]));
    }
    if snap.phase == Phase::Idle && view.state.input.trim().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Type an expression and press Enter",
            Style::default().fg(theme::text_muted()).italic(),
        )));
    }

    let paragraph = Paragraph::new(lines).block(panel_block("RESULT", false)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
