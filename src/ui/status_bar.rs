use ratatui::{prelude::*, widgets::Paragraph};

use super::helpers::spinner;
use super::{View, theme};

pub fn render_status_bar(frame: &mut Frame, view: &View, area: Rect) {
    let base_style = Style::default().bg(theme::bg_base()).fg(theme::text_muted());
    let badge = |text: String, bg: Color| Span::styled(text, Style::default().fg(theme::bg_base()).bg(bg).bold());

    let mut spans = vec![Span::styled(" ", base_style)];

    if view.evaluation.is_loading {
        spans.push(badge(format!(" {} EVALUATING ", spinner()), theme::warning()));
    } else {
        spans.push(badge(" READY ".to_string(), theme::text_muted()));
    }
    spans.push(Span::styled(" ", base_style));

    let auth = &view.ctx.auth;
    match auth.current_user() {
        Some(user) => spans.push(badge(format!(" {} ", user.username), theme::success())),
        None if auth.is_authenticated() => spans.push(badge(" SIGNED IN ".to_string(), theme::success())),
        None => spans.push(badge(" GUEST ".to_string(), theme::border())),
    }
    spans.push(Span::styled(" ", base_style));
    spans.push(Span::styled(format!(" {} ", view.state.theme), Style::default().fg(theme::text()).bg(theme::bg_surface())));

    if let Some(notice) = &view.state.notice {
        spans.push(Span::styled(format!("  {}", notice), Style::default().fg(theme::warning()).bg(theme::bg_base())));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), area);
}
