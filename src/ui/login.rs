use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::state::LoginField;

use super::helpers::spinner;
use super::{View, theme};

const FORM_WIDTH: u16 = 50;
const FORM_HEIGHT: u16 = 13;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(area.x + (area.width - w) / 2, area.y + (area.height - h) / 2, w, h)
}

pub fn render_login(frame: &mut Frame, view: &View, area: Rect) {
    let form = &view.state.login;
    let auth = &view.ctx.auth;
    let rect = centered(area, FORM_WIDTH, FORM_HEIGHT);

    let field = |name: &str, value: String, focused: bool| {
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            Style::default().fg(theme::accent()).bold()
        } else {
            Style::default().fg(theme::text_muted())
        };
        Line::from(vec![
            Span::styled(format!(" {}{:<10}", marker, name), label_style),
            Span::styled(value, Style::default().fg(theme::text())),
        ])
    };

    let masked = "•".repeat(form.password.chars().count());
    let mut lines = vec![
        Line::from(""),
        field("username", form.username.clone(), form.focus == LoginField::Username),
        field("password", masked.clone(), form.focus == LoginField::Password),
        Line::from(""),
    ];

    if view.state.auth_pending {
        lines.push(Line::from(Span::styled(format!("  {} contacting server", spinner()), Style::default().fg(theme::warning()))));
    }
    for err in [auth.login_error(), auth.register_error()].into_iter().flatten() {
        lines.push(Line::from(Span::styled(format!("  {}", err), Style::default().fg(theme::error()))));
    }
    if let Some(user) = auth.current_user() {
        lines.push(Line::from(Span::styled(
            format!("  signed in as {}", user.username),
            Style::default().fg(theme::success()),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter login · Ctrl+N register · Tab switch · Esc back",
        Style::default().fg(theme::text_muted()),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::accent()))
        .style(Style::default().bg(theme::bg_surface()))
        .title(Span::styled(" LOGIN ", Style::default().fg(theme::accent()).bold()));
    let inner = block.inner(rect);

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(block), rect);

    // " ▸ " + 10-col label
    let (row, value) = match form.focus {
        LoginField::Username => (1, form.username.as_str()),
        LoginField::Password => (2, masked.as_str()),
    };
    let x = inner.x + 13 + value.width() as u16;
    if x < inner.x + inner.width && row < inner.height {
        frame.set_cursor_position((x, inner.y + row));
    }
}
