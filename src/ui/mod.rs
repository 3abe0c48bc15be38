mod calculator;
mod helpers;
mod login;
mod sidebar;
mod status_bar;
pub mod theme;

use ratatui::{prelude::*, widgets::Block};

use calc_mod_eval::EvaluationSnapshot;

use crate::context::AppContext;
use crate::state::{Screen, State};

/// Sidebar width (history list)
const SIDEBAR_WIDTH: u16 = 36;

/// Everything one frame needs, captured before drawing.
pub struct View<'a> {
    pub state: &'a State,
    pub evaluation: EvaluationSnapshot,
    pub ctx: &'a AppContext,
}

pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();

    // Fill base background
    frame.render_widget(Block::default().style(Style::default().bg(theme::bg_base())), area);

    // Main layout: body + footer
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    match view.state.screen {
        Screen::Calculator => render_body(frame, view, main_layout[0]),
        Screen::Login => login::render_login(frame, view, main_layout[0]),
    }
    status_bar::render_status_bar(frame, view, main_layout[1]);
}

fn render_body(frame: &mut Frame, view: &View, area: Rect) {
    let body_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(area);

    sidebar::render_sidebar(frame, view, body_layout[0]);
    calculator::render_calculator(frame, view, body_layout[1]);
}
