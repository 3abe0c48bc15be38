use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event;
use ratatui::prelude::*;

use calc_base::api::Credentials;
use calc_mod_eval::{Evaluation, EvaluationSnapshot, Phase};

use crate::actions::{Action, ActionResult, apply_action};
use crate::context::AppContext;
use crate::events::handle_event;
use crate::persistence::{Settings, save_settings};
use crate::state::{Screen, State};
use crate::ui::{self, View};

/// Input poll interval while something is changing
const EVENT_POLL_MS: u64 = 8;
/// Input poll interval when idle
const IDLE_POLL_MS: u64 = 50;
/// Minimum delay between two renders
const RENDER_THROTTLE_MS: u64 = 36;

/// Results of work done off the UI thread
enum BackgroundEvent {
    Authenticated { username: String },
    AuthFailed,
    HistoryFetched,
}

pub struct App {
    pub state: State,
    ctx: AppContext,
    evaluation: Evaluation,
    tx: Sender<BackgroundEvent>,
    rx: Receiver<BackgroundEvent>,
    /// Snapshot drawn by the last render
    last_snapshot: EvaluationSnapshot,
    last_render: Instant,
}

impl App {
    pub fn new(state: State, ctx: AppContext) -> Self {
        let (tx, rx) = mpsc::channel();
        let evaluation = ctx.evaluation();
        Self { state, ctx, evaluation, tx, rx, last_snapshot: EvaluationSnapshot::default(), last_render: Instant::now() }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        if self.ctx.auth.is_authenticated() {
            self.spawn_profile_fetch();
            self.spawn_history_fetch();
        }

        loop {
            // === INPUT FIRST ===
            if event::poll(Duration::ZERO)? {
                let evt = event::read()?;
                let Some(action) = handle_event(&evt, &self.state) else {
                    tracing::info!("quit requested");
                    break;
                };
                self.handle_action(action);

                // Render immediately after input for instant feedback
                self.draw(terminal)?;
            }

            // === BACKGROUND RESULTS ===
            self.process_background_events();

            let snapshot = self.evaluation.snapshot();
            let busy = snapshot.is_loading || self.state.auth_pending || self.ctx.history.is_loading();
            if snapshot != self.last_snapshot || busy {
                self.state.dirty = true;
            }

            if self.state.dirty && self.last_render.elapsed() >= Duration::from_millis(RENDER_THROTTLE_MS) {
                self.draw(terminal)?;
            }

            let poll_ms = if busy || self.state.dirty { EVENT_POLL_MS } else { IDLE_POLL_MS };
            let _ = event::poll(Duration::from_millis(poll_ms))?;
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        let view = View { state: &self.state, evaluation: self.evaluation.snapshot(), ctx: &self.ctx };
        terminal.draw(|frame| ui::render(frame, &view))?;
        self.last_snapshot = view.evaluation;
        self.state.dirty = false;
        self.last_render = Instant::now();
        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        let result = apply_action(&mut self.state, action);

        if self.state.screen == Screen::Calculator && self.evaluation.set_expression(&self.state.input) {
            tracing::debug!(expression = %self.state.input, "expression changed");
        }

        match result {
            ActionResult::Evaluate => {
                if !self.evaluation.send() {
                    self.state.notice = refused_send_notice(self.evaluation.snapshot().phase).map(str::to_string);
                }
            }
            ActionResult::Login(creds) => self.spawn_auth(creds, false),
            ActionResult::Register(creds) => self.spawn_auth(creds, true),
            ActionResult::Logout => self.ctx.auth.logout(),
            ActionResult::RefreshHistory => self.spawn_history_fetch(),
            ActionResult::SaveSettings => {
                save_settings(&self.ctx.config.store_dir, &Settings { active_theme: self.state.theme.clone() });
            }
            ActionResult::Nothing => {}
        }
    }

    fn spawn_auth(&mut self, creds: Credentials, register: bool) {
        if self.state.auth_pending {
            return;
        }
        self.state.auth_pending = true;
        let auth = self.ctx.auth.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let ok = if register { auth.register(&creds) } else { auth.login(&creds) };
            if ok && auth.current_user().is_none() {
                auth.fetch_current_user();
            }
            let event = if ok { BackgroundEvent::Authenticated { username: creds.username } } else { BackgroundEvent::AuthFailed };
            let _ = tx.send(event);
        });
    }

    fn spawn_profile_fetch(&self) {
        let auth = self.ctx.auth.clone();
        thread::spawn(move || {
            auth.fetch_current_user();
        });
    }

    fn spawn_history_fetch(&self) {
        let history = self.ctx.history.clone();
        let transport = self.ctx.transport.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            history.fetch_all(transport.as_ref());
            let _ = tx.send(BackgroundEvent::HistoryFetched);
        });
    }

    fn process_background_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.state.dirty = true;
            match event {
                BackgroundEvent::Authenticated { username } => {
                    self.state.auth_pending = false;
                    self.state.screen = Screen::Calculator;
                    self.state.login.password.clear();
                    self.state.notice = Some(format!("logged in as {}", username));
                    self.spawn_history_fetch();
                }
                BackgroundEvent::AuthFailed => {
                    self.state.auth_pending = false;
                }
                BackgroundEvent::HistoryFetched => {}
            }
        }
    }
}

/// Status bar notice for an Enter that did not start a lifecycle.
fn refused_send_notice(phase: Phase) -> Option<&'static str> {
    if phase.is_running() {
        Some("still evaluating")
    } else if phase.is_terminal() {
        Some("already evaluated, edit the expression to run it again")
    } else {
        None
    }
}
