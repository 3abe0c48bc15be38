//! Scripted in-memory `Transport` for tests of the state machines.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Mutex, MutexGuard};

use crate::api::{
    ApiResult, AuthPayload, Credentials, ExpressionId, ExpressionRecord, ExpressionStatus, StatusReport, Transport,
    User,
};

const SCRIPT_EXHAUSTED: &str = "mock script exhausted";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

fn pop<T>(queue: &Mutex<VecDeque<ApiResult<T>>>) -> ApiResult<T> {
    lock(queue).pop_front().unwrap_or_else(|| Err(SCRIPT_EXHAUSTED.to_string()))
}

/// Plays back queued responses in order and counts calls.
#[derive(Default)]
pub struct ScriptedTransport {
    submits: Mutex<VecDeque<ApiResult<ExpressionId>>>,
    statuses: Mutex<VecDeque<ApiResult<StatusReport>>>,
    logins: Mutex<VecDeque<ApiResult<AuthPayload>>>,
    registers: Mutex<VecDeque<ApiResult<AuthPayload>>>,
    users: Mutex<VecDeque<ApiResult<User>>>,
    lists: Mutex<VecDeque<ApiResult<Vec<ExpressionRecord>>>>,
    /// When set, each check_status waits for one message first
    status_gate: Mutex<Option<Receiver<()>>>,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
    login_calls: AtomicUsize,
    submitted: Mutex<Vec<String>>,
}

/// Shorthand for a status report with the given id.
pub fn report(id: &str, status: ExpressionStatus, result: Option<f64>) -> StatusReport {
    StatusReport { id: ExpressionId::from(id), status, result }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_submit(self, response: ApiResult<ExpressionId>) -> Self {
        lock(&self.submits).push_back(response);
        self
    }

    pub fn on_status(self, response: ApiResult<StatusReport>) -> Self {
        lock(&self.statuses).push_back(response);
        self
    }

    /// Queue `count` copies of the same status report.
    pub fn on_status_repeated(self, response: StatusReport, count: usize) -> Self {
        {
            let mut q = lock(&self.statuses);
            for _ in 0..count {
                q.push_back(Ok(response.clone()));
            }
        }
        self
    }

    pub fn on_login(self, response: ApiResult<AuthPayload>) -> Self {
        lock(&self.logins).push_back(response);
        self
    }

    pub fn on_register(self, response: ApiResult<AuthPayload>) -> Self {
        lock(&self.registers).push_back(response);
        self
    }

    pub fn on_current_user(self, response: ApiResult<User>) -> Self {
        lock(&self.users).push_back(response);
        self
    }

    pub fn on_list(self, response: ApiResult<Vec<ExpressionRecord>>) -> Self {
        lock(&self.lists).push_back(response);
        self
    }

    /// Make every check_status block until a message arrives on `gate`.
    pub fn gate_status(self, gate: Receiver<()>) -> Self {
        *lock(&self.status_gate) = Some(gate);
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// Expressions passed to submit, in call order.
    pub fn submitted(&self) -> Vec<String> {
        lock(&self.submitted).clone()
    }
}

impl Transport for ScriptedTransport {
    fn submit(&self, expression: &str) -> ApiResult<ExpressionId> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.submitted).push(expression.to_string());
        pop(&self.submits)
    }

    fn check_status(&self, _id: &ExpressionId) -> ApiResult<StatusReport> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = lock(&self.status_gate).as_ref() {
            let _ = gate.recv();
        }
        pop(&self.statuses)
    }

    fn login(&self, _credentials: &Credentials) -> ApiResult<AuthPayload> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        pop(&self.logins)
    }

    fn register(&self, _credentials: &Credentials) -> ApiResult<AuthPayload> {
        pop(&self.registers)
    }

    fn current_user(&self) -> ApiResult<User> {
        pop(&self.users)
    }

    fn list_expressions(&self) -> ApiResult<Vec<ExpressionRecord>> {
        pop(&self.lists)
    }
}
