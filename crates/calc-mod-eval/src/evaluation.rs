//! Submit-then-poll state machine for one expression input.
//!
//! Every lifecycle captures the generation it was started in. Changing the
//! expression (or starting a new lifecycle) bumps the generation, and any
//! write from an older lifecycle is dropped at commit time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use calc_base::api::{ExpressionStatus, Transport};
use calc_base::constants::{EXPRESSION_FAILED_MESSAGE, POLL_ATTEMPTS_EXHAUSTED_MESSAGE};
use calc_mod_history::{History, HistoryEntry};

use crate::policy::PollPolicy;
use crate::types::{EvaluationSnapshot, Phase};

/// Blocking delay between polls; swapped out in tests.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// State shared between the owner and its lifecycle threads
#[derive(Default)]
struct Shared {
    snapshot: Mutex<EvaluationSnapshot>,
    generation: AtomicU64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EvaluationSnapshot> {
        self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Start a new generation with an empty snapshot, then apply `init`.
    fn reset(&self, init: impl FnOnce(&mut EvaluationSnapshot)) -> u64 {
        let mut snap = self.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *snap = EvaluationSnapshot::default();
        init(&mut snap);
        generation
    }

    /// Apply `f` if `generation` is still current; returns the new snapshot.
    fn commit(&self, generation: u64, f: impl FnOnce(&mut EvaluationSnapshot)) -> Option<EvaluationSnapshot> {
        let mut snap = self.lock();
        if !self.is_current(generation) {
            tracing::debug!(generation, "dropping write from superseded evaluation");
            return None;
        }
        f(&mut snap);
        Some(snap.clone())
    }
}

/// Everything a lifecycle thread needs, detached from `Evaluation`.
struct Lifecycle {
    shared: Arc<Shared>,
    transport: Arc<dyn Transport>,
    history: History,
    policy: PollPolicy,
    sleeper: Sleeper,
    expression: String,
    generation: u64,
}

impl Lifecycle {
    fn run(self) {
        let id = match self.transport.submit(&self.expression) {
            Ok(id) => id,
            Err(error) => {
                tracing::warn!(expression = %self.expression, %error, "submit failed");
                self.finish(Phase::TransportError, |s| s.error = Some(error));
                return;
            }
        };
        tracing::info!(expression = %self.expression, id = %id, "expression submitted");

        if self
            .shared
            .commit(self.generation, |s| {
                s.id = Some(id.clone());
                s.phase = Phase::Polling;
            })
            .is_none()
        {
            return;
        }

        let mut attempts: u32 = 0;
        loop {
            let report = match self.transport.check_status(&id) {
                Ok(report) => report,
                Err(error) => {
                    tracing::warn!(id = %id, %error, "status check failed");
                    self.finish(Phase::TransportError, |s| s.error = Some(error));
                    return;
                }
            };

            let status = report.status;
            if self.shared.commit(self.generation, |s| s.status = Some(status)).is_none() {
                return;
            }

            if status.is_failure() {
                tracing::info!(id = %id, status = status.label(), "evaluation failed");
                self.finish(Phase::from_terminal_status(status), |s| {
                    s.error = Some(EXPRESSION_FAILED_MESSAGE.to_string());
                });
                return;
            }

            if status == ExpressionStatus::Succeeded {
                tracing::info!(id = %id, result = ?report.result, "evaluation succeeded");
                self.finish(Phase::Succeeded, |s| s.result = report.result);
                return;
            }

            attempts += 1;
            if !self.policy.allows_another(attempts) {
                tracing::warn!(id = %id, attempts, "poll budget exhausted");
                self.finish(Phase::TransportError, |s| {
                    s.error = Some(POLL_ATTEMPTS_EXHAUSTED_MESSAGE.to_string());
                });
                return;
            }

            (self.sleeper)(self.policy.delay_after(attempts));
            if !self.shared.is_current(self.generation) {
                return;
            }
        }
    }

    /// Terminal commit; records history when a status was ever observed.
    /// The history entry is written under the snapshot lock, so a reader
    /// never sees a finished snapshot without its entry.
    fn finish(&self, phase: Phase, f: impl FnOnce(&mut EvaluationSnapshot)) {
        self.shared.commit(self.generation, |s| {
            f(s);
            s.phase = phase;
            s.is_loading = false;
            if let Some(status) = s.status {
                self.history.append(HistoryEntry::completed(self.expression.clone(), s.result, status));
            }
        });
    }
}

/// Evaluation state machine bound to one expression input.
pub struct Evaluation {
    shared: Arc<Shared>,
    transport: Arc<dyn Transport>,
    history: History,
    policy: PollPolicy,
    sleeper: Sleeper,
    expression: String,
    /// A lifecycle was started for the current expression value
    activated: bool,
    worker: Option<JoinHandle<()>>,
}

impl Evaluation {
    pub fn new(transport: Arc<dyn Transport>, history: History, policy: PollPolicy) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            transport,
            history,
            policy,
            sleeper: Arc::new(thread::sleep),
            expression: String::new(),
            activated: false,
            worker: None,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn snapshot(&self) -> EvaluationSnapshot {
        self.shared.lock().clone()
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Observe the current input. A changed value resets everything and
    /// abandons any running lifecycle; returns whether a reset happened.
    pub fn set_expression(&mut self, text: &str) -> bool {
        if text == self.expression {
            return false;
        }
        self.expression = text.to_string();
        self.activated = false;
        self.shared.reset(|_| {});
        true
    }

    /// Start a lifecycle on a background thread.
    ///
    /// Ignored for an empty expression, and for an expression that was
    /// already activated unless its last lifecycle ended in a transport
    /// error. Returns whether a lifecycle was started.
    pub fn send(&mut self) -> bool {
        match self.activate() {
            Some(lifecycle) => {
                self.worker = Some(thread::spawn(move || lifecycle.run()));
                true
            }
            None => false,
        }
    }

    /// Same as `send`, but runs the lifecycle on the calling thread.
    pub fn send_blocking(&mut self) -> bool {
        match self.activate() {
            Some(lifecycle) => {
                lifecycle.run();
                true
            }
            None => false,
        }
    }

    /// Block until the most recently started background lifecycle returns.
    pub fn wait(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    fn activate(&mut self) -> Option<Lifecycle> {
        if self.expression.trim().is_empty() {
            return None;
        }
        if self.activated && self.snapshot().phase != Phase::TransportError {
            return None;
        }
        self.activated = true;

        let generation = self.shared.reset(|s| {
            s.is_loading = true;
            s.phase = Phase::Submitting;
        });

        Some(Lifecycle {
            shared: Arc::clone(&self.shared),
            transport: Arc::clone(&self.transport),
            history: self.history.clone(),
            policy: self.policy.clone(),
            sleeper: Arc::clone(&self.sleeper),
            expression: self.expression.clone(),
            generation,
        })
    }
}
