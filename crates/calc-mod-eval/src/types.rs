use calc_base::api::{ExpressionId, ExpressionStatus};

/// Where an evaluation lifecycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
    Aborted,
    /// Submit or a status check failed, or the poll budget ran out
    TransportError,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed | Phase::Aborted | Phase::TransportError)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Submitting | Phase::Polling)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Polling => "polling",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
            Phase::Aborted => "aborted",
            Phase::TransportError => "error",
        }
    }

    /// Terminal phase for a terminal server status
    pub(crate) fn from_terminal_status(status: ExpressionStatus) -> Self {
        match status {
            ExpressionStatus::Succeeded => Phase::Succeeded,
            ExpressionStatus::Aborted => Phase::Aborted,
            _ => Phase::Failed,
        }
    }
}

/// Observable state of one evaluation. Empty (`Default`) after a reset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationSnapshot {
    pub phase: Phase,
    pub id: Option<ExpressionId>,
    pub result: Option<f64>,
    /// Latest status reported by the server, published on every poll
    pub status: Option<ExpressionStatus>,
    pub error: Option<String>,
    pub is_loading: bool,
}
