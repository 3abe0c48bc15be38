//! Remote calculation service: transport seam, HTTP adapter, wire types.

pub mod error;
pub mod http;
pub mod types;

pub use error::TransportError;
pub use http::HttpTransport;
pub use types::{AuthPayload, Credentials, ExpressionId, ExpressionRecord, ExpressionStatus, StatusReport, User};

/// Uniform result of every remote call: the decoded value, or the
/// user-facing error string.
pub type ApiResult<T> = Result<T, String>;

/// Calls against the calculation service.
///
/// Implementations normalize every failure into a display string and never
/// panic; state machines depend on this trait so tests can script responses.
pub trait Transport: Send + Sync {
    /// Send an expression for evaluation, returning its server id.
    fn submit(&self, expression: &str) -> ApiResult<ExpressionId>;

    /// Current status (and result, once succeeded) of a submitted expression.
    fn check_status(&self, id: &ExpressionId) -> ApiResult<StatusReport>;

    fn login(&self, credentials: &Credentials) -> ApiResult<AuthPayload>;

    fn register(&self, credentials: &Credentials) -> ApiResult<AuthPayload>;

    /// Profile of the authenticated user.
    fn current_user(&self) -> ApiResult<User>;

    /// All expressions of the authenticated user, as the server stores them.
    fn list_expressions(&self) -> ApiResult<Vec<ExpressionRecord>>;
}
