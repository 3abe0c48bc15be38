use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::TransportError;
use super::types::{AuthPayload, Credentials, ExpressionId, ExpressionRecord, StatusReport, User};
use super::{ApiResult, Transport};
use crate::config::ClientConfig;
use crate::constants::{CALCULATE_PATH, CURRENT_USER_PATH, EXPRESSIONS_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::session::SessionCell;

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: ExpressionId,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    expressions: Vec<ExpressionRecord>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Blocking HTTP client for the calculation service.
///
/// Attaches the session's bearer token to every request and logs the
/// session out when a token-carrying request comes back 401.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    session: SessionCell,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, session: SessionCell) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string(), session })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send, read, decode. Every failure is collapsed to its user-facing string.
    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> ApiResult<T> {
        let sent = self.session.token();
        let request = match &sent {
            Some(token) => request.header("Authorization", format!("Bearer {}", token.expose_secret())),
            None => request,
        };

        let outcome = request
            .header("Accept", "application/json")
            .send()
            .map_err(TransportError::from)
            .and_then(|resp| {
                let status = resp.status().as_u16();
                let body = resp.text().map_err(|e| TransportError::Body(e.to_string()))?;
                decode_response(status, &body)
            });

        match outcome {
            Ok(value) => Ok(value),
            Err(err) => {
                // Only the token that was rejected is dropped; a session
                // established while the request was in flight survives
                if err.is_unauthorized()
                    && let Some(token) = &sent
                    && self.session.clear_if_current(token)
                {
                    tracing::warn!(call = what, "unauthorized response, session cleared");
                }
                tracing::warn!(call = what, error = %err, "request failed");
                Err(err.message())
            }
        }
    }
}

/// Map a raw HTTP response to a decoded body or a typed error.
///
/// A success status with an undecodable body counts as "no usable
/// response"; a failure status with an undecodable body counts as a
/// failure without a server message.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, TransportError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| TransportError::Body(e.to_string()));
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    Err(TransportError::Status { status, message })
}

impl Transport for HttpTransport {
    fn submit(&self, expression: &str) -> ApiResult<ExpressionId> {
        tracing::debug!(expression, "submitting expression");
        let body = serde_json::json!({ "expression": expression });
        let resp: SubmitResponse = self.execute(self.client.post(self.url(CALCULATE_PATH)).json(&body), "submit")?;
        Ok(resp.id)
    }

    fn check_status(&self, id: &ExpressionId) -> ApiResult<StatusReport> {
        let url = self.url(&format!("{}/{}", EXPRESSIONS_PATH, id));
        self.execute(self.client.get(url), "check_status")
    }

    fn login(&self, credentials: &Credentials) -> ApiResult<AuthPayload> {
        self.execute(self.client.post(self.url(LOGIN_PATH)).json(credentials), "login")
    }

    fn register(&self, credentials: &Credentials) -> ApiResult<AuthPayload> {
        self.execute(self.client.post(self.url(REGISTER_PATH)).json(credentials), "register")
    }

    fn current_user(&self) -> ApiResult<User> {
        self.execute(self.client.get(self.url(CURRENT_USER_PATH)), "current_user")
    }

    fn list_expressions(&self) -> ApiResult<Vec<ExpressionRecord>> {
        let resp: ListResponse = self.execute(self.client.get(self.url(EXPRESSIONS_PATH)), "list_expressions")?;
        Ok(resp.expressions)
    }
}
