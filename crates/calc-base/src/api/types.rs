use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned expression identifier, kept opaque.
/// The service issues integers; strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExpressionId(pub String);

impl<'de> Deserialize<'de> for ExpressionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ExpressionId(n.to_string()),
            Raw::Text(s) => ExpressionId(s),
        })
    }
}

impl fmt::Display for ExpressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExpressionId {
    fn from(s: &str) -> Self {
        ExpressionId(s.to_string())
    }
}

/// Evaluation state reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpressionStatus {
    New,
    Processing,
    Succeeded,
    Aborted,
    Failed,
    /// Any status string this client does not know; treated as still running
    Unknown,
}

impl ExpressionStatus {
    /// Wire name used by the service
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            ExpressionStatus::New => "new",
            ExpressionStatus::Processing => "processing",
            ExpressionStatus::Succeeded => "succeed",
            ExpressionStatus::Aborted => "aborted",
            ExpressionStatus::Failed => "failed",
            ExpressionStatus::Unknown => "unknown",
        }
    }

    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "waiting for processing" => ExpressionStatus::New,
            "processing" => ExpressionStatus::Processing,
            "succeed" | "succeeded" | "processed" => ExpressionStatus::Succeeded,
            "aborted" => ExpressionStatus::Aborted,
            "failed" => ExpressionStatus::Failed,
            _ => ExpressionStatus::Unknown,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExpressionStatus::Succeeded | ExpressionStatus::Aborted | ExpressionStatus::Failed)
    }

    /// Failed or aborted
    pub fn is_failure(&self) -> bool {
        matches!(self, ExpressionStatus::Aborted | ExpressionStatus::Failed)
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            ExpressionStatus::New => "waiting",
            ExpressionStatus::Processing => "processing",
            ExpressionStatus::Succeeded => "succeeded",
            ExpressionStatus::Aborted => "aborted",
            ExpressionStatus::Failed => "failed",
            ExpressionStatus::Unknown => "unknown",
        }
    }
}

impl From<String> for ExpressionStatus {
    fn from(s: String) -> Self {
        ExpressionStatus::from_wire(&s)
    }
}

impl From<ExpressionStatus> for String {
    fn from(status: ExpressionStatus) -> Self {
        status.as_wire_str().to_string()
    }
}

/// Current state of a submitted expression.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    pub id: ExpressionId,
    pub status: ExpressionStatus,
    #[serde(default)]
    pub result: Option<f64>,
}

/// One expression as listed by `GET /api/v1/expressions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpressionRecord {
    pub id: ExpressionId,
    pub expression: String,
    pub status: ExpressionStatus,
    #[serde(default)]
    pub result: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

/// Login / register request body.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("username", &self.username).field("password", &"***").finish()
    }
}

/// Successful login / register response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    #[serde(alias = "accessToken")]
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_id_accepts_number_and_string() {
        let n: ExpressionId = serde_json::from_str("42").unwrap();
        let s: ExpressionId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(n, ExpressionId::from("42"));
        assert_eq!(s.to_string(), "abc");
    }

    #[test]
    fn status_wire_names() {
        let parsed: Vec<ExpressionStatus> =
            serde_json::from_str(r#"["new","processing","succeed","aborted","failed","weird"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                ExpressionStatus::New,
                ExpressionStatus::Processing,
                ExpressionStatus::Succeeded,
                ExpressionStatus::Aborted,
                ExpressionStatus::Failed,
                ExpressionStatus::Unknown,
            ]
        );
        assert_eq!(serde_json::to_string(&ExpressionStatus::Succeeded).unwrap(), "\"succeed\"");
    }

    #[test]
    fn terminal_classification() {
        assert!(!ExpressionStatus::New.is_terminal());
        assert!(!ExpressionStatus::Processing.is_terminal());
        assert!(!ExpressionStatus::Unknown.is_terminal());
        assert!(ExpressionStatus::Succeeded.is_terminal());
        assert!(ExpressionStatus::Failed.is_failure());
        assert!(ExpressionStatus::Aborted.is_failure());
        assert!(!ExpressionStatus::Succeeded.is_failure());
    }

    #[test]
    fn record_renames_snake_case_fields() {
        let json = r#"{"id":7,"user_id":1,"status":"succeed","expression":"2+2","result":4,
            "created_at":"2025-03-01T10:00:00Z","updated_at":"2025-03-01T10:00:01Z"}"#;
        let rec: ExpressionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id, ExpressionId::from("7"));
        assert_eq!(rec.result, Some(4.0));
        assert!(rec.created_at.is_some());
    }

    #[test]
    fn auth_payload_accepts_both_token_spellings() {
        let snake: AuthPayload =
            serde_json::from_str(r#"{"access_token":"t1","user":{"id":1,"username":"ann"}}"#).unwrap();
        let camel: AuthPayload = serde_json::from_str(r#"{"accessToken":"t2"}"#).unwrap();
        assert_eq!(snake.access_token, "t1");
        assert_eq!(snake.user.map(|u| u.username), Some("ann".to_string()));
        assert_eq!(camel.access_token, "t2");
        assert!(camel.user.is_none());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let c = Credentials::new("ann", "hunter2");
        let dbg = format!("{:?}", c);
        assert!(dbg.contains("ann"));
        assert!(!dbg.contains("hunter2"));
    }
}
