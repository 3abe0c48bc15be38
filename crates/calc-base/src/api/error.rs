use std::fmt;

use crate::constants::{GENERIC_ERROR_MESSAGE, NO_RESPONSE_FROM_SERVER_MESSAGE};

/// Typed failure of a single HTTP exchange.
///
/// Callers never see this type directly: `message()` collapses it into the
/// plain string that ends up in an observable error cell.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// No response at all (DNS, connection refused, timeout)
    Network(String),
    /// A response arrived but its body could not be read or decoded
    Body(String),
    /// Non-success HTTP status, with the server's `error` field if it sent one
    Status { status: u16, message: Option<String> },
}

impl TransportError {
    /// The string shown to the user.
    pub fn message(&self) -> String {
        match self {
            TransportError::Network(_) | TransportError::Body(_) => NO_RESPONSE_FROM_SERVER_MESSAGE.to_string(),
            TransportError::Status { message: Some(msg), .. } => msg.clone(),
            TransportError::Status { message: None, .. } => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TransportError::Status { status: 401, .. })
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "Network error: {}", msg),
            TransportError::Body(msg) => write!(f, "Body error: {}", msg),
            TransportError::Status { status, message: Some(msg) } => write!(f, "HTTP {}: {}", status, msg),
            TransportError::Status { status, message: None } => write!(f, "HTTP {}", status),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_and_body_collapse_to_sentinel() {
        assert_eq!(TransportError::Network("refused".into()).message(), NO_RESPONSE_FROM_SERVER_MESSAGE);
        assert_eq!(TransportError::Body("eof".into()).message(), NO_RESPONSE_FROM_SERVER_MESSAGE);
    }

    #[test]
    fn server_message_passes_through() {
        let e = TransportError::Status { status: 422, message: Some("invalid expression".into()) };
        assert_eq!(e.message(), "invalid expression");
        assert_eq!(e.to_string(), "HTTP 422: invalid expression");
    }

    #[test]
    fn missing_server_message_uses_generic() {
        let e = TransportError::Status { status: 500, message: None };
        assert_eq!(e.message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(e.to_string(), "HTTP 500");
    }

    #[test]
    fn unauthorized_detection() {
        assert!(TransportError::Status { status: 401, message: None }.is_unauthorized());
        assert!(!TransportError::Status { status: 403, message: None }.is_unauthorized());
        assert!(!TransportError::Network("x".into()).is_unauthorized());
    }
}
