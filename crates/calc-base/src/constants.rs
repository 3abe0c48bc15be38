// =============================================================================
// SERVER API
// =============================================================================

/// Default backend host when `CALC_SERVER_HOST` is unset
pub const DEFAULT_SERVER_HOST: &str = "localhost";

/// Default backend port when `CALC_SERVER_PORT` is unset
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Submit an expression for evaluation (POST)
pub const CALCULATE_PATH: &str = "/api/v1/calculate";

/// Expression list (GET) and per-id status (GET `{EXPRESSIONS_PATH}/{id}`)
pub const EXPRESSIONS_PATH: &str = "/api/v1/expressions";

/// Login endpoint (POST)
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Register endpoint (POST)
pub const REGISTER_PATH: &str = "/api/v1/auth/register";

/// Current user profile (GET)
pub const CURRENT_USER_PATH: &str = "/api/v1/users/me";

/// HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR MESSAGES
// =============================================================================

/// Returned when no usable response arrived (network failure, unreadable body)
pub const NO_RESPONSE_FROM_SERVER_MESSAGE: &str = "no response body from the server";

/// Returned for a non-success response without an `error` field
pub const GENERIC_ERROR_MESSAGE: &str = "something went wrong";

/// Shown when the server marks an expression failed or aborted
pub const EXPRESSION_FAILED_MESSAGE: &str = "calculation failed, make sure there is no division by zero";

/// Shown when a bounded poll policy runs out of attempts
pub const POLL_ATTEMPTS_EXHAUSTED_MESSAGE: &str = "gave up waiting for the calculation result";

// =============================================================================
// POLLING
// =============================================================================

/// Delay between two status checks of the same expression
pub const EXPRESSION_POLLING_INTERVAL_MS: u64 = 200;

/// Upper bound for the poll delay when backoff is enabled
pub const MAX_POLLING_INTERVAL_MS: u64 = 5_000;

// =============================================================================
// LOCAL STORE
// =============================================================================

/// Directory holding the client's local state
pub const STORE_DIR: &str = ".calc-client";

/// Persisted session slot
pub const SESSION_FILE: &str = "session.json";

/// Persisted UI settings
pub const CONFIG_FILE: &str = "config.json";

/// Log files directory (inside the store)
pub const LOGS_DIR: &str = "logs";

/// Panic reports directory (inside the store)
pub const ERRORS_DIR: &str = "errors";
