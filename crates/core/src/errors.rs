use thiserror::Error;

/// Unified error type for the entire census-forecast-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No analytics provider available: {0}")]
    ServiceUnavailable(String),

    #[error("Random source failed: {0}")]
    Randomness(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Query strings may carry tokens; keep them out of error messages.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` in a message that may contain a URL.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
