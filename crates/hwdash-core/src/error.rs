// ── Core error types ──
//
// User-facing errors from hwdash-core. Consumers never see raw reqwest
// errors or JSON parse failures; `From<hwdash_api::Error>` translates
// transport-layer errors into domain variants.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Backend error code (e.g. `E40400`).
        code: Option<String>,
        status: Option<u16>,
    },

    #[error("Metrics query failed ({error_type}): {message}")]
    Query { error_type: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Map a 404 from an entity lookup into `NotFound`, keep anything else.
    pub fn not_found_as(self, entity_type: &str, identifier: &str) -> Self {
        match self {
            Self::Api {
                status: Some(404), ..
            } => Self::NotFound {
                entity_type: entity_type.to_owned(),
                identifier: identifier.to_owned(),
            },
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hwdash_api::Error> for CoreError {
    fn from(err: hwdash_api::Error) -> Self {
        match err {
            hwdash_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            hwdash_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            hwdash_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            hwdash_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            hwdash_api::Error::InvalidToken(msg) => CoreError::Config {
                message: format!("Invalid bearer token: {msg}"),
            },
            hwdash_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            hwdash_api::Error::Query {
                error_type,
                message,
            } => CoreError::Query {
                error_type,
                message,
            },
            hwdash_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_status_and_code() {
        let err = CoreError::from(hwdash_api::Error::Api {
            message: "not found".into(),
            code: Some("E40400".into()),
            status: 404,
        });
        assert!(matches!(
            &err,
            CoreError::Api { status: Some(404), code: Some(code), .. } if code == "E40400"
        ));

        let err = err.not_found_as("Resource group", "g-1");
        assert_eq!(err.to_string(), "Resource group not found: g-1");
    }

    #[test]
    fn not_found_as_keeps_other_errors() {
        let err = CoreError::Internal("boom".into()).not_found_as("Resource", "x");
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[test]
    fn query_errors_pass_through() {
        let err = CoreError::from(hwdash_api::Error::Query {
            error_type: "bad_data".into(),
            message: "parse error".into(),
        });
        assert_eq!(err.to_string(), "Metrics query failed (bad_data): parse error");
    }
}
