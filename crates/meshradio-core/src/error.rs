// ── Core error types ──
//
// User-facing errors from meshradio-core. Consumers never see reqwest or
// serde errors directly; `From<meshradio_api::Error>` translates
// transport-layer failures into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach station at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Station request timed out")]
    Timeout,

    // ── Operation errors ─────────────────────────────────────────────
    /// The station answered with an `error` message. Displayed verbatim.
    #[error("{message}")]
    Rejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Station API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Runtime errors ───────────────────────────────────────────────
    #[error("Controller is not running")]
    ControllerStopped,

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<meshradio_api::Error> for CoreError {
    fn from(err: meshradio_api::Error) -> Self {
        match err {
            meshradio_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
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
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            meshradio_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            meshradio_api::Error::UnsupportedScheme(scheme) => CoreError::Config {
                message: format!("Unsupported URL scheme: {scheme}"),
            },
            meshradio_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            meshradio_api::Error::Station { message } => CoreError::Rejected { message },
            meshradio_api::Error::Status { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                status: Some(status),
            },
            meshradio_api::Error::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("WebSocket connection failed: {reason}"),
            },
            meshradio_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_error_displays_verbatim() {
        let err = CoreError::from(meshradio_api::Error::Station {
            message: "Already broadcasting".into(),
        });
        assert_eq!(err.to_string(), "Already broadcasting");
    }

    #[test]
    fn status_error_keeps_code() {
        let err = CoreError::from(meshradio_api::Error::Status {
            status: 405,
            body: "Method not allowed".into(),
        });
        match err {
            CoreError::Api { status, message } => {
                assert_eq!(status, Some(405));
                assert_eq!(message, "HTTP 405: Method not allowed");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn timeout_reads_without_placeholder() {
        assert_eq!(CoreError::Timeout.to_string(), "Station request timed out");
    }

    #[test]
    fn scheme_error_is_config() {
        let err = CoreError::from(meshradio_api::Error::UnsupportedScheme("ftp".into()));
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
