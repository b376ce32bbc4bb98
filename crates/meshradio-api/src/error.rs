use thiserror::Error;

/// Top-level error type for the `meshradio-api` crate.
///
/// Covers every failure mode of the two station surfaces: the HTTP control
/// API and the status stream. `meshradio-core` maps these into user-facing
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The station origin uses a scheme with no streaming counterpart.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// TLS setup failed while building the HTTP client.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Station control API ─────────────────────────────────────────
    /// The station answered with a non-empty `error` field.
    #[error("{message}")]
    Station { message: String },

    /// The station answered with a non-success HTTP status.
    #[error("Station returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    // ── Status stream ───────────────────────────────────────────────
    /// WebSocket handshake or read failure.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
