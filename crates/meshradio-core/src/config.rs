// ── Runtime station configuration ──
//
// Describes *which* station to talk to and how to behave when the link is
// flaky. Never touches disk: meshradio-config (or a test) builds a
// `StationConfig` and hands it to the `Controller`.

use std::time::Duration;

use meshradio_api::TransportConfig;
use url::Url;

use crate::error::CoreError;
use crate::reconciler::DEFAULT_BROADCAST_PORT;
use crate::reconnect::ReconnectPolicy;

/// Origin of a station GUI server running with its default settings.
pub const DEFAULT_STATION_URL: &str = "http://localhost:8080";

/// Default HTTP request timeout for command requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    /// Station origin (e.g., `http://[200:1234::1]:8080`).
    pub url: Url,
    /// Explicit status stream endpoint. Derived from `url` when unset.
    pub stream_url: Option<Url>,
    /// Command request timeout.
    pub timeout: Duration,
    /// Skip TLS certificate checks for command requests.
    pub accept_invalid_certs: bool,
    pub reconnect: ReconnectPolicy,
    /// Port shown after the station address while broadcasting.
    pub broadcast_port: u16,
}

impl StationConfig {
    /// Configuration for the station at `url` with default tuning.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            stream_url: None,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            reconnect: ReconnectPolicy::default(),
            broadcast_port: DEFAULT_BROADCAST_PORT,
        }
    }

    /// The status stream endpoint: the override if set, otherwise `ws(s)://<origin>/ws`.
    pub fn stream_endpoint(&self) -> Result<Url, CoreError> {
        match &self.stream_url {
            Some(url) => Ok(url.clone()),
            None => Ok(meshradio_api::station::stream_url(&self.url)?),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}
