// Station control API client
//
// Thin wrapper over `reqwest::Client` for the four mode-change endpoints.
// Every endpoint is a bodyless POST (except `listen/start`) answering with
// either an acknowledgement object or `{ "error": "..." }`; the latter is
// surfaced as `Error::Station` so callers treat it like a transport failure.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{CommandAck, CommandResponse, ListenRequest};
use crate::transport::TransportConfig;

const BROADCAST_START: &str = "/api/broadcast/start";
const BROADCAST_STOP: &str = "/api/broadcast/stop";
const LISTEN_START: &str = "/api/listen/start";
const LISTEN_STOP: &str = "/api/listen/stop";

/// Path of the status stream, relative to the station origin.
pub const STREAM_PATH: &str = "/ws";

/// HTTP client for a single station's control API.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StationClient {
    /// Create a client for the station served at `base_url`
    /// (e.g. `http://[200:1234::1]:8080`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The station origin this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub async fn start_broadcast(&self) -> Result<CommandAck, Error> {
        self.post(BROADCAST_START, None::<&()>).await
    }

    pub async fn stop_broadcast(&self) -> Result<CommandAck, Error> {
        self.post(BROADCAST_STOP, None::<&()>).await
    }

    /// Start listening to the station at `ipv6`. The address is validated
    /// by the station, not here.
    pub async fn start_listen(&self, ipv6: &str) -> Result<CommandAck, Error> {
        self.post(LISTEN_START, Some(&ListenRequest { ipv6 })).await
    }

    pub async fn stop_listen(&self) -> Result<CommandAck, Error> {
        self.post(LISTEN_STOP, None::<&()>).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<CommandAck, Error> {
        let url = self.base_url.join(path)?;
        debug!(%url, "POST");

        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        parse_command_response(status.as_u16(), status.is_success(), &text)
    }
}

/// Interpret a command response body.
///
/// A station-reported `error` wins over the HTTP status so the operator sees
/// the station's own wording.
fn parse_command_response(status: u16, success: bool, text: &str) -> Result<CommandAck, Error> {
    let parsed = if text.trim().is_empty() {
        Ok(CommandResponse::default())
    } else {
        serde_json::from_str::<CommandResponse>(text)
    };

    match parsed {
        Ok(resp) => {
            if let Some(message) = resp.error.filter(|m| !m.is_empty()) {
                return Err(Error::Station { message });
            }
            if !success {
                return Err(Error::Status {
                    status,
                    body: text.to_owned(),
                });
            }
            Ok(CommandAck {
                status: resp.status,
                target: resp.target,
            })
        }
        Err(_) if !success => Err(Error::Status {
            status,
            body: text.trim().to_owned(),
        }),
        Err(e) => Err(Error::Deserialization {
            message: e.to_string(),
            body: text.to_owned(),
        }),
    }
}

/// Derive the status-stream endpoint from a station origin.
///
/// `http` becomes `ws` and `https` becomes `wss`, so a securely served
/// station is always streamed securely. The path is fixed; query and
/// fragment are dropped.
pub fn stream_url(origin: &Url) -> Result<Url, Error> {
    let scheme = match origin.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(Error::UnsupportedScheme(other.to_owned())),
    };

    let mut url = origin.clone();
    url.set_scheme(scheme)
        .map_err(|()| Error::UnsupportedScheme(origin.scheme().to_owned()))?;
    url.set_path(STREAM_PATH);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
