//! Station status stream.
//!
//! Runs a single WebSocket connection to the station's `/ws` endpoint and
//! reports its lifecycle as [`StreamEvent`]s through a caller-supplied sink.
//! Reconnection is deliberately *not* handled here: the caller owns the
//! retry policy and simply runs [`run_stream`] again when it decides to.
//!
//! Every call reports exactly one terminal [`StreamEvent::Closed`], whether
//! the handshake failed, the station closed the socket, or the read side
//! errored, unless the cancellation token fires first.
//!
//! # Example
//!
//! ```rust,ignore
//! use meshradio_api::stream::{run_stream, StreamEvent};
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let url = Url::parse("ws://localhost:8080/ws")?;
//!
//! run_stream(&url, &cancel, |event| match event {
//!     StreamEvent::Status(status) => println!("mode: {:?}", status.mode),
//!     other => println!("{other:?}"),
//! })
//! .await;
//! ```

use futures_util::StreamExt;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::models::StatusPayload;

// ── StreamEvent ──────────────────────────────────────────────────────

/// Lifecycle and data events of one stream connection.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The handshake completed; frames will follow.
    Opened,
    /// A well-formed status frame.
    Status(StatusPayload),
    /// A frame that could not be decoded. The frame is dropped; the
    /// connection stays up.
    Malformed(String),
    /// The connection is gone. Always the last event of a run.
    Closed(CloseReason),
}

/// Why a stream connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The station closed the socket (close frame or end of stream).
    Clean { code: Option<u16>, reason: String },
    /// The connection broke while reading.
    Error(String),
    /// The connection could not be established at all.
    Refused(String),
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish one WebSocket connection and read frames until it drops.
///
/// `emit` is invoked in order for every event; it must not block.
pub async fn run_stream<F>(url: &Url, cancel: &CancellationToken, mut emit: F)
where
    F: FnMut(StreamEvent),
{
    tracing::info!(url = %url, "Connecting to status stream");

    let connect = tokio_tungstenite::connect_async(url.as_str());
    let ws_stream = tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        result = connect => match result {
            Ok((ws_stream, _response)) => ws_stream,
            Err(e) => {
                let err = Error::WebSocketConnect(e.to_string());
                tracing::warn!(error = %err, "Status stream handshake failed");
                emit(StreamEvent::Closed(CloseReason::Refused(e.to_string())));
                return;
            }
        },
    };

    tracing::info!("Status stream connected");
    emit(StreamEvent::Opened);

    // The station never reads from the socket, so the write half is unused;
    // tungstenite answers pings on its own.
    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        emit(decode_frame(text.as_str()));
                    }
                    Some(Ok(tungstenite::Message::Binary(bytes))) => {
                        let event = match std::str::from_utf8(&bytes) {
                            Ok(text) => decode_frame(text),
                            Err(e) => StreamEvent::Malformed(format!("binary frame is not UTF-8: {e}")),
                        };
                        emit(event);
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        let reason = match frame {
                            Some(cf) => {
                                tracing::info!(
                                    code = %cf.code,
                                    reason = %cf.reason,
                                    "Status stream close frame received"
                                );
                                CloseReason::Clean {
                                    code: Some(u16::from(cf.code)),
                                    reason: cf.reason.to_string(),
                                }
                            }
                            None => {
                                tracing::info!("Status stream close frame received (no payload)");
                                CloseReason::Clean { code: None, reason: String::new() }
                            }
                        };
                        emit(StreamEvent::Closed(reason));
                        return;
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        tracing::trace!("Status stream ping");
                    }
                    Some(Ok(_)) => {
                        // Pong, raw frame -- ignore
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Status stream read failed");
                        emit(StreamEvent::Closed(CloseReason::Error(e.to_string())));
                        return;
                    }
                    None => {
                        tracing::info!("Status stream ended");
                        emit(StreamEvent::Closed(CloseReason::Clean { code: None, reason: String::new() }));
                        return;
                    }
                }
            }
        }
    }
}

// ── Frame decoding ───────────────────────────────────────────────────

/// Decode one text frame into a status event. Never fails: a bad frame
/// becomes [`StreamEvent::Malformed`].
pub fn decode_frame(text: &str) -> StreamEvent {
    match StatusPayload::from_frame(text) {
        Ok(status) => StreamEvent::Status(status),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse status frame");
            StreamEvent::Malformed(e.to_string())
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WireMode;

    #[test]
    fn decode_broadcasting_frame() {
        let raw = serde_json::json!({
            "timestamp": 1_760_000_000,
            "callsign": "W1AW",
            "ipv6": "2001:db8::1",
            "mode": "broadcasting",
            "packetCount": 0,
            "signalQuality": 0
        });

        match decode_frame(&raw.to_string()) {
            StreamEvent::Status(status) => {
                assert_eq!(status.mode, WireMode::Broadcasting);
                assert_eq!(status.ipv6.as_deref(), Some("2001:db8::1"));
            }
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn decode_malformed_json() {
        // Should not panic, should just report and skip
        let event = decode_frame("not json at all");
        assert!(matches!(event, StreamEvent::Malformed(_)));
    }

    #[test]
    fn decode_wrong_shape() {
        let event = decode_frame(r#"{"mode": 3}"#);
        assert!(matches!(event, StreamEvent::Malformed(_)));
    }

    #[tokio::test]
    async fn refused_connection_reports_single_close() {
        // Port 9 (discard) is essentially never listening on loopback.
        let url = Url::parse("ws://127.0.0.1:9/ws").unwrap();
        let cancel = CancellationToken::new();
        let mut events = Vec::new();

        run_stream(&url, &cancel, |e| events.push(e)).await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StreamEvent::Closed(CloseReason::Refused(_))));
    }

    #[tokio::test]
    async fn cancelled_before_connect_reports_nothing() {
        let url = Url::parse("ws://127.0.0.1:9/ws").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut events = Vec::new();

        run_stream(&url, &cancel, |e| events.push(e)).await;

        assert!(events.is_empty());
    }
}
