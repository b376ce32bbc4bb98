// Wire types for the station's control API and status stream.
//
// These mirror the station's JSON exactly (camelCase, optional fields).
// Domain conversion lives in `meshradio-core::convert`.

use serde::{Deserialize, Serialize};

/// Station operating mode as it appears on the wire.
///
/// Any other string fails deserialization, which the stream client
/// surfaces as a malformed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireMode {
    Idle,
    Broadcasting,
    Listening,
}

/// A status frame pushed by the station over the stream.
///
/// Only `mode` is required; every identity field is optional and may be an
/// empty string, which consumers treat the same as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub mode: WireMode,

    #[serde(default)]
    pub callsign: Option<String>,

    /// The station's own mesh IPv6 address.
    #[serde(default)]
    pub ipv6: Option<String>,

    /// Callsign (or target address) of the station being listened to.
    #[serde(default)]
    pub station: Option<String>,

    /// Packets received while listening. Kept as a raw JSON number so that
    /// negative or fractional values degrade instead of failing the frame.
    #[serde(default)]
    pub packet_count: Option<serde_json::Number>,

    /// Unix seconds at which the station produced the frame. Like
    /// `signal_quality`, kept raw so an odd value never costs the snapshot.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,

    #[serde(default)]
    pub signal_quality: Option<serde_json::Value>,
}

impl StatusPayload {
    /// Parse a single stream frame.
    pub fn from_frame(text: &str) -> Result<Self, crate::Error> {
        serde_json::from_str(text).map_err(|e| crate::Error::Deserialization {
            message: e.to_string(),
            body: text.to_owned(),
        })
    }
}

/// Body of `POST /api/listen/start`.
#[derive(Debug, Clone, Serialize)]
pub struct ListenRequest<'a> {
    pub ipv6: &'a str,
}

/// Raw command response. Every control endpoint answers with either an
/// acknowledgement object or `{ "error": "..." }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CommandResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Successful command acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandAck {
    /// Station-reported state after the command, e.g. `"broadcasting"`.
    pub status: Option<String>,
    /// Listen target echoed back by `listen/start`.
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_listening_frame() {
        let raw = r#"{
            "timestamp": 1760000000,
            "callsign": "W1AW",
            "ipv6": "200:1234::1",
            "mode": "listening",
            "station": "K1ABC",
            "packetCount": 250,
            "signalQuality": 0
        }"#;

        let payload = StatusPayload::from_frame(raw).unwrap();
        assert_eq!(payload.mode, WireMode::Listening);
        assert_eq!(payload.callsign.as_deref(), Some("W1AW"));
        assert_eq!(payload.station.as_deref(), Some("K1ABC"));
        assert_eq!(payload.packet_count.unwrap().as_u64(), Some(250));
        assert_eq!(
            payload.timestamp.as_ref().and_then(serde_json::Value::as_i64),
            Some(1_760_000_000)
        );
    }

    #[test]
    fn parse_minimal_frame() {
        let payload = StatusPayload::from_frame(r#"{"mode":"idle"}"#).unwrap();
        assert_eq!(payload.mode, WireMode::Idle);
        assert!(payload.callsign.is_none());
        assert!(payload.packet_count.is_none());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = StatusPayload::from_frame(r#"{"mode":"transmitting"}"#).unwrap_err();
        assert!(matches!(err, crate::Error::Deserialization { .. }));
    }

    #[test]
    fn missing_mode_is_rejected() {
        let err = StatusPayload::from_frame(r#"{"callsign":"W1AW"}"#).unwrap_err();
        match err {
            crate::Error::Deserialization { body, .. } => {
                assert_eq!(body, r#"{"callsign":"W1AW"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_packet_count_still_parses() {
        let payload = StatusPayload::from_frame(r#"{"mode":"listening","packetCount":-4}"#).unwrap();
        assert_eq!(payload.packet_count.unwrap().as_i64(), Some(-4));
    }
}
