// ── Wire → domain conversion ──
//
// Maps meshradio-api status frames onto `StationSnapshot`. Empty identity
// strings collapse to `None`; packet counts that are negative, fractional,
// or missing collapse to 0. Out-of-range timestamps and signal qualities
// are dropped without touching the rest of the frame.

use meshradio_api::{StatusPayload, WireMode};

use crate::model::{Mode, StationSnapshot};

impl From<WireMode> for Mode {
    fn from(mode: WireMode) -> Self {
        match mode {
            WireMode::Idle => Mode::Idle,
            WireMode::Broadcasting => Mode::Broadcasting,
            WireMode::Listening => Mode::Listening,
        }
    }
}

impl From<StatusPayload> for StationSnapshot {
    fn from(p: StatusPayload) -> Self {
        StationSnapshot {
            mode: p.mode.into(),
            callsign: non_empty(p.callsign),
            ipv6_address: non_empty(p.ipv6),
            station_name: non_empty(p.station),
            packet_count: p
                .packet_count
                .as_ref()
                .and_then(serde_json::Number::as_u64)
                .unwrap_or(0),
            timestamp: p.timestamp.as_ref().and_then(serde_json::Value::as_i64),
            signal_quality: p
                .signal_quality
                .as_ref()
                .and_then(serde_json::Value::as_u64)
                .and_then(|q| u8::try_from(q).ok()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> StatusPayload {
        StatusPayload::from_frame(json).unwrap()
    }

    #[test]
    fn listening_frame_converts() {
        let snap = StationSnapshot::from(payload(
            r#"{"mode":"listening","callsign":"W1AW","station":"K1ABC","packetCount":250}"#,
        ));
        assert_eq!(snap.mode, Mode::Listening);
        assert_eq!(snap.callsign.as_deref(), Some("W1AW"));
        assert_eq!(snap.station_name.as_deref(), Some("K1ABC"));
        assert_eq!(snap.packet_count, 250);
    }

    #[test]
    fn empty_strings_become_absent() {
        let snap = StationSnapshot::from(payload(
            r#"{"mode":"idle","callsign":"","ipv6":"","station":""}"#,
        ));
        assert_eq!(snap.callsign, None);
        assert_eq!(snap.ipv6_address, None);
        assert_eq!(snap.station_name, None);
    }

    #[test]
    fn odd_packet_counts_become_zero() {
        for raw in [
            r#"{"mode":"listening","packetCount":-3}"#,
            r#"{"mode":"listening","packetCount":2.5}"#,
            r#"{"mode":"listening"}"#,
        ] {
            assert_eq!(StationSnapshot::from(payload(raw)).packet_count, 0, "{raw}");
        }
    }

    #[test]
    fn odd_auxiliary_fields_are_dropped() {
        let snap = StationSnapshot::from(payload(
            r#"{"mode":"listening","timestamp":1.5,"signalQuality":300}"#,
        ));
        assert_eq!(snap.mode, Mode::Listening);
        assert_eq!(snap.timestamp, None);
        assert_eq!(snap.signal_quality, None);

        let snap = StationSnapshot::from(payload(
            r#"{"mode":"idle","timestamp":1760000000,"signalQuality":87}"#,
        ));
        assert_eq!(snap.timestamp, Some(1_760_000_000));
        assert_eq!(snap.signal_quality, Some(87));
    }
}
