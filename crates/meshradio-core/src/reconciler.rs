// ── State reconciler ──
//
// Holds the latest station snapshot and projects it into the view handed
// to the renderer. The reconciled state is never edited locally: every
// applied snapshot replaces it wholesale (last write wins).

use crate::model::{Mode, ModeStyle, StationSnapshot};

/// Presentation port appended to the broadcast address.
pub const DEFAULT_BROADCAST_PORT: u16 = 9001;

const ABSENT: &str = "-";
const UNKNOWN_STATION: &str = "Unknown";

/// Label and style tag for the mode badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeBadge {
    pub label: &'static str,
    pub style: Option<ModeStyle>,
}

/// Listening panel contents, present only while listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenView {
    pub station_name: String,
    pub packet_count: u64,
    /// `packet_count mod 100`, in `[0, 100)`.
    pub signal_percent: u8,
}

/// Everything the renderer needs to draw one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationView {
    pub mode: Mode,
    pub badge: ModeBadge,
    pub callsign: String,
    pub address: String,
    /// `address:port`, present only while broadcasting.
    pub broadcast_address: Option<String>,
    pub listen: Option<ListenView>,
}

impl StationView {
    pub fn project(snapshot: &StationSnapshot, broadcast_port: u16) -> Self {
        let mode = snapshot.mode;
        let address = snapshot.ipv6_address.as_deref();

        let broadcast_address = (mode == Mode::Broadcasting).then(|| match address {
            Some(addr) => format!("{addr}:{broadcast_port}"),
            None => ABSENT.to_owned(),
        });

        let listen = (mode == Mode::Listening).then(|| ListenView {
            station_name: snapshot
                .station_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_STATION.to_owned()),
            packet_count: snapshot.packet_count,
            signal_percent: signal_percent(snapshot.packet_count),
        });

        Self {
            mode,
            badge: ModeBadge {
                label: mode.label(),
                style: mode.style(),
            },
            callsign: snapshot.callsign.clone().unwrap_or_else(|| ABSENT.to_owned()),
            address: address.unwrap_or(ABSENT).to_owned(),
            broadcast_address,
            listen,
        }
    }
}

/// Signal strength shown while listening.
pub fn signal_percent(packet_count: u64) -> u8 {
    // Always < 100, so the narrowing is lossless.
    u8::try_from(packet_count % 100).unwrap_or(0)
}

/// Latest-snapshot holder.
#[derive(Debug, Clone)]
pub struct Reconciler {
    snapshot: StationSnapshot,
    broadcast_port: u16,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DEFAULT_BROADCAST_PORT)
    }
}

impl Reconciler {
    pub fn new(broadcast_port: u16) -> Self {
        Self {
            snapshot: StationSnapshot::idle(),
            broadcast_port,
        }
    }

    /// Replace the reconciled state and return its projection.
    pub fn apply(&mut self, snapshot: StationSnapshot) -> StationView {
        self.snapshot = snapshot;
        self.view()
    }

    /// The station's mode as last reported. `Idle` before any snapshot.
    pub fn mode(&self) -> Mode {
        self.snapshot.mode
    }

    pub fn snapshot(&self) -> &StationSnapshot {
        &self.snapshot
    }

    pub fn view(&self) -> StationView {
        StationView::project(&self.snapshot, self.broadcast_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(mode: Mode) -> StationSnapshot {
        StationSnapshot {
            mode,
            ..StationSnapshot::default()
        }
    }

    #[test]
    fn idle_before_any_snapshot() {
        let reconciler = Reconciler::default();
        assert_eq!(reconciler.mode(), Mode::Idle);
        let view = reconciler.view();
        assert_eq!(view.badge, ModeBadge { label: "Idle", style: None });
        assert_eq!(view.callsign, "-");
        assert_eq!(view.address, "-");
        assert_eq!(view.broadcast_address, None);
        assert_eq!(view.listen, None);
    }

    #[test]
    fn listening_projection() {
        let mut reconciler = Reconciler::default();
        let view = reconciler.apply(StationSnapshot {
            packet_count: 250,
            station_name: Some("K1ABC".into()),
            ..snapshot(Mode::Listening)
        });

        assert_eq!(view.badge.style, Some(ModeStyle::Listening));
        assert_eq!(
            view.listen,
            Some(ListenView {
                station_name: "K1ABC".into(),
                packet_count: 250,
                signal_percent: 50,
            })
        );
    }

    #[test]
    fn listening_defaults_station_name() {
        let mut reconciler = Reconciler::default();
        let view = reconciler.apply(snapshot(Mode::Listening));
        let listen = view.listen.unwrap();
        assert_eq!(listen.station_name, "Unknown");
        assert_eq!(listen.signal_percent, 0);
    }

    #[test]
    fn broadcasting_projection() {
        let mut reconciler = Reconciler::default();
        let view = reconciler.apply(StationSnapshot {
            callsign: Some("W1AW".into()),
            ipv6_address: Some("2001:db8::1".into()),
            ..snapshot(Mode::Broadcasting)
        });

        assert_eq!(view.badge, ModeBadge { label: "Broadcasting", style: Some(ModeStyle::Broadcasting) });
        assert_eq!(view.callsign, "W1AW");
        assert_eq!(view.address, "2001:db8::1");
        assert_eq!(view.broadcast_address.as_deref(), Some("2001:db8::1:9001"));
        assert_eq!(view.listen, None);
    }

    #[test]
    fn broadcasting_without_address() {
        let mut reconciler = Reconciler::new(7000);
        let view = reconciler.apply(snapshot(Mode::Broadcasting));
        assert_eq!(view.broadcast_address.as_deref(), Some("-"));
    }

    #[test]
    fn custom_broadcast_port() {
        let mut reconciler = Reconciler::new(7000);
        let view = reconciler.apply(StationSnapshot {
            ipv6_address: Some("fd00::2".into()),
            ..snapshot(Mode::Broadcasting)
        });
        assert_eq!(view.broadcast_address.as_deref(), Some("fd00::2:7000"));
    }

    #[test]
    fn last_write_wins() {
        let mut reconciler = Reconciler::default();
        let sequence = [
            Mode::Broadcasting,
            Mode::Idle,
            Mode::Listening,
            Mode::Listening,
            Mode::Broadcasting,
        ];
        for mode in sequence {
            reconciler.apply(snapshot(mode));
            assert_eq!(reconciler.mode(), mode);
        }
        assert_eq!(reconciler.mode(), Mode::Broadcasting);
    }

    #[test]
    fn style_tags_reset_between_projections() {
        let mut reconciler = Reconciler::default();
        reconciler.apply(snapshot(Mode::Broadcasting));
        let view = reconciler.apply(snapshot(Mode::Idle));
        assert_eq!(view.badge.style, None);
    }

    #[test]
    fn signal_percent_wraps() {
        assert_eq!(signal_percent(0), 0);
        assert_eq!(signal_percent(99), 99);
        assert_eq!(signal_percent(100), 0);
        assert_eq!(signal_percent(u64::MAX), 15);
    }
}
