use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Operating mode reported by the station. At most one of broadcasting and
/// listening is active at a time; the station enforces this.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Idle,
    Broadcasting,
    Listening,
}

impl Mode {
    /// Human-readable badge label.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Style tag for the mode badge. Idle carries none.
    pub fn style(self) -> Option<ModeStyle> {
        match self {
            Self::Idle => None,
            Self::Broadcasting => Some(ModeStyle::Broadcasting),
            Self::Listening => Some(ModeStyle::Listening),
        }
    }
}

/// Presentation tag attached to an active mode badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ModeStyle {
    Broadcasting,
    Listening,
}

/// One authoritative state report from the station.
///
/// Produced only by the station and never modified after receipt; a newer
/// snapshot replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub mode: Mode,
    pub callsign: Option<String>,
    pub ipv6_address: Option<String>,
    /// Name of the station being listened to.
    pub station_name: Option<String>,
    pub packet_count: u64,
    /// Unix seconds at which the station produced the report.
    pub timestamp: Option<i64>,
    pub signal_quality: Option<u8>,
}

impl StationSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }
}
