use std::time::Instant;

use strum::{Display, EnumIter, IntoStaticStr};

use super::station::Mode;

/// An operator control on the console. Each one drives a single station mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Control {
    Broadcast,
    Listen,
}

impl Control {
    /// The station mode this control starts and stops.
    pub fn mode(self) -> Mode {
        match self {
            Self::Broadcast => Mode::Broadcasting,
            Self::Listen => Mode::Listening,
        }
    }
}

/// Station command issued by a control toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    StartBroadcast,
    StopBroadcast,
    StartListen,
    StopListen,
}

impl CommandKind {
    pub fn control(self) -> Control {
        match self {
            Self::StartBroadcast | Self::StopBroadcast => Control::Broadcast,
            Self::StartListen | Self::StopListen => Control::Listen,
        }
    }

    pub fn is_start(self) -> bool {
        matches!(self, Self::StartBroadcast | Self::StartListen)
    }

    pub fn start(control: Control) -> Self {
        match control {
            Control::Broadcast => Self::StartBroadcast,
            Control::Listen => Self::StartListen,
        }
    }

    pub fn stop(control: Control) -> Self {
        match control {
            Control::Broadcast => Self::StopBroadcast,
            Control::Listen => Self::StopListen,
        }
    }
}

/// Display state of one control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum ControlState {
    #[default]
    Inactive,
    /// A start request is outstanding.
    Starting,
    Active,
    /// A stop request is outstanding.
    Stopping,
}

impl ControlState {
    /// Settled state for a control given the station's current mode.
    pub fn from_mode(control: Control, mode: Mode) -> Self {
        if control.mode() == mode {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Outstanding request for one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    pub kind: CommandKind,
    pub issued_at: Instant,
    /// State to restore if the request fails.
    pub(crate) prior: ControlState,
}

/// A request the runtime must send to the station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub kind: CommandKind,
    /// Listen target; only set for [`CommandKind::StartListen`].
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_kind_maps_to_control() {
        assert_eq!(CommandKind::StartBroadcast.control(), Control::Broadcast);
        assert_eq!(CommandKind::StopListen.control(), Control::Listen);
        assert!(CommandKind::StartListen.is_start());
        assert!(!CommandKind::StopBroadcast.is_start());
    }

    #[test]
    fn command_kind_display_is_snake_case() {
        assert_eq!(CommandKind::StartBroadcast.to_string(), "start_broadcast");
        assert_eq!(CommandKind::StopListen.to_string(), "stop_listen");
    }

    #[test]
    fn control_state_from_mode() {
        assert_eq!(
            ControlState::from_mode(Control::Broadcast, Mode::Broadcasting),
            ControlState::Active
        );
        assert_eq!(
            ControlState::from_mode(Control::Listen, Mode::Broadcasting),
            ControlState::Inactive
        );
        assert_eq!(
            ControlState::from_mode(Control::Listen, Mode::Idle),
            ControlState::Inactive
        );
    }
}
