// ── Command dispatcher ──
//
// Per-control request discipline: at most one outstanding command per
// control, start/stop chosen from the station's reported mode, rollback on
// failure. The station stays authoritative: once a control is settled,
// every applied snapshot overrides it.

use std::time::Instant;

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::model::{CommandKind, CommandRequest, Control, ControlState, Mode, PendingCommand};

/// Why a toggle did not produce a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleRejection {
    #[error("{kind} already in flight")]
    Pending { kind: CommandKind },

    #[error("Please enter an IPv6 address")]
    MissingTarget,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    state: ControlState,
    pending: Option<PendingCommand>,
}

/// Control state machine for the broadcast and listen controls.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    broadcast: Slot,
    listen: Slot,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, control: Control) -> &Slot {
        match control {
            Control::Broadcast => &self.broadcast,
            Control::Listen => &self.listen,
        }
    }

    fn slot_mut(&mut self, control: Control) -> &mut Slot {
        match control {
            Control::Broadcast => &mut self.broadcast,
            Control::Listen => &mut self.listen,
        }
    }

    pub fn state(&self, control: Control) -> ControlState {
        self.slot(control).state
    }

    pub fn pending(&self, control: Control) -> Option<&PendingCommand> {
        self.slot(control).pending.as_ref()
    }

    /// Operator toggled `control` while the station reports `mode`.
    ///
    /// On success the control is marked pending and the returned request
    /// must be sent. On rejection nothing changes.
    pub fn toggle(
        &mut self,
        control: Control,
        mode: Mode,
        target: Option<&str>,
    ) -> Result<CommandRequest, ToggleRejection> {
        let slot = self.slot_mut(control);
        if let Some(pending) = &slot.pending {
            return Err(ToggleRejection::Pending { kind: pending.kind });
        }

        let kind = if mode == control.mode() {
            CommandKind::stop(control)
        } else {
            CommandKind::start(control)
        };

        let target = if kind == CommandKind::StartListen {
            let trimmed = target.map(str::trim).unwrap_or_default();
            if trimmed.is_empty() {
                return Err(ToggleRejection::MissingTarget);
            }
            Some(trimmed.to_owned())
        } else {
            None
        };

        slot.pending = Some(PendingCommand {
            kind,
            issued_at: Instant::now(),
            prior: slot.state,
        });
        slot.state = if kind.is_start() {
            ControlState::Starting
        } else {
            ControlState::Stopping
        };

        Ok(CommandRequest { kind, target })
    }

    /// A request for `kind` completed. Clears the pending command and
    /// returns the control's new state, or `None` if nothing was pending
    /// for that command.
    pub fn settle(&mut self, kind: CommandKind, succeeded: bool) -> Option<ControlState> {
        let slot = self.slot_mut(kind.control());
        let pending = slot.pending.take_if(|p| p.kind == kind)?;

        slot.state = match (succeeded, kind.is_start()) {
            (true, true) => ControlState::Active,
            (true, false) => ControlState::Inactive,
            (false, _) => pending.prior,
        };
        Some(slot.state)
    }

    /// Align settled controls with the station's mode. Pending controls
    /// keep their state until their command settles. Returns the controls
    /// whose state changed.
    pub fn sync_from(&mut self, mode: Mode) -> Vec<(Control, ControlState)> {
        let mut changed = Vec::new();
        for control in Control::iter() {
            let slot = self.slot_mut(control);
            if slot.pending.is_some() {
                continue;
            }
            let next = ControlState::from_mode(control, mode);
            if slot.state != next {
                slot.state = next;
                changed.push((control, next));
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_broadcast_from_idle() {
        let mut d = Dispatcher::new();
        let req = d.toggle(Control::Broadcast, Mode::Idle, None).unwrap();
        assert_eq!(req, CommandRequest { kind: CommandKind::StartBroadcast, target: None });
        assert_eq!(d.state(Control::Broadcast), ControlState::Starting);
        assert!(d.pending(Control::Broadcast).is_some());
    }

    #[test]
    fn stop_is_chosen_from_station_mode() {
        let mut d = Dispatcher::new();
        // Local state says inactive, but the station reports broadcasting.
        let req = d.toggle(Control::Broadcast, Mode::Broadcasting, None).unwrap();
        assert_eq!(req.kind, CommandKind::StopBroadcast);
        assert_eq!(d.state(Control::Broadcast), ControlState::Stopping);
    }

    #[test]
    fn second_toggle_while_pending_is_rejected() {
        let mut d = Dispatcher::new();
        d.toggle(Control::Broadcast, Mode::Idle, None).unwrap();
        let err = d.toggle(Control::Broadcast, Mode::Idle, None).unwrap_err();
        assert_eq!(err, ToggleRejection::Pending { kind: CommandKind::StartBroadcast });
        assert_eq!(d.state(Control::Broadcast), ControlState::Starting);
    }

    #[test]
    fn controls_are_independent() {
        let mut d = Dispatcher::new();
        d.toggle(Control::Broadcast, Mode::Idle, None).unwrap();
        let req = d.toggle(Control::Listen, Mode::Idle, Some("fd00::1")).unwrap();
        assert_eq!(req.kind, CommandKind::StartListen);
    }

    #[test]
    fn listen_requires_target() {
        let mut d = Dispatcher::new();
        for target in [None, Some(""), Some("   ")] {
            assert_eq!(
                d.toggle(Control::Listen, Mode::Idle, target),
                Err(ToggleRejection::MissingTarget)
            );
        }
        assert_eq!(d.state(Control::Listen), ControlState::Inactive);
        assert!(d.pending(Control::Listen).is_none());
    }

    #[test]
    fn listen_target_is_trimmed() {
        let mut d = Dispatcher::new();
        let req = d.toggle(Control::Listen, Mode::Idle, Some("  2001:db8::5 ")).unwrap();
        assert_eq!(req.target.as_deref(), Some("2001:db8::5"));
    }

    #[test]
    fn stop_listen_ignores_target() {
        let mut d = Dispatcher::new();
        let req = d.toggle(Control::Listen, Mode::Listening, None).unwrap();
        assert_eq!(req, CommandRequest { kind: CommandKind::StopListen, target: None });
    }

    #[test]
    fn success_advances() {
        let mut d = Dispatcher::new();
        d.toggle(Control::Broadcast, Mode::Idle, None).unwrap();
        assert_eq!(d.settle(CommandKind::StartBroadcast, true), Some(ControlState::Active));
        assert!(d.pending(Control::Broadcast).is_none());

        d.toggle(Control::Broadcast, Mode::Broadcasting, None).unwrap();
        assert_eq!(d.settle(CommandKind::StopBroadcast, true), Some(ControlState::Inactive));
    }

    #[test]
    fn failure_rolls_back_to_prior_state() {
        let mut d = Dispatcher::new();
        d.sync_from(Mode::Broadcasting);
        assert_eq!(d.state(Control::Broadcast), ControlState::Active);

        d.toggle(Control::Broadcast, Mode::Broadcasting, None).unwrap();
        assert_eq!(d.settle(CommandKind::StopBroadcast, false), Some(ControlState::Active));

        d.sync_from(Mode::Idle);
        d.toggle(Control::Broadcast, Mode::Idle, None).unwrap();
        assert_eq!(d.settle(CommandKind::StartBroadcast, false), Some(ControlState::Inactive));
    }

    #[test]
    fn settle_without_pending_is_ignored() {
        let mut d = Dispatcher::new();
        assert_eq!(d.settle(CommandKind::StartListen, true), None);

        d.toggle(Control::Listen, Mode::Idle, Some("fd00::1")).unwrap();
        assert_eq!(d.settle(CommandKind::StopListen, true), None);
        assert_eq!(d.state(Control::Listen), ControlState::Starting);
    }

    #[test]
    fn snapshots_override_settled_controls_only() {
        let mut d = Dispatcher::new();
        d.toggle(Control::Listen, Mode::Idle, Some("fd00::1")).unwrap();

        let changed = d.sync_from(Mode::Broadcasting);
        assert_eq!(changed, vec![(Control::Broadcast, ControlState::Active)]);
        assert_eq!(d.state(Control::Listen), ControlState::Starting);

        // Settled success, then the station says otherwise: station wins.
        d.settle(CommandKind::StartListen, true);
        assert_eq!(d.state(Control::Listen), ControlState::Active);
        let changed = d.sync_from(Mode::Broadcasting);
        assert_eq!(changed, vec![(Control::Listen, ControlState::Inactive)]);
    }

    #[test]
    fn sync_reports_nothing_when_unchanged() {
        let mut d = Dispatcher::new();
        assert!(d.sync_from(Mode::Idle).is_empty());
    }
}
