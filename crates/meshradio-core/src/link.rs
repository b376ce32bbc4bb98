// ── Stream link state ──
//
// Tracks the status stream's connection lifecycle and applies the
// reconnection policy. Pure state: the session turns decisions into
// effects and the controller runtime executes them.

use crate::reconnect::{ReconnectDecision, ReconnectPolicy};

/// Connection lifecycle of the status stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum LinkStatus {
    Connecting,
    Open,
    #[default]
    Closed,
}

/// Snapshot of the link. Replaced wholesale on every transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub status: LinkStatus,
    /// Consecutive failed reconnection attempts. Reset on every open.
    pub attempt_count: u32,
}

/// Link state machine for the status stream.
#[derive(Debug, Clone)]
pub struct Link {
    state: ConnectionState,
    policy: ReconnectPolicy,
    gave_up: bool,
}

impl Link {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            state: ConnectionState::default(),
            policy,
            gave_up: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    pub fn is_open(&self) -> bool {
        self.state.status == LinkStatus::Open
    }

    /// True once the reconnection budget is spent.
    pub fn gave_up(&self) -> bool {
        self.gave_up
    }

    /// Request a new connection attempt. Returns `false` (and changes
    /// nothing) while an attempt is in flight, the link is open, or the
    /// policy has given up.
    pub fn begin_open(&mut self) -> bool {
        if self.gave_up || self.state.status != LinkStatus::Closed {
            return false;
        }
        self.state = ConnectionState {
            status: LinkStatus::Connecting,
            attempt_count: self.state.attempt_count,
        };
        true
    }

    /// The handshake succeeded.
    pub fn opened(&mut self) {
        self.state = ConnectionState {
            status: LinkStatus::Open,
            attempt_count: 0,
        };
    }

    /// The current attempt ended. Returns the reconnection decision, or
    /// `None` if the link was already closed (a duplicate report).
    pub fn lost(&mut self) -> Option<ReconnectDecision> {
        if self.state.status == LinkStatus::Closed {
            return None;
        }
        let decision = self.policy.decide(self.state.attempt_count);
        let attempt_count = match decision {
            ReconnectDecision::Retry { attempt, .. } => attempt,
            ReconnectDecision::GiveUp => {
                self.gave_up = true;
                self.state.attempt_count
            }
        };
        self.state = ConnectionState {
            status: LinkStatus::Closed,
            attempt_count,
        };
        Some(decision)
    }
}
