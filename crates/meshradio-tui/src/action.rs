//! All possible UI actions. Actions are the sole mechanism for state mutation.

use meshradio_core::{Control, ControlState, LogEntry, StationView};

/// Every state transition in the console is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Renderer calls (from the controller) ──────────────────────
    ConnectionChanged(bool),
    StationUpdated(StationView),
    ControlChanged(Control, ControlState),
    LogAppended(LogEntry),

    // ── Operator commands ─────────────────────────────────────────
    ToggleBroadcast,
    ToggleListen,

    // ── Target address input ──────────────────────────────────────
    StartEditing,
    StopEditing,
    InputChar(char),
    InputBackspace,
}
