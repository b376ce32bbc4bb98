// ── Renderer interface ──
//
// The presentation collaborator. The session pushes validated data into
// it and never reads anything back.

use crate::model::{Control, ControlState, LogEntry, Mode};
use crate::reconciler::StationView;

/// Sink for everything the operator sees.
pub trait Renderer {
    /// The status stream went up (`true`) or down (`false`).
    fn set_connection(&mut self, connected: bool);

    /// A snapshot was applied; `view` is its full projection.
    fn set_mode(&mut self, mode: Mode, view: &StationView);

    fn set_control_state(&mut self, control: Control, state: ControlState);

    fn append_log_entry(&mut self, entry: &LogEntry);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn set_connection(&mut self, connected: bool) {
        (**self).set_connection(connected);
    }

    fn set_mode(&mut self, mode: Mode, view: &StationView) {
        (**self).set_mode(mode, view);
    }

    fn set_control_state(&mut self, control: Control, state: ControlState) {
        (**self).set_control_state(control, state);
    }

    fn append_log_entry(&mut self, entry: &LogEntry) {
        (**self).append_log_entry(entry);
    }
}
