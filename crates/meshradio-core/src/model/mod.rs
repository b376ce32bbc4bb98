// ── Domain model ──
//
// Types consumers see. Wire shapes from meshradio-api are converted into
// these in `crate::convert` and never leak past the core.

mod control;
mod log;
mod station;

pub use control::{CommandKind, CommandRequest, Control, ControlState, PendingCommand};
pub use log::{LogEntry, Severity};
pub use station::{Mode, ModeStyle, StationSnapshot};
