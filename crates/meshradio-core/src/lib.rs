// meshradio-core: Connection resilience and state synchronization between
// meshradio-api and consumers (the terminal console).

pub mod activity_log;
pub mod config;
pub mod controller;
pub mod convert;
pub mod dispatcher;
pub mod error;
pub mod link;
pub mod model;
pub mod reconciler;
pub mod reconnect;
pub mod renderer;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use activity_log::{ActivityLog, LOG_CAPACITY};
pub use config::StationConfig;
pub use controller::{Controller, ControllerHandle};
pub use dispatcher::{Dispatcher, ToggleRejection};
pub use error::CoreError;
pub use link::{ConnectionState, Link, LinkStatus};
pub use reconciler::{ListenView, ModeBadge, Reconciler, StationView};
pub use reconnect::{ReconnectDecision, ReconnectPolicy};
pub use renderer::Renderer;
pub use session::{Effect, Session, SessionEvent};

pub use model::{
    CommandKind, CommandRequest, Control, ControlState, LogEntry, Mode, ModeStyle,
    PendingCommand, Severity, StationSnapshot,
};
