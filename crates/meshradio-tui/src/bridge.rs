//! Renderer bridge: turns the controller's renderer calls into [`Action`]s.
//!
//! The controller runs on its own task; every call it makes on the
//! renderer is forwarded through the console's action channel so the app
//! loop stays the single writer of UI state.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use meshradio_core::{Control, ControlState, Controller, LogEntry, Mode, Renderer, StationView};

use crate::action::Action;

/// [`Renderer`] that posts every call as an [`Action`].
pub struct ChannelRenderer {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl ChannelRenderer {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { action_tx }
    }

    fn post(&self, action: Action) {
        // The app may already be shutting down.
        let _ = self.action_tx.send(action);
    }
}

impl Renderer for ChannelRenderer {
    fn set_connection(&mut self, connected: bool) {
        self.post(Action::ConnectionChanged(connected));
    }

    fn set_mode(&mut self, _mode: Mode, view: &StationView) {
        self.post(Action::StationUpdated(view.clone()));
    }

    fn set_control_state(&mut self, control: Control, state: ControlState) {
        self.post(Action::ControlChanged(control, state));
    }

    fn append_log_entry(&mut self, entry: &LogEntry) {
        self.post(Action::LogAppended(entry.clone()));
    }
}

/// Run `controller` in a background task, feeding the action channel.
pub fn spawn_controller(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let session = controller.run(ChannelRenderer::new(action_tx)).await;
        info!(
            mode = %session.reconciler().mode(),
            log_entries = session.log().len(),
            "controller task finished"
        );
    })
}
