// ── Session state machine ──
//
// The single application-state struct. Every input (operator toggles,
// stream events, timer fires, command results) arrives as a
// `SessionEvent`; handling one mutates state, pushes updates to the
// renderer, and yields at most one `Effect` for the runtime to execute.
// No I/O happens here, which keeps every rule testable synchronously.

use std::time::Duration;

use meshradio_api::{CloseReason, CommandAck, StreamEvent};
use tracing::{debug, info, warn};

use crate::activity_log::ActivityLog;
use crate::config::StationConfig;
use crate::dispatcher::{Dispatcher, ToggleRejection};
use crate::error::CoreError;
use crate::link::Link;
use crate::model::{CommandKind, CommandRequest, Control, Severity, StationSnapshot};
use crate::reconciler::Reconciler;
use crate::reconnect::ReconnectDecision;
use crate::renderer::Renderer;

/// Terminal log message once the reconnection budget is spent.
pub const GIVE_UP_MESSAGE: &str = "Connection lost. Please reload the client.";

/// Input to the session.
#[derive(Debug)]
pub enum SessionEvent {
    /// Open the status stream for the first time.
    Start,
    /// A scheduled reconnection timer fired.
    ReconnectDue,
    ToggleBroadcast,
    /// Toggle listening; `target` is the operator-entered address.
    ToggleListen { target: String },
    Stream(StreamEvent),
    CommandSettled {
        request: CommandRequest,
        result: Result<CommandAck, CoreError>,
    },
}

/// Work the runtime must perform on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenStream,
    ScheduleReconnect { attempt: u32, delay: Duration },
    SendCommand(CommandRequest),
}

/// Link, reconciled state, controls, log and renderer for one station.
pub struct Session<R> {
    link: Link,
    reconciler: Reconciler,
    dispatcher: Dispatcher,
    log: ActivityLog,
    renderer: R,
}

impl<R: Renderer> Session<R> {
    pub fn new(config: &StationConfig, renderer: R) -> Self {
        Self {
            link: Link::new(config.reconnect),
            reconciler: Reconciler::new(config.broadcast_port),
            dispatcher: Dispatcher::new(),
            log: ActivityLog::default(),
            renderer,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn link(&self) -> &Link {
        &self.link
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    // ── Event handling ───────────────────────────────────────────────

    pub fn handle(&mut self, event: SessionEvent) -> Option<Effect> {
        match event {
            SessionEvent::Start | SessionEvent::ReconnectDue => self.open(),
            SessionEvent::ToggleBroadcast => self.toggle(Control::Broadcast, None),
            SessionEvent::ToggleListen { target } => self.toggle(Control::Listen, Some(&target)),
            SessionEvent::Stream(event) => self.on_stream(event),
            SessionEvent::CommandSettled { request, result } => {
                self.on_settled(&request, result);
                None
            }
        }
    }

    fn append(&mut self, message: impl Into<String>, severity: Severity) {
        let entry = self.log.append(message, severity);
        self.renderer.append_log_entry(entry);
    }

    fn open(&mut self) -> Option<Effect> {
        if self.link.begin_open() {
            Some(Effect::OpenStream)
        } else {
            debug!(state = ?self.link.state(), gave_up = self.link.gave_up(), "open ignored");
            None
        }
    }

    // ── Stream ───────────────────────────────────────────────────────

    fn on_stream(&mut self, event: StreamEvent) -> Option<Effect> {
        match event {
            StreamEvent::Opened => {
                self.link.opened();
                info!("status stream open");
                self.renderer.set_connection(true);
                self.append("Connected to station", Severity::Success);
                None
            }
            StreamEvent::Status(payload) => {
                self.apply(StationSnapshot::from(payload));
                None
            }
            StreamEvent::Malformed(reason) => {
                warn!(%reason, "discarding malformed status frame");
                self.append(
                    format!("Discarded malformed status update: {reason}"),
                    Severity::Error,
                );
                None
            }
            StreamEvent::Closed(reason) => self.on_closed(&reason),
        }
    }

    fn apply(&mut self, snapshot: StationSnapshot) {
        debug!(mode = %snapshot.mode, packets = snapshot.packet_count, "applying snapshot");
        let view = self.reconciler.apply(snapshot);
        self.renderer.set_mode(view.mode, &view);
        for (control, state) in self.dispatcher.sync_from(view.mode) {
            self.renderer.set_control_state(control, state);
        }
    }

    fn on_closed(&mut self, reason: &CloseReason) -> Option<Effect> {
        let Some(decision) = self.link.lost() else {
            debug!(?reason, "duplicate close ignored");
            return None;
        };

        self.renderer.set_connection(false);
        match reason {
            CloseReason::Clean { .. } => {
                info!(?reason, "status stream closed");
                self.append("Disconnected from station", Severity::Info);
            }
            CloseReason::Error(e) | CloseReason::Refused(e) => {
                warn!(error = %e, "status stream failed");
                self.append(format!("Connection error: {e}"), Severity::Error);
            }
        }

        match decision {
            ReconnectDecision::Retry { attempt, delay } => {
                let max = self.link.policy().max_attempts;
                info!(attempt, max, delay_ms = delay.as_millis(), "scheduling reconnect");
                self.append(format!("Reconnecting... ({attempt}/{max})"), Severity::Info);
                Some(Effect::ScheduleReconnect { attempt, delay })
            }
            ReconnectDecision::GiveUp => {
                warn!("reconnection budget exhausted");
                self.append(GIVE_UP_MESSAGE, Severity::Error);
                None
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    fn toggle(&mut self, control: Control, target: Option<&str>) -> Option<Effect> {
        match self.dispatcher.toggle(control, self.reconciler.mode(), target) {
            Ok(request) => {
                info!(kind = %request.kind, target = ?request.target, "issuing command");
                self.renderer
                    .set_control_state(control, self.dispatcher.state(control));
                Some(Effect::SendCommand(request))
            }
            Err(rejection @ ToggleRejection::Pending { .. }) => {
                debug!(%control, %rejection, "toggle rejected");
                None
            }
            Err(rejection @ ToggleRejection::MissingTarget) => {
                self.append(rejection.to_string(), Severity::Error);
                None
            }
        }
    }

    fn on_settled(&mut self, request: &CommandRequest, result: Result<CommandAck, CoreError>) {
        let kind = request.kind;
        let Some(state) = self.dispatcher.settle(kind, result.is_ok()) else {
            debug!(%kind, "settlement without pending command ignored");
            return;
        };
        self.renderer.set_control_state(kind.control(), state);

        match result {
            Ok(ack) => {
                info!(%kind, "command succeeded");
                let message = match kind {
                    CommandKind::StartBroadcast => "Broadcasting started".to_owned(),
                    CommandKind::StopBroadcast => "Broadcasting stopped".to_owned(),
                    CommandKind::StartListen => {
                        let target = ack
                            .target
                            .or_else(|| request.target.clone())
                            .unwrap_or_default();
                        format!("Listening to {target}")
                    }
                    CommandKind::StopListen => "Listening stopped".to_owned(),
                };
                self.append(message, Severity::Success);
            }
            Err(e) => {
                warn!(%kind, error = %e, "command failed");
                let action = match kind {
                    CommandKind::StartBroadcast => "start broadcasting",
                    CommandKind::StopBroadcast => "stop broadcasting",
                    CommandKind::StartListen => "start listening",
                    CommandKind::StopListen => "stop listening",
                };
                self.append(format!("Failed to {action}: {e}"), Severity::Error);
            }
        }
    }
}
