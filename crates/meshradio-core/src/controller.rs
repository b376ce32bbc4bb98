// ── Controller runtime ──
//
// Async shell around `Session`. A single task owns the session and drains
// one event queue; stream reading, reconnect timers and command requests
// run as spawned tasks that only post events back. Shutdown cancels every
// task through a shared `CancellationToken`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use meshradio_api::StationClient;
use meshradio_api::stream::run_stream;

use crate::config::StationConfig;
use crate::error::CoreError;
use crate::model::{CommandKind, CommandRequest};
use crate::renderer::Renderer;
use crate::session::{Effect, Session, SessionEvent};

// ── ControllerHandle ─────────────────────────────────────────────

/// Cloneable operator surface for a running [`Controller`].
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
    cancel: CancellationToken,
}

impl ControllerHandle {
    pub fn toggle_broadcast(&self) -> Result<(), CoreError> {
        self.send(SessionEvent::ToggleBroadcast)
    }

    /// Toggle listening. `target` is only used when this starts listening.
    pub fn toggle_listen(&self, target: impl Into<String>) -> Result<(), CoreError> {
        self.send(SessionEvent::ToggleListen {
            target: target.into(),
        })
    }

    /// Stop the controller and every task it spawned.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    fn send(&self, event: SessionEvent) -> Result<(), CoreError> {
        if self.cancel.is_cancelled() {
            return Err(CoreError::ControllerStopped);
        }
        self.tx.send(event).map_err(|_| CoreError::ControllerStopped)
    }
}

// ── Controller ───────────────────────────────────────────────────

/// Runtime for one station connection.
///
/// Build with [`Controller::new`], grab a [`handle`](Self::handle) for the
/// operator side, then drive it with [`run`](Self::run).
pub struct Controller {
    config: StationConfig,
    client: StationClient,
    stream_url: Url,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    cancel: CancellationToken,
}

impl Controller {
    /// Create a controller. Does NOT connect; the stream opens when
    /// [`run`](Self::run) starts.
    pub fn new(config: StationConfig) -> Result<Self, CoreError> {
        let client = StationClient::new(config.url.clone(), &config.transport())?;
        let stream_url = config.stream_endpoint()?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            client,
            stream_url,
            tx,
            rx,
            cancel: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn stream_url(&self) -> &Url {
        &self.stream_url
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.tx.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// Open the stream and process events until shutdown. Returns the
    /// session so the caller can inspect the final state.
    pub async fn run<R: Renderer>(mut self, renderer: R) -> Session<R> {
        let mut session = Session::new(&self.config, renderer);
        info!(station = %self.config.url, stream = %self.stream_url, "controller starting");

        if let Some(effect) = session.handle(SessionEvent::Start) {
            self.execute(effect);
        }

        loop {
            let event = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                event = self.rx.recv() => {
                    let Some(event) = event else { break };
                    event
                }
            };

            if let Some(effect) = session.handle(event) {
                self.execute(effect);
            }
        }

        // Stops any stream, timer, or request task still running.
        self.cancel.cancel();
        info!("controller stopped");
        session
    }

    fn execute(&self, effect: Effect) {
        debug!(?effect, "executing effect");
        match effect {
            Effect::OpenStream => {
                let url = self.stream_url.clone();
                let cancel = self.cancel.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    run_stream(&url, &cancel, |event| {
                        let _ = tx.send(SessionEvent::Stream(event));
                    })
                    .await;
                });
            }
            Effect::ScheduleReconnect { attempt, delay } => {
                tokio::spawn(reconnect_timer(
                    self.tx.clone(),
                    self.cancel.clone(),
                    attempt,
                    delay,
                ));
            }
            Effect::SendCommand(request) => {
                let client = self.client.clone();
                let cancel = self.cancel.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = tokio::select! {
                        biased;
                        () = cancel.cancelled() => return,
                        result = send_command(&client, &request) => result,
                    };
                    let _ = tx.send(SessionEvent::CommandSettled { request, result });
                });
            }
        }
    }
}

/// Post `ReconnectDue` once `delay` has elapsed, unless cancelled first.
async fn reconnect_timer(
    tx: mpsc::UnboundedSender<SessionEvent>,
    cancel: CancellationToken,
    attempt: u32,
    delay: Duration,
) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {}
        () = tokio::time::sleep(delay) => {
            debug!(attempt, "reconnect timer fired");
            let _ = tx.send(SessionEvent::ReconnectDue);
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

async fn send_command(
    client: &StationClient,
    request: &CommandRequest,
) -> Result<meshradio_api::CommandAck, CoreError> {
    let ack = match request.kind {
        CommandKind::StartBroadcast => client.start_broadcast().await?,
        CommandKind::StopBroadcast => client.stop_broadcast().await?,
        CommandKind::StartListen => {
            client
                .start_listen(request.target.as_deref().unwrap_or_default())
                .await?
        }
        CommandKind::StopListen => client.stop_listen().await?,
    };
    Ok(ack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconnect::{ReconnectDecision, ReconnectPolicy};

    async fn settle_tasks() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_timer_fires_exactly_at_delay() {
        // Second failure: the next attempt is due 2000 × 2 ms later.
        let ReconnectDecision::Retry { attempt, delay } = ReconnectPolicy::default().decide(1)
        else {
            panic!("expected a retry");
        };
        assert_eq!(delay, Duration::from_millis(4000));

        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(reconnect_timer(tx, CancellationToken::new(), attempt, delay));
        settle_tasks().await;

        tokio::time::advance(delay - Duration::from_millis(1)).await;
        settle_tasks().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle_tasks().await;
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::ReconnectDue)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reconnect_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let timer = tokio::spawn(reconnect_timer(tx, cancel.clone(), 1, Duration::from_secs(2)));
        settle_tasks().await;

        cancel.cancel();
        timer.await.unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(rx.recv().await.is_none());
    }
}
