//! Application core: event loop, key mapping, action dispatch, rendering.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, List, ListItem, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use meshradio_core::{
    Control, ControlState, ControllerHandle, LOG_CAPACITY, LogEntry, Mode, StationConfig,
    StationSnapshot, StationView,
};

use crate::action::Action;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::widgets::level_meter::LevelMeter;
use crate::widgets::signal_bars::signal_span;

const TICK_RATE: Duration = Duration::from_millis(200);
const RENDER_RATE: Duration = Duration::from_millis(33);

/// Longest textual IPv6 address.
const MAX_TARGET_LEN: usize = 45;

/// Top-level console state and event loop.
pub struct App {
    running: bool,
    /// Station origin, shown in the header.
    station: String,
    connected: bool,
    view: StationView,
    broadcast: ControlState,
    listen: ControlState,
    /// Mirror of the activity log, newest first.
    log: VecDeque<LogEntry>,
    /// Listen target being typed by the operator.
    target: String,
    editing: bool,
    meter: LevelMeter,
    controller: ControllerHandle,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(controller: ControllerHandle, config: &StationConfig) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            station: config.url.to_string(),
            connected: false,
            view: StationView::project(&StationSnapshot::idle(), config.broadcast_port),
            broadcast: ControlState::Inactive,
            listen: ControlState::Inactive,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            target: String::new(),
            editing: false,
            meter: LevelMeter::default(),
            controller,
            action_tx,
            action_rx,
        }
    }

    /// Sender for background producers (the renderer bridge).
    pub fn action_sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Run the main event loop until the operator quits.
    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut events = EventReader::new(TICK_RATE, RENDER_RATE);
        info!("console event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key),
                Event::Tick => Some(Action::Tick),
                Event::Render | Event::Resize => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                let render = action == Action::Render;
                self.process_action(action);
                if render {
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.controller.shutdown();
        info!("console event loop ended");
        Ok(())
    }

    /// Map a key event to an action.
    fn handle_key_event(&self, key: KeyEvent) -> Option<Action> {
        if (key.modifiers, key.code) == (KeyModifiers::CONTROL, KeyCode::Char('c')) {
            return Some(Action::Quit);
        }

        if self.editing {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Action::StopEditing),
                KeyCode::Backspace => Some(Action::InputBackspace),
                KeyCode::Char(c) => Some(Action::InputChar(c)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('b') => Some(Action::ToggleBroadcast),
            KeyCode::Char('l') => Some(Action::ToggleListen),
            KeyCode::Char('i') => Some(Action::StartEditing),
            _ => None,
        }
    }

    /// Process a single action.
    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Tick => self.meter.tick(self.view.mode == Mode::Broadcasting),
            Action::Render => {}

            Action::ConnectionChanged(connected) => self.connected = connected,
            Action::StationUpdated(view) => {
                debug!(mode = %view.mode, "station view updated");
                self.view = view;
            }
            Action::ControlChanged(Control::Broadcast, state) => self.broadcast = state,
            Action::ControlChanged(Control::Listen, state) => self.listen = state,
            Action::LogAppended(entry) => {
                self.log.push_front(entry);
                self.log.truncate(LOG_CAPACITY);
            }

            Action::ToggleBroadcast => {
                if let Err(e) = self.controller.toggle_broadcast() {
                    warn!(error = %e, "broadcast toggle not delivered");
                }
            }
            Action::ToggleListen => {
                if let Err(e) = self.controller.toggle_listen(self.target.clone()) {
                    warn!(error = %e, "listen toggle not delivered");
                }
            }

            Action::StartEditing => self.editing = true,
            Action::StopEditing => self.editing = false,
            Action::InputChar(c) => {
                if self.target.chars().count() < MAX_TARGET_LEN {
                    self.target.push(c);
                }
            }
            Action::InputBackspace => {
                self.target.pop();
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Render the full console frame.
    fn render(&self, frame: &mut Frame) {
        let [header, controls, log, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let [broadcast, listen] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(controls);

        self.render_header(frame, header);
        self.render_broadcast(frame, broadcast);
        self.render_listen(frame, listen);
        self.render_log(frame, log);
        self.render_status_bar(frame, status);
    }

    fn panel(title: &str, focused: bool) -> Block<'_> {
        Block::default()
            .title(Span::styled(format!(" {title} "), theme::title_style()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
    }

    fn field<'a>(label: &'a str, value: impl Into<Span<'a>>) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("{label:<9}"), theme::label()),
            value.into(),
        ])
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let badge = Span::styled(
            format!(" {} ", self.view.badge.label),
            theme::mode_badge(self.view.badge.style),
        );
        let line = Line::from(vec![
            Span::styled("Callsign ", theme::label()),
            Span::styled(self.view.callsign.as_str(), theme::value()),
            Span::raw("   "),
            Span::styled("Address ", theme::label()),
            Span::styled(self.view.address.as_str(), theme::value()),
            Span::raw("   "),
            badge,
        ]);

        let block = Self::panel("MeshRadio", false)
            .title_bottom(Span::styled(format!(" {} ", self.station), theme::key_hint()));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_broadcast(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("Broadcast", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [text, meter] =
            Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).areas(inner);

        let lines = vec![
            Self::field(
                "State",
                Span::styled(self.broadcast.to_string(), theme::control_state(self.broadcast)),
            ),
            Self::field(
                "Address",
                Span::styled(
                    self.view.broadcast_address.as_deref().unwrap_or("-"),
                    theme::value(),
                ),
            ),
        ];
        frame.render_widget(Paragraph::new(lines), text);

        let level = self.meter.level();
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme::CORAL))
            .percent(level)
            .label(format!("level {level}%"));
        frame.render_widget(gauge, meter);
    }

    fn render_listen(&self, frame: &mut Frame, area: Rect) {
        let block = Self::panel("Listen", self.editing);

        let target = if self.editing {
            Span::styled(format!("{}▏", self.target), theme::key_hint_key())
        } else if self.target.is_empty() {
            Span::styled("press i to enter an IPv6 address", theme::key_hint())
        } else {
            Span::styled(self.target.as_str(), theme::value())
        };

        let mut lines = vec![
            Self::field(
                "State",
                Span::styled(self.listen.to_string(), theme::control_state(self.listen)),
            ),
            Self::field("Target", target),
        ];

        if let Some(listen) = &self.view.listen {
            lines.push(Self::field(
                "Station",
                Span::styled(listen.station_name.as_str(), theme::value()),
            ));
            lines.push(Self::field(
                "Packets",
                Span::styled(listen.packet_count.to_string(), theme::value()),
            ));
            lines.push(Line::from(vec![
                Span::styled(format!("{:<9}", "Signal"), theme::label()),
                signal_span(listen.signal_percent),
                Span::styled(format!(" {}%", listen.signal_percent), theme::value()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .log
            .iter()
            .map(|entry| {
                let stamp = entry.timestamp.with_timezone(&Local).format("%H:%M:%S");
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{stamp} "), theme::key_hint()),
                    Span::styled(entry.message.as_str(), theme::severity(entry.severity)),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(Self::panel("Activity", false)), area);
    }

    /// Render the bottom status bar with link status and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = if self.connected {
            Span::styled("● connected", Style::default().fg(theme::SUCCESS_GREEN))
        } else {
            Span::styled("○ disconnected", Style::default().fg(theme::ERROR_RED))
        };

        let hints: &[(&str, &str)] = if self.editing {
            &[("Enter", "done"), ("Esc", "done")]
        } else {
            &[("b", "broadcast"), ("l", "listen"), ("i", "target"), ("q", "quit")]
        };

        let mut spans = vec![Span::raw(" "), indicator, Span::styled(" │", theme::key_hint())];
        for (key, what) in hints {
            spans.push(Span::styled(format!(" {key}"), theme::key_hint_key()));
            spans.push(Span::styled(format!(" {what} "), theme::key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
