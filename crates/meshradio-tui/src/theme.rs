//! Console palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

use meshradio_core::{ControlState, ModeStyle, Severity};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for the panel currently taking input.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Field labels ("Address", "Station", ...).
pub fn label() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn value() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Mode badge. Untagged (idle) badges stay dim.
pub fn mode_badge(style: Option<ModeStyle>) -> Style {
    match style {
        None => Style::default().fg(DIM_WHITE),
        Some(ModeStyle::Broadcasting) => Style::default()
            .fg(CORAL)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        Some(ModeStyle::Listening) => Style::default()
            .fg(NEON_CYAN)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
    }
}

pub fn control_state(state: ControlState) -> Style {
    match state {
        ControlState::Inactive => Style::default().fg(DIM_WHITE),
        ControlState::Starting | ControlState::Stopping => Style::default()
            .fg(ELECTRIC_YELLOW)
            .add_modifier(Modifier::ITALIC),
        ControlState::Active => Style::default()
            .fg(SUCCESS_GREEN)
            .add_modifier(Modifier::BOLD),
    }
}

pub fn severity(severity: Severity) -> Style {
    match severity {
        Severity::Info => Style::default().fg(DIM_WHITE),
        Severity::Success => Style::default().fg(SUCCESS_GREEN),
        Severity::Error => Style::default().fg(ERROR_RED),
    }
}
