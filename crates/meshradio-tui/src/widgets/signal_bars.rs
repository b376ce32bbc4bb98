//! Listening signal strength bars (▂▄▆█) with color thresholds.

use ratatui::style::Style;
use ratatui::text::Span;

use crate::theme;

/// Returns a styled `Span` with signal bars for a 0–100 percentage.
///
/// | Bars    | Percent | Color          |
/// |---------|---------|----------------|
/// | `▂▄▆█` | >= 75   | Success Green  |
/// | `▂▄▆ ` | 50–74   | Neon Cyan      |
/// | `▂▄  ` | 25–49   | Electric Yellow|
/// | `▂   ` | 1–24    | Coral          |
/// | `·   ` | 0       | Error Red      |
pub fn signal_span(percent: u8) -> Span<'static> {
    let (bars, color) = match percent {
        75.. => ("▂▄▆█", theme::SUCCESS_GREEN),
        50..=74 => ("▂▄▆ ", theme::NEON_CYAN),
        25..=49 => ("▂▄  ", theme::ELECTRIC_YELLOW),
        1..=24 => ("▂   ", theme::CORAL),
        0 => ("·   ", theme::ERROR_RED),
    };

    Span::styled(bars, Style::default().fg(color))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(signal_span(0).content, "·   ");
        assert_eq!(signal_span(10).content, "▂   ");
        assert_eq!(signal_span(50).content, "▂▄▆ ");
        assert_eq!(signal_span(99).content, "▂▄▆█");
    }
}
