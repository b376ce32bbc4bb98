pub mod level_meter;
pub mod signal_bars;
