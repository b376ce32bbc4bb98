//! Ambient audio-level meter shown while the station is broadcasting.
//!
//! The station does not report levels, so the meter is decoration: it
//! wanders between 40% and 80% on every tick.

/// Lowest level the meter shows while active.
pub const MIN_LEVEL: u16 = 40;
/// Highest level the meter shows while active.
pub const MAX_LEVEL: u16 = 80;

/// Animated level source.
#[derive(Debug, Clone)]
pub struct LevelMeter {
    seed: u32,
    level: u16,
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new(0x9E37_79B9)
    }
}

impl LevelMeter {
    pub fn new(seed: u32) -> Self {
        Self { seed, level: 0 }
    }

    /// Current level in percent; 0 while idle.
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Advance one animation frame. Inactive meters drop to zero.
    pub fn tick(&mut self, active: bool) {
        if !active {
            self.level = 0;
            return;
        }
        // xorshift32
        self.seed ^= self.seed << 13;
        self.seed ^= self.seed >> 17;
        self.seed ^= self.seed << 5;
        let span = u32::from(MAX_LEVEL - MIN_LEVEL + 1);
        let offset = u16::try_from(self.seed % span).unwrap_or(0);
        self.level = MIN_LEVEL + offset;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn stays_in_band_while_active() {
        let mut meter = LevelMeter::default();
        for _ in 0..500 {
            meter.tick(true);
            assert!((MIN_LEVEL..=MAX_LEVEL).contains(&meter.level()), "{}", meter.level());
        }
    }

    #[test]
    fn drops_to_zero_when_inactive() {
        let mut meter = LevelMeter::default();
        meter.tick(true);
        meter.tick(false);
        assert_eq!(meter.level(), 0);
    }
}
