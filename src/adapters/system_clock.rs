//! Clock adapters: the real wall clock, and a pinned one for tests and replays.

use crate::ports::clock_port::Clock;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Always reports the same epoch-seconds value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_pinned() {
        let clock = FixedClock(1_740_985_800);
        assert_eq!(clock.now_epoch_seconds(), 1_740_985_800);
        assert_eq!((&clock).now_epoch_seconds(), 1_740_985_800);
    }

    #[test]
    fn system_clock_is_recent() {
        // 2023-11-14, well before any machine running this.
        assert!(SystemClock.now_epoch_seconds() > 1_700_000_000);
    }
}
