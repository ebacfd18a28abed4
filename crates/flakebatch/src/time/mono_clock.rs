use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::{CUSTOM_EPOCH, Error, Result, TimeSource};

/// A monotonic time source that returns elapsed time since construction,
/// offset from a chosen epoch.
///
/// The wall clock is read exactly once, when the clock is built, to compute
/// the distance to the epoch. Every later reading comes from [`Instant`], so
/// NTP steps or manual clock changes can never move timestamps backward.
///
/// Clones share the same origin and therefore agree on the current time.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: u64,
}

impl MonotonicClock {
    /// Builds a clock aligned to [`CUSTOM_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads earlier
    /// than the epoch.
    pub fn new() -> Result<Self> {
        Self::with_epoch(CUSTOM_EPOCH)
    }

    /// Builds a clock whose zero point is `epoch`, given as a [`Duration`]
    /// since 1970-01-01 UTC.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads earlier
    /// than `epoch`.
    pub fn with_epoch(epoch: Duration) -> Result<Self> {
        let start = Instant::now();
        let offset = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|now| now.checked_sub(epoch))
            .ok_or(Error::ClockBeforeEpoch)?;

        Ok(Self {
            start,
            epoch_offset: u64::try_from(offset.as_millis()).unwrap_or(u64::MAX),
        })
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        let elapsed = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.epoch_offset.saturating_add(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_goes_backward() {
        let clock = MonotonicClock::new().unwrap();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_real_time() {
        let clock = MonotonicClock::new().unwrap();
        let before = clock.current_millis();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.current_millis() >= before + 5);
    }

    #[test]
    fn rejects_future_epoch() {
        let future = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .saturating_add(Duration::from_secs(3600));
        assert_eq!(
            MonotonicClock::with_epoch(future).unwrap_err(),
            Error::ClockBeforeEpoch
        );
    }
}
