//! The identifier capability consumed by issuing services.
//!
//! [`IdSource`] is deliberately tiny: one call, one new identifier. Services
//! hold it as `Arc<dyn IdSource>` so any concurrency-safe implementation can
//! be substituted, including test doubles.

use core::time::Duration;
use std::sync::Arc;

use crate::{AtomicSnowflakeGenerator, Error, IdGenStatus, Result, TimeSource};

/// Default number of attempts [`SnowflakeSource`] makes before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// Produces globally unique, opaque, non-empty string identifiers.
///
/// Implementations must be safe to call from many threads at once without
/// any locking on the caller's side.
pub trait IdSource: Send + Sync {
    /// Produces one new identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no identifier could be produced. Callers must
    /// treat this as fatal for whatever batch they are building.
    fn try_next_id(&self) -> Result<String>;
}

impl<S: IdSource + ?Sized> IdSource for Arc<S> {
    fn try_next_id(&self) -> Result<String> {
        (**self).try_next_id()
    }
}

impl<S: IdSource + ?Sized> IdSource for &S {
    fn try_next_id(&self) -> Result<String> {
        (**self).try_next_id()
    }
}

/// How a [`SnowflakeSource`] waits when the generator reports
/// [`IdGenStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Busy-waits in a tight loop.
    ///
    /// Offers maximum throughput at the cost of high CPU usage.
    Spin,

    /// Yields to the OS scheduler to allow other threads to run.
    #[default]
    Yield,

    /// Sleeps for the suggested delay in milliseconds.
    ///
    /// Lowest CPU usage, but may oversleep depending on scheduler resolution.
    Sleep,
}

impl Backoff {
    fn wait(self, yield_for: u64) {
        match self {
            Self::Spin => core::hint::spin_loop(),
            Self::Yield => std::thread::yield_now(),
            Self::Sleep if yield_for == 0 => std::thread::yield_now(),
            Self::Sleep => std::thread::sleep(Duration::from_millis(yield_for)),
        }
    }
}

/// An [`IdSource`] backed by an [`AtomicSnowflakeGenerator`].
///
/// Identifiers are the 13-character Crockford Base32 form of the raw ID.
pub struct SnowflakeSource<T>
where
    T: TimeSource,
{
    generator: AtomicSnowflakeGenerator<T>,
    backoff: Backoff,
    max_attempts: usize,
}

impl<T> SnowflakeSource<T>
where
    T: TimeSource,
{
    pub const fn new(generator: AtomicSnowflakeGenerator<T>, backoff: Backoff) -> Self {
        Self {
            generator,
            backoff,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Caps how many pending results are tolerated per identifier before
    /// [`Error::Exhausted`] is returned. A value of zero is treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    pub const fn generator(&self) -> &AtomicSnowflakeGenerator<T> {
        &self.generator
    }
}

impl<T> IdSource for SnowflakeSource<T>
where
    T: TimeSource + Send + Sync,
{
    fn try_next_id(&self) -> Result<String> {
        for _ in 0..self.max_attempts {
            match self.generator.next_id() {
                IdGenStatus::Ready { id } => return Ok(id.encode()),
                IdGenStatus::Pending { yield_for } => self.backoff.wait(yield_for),
            }
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            attempts = self.max_attempts,
            "generator stayed pending for the whole attempt budget"
        );
        Err(Error::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MonotonicClock, SnowflakeId};
    use std::collections::HashSet;

    struct FixedTime;

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            42
        }
    }

    #[test]
    fn produces_decodable_identifiers() {
        let generator = AtomicSnowflakeGenerator::new(5, MonotonicClock::new().unwrap()).unwrap();
        let source = SnowflakeSource::new(generator, Backoff::Yield);

        let id = source.try_next_id().unwrap();
        assert!(!id.is_empty());
        assert_eq!(SnowflakeId::decode(&id).unwrap().machine_id(), 5);
    }

    #[test]
    fn exhausted_when_clock_never_advances() {
        let generator = AtomicSnowflakeGenerator::from_components(
            42,
            0,
            SnowflakeId::max_sequence(),
            FixedTime,
        );
        let source = SnowflakeSource::new(generator, Backoff::Spin).with_max_attempts(3);

        assert_eq!(
            source.try_next_id(),
            Err(Error::Exhausted { attempts: 3 })
        );
    }

    #[test]
    fn sequence_exhaustion_waits_for_next_millisecond() {
        let generator = AtomicSnowflakeGenerator::new(0, MonotonicClock::new().unwrap()).unwrap();
        let source = SnowflakeSource::new(generator, Backoff::Sleep);

        // More than one millisecond's worth of sequence space.
        let count = (SnowflakeId::max_sequence() as usize + 1) * 2;
        let ids: HashSet<_> = (0..count).map(|_| source.try_next_id().unwrap()).collect();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn shared_through_arc_dyn() {
        let generator = AtomicSnowflakeGenerator::new(1, MonotonicClock::new().unwrap()).unwrap();
        let source: Arc<dyn IdSource> = Arc::new(SnowflakeSource::new(generator, Backoff::Yield));

        let a = source.try_next_id().unwrap();
        let b = Arc::clone(&source).try_next_id().unwrap();
        assert_ne!(a, b);
    }
}
