use core::cmp;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdGenStatus, Result, SnowflakeId, TimeSource};

/// A lock-free Snowflake ID generator suitable for multi-threaded environments.
///
/// The last issued ID is stored in a single [`AtomicU64`] and advanced with a
/// compare-and-swap, so one instance can be shared by reference (or behind an
/// `Arc`) across any number of threads or tasks without external locking.
/// Every successful call returns an ID strictly greater than any previously
/// returned by the same instance.
///
/// ## Caveats
/// Contended threads may observe [`IdGenStatus::Pending`] with `yield_for ==
/// 0` when they lose a race; callers are expected to retry.
pub struct AtomicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    time: T,
}

impl<T> AtomicSnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `machine_id`, reading time from `time`.
    ///
    /// The initial state is timestamp zero, so the first call always rolls
    /// over to the current millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MachineIdOutOfRange`] if `machine_id` does not fit
    /// the 10-bit machine field.
    ///
    /// # Example
    /// ```
    /// use flakebatch::{AtomicSnowflakeGenerator, IdGenStatus, MonotonicClock};
    ///
    /// let generator = AtomicSnowflakeGenerator::new(0, MonotonicClock::new().unwrap()).unwrap();
    ///
    /// let id = loop {
    ///     match generator.next_id() {
    ///         IdGenStatus::Ready { id } => break id,
    ///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert_eq!(id.machine_id(), 0);
    /// ```
    pub fn new(machine_id: u64, time: T) -> Result<Self> {
        let max = SnowflakeId::max_machine_id();
        if machine_id > max {
            return Err(Error::MachineIdOutOfRange { machine_id, max });
        }
        Ok(Self::from_components(0, machine_id, 0, time))
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// Mostly useful for tests and for resuming from a known last ID.
    /// Components wider than their field are truncated.
    pub fn from_components(timestamp: u64, machine_id: u64, sequence: u64, time: T) -> Self {
        let initial = SnowflakeId::from_components(timestamp, machine_id, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial.to_raw())),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial.to_raw()),
            time,
        }
    }

    /// The machine id embedded in every ID from this generator.
    pub fn machine_id(&self) -> u64 {
        SnowflakeId::from_raw(self.state.load(Ordering::Relaxed)).machine_id()
    }

    /// Attempts to generate the next ID.
    ///
    /// - Same millisecond as the last ID: bump the sequence, or return
    ///   `Pending { yield_for: 1 }` when the sequence is exhausted.
    /// - Later millisecond: roll over with the sequence reset to zero.
    /// - Earlier millisecond (clock behind state): return `Pending` for the
    ///   gap.
    /// - Lost CAS race: return `Pending { yield_for: 0 }`.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> IdGenStatus {
        let now = self.time.current_millis();

        let current_raw = self.state.load(Ordering::Relaxed);
        let current_id = SnowflakeId::from_raw(current_raw);
        let current_ts = current_id.timestamp();

        let next_id = match now.cmp(&current_ts) {
            cmp::Ordering::Equal => {
                if current_id.has_sequence_room() {
                    current_id.increment_sequence()
                } else {
                    return IdGenStatus::Pending { yield_for: 1 };
                }
            }
            cmp::Ordering::Greater => current_id.rollover_to_timestamp(now),
            cmp::Ordering::Less => return Self::cold_clock_behind(now, current_ts),
        };

        if self
            .state
            .compare_exchange(
                current_raw,
                next_id.to_raw(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            IdGenStatus::Ready { id: next_id }
        } else {
            IdGenStatus::Pending { yield_for: 0 }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, current_ts: u64) -> IdGenStatus {
        IdGenStatus::Pending {
            yield_for: current_ts - now,
        }
    }
}
