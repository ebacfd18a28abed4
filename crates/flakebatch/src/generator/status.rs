use crate::SnowflakeId;

/// The outcome of one generation attempt.
///
/// Generators never block. When they cannot make progress they return
/// [`IdGenStatus::Pending`] and leave the waiting strategy to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be produced right now.
    ///
    /// `yield_for` is the suggested wait in milliseconds. Zero means another
    /// thread won a race and the caller should retry immediately.
    Pending {
        /// Milliseconds to wait before retrying.
        yield_for: u64,
    },
}
