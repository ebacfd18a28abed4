/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `flakebatch` can emit.
///
/// Generation itself is lock-free and cannot fail; the only runtime failure
/// is [`Error::Exhausted`], raised by an [`IdSource`] that gave up waiting
/// for the generator to make progress.
///
/// [`IdSource`]: crate::IdSource
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The machine id does not fit the layout's machine id field.
    #[error("machine id {machine_id} exceeds the maximum of {max}")]
    MachineIdOutOfRange { machine_id: u64, max: u64 },

    /// The wall clock reads earlier than the requested epoch, so no
    /// non-negative timestamp can be produced.
    #[error("system clock is earlier than the configured epoch")]
    ClockBeforeEpoch,

    /// The generator stayed pending for the whole attempt budget.
    #[error("no identifier produced after {attempts} attempts")]
    Exhausted { attempts: usize },

    /// A character outside the Crockford alphabet was found while decoding.
    #[error("invalid base32 byte {byte:#04x} at index {index}")]
    DecodeInvalidAscii { byte: u8, index: usize },

    /// The encoded string has the wrong length.
    #[error("invalid base32 length {len}, expected {expected}")]
    DecodeInvalidLen { len: usize, expected: usize },

    /// The encoded string represents a value wider than 64 bits.
    #[error("base32 value overflows 64 bits")]
    DecodeOverflow,
}
