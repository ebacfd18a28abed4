use core::fmt;

use crate::{ENCODED_LEN, Result, decode_base32, encode_base32};

/// A 64-bit Snowflake identifier in the Twitter layout.
///
/// ```text
///  Bit Index:  63           63 62            22 21             12 11             0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | machine ID (10) | sequence (12) |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
///
/// The reserved bit is always zero. Ordering on the raw value is ordering by
/// timestamp, then machine id, then sequence.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const MACHINE_ID_BITS: u32 = 10;
    pub const SEQUENCE_BITS: u32 = 12;

    const SEQUENCE_SHIFT: u32 = 0;
    const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
    const TIMESTAMP_SHIFT: u32 = Self::MACHINE_ID_SHIFT + Self::MACHINE_ID_BITS;

    const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    const MACHINE_ID_MASK: u64 = (1 << Self::MACHINE_ID_BITS) - 1;
    const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Builds an ID from its components. Out-of-range components are
    /// truncated to their field width.
    #[must_use]
    pub const fn from_components(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(machine_id <= Self::MACHINE_ID_MASK, "machine_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");

        let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let m = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self { id: t | m | s }
    }

    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    #[must_use]
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    #[must_use]
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    #[must_use]
    pub const fn max_machine_id() -> u64 {
        Self::MACHINE_ID_MASK
    }

    #[must_use]
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns `true` if the sequence can be incremented within the current
    /// millisecond.
    #[must_use]
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns the same ID with the sequence bumped by one.
    ///
    /// Callers must check [`Self::has_sequence_room`] first.
    #[must_use]
    pub const fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.machine_id(), self.sequence() + 1)
    }

    /// Moves the ID to a new millisecond, resetting the sequence.
    #[must_use]
    pub const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.machine_id(), 0)
    }

    /// Writes the fixed-width Crockford Base32 form into `buf`.
    pub fn encode_into(&self, buf: &mut [u8; ENCODED_LEN]) {
        encode_base32(self.id, buf);
    }

    /// Returns the fixed-width Crockford Base32 form, e.g. `"01JGXB5VY0000"`.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buf = [0_u8; ENCODED_LEN];
        self.encode_into(&mut buf);
        buf.iter().copied().map(char::from).collect()
    }

    /// Parses the Crockford Base32 form produced by [`Self::encode`].
    ///
    /// # Errors
    ///
    /// Returns a decode error if the input is not a valid 13-character
    /// Crockford string.
    pub fn decode(encoded: &str) -> Result<Self> {
        decode_base32(encoded).map(Self::from_raw)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("{:#018x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_round_trip_through_layout() {
        let id = SnowflakeId::from_components(
            SnowflakeId::max_timestamp(),
            SnowflakeId::max_machine_id(),
            SnowflakeId::max_sequence(),
        );
        assert_eq!(id.timestamp(), SnowflakeId::max_timestamp());
        assert_eq!(id.machine_id(), SnowflakeId::max_machine_id());
        assert_eq!(id.sequence(), SnowflakeId::max_sequence());
        // reserved bit stays clear
        assert_eq!(id.to_raw() >> 63, 0);
        assert_eq!(id.to_raw(), u64::MAX >> 1);
    }

    #[test]
    fn sequence_and_rollover() {
        let id = SnowflakeId::from_components(7, 3, 0);
        let next = id.increment_sequence();
        assert_eq!(next.sequence(), 1);
        assert_eq!(next.timestamp(), 7);
        assert!(next > id);

        let full = SnowflakeId::from_components(7, 3, SnowflakeId::max_sequence());
        assert!(!full.has_sequence_room());

        let rolled = full.rollover_to_timestamp(8);
        assert_eq!(rolled.timestamp(), 8);
        assert_eq!(rolled.machine_id(), 3);
        assert_eq!(rolled.sequence(), 0);
        assert!(rolled > full);
    }

    #[test]
    fn encode_is_fixed_width_and_decodable() {
        let id = SnowflakeId::from_components(123_456_789, 42, 17);
        let encoded = id.encode();
        assert_eq!(encoded.len(), ENCODED_LEN);
        assert_eq!(SnowflakeId::decode(&encoded).unwrap(), id);
        assert_eq!(SnowflakeId::default().encode(), "0000000000000");
    }
}
