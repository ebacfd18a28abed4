//! Crockford Base32 for 64-bit identifiers.
//!
//! A `u64` is written as [`ENCODED_LEN`] characters, most significant first.
//! Thirteen characters carry 65 bits, so the leading character only ever
//! holds the top 4 bits (`0`..=`F`). The encoding is fixed width, which keeps
//! lexicographic order identical to numeric order.

use crate::{Error, Result};

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: u32 = 5;

/// Number of characters needed to encode a `u64`.
pub const ENCODED_LEN: usize = 13;

/// Lookup table for decoding, accepting lower-case letters and the Crockford
/// aliases `O`, `I` and `L`.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i;
        }
        i += 1;
    }
    lut[b'O' as usize] = 0;
    lut[b'o' as usize] = 0;
    lut[b'I' as usize] = 1;
    lut[b'i' as usize] = 1;
    lut[b'L' as usize] = 1;
    lut[b'l' as usize] = 1;
    lut
};

/// Encodes `value` into `buf`, most significant character first.
pub fn encode_base32(value: u64, buf: &mut [u8; ENCODED_LEN]) {
    for (i, slot) in buf.iter_mut().enumerate() {
        let shift = BITS_PER_CHAR * (ENCODED_LEN - 1 - i) as u32;
        *slot = ALPHABET[((value >> shift) & 0x1F) as usize];
    }
}

/// Decodes a fixed-width Crockford Base32 string into a `u64`.
///
/// # Errors
///
/// - [`Error::DecodeInvalidLen`] if `encoded` is not [`ENCODED_LEN`] bytes.
/// - [`Error::DecodeInvalidAscii`] on a byte outside the alphabet.
/// - [`Error::DecodeOverflow`] if the leading character exceeds `F`.
pub fn decode_base32(encoded: &str) -> Result<u64> {
    if encoded.len() != ENCODED_LEN {
        return Err(Error::DecodeInvalidLen {
            len: encoded.len(),
            expected: ENCODED_LEN,
        });
    }

    let mut acc = 0_u64;
    for (index, byte) in encoded.bytes().enumerate() {
        let val = LOOKUP[byte as usize];
        if val == NO_VALUE {
            return Err(Error::DecodeInvalidAscii { byte, index });
        }
        if index == 0 && val > 0x0F {
            return Err(Error::DecodeOverflow);
        }
        acc = (acc << BITS_PER_CHAR) | u64::from(val);
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> String {
        let mut buf = [0_u8; ENCODED_LEN];
        encode_base32(value, &mut buf);
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn encodes_extremes() {
        assert_eq!(encode(0), "0000000000000");
        assert_eq!(encode(u64::MAX), "FZZZZZZZZZZZZ");
        assert_eq!(encode(31), "000000000000Z");
        assert_eq!(encode(32), "0000000000010");
    }

    #[test]
    fn preserves_ordering() {
        let values = [0, 1, 31, 32, 1 << 22, u64::from(u32::MAX), u64::MAX - 1];
        let encoded: Vec<_> = values.iter().copied().map(encode).collect();
        let mut sorted = encoded.clone();
        sorted.sort();
        assert_eq!(encoded, sorted);
    }

    #[test]
    fn decode_accepts_aliases_and_lowercase() {
        assert_eq!(decode_base32("oooooooooooo1").unwrap(), 1);
        assert_eq!(decode_base32("000000000000L").unwrap(), 1);
        assert_eq!(decode_base32("fzzzzzzzzzzzz").unwrap(), u64::MAX);
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(
            decode_base32("000"),
            Err(Error::DecodeInvalidLen {
                len: 3,
                expected: ENCODED_LEN
            })
        );
        assert_eq!(
            decode_base32("00000000000U0"),
            Err(Error::DecodeInvalidAscii {
                byte: b'U',
                index: 11
            })
        );
        assert_eq!(decode_base32("G000000000000"), Err(Error::DecodeOverflow));
    }
}
