//! Variable-length encoding for unsigned 32-bit values.
//!
//! Format:
//! - Values below `0xCF` take a single byte holding `value + 1`, so the byte is never zero.
//! - Larger values start with a descriptor byte `(0xF0 | mask) - 1`, followed by the
//!   non-zero bytes of the value in big-endian order. Bit 3 of `mask` flags the most
//!   significant byte, bit 0 the least significant one.
//!
//! Zero bytes are never written, which makes the encoding canonical: a value has
//! exactly one minimal form and [`encoded_size_u32`] predicts its length.
//!
//! Example (doctest ignored because the module is crate-private):
//! ```ignore
//! let mut buf = Vec::new();
//! encode_u32(0x1234, &mut |b| buf.extend_from_slice(b));
//! assert_eq!(buf, [0xF2, 0x12, 0x34]);
//! ```
use crate::{
    encoding::{
        magic::{INT_PACKED_MAX, INT_PACKED_MIN, INT_SMALL_MAX, INT_SMALL_MIN},
        take_byte,
    },
    error::{DecodeError, DecodeResult},
};

/// Largest value stored in the single-byte form.
pub const MAX_INLINE_VALUE: u32 = (INT_SMALL_MAX - 1) as u32;

/// Encode `value` and feed the bytes to `encoder`. Returns the number of bytes written.
pub fn encode_u32<F: FnMut(&[u8])>(value: u32, encoder: &mut F) -> usize {
    if value <= MAX_INLINE_VALUE {
        encoder(&[value as u8 + 1]);
        return 1;
    }

    let be = value.to_be_bytes();
    let mut bytes = [0u8; 5];
    let mut len = 1;
    let mut mask = 0u8;

    // be[0] is the most significant byte and maps to mask bit 3.
    for (i, &b) in be.iter().enumerate() {
        if b != 0 {
            mask |= 1 << (3 - i);
            bytes[len] = b;
            len += 1;
        }
    }

    bytes[0] = (INT_PACKED_MIN | mask) - 1;
    encoder(&bytes[..len]);
    len
}

/// Decode one value whose descriptor byte has already been consumed.
///
/// Used by the expression decoder, which reads the type byte before knowing
/// it is an integer.
pub fn decode_u32_with_type(type_byte: u8, buf: &mut &[u8]) -> DecodeResult<u32> {
    match type_byte {
        INT_SMALL_MIN..=INT_SMALL_MAX => Ok((type_byte - 1) as u32),
        INT_PACKED_MIN..=INT_PACKED_MAX => {
            let mask = (type_byte + 1) & 0x0F;
            let mut value = 0u32;
            for bit in (0..4).rev() {
                if mask & (1 << bit) != 0 {
                    let b = take_byte(buf, "integer value byte")?;
                    value |= (b as u32) << (8 * bit);
                }
            }
            Ok(value)
        }
        other => Err(DecodeError::InvalidIntegerDescriptor(other)),
    }
}

/// Decode one value from the front of `buf`, advancing it past the consumed bytes.
pub fn decode_u32(buf: &mut &[u8]) -> DecodeResult<u32> {
    let type_byte = take_byte(buf, "integer descriptor")?;
    decode_u32_with_type(type_byte, buf)
}

/// Number of bytes [`encode_u32`] writes for `value`.
pub fn encoded_size_u32(value: u32) -> usize {
    if value <= MAX_INLINE_VALUE {
        return 1;
    }
    1 + value.to_be_bytes().iter().filter(|&&b| b != 0).count()
}
