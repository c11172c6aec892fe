//! Low-level encoding utilities shared by expressions and payloads.
//!
//! Decoders follow one convention: they take a `&mut &[u8]` cursor, consume
//! exactly the bytes of the value they decode, and leave the rest of the
//! slice in place.
use smallvec::SmallVec;

use crate::error::{DecodeError, DecodeResult};

pub mod integer;
pub mod magic;

/// A small, stack-allocated-first buffer used by the encoder.
///
/// Backed by `smallvec`, this stores up to 32 bytes inline before spilling to the heap.
pub type DynBuf = SmallVec<[u8; 32]>;

/// Trait for values that can append their wire encoding to a byte sink.
pub trait RawEncodable {
    /// Feed the encoding to `sink`, chunk by chunk.
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F);

    /// Exact number of bytes [`RawEncodable::encode_raw`] produces.
    fn encoded_size(&self) -> usize;

    fn encode_dynbuf(&self, buf: &mut DynBuf) {
        self.encode_raw(&mut |b| buf.extend_from_slice(b));
    }

    fn encode_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_size());
        self.encode_raw(&mut |b| out.extend_from_slice(b));
        out
    }
}

impl<T: RawEncodable> RawEncodable for &T {
    #[inline]
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F) {
        (*self).encode_raw(sink)
    }

    #[inline]
    fn encoded_size(&self) -> usize {
        (*self).encoded_size()
    }
}

/// Append a length prefix using the integer codec.
#[inline]
pub(crate) fn push_len<F: FnMut(&[u8])>(len: usize, sink: &mut F) {
    integer::encode_u32(len as u32, sink);
}

/// Consume one byte, reporting `expected` when the input is exhausted.
#[inline]
pub(crate) fn take_byte(buf: &mut &[u8], expected: &'static str) -> DecodeResult<u8> {
    let (&first, rest) = buf
        .split_first()
        .ok_or(DecodeError::UnexpectedEnd { expected })?;
    *buf = rest;
    Ok(first)
}

/// Consume `len` bytes, reporting `expected` when fewer remain.
#[inline]
pub(crate) fn take_bytes<'a>(
    buf: &mut &'a [u8],
    len: usize,
    expected: &'static str,
) -> DecodeResult<&'a [u8]> {
    if buf.len() < len {
        return Err(DecodeError::UnexpectedEnd { expected });
    }
    let (head, rest) = buf.split_at(len);
    *buf = rest;
    Ok(head)
}

/// Consume an integer-prefixed byte string.
pub(crate) fn take_len_prefixed<'a>(
    buf: &mut &'a [u8],
    expected: &'static str,
) -> DecodeResult<&'a [u8]> {
    let len = integer::decode_u32(buf)? as usize;
    take_bytes(buf, len, expected)
}
