use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

/// Hard decode failures.
///
/// Every variant describes a malformed byte stream. Decoding never guesses a
/// value to recover from one of these: the current value is abandoned and the
/// error is propagated to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum DecodeError {
    /// The input ended while `expected` was still being read.
    #[error("malformed macro data: unexpected end of input while reading {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// A `0x00` byte was found where an expression type byte was expected.
    #[error("malformed macro data: null byte at expression type position")]
    NulTypeByte,

    /// The byte does not belong to any expression type range.
    #[error("malformed macro data: reserved expression type byte 0x{0:02X}")]
    InvalidTypeByte(u8),

    /// The byte is not a valid integer descriptor.
    #[error("malformed macro data: invalid integer descriptor 0x{0:02X}")]
    InvalidIntegerDescriptor(u8),

    /// A string expression body contains a `0x00` byte.
    #[error("malformed macro data: string expression contains an embedded null byte at offset {offset}")]
    EmbeddedNul { offset: usize },

    /// A macro payload was not closed by the end marker.
    #[error("malformed macro data: payload <{code:#04x}> is not terminated by 0x03 (found {found:?})")]
    MissingEndMarker { code: u8, found: Option<u8> },

    /// The length of a macro body is not in its shortest encoding.
    #[error("malformed macro data: payload <{code:#04x}> has a non-minimal body length")]
    NonMinimalLength { code: u8 },

    /// A required field of a table-driven macro is absent.
    #[error("malformed macro data: <{macro_name}> is missing its `{field}` field")]
    MissingField {
        macro_name: &'static str,
        field: &'static str,
    },

    /// Bytes remain in a macro body after its last declared field.
    #[error("malformed macro data: <{macro_name}> has {remaining} unexpected trailing byte(s)")]
    TrailingData {
        macro_name: &'static str,
        remaining: usize,
    },

    /// Expressions nest deeper than the decoder accepts.
    #[error("malformed macro data: expressions nested deeper than {max} levels")]
    NestingTooDeep { max: usize },
}

pub type DecodeResult<T> = Result<T, DecodeError>;
