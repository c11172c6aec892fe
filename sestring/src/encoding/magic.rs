//! Magic bytes of the SeString wire format.
//!
//! Conventions:
//! - A macro payload is framed as `START code len(body) body END`.
//! - Inside a body, every value is an expression identified by its first byte.
//! - Lengths and inline integers share the descriptor scheme of [`super::integer`].

pub const START_BYTE: u8 = 0x02;
pub const END_BYTE: u8 = 0x03;

// Inline integers
pub const INT_SMALL_MIN: u8 = 0x01;
pub const INT_SMALL_MAX: u8 = 0xCF;
pub const INT_PACKED_MIN: u8 = 0xF0;
pub const INT_PACKED_MAX: u8 = 0xFE;

// Placeholders
pub const PLACEHOLDER_MIN: u8 = 0xD0;
pub const PLACEHOLDER_MAX: u8 = 0xDF;
pub const STACK_COLOR: u8 = 0xEC;

// Binary operators: op lhs rhs
pub const BINARY_MIN: u8 = 0xE0;
pub const BINARY_MAX: u8 = 0xE5;

// Parameters: kind index
pub const PARAMETER_MIN: u8 = 0xE8;
pub const PARAMETER_MAX: u8 = 0xEB;

// Strings: 0xFF len(body) body
pub const STRING_EXPR: u8 = 0xFF;

/// The five disjoint classes an expression type byte can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Integer,
    Placeholder,
    Binary,
    Parameter,
    String,
}

/// Classify a type byte. `None` for `0x00` and reserved bytes.
pub fn classify(type_byte: u8) -> Option<TypeClass> {
    match type_byte {
        INT_SMALL_MIN..=INT_SMALL_MAX | INT_PACKED_MIN..=INT_PACKED_MAX => Some(TypeClass::Integer),
        PLACEHOLDER_MIN..=PLACEHOLDER_MAX | STACK_COLOR => Some(TypeClass::Placeholder),
        BINARY_MIN..=BINARY_MAX => Some(TypeClass::Binary),
        PARAMETER_MIN..=PARAMETER_MAX => Some(TypeClass::Parameter),
        STRING_EXPR => Some(TypeClass::String),
        _ => None,
    }
}
