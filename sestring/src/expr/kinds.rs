//! Operator and operand kinds carried by expression type bytes.
use strum::{EnumIs, EnumIter, FromRepr, IntoEnumIterator};

use crate::encoding::magic::{PLACEHOLDER_MIN, STACK_COLOR};

/// Zero-operand expressions resolved entirely from the evaluation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum PlaceholderKind {
    /// `0xD0..=0xD7`. The low three bits are kept so the byte round-trips.
    Unassigned(u8),
    Millisecond,
    Second,
    Minute,
    Hour,
    /// Day of the month, 1-based.
    Day,
    /// Day of the week, 1 = Sunday.
    Weekday,
    /// Month, 1-based.
    Month,
    Year,
    /// Refers to the previous entry of a color stack.
    StackColor,
}

impl PlaceholderKind {
    /// Decode from a type byte of the placeholder range.
    pub fn from_type_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0xD0..=0xD7 => PlaceholderKind::Unassigned(byte & 0x07),
            0xD8 => PlaceholderKind::Millisecond,
            0xD9 => PlaceholderKind::Second,
            0xDA => PlaceholderKind::Minute,
            0xDB => PlaceholderKind::Hour,
            0xDC => PlaceholderKind::Day,
            0xDD => PlaceholderKind::Weekday,
            0xDE => PlaceholderKind::Month,
            0xDF => PlaceholderKind::Year,
            STACK_COLOR => PlaceholderKind::StackColor,
            _ => return None,
        })
    }

    /// The type byte written on the wire.
    pub fn type_byte(self) -> u8 {
        match self {
            PlaceholderKind::Unassigned(slot) => PLACEHOLDER_MIN | (slot & 0x07),
            PlaceholderKind::Millisecond => 0xD8,
            PlaceholderKind::Second => 0xD9,
            PlaceholderKind::Minute => 0xDA,
            PlaceholderKind::Hour => 0xDB,
            PlaceholderKind::Day => 0xDC,
            PlaceholderKind::Weekday => 0xDD,
            PlaceholderKind::Month => 0xDE,
            PlaceholderKind::Year => 0xDF,
            PlaceholderKind::StackColor => STACK_COLOR,
        }
    }

    /// Name used in macro strings.
    pub fn to_str(self) -> &'static str {
        match self {
            PlaceholderKind::Unassigned(_) => "t_unassigned",
            PlaceholderKind::Millisecond => "t_msec",
            PlaceholderKind::Second => "t_sec",
            PlaceholderKind::Minute => "t_min",
            PlaceholderKind::Hour => "t_hour",
            PlaceholderKind::Day => "t_day",
            PlaceholderKind::Weekday => "t_wday",
            PlaceholderKind::Month => "t_mon",
            PlaceholderKind::Year => "t_year",
            PlaceholderKind::StackColor => "stackcolor",
        }
    }
}

/// Comparison operators of binary expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u8)]
pub enum BinaryOp {
    GreaterThanOrEqual = 0xE0,
    GreaterThan = 0xE1,
    LessThanOrEqual = 0xE2,
    LessThan = 0xE3,
    Equal = 0xE4,
    NotEqual = 0xE5,
}

impl BinaryOp {
    /// Creates a [`BinaryOp`] from its symbol.
    pub fn from_str(s: &str) -> Option<Self> {
        BinaryOp::iter().find(|op| op.to_str() == s)
    }

    /// Returns the symbol of the operator.
    pub fn to_str(&self) -> &'static str {
        match self {
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::LessThan => "<",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
        }
    }

    /// Equality operators compare resolved strings, the others compare numbers.
    pub fn compares_strings(&self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }
}

/// Which parameter table a parameter expression reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumIs, FromRepr)]
#[repr(u8)]
pub enum ParameterKind {
    LocalNumber = 0xE8,
    GlobalNumber = 0xE9,
    LocalString = 0xEA,
    GlobalString = 0xEB,
}

impl ParameterKind {
    /// Returns the macro-string prefix of the parameter.
    pub fn to_str(&self) -> &'static str {
        match self {
            ParameterKind::LocalNumber => "lnum",
            ParameterKind::GlobalNumber => "gnum",
            ParameterKind::LocalString => "lstr",
            ParameterKind::GlobalString => "gstr",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ParameterKind::LocalNumber | ParameterKind::LocalString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_bytes_roundtrip() {
        for byte in (0xD0..=0xDF).chain(std::iter::once(STACK_COLOR)) {
            let kind = PlaceholderKind::from_type_byte(byte).expect("placeholder byte");
            assert_eq!(kind.type_byte(), byte);
        }
        assert_eq!(PlaceholderKind::from_type_byte(0xE0), None);
    }

    #[test]
    fn binary_op_symbols() {
        for op in BinaryOp::iter() {
            assert_eq!(BinaryOp::from_str(op.to_str()), Some(op));
            assert_eq!(BinaryOp::from_repr(op as u8), Some(op));
        }
        assert!(BinaryOp::Equal.compares_strings());
        assert!(!BinaryOp::LessThan.compares_strings());
    }
}
