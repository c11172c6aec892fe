//! Expressions: the values and operations carried inside macro payload bodies.
//!
//! An expression is identified by its first byte (see [`crate::encoding::magic`]):
//! inline integers, placeholders, binary comparisons, parameter references and
//! nested strings. Operands follow their operator in prefix order, so decoding
//! is a single forward pass and no expression can refer back to an earlier one.
pub mod kinds;

use log::trace;
use strum::{EnumIs, EnumTryAs};

pub use kinds::{BinaryOp, ParameterKind, PlaceholderKind};

use crate::{
    encoding::{
        RawEncodable, integer,
        magic::{self, STRING_EXPR, TypeClass},
        push_len, take_byte, take_len_prefixed,
    },
    error::{DecodeError, DecodeResult},
    string::SeString,
};

/// Maximum nesting accepted by [`Expression::decode`].
pub const MAX_NESTING: usize = 128;

/// One node of an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum Expression {
    Integer(u32),
    Placeholder(PlaceholderKind),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    /// Parameter lookup; the operand evaluates to a 1-based index.
    Parameter(ParameterKind, Box<Expression>),
    String(SeString),
}

impl Expression {
    /// Decode one expression from the front of `buf`.
    pub fn decode(buf: &mut &[u8]) -> DecodeResult<Self> {
        Self::decode_nested(buf, 0)
    }

    pub(crate) fn decode_nested(buf: &mut &[u8], depth: usize) -> DecodeResult<Self> {
        if depth >= MAX_NESTING {
            return Err(DecodeError::NestingTooDeep { max: MAX_NESTING });
        }

        let type_byte = take_byte(buf, "expression type")?;
        if type_byte == 0 {
            return Err(DecodeError::NulTypeByte);
        }

        match magic::classify(type_byte) {
            Some(TypeClass::Integer) => {
                integer::decode_u32_with_type(type_byte, buf).map(Expression::Integer)
            }
            Some(TypeClass::Placeholder) => PlaceholderKind::from_type_byte(type_byte)
                .map(Expression::Placeholder)
                .ok_or(DecodeError::InvalidTypeByte(type_byte)),
            Some(TypeClass::Binary) => {
                let op = BinaryOp::from_repr(type_byte).ok_or(DecodeError::InvalidTypeByte(type_byte))?;
                let lhs = Self::decode_nested(buf, depth + 1)?;
                let rhs = Self::decode_nested(buf, depth + 1)?;
                Ok(Expression::Binary(op, Box::new(lhs), Box::new(rhs)))
            }
            Some(TypeClass::Parameter) => {
                let kind = ParameterKind::from_repr(type_byte)
                    .ok_or(DecodeError::InvalidTypeByte(type_byte))?;
                let index = Self::decode_nested(buf, depth + 1)?;
                Ok(Expression::Parameter(kind, Box::new(index)))
            }
            Some(TypeClass::String) => {
                let body = take_len_prefixed(buf, "string expression body")?;
                if let Some(offset) = body.iter().position(|&b| b == 0) {
                    return Err(DecodeError::EmbeddedNul { offset });
                }
                if body.is_empty() {
                    return Ok(Expression::String(SeString::new()));
                }
                trace!("Decoding nested string expression of {} bytes", body.len());
                SeString::decode_nested(body, depth + 1).map(Expression::String)
            }
            None => Err(DecodeError::InvalidTypeByte(type_byte)),
        }
    }

    /// Decode an expression that must span the whole slice.
    pub fn decode_exact(mut bytes: &[u8]) -> DecodeResult<Self> {
        let expr = Self::decode(&mut bytes)?;
        if !bytes.is_empty() {
            return Err(DecodeError::TrailingData {
                macro_name: "expression",
                remaining: bytes.len(),
            });
        }
        Ok(expr)
    }

    /// Integer literal.
    #[inline]
    pub fn int(value: u32) -> Self {
        Expression::Integer(value)
    }

    /// String literal holding plain text.
    pub fn text(text: &str) -> Self {
        Expression::String(SeString::from_text(text))
    }

    pub fn placeholder(kind: PlaceholderKind) -> Self {
        Expression::Placeholder(kind)
    }

    /// Stack-color placeholder, which pops a color stack.
    pub fn stack_color() -> Self {
        Expression::Placeholder(PlaceholderKind::StackColor)
    }

    pub fn parameter(kind: ParameterKind, index: u32) -> Self {
        Expression::Parameter(kind, Box::new(Expression::Integer(index)))
    }

    /// Local number parameter, 1-based as on the wire.
    pub fn lnum(index: u32) -> Self {
        Self::parameter(ParameterKind::LocalNumber, index)
    }

    /// Local string parameter, 1-based as on the wire.
    pub fn lstr(index: u32) -> Self {
        Self::parameter(ParameterKind::LocalString, index)
    }

    pub fn gnum(index: u32) -> Self {
        Self::parameter(ParameterKind::GlobalNumber, index)
    }

    pub fn gstr(index: u32) -> Self {
        Self::parameter(ParameterKind::GlobalString, index)
    }

    pub fn binary(op: BinaryOp, lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Self {
        Expression::Binary(op, Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn ge(self, rhs: impl Into<Expression>) -> Self {
        Self::binary(BinaryOp::GreaterThanOrEqual, self, rhs)
    }

    pub fn gt(self, rhs: impl Into<Expression>) -> Self {
        Self::binary(BinaryOp::GreaterThan, self, rhs)
    }

    pub fn le(self, rhs: impl Into<Expression>) -> Self {
        Self::binary(BinaryOp::LessThanOrEqual, self, rhs)
    }

    pub fn lt(self, rhs: impl Into<Expression>) -> Self {
        Self::binary(BinaryOp::LessThan, self, rhs)
    }

    pub fn equals(self, rhs: impl Into<Expression>) -> Self {
        Self::binary(BinaryOp::Equal, self, rhs)
    }

    pub fn not_equals(self, rhs: impl Into<Expression>) -> Self {
        Self::binary(BinaryOp::NotEqual, self, rhs)
    }

    /// The literal value when this is an integer literal.
    pub fn as_literal(&self) -> Option<u32> {
        match self {
            Expression::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_stack_color(&self) -> bool {
        matches!(self, Expression::Placeholder(PlaceholderKind::StackColor))
    }

    /// Total number of bytes this expression occupies on the wire.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.encoded_size()
    }
}

impl RawEncodable for Expression {
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F) {
        match self {
            Expression::Integer(value) => {
                integer::encode_u32(*value, sink);
            }
            Expression::Placeholder(kind) => sink(&[kind.type_byte()]),
            Expression::Binary(op, lhs, rhs) => {
                sink(&[*op as u8]);
                lhs.encode_raw(sink);
                rhs.encode_raw(sink);
            }
            Expression::Parameter(kind, index) => {
                sink(&[*kind as u8]);
                index.encode_raw(sink);
            }
            Expression::String(string) => {
                sink(&[STRING_EXPR]);
                push_len(string.encoded_size(), sink);
                string.encode_raw(sink);
            }
        }
    }

    fn encoded_size(&self) -> usize {
        match self {
            Expression::Integer(value) => integer::encoded_size_u32(*value),
            Expression::Placeholder(_) => 1,
            Expression::Binary(_, lhs, rhs) => 1 + lhs.encoded_size() + rhs.encoded_size(),
            Expression::Parameter(_, index) => 1 + index.encoded_size(),
            Expression::String(string) => {
                let body = string.encoded_size();
                1 + integer::encoded_size_u32(body as u32) + body
            }
        }
    }
}

impl From<u32> for Expression {
    fn from(value: u32) -> Self {
        Expression::Integer(value)
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Expression::text(value)
    }
}

impl From<SeString> for Expression {
    fn from(value: SeString) -> Self {
        Expression::String(value)
    }
}
