//! Body of the `fixed` macro.
//!
//! The body is a list of expressions, `group` and `key` first. Two system
//! links carry one raw length-prefixed byte string among their expressions:
//! the player link stores the player name after its world id, the literal
//! text link stores the text directly after `key`.
use strum::{EnumIter, FromRepr};

use crate::{
    encoding::{RawEncodable, integer, push_len, take_len_prefixed},
    error::DecodeResult,
    expr::Expression,
};

/// Fixed groups reserved to system links. Any other group is an
/// auto-translation group.
pub const SYSTEM_LINK_GROUPS: [u32; 2] = [100, 200];

/// Sub-operation of a system link, selected by `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u8)]
pub enum SystemLinkKind {
    Player = 1,
    ClassJobLevel = 2,
    MapPosition = 3,
    Item = 4,
    ChatSound = 5,
    ObjectName = 6,
    LiteralText = 7,
    TimeRemaining = 8,
    Status = 9,
    PartyFinder = 10,
    Quest = 11,
    AutoTranslate = 12,
}

impl SystemLinkKind {
    /// Kind of a system link, `None` for auto-translation groups or unknown keys.
    pub fn from_group_key(group: u32, key: u32) -> Option<Self> {
        if !SYSTEM_LINK_GROUPS.contains(&group) {
            return None;
        }
        u8::try_from(key).ok().and_then(Self::from_repr)
    }
}

/// Number of leading expressions preceding the raw byte string, when the
/// given group and key carry one.
pub fn raw_text_position(group: u32, key: u32) -> Option<usize> {
    match SystemLinkKind::from_group_key(group, key)? {
        SystemLinkKind::Player => Some(3),
        SystemLinkKind::LiteralText => Some(2),
        _ => None,
    }
}

/// Decoded `fixed` body.
///
/// `text` is present exactly when `group`/`key` call for it and the body was
/// long enough to reach it; `trailing` is only ever filled after `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FixedBody {
    pub leading: Vec<Expression>,
    pub text: Option<Vec<u8>>,
    pub trailing: Vec<Expression>,
}

impl FixedBody {
    /// Build a body from its expressions. When `group` and `key` call for a
    /// raw string and enough expressions are given, an empty one is inserted
    /// at its position so the body stays encodable.
    pub fn from_expressions(exprs: Vec<Expression>) -> Self {
        let mut leading = exprs;
        let Some(pos) = Self::position_of(&leading) else {
            return Self {
                leading,
                text: None,
                trailing: Vec::new(),
            };
        };
        if leading.len() <= pos {
            return Self {
                leading,
                text: None,
                trailing: Vec::new(),
            };
        }
        let trailing = leading.split_off(pos);
        Self {
            leading,
            text: Some(Vec::new()),
            trailing,
        }
    }

    /// Player link: `group`, key 1, world id, then the player name.
    pub fn player(group: u32, world_id: u32, name: &[u8], trailing: Vec<Expression>) -> Self {
        Self {
            leading: vec![
                Expression::int(group),
                Expression::int(SystemLinkKind::Player as u32),
                Expression::int(world_id),
            ],
            text: Some(name.to_vec()),
            trailing,
        }
    }

    /// Literal text link: `group`, key 7, then the text.
    pub fn literal_text(group: u32, text: &[u8], trailing: Vec<Expression>) -> Self {
        Self {
            leading: vec![
                Expression::int(group),
                Expression::int(SystemLinkKind::LiteralText as u32),
            ],
            text: Some(text.to_vec()),
            trailing,
        }
    }

    /// Body made only of integer literals, e.g. an auto-translation reference.
    pub fn literals(values: &[u32]) -> Self {
        Self::from_expressions(values.iter().copied().map(Expression::int).collect())
    }

    fn position_of(leading: &[Expression]) -> Option<usize> {
        match leading {
            [group, key, ..] => raw_text_position(group.as_literal()?, key.as_literal()?),
            _ => None,
        }
    }

    /// The `group` field.
    pub fn group(&self) -> Option<&Expression> {
        self.leading.first()
    }

    /// The `key` field.
    pub fn key(&self) -> Option<&Expression> {
        self.leading.get(1)
    }

    /// Every expression in wire order, raw string excluded.
    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.leading.iter().chain(self.trailing.iter())
    }

    /// The `index`-th expression, raw string excluded.
    pub fn expression(&self, index: usize) -> Option<&Expression> {
        self.expressions().nth(index)
    }

    pub(crate) fn decode(body: &mut &[u8], depth: usize) -> DecodeResult<Self> {
        let mut fixed = FixedBody::default();
        while !body.is_empty() {
            fixed.leading.push(Expression::decode_nested(body, depth)?);
            if !body.is_empty() && Self::position_of(&fixed.leading) == Some(fixed.leading.len()) {
                let text = take_len_prefixed(body, "fixed raw string")?;
                fixed.text = Some(text.to_vec());
                break;
            }
        }
        while !body.is_empty() {
            fixed.trailing.push(Expression::decode_nested(body, depth)?);
        }
        Ok(fixed)
    }
}

impl RawEncodable for FixedBody {
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F) {
        for expr in &self.leading {
            expr.encode_raw(sink);
        }
        if let Some(text) = &self.text {
            push_len(text.len(), sink);
            sink(text);
        }
        for expr in &self.trailing {
            expr.encode_raw(sink);
        }
    }

    fn encoded_size(&self) -> usize {
        let text = self
            .text
            .as_ref()
            .map_or(0, |t| integer::encoded_size_u32(t.len() as u32) + t.len());
        self.expressions().map(|e| e.encoded_size()).sum::<usize>() + text
    }
}
