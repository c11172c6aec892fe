//! Payload framing: text runs and macro payloads.
//!
//! A macro payload is framed as `0x02 code len(body) body 0x03`. Anything else
//! is a text run, copied verbatim up to the next start byte. Bodies of
//! registered codes are decoded with the codec named by the registry; bodies of
//! unregistered codes are kept as raw bytes so they re-encode unchanged.
pub mod fixed;

use auto_enums::auto_enum;
use log::trace;
use smallvec::SmallVec;
use strum::{EnumIs, EnumTryAs};

pub use fixed::{FixedBody, SystemLinkKind};

use crate::{
    code::MacroCode,
    encoding::{
        RawEncodable, integer,
        magic::{END_BYTE, START_BYTE},
        push_len, take_byte, take_len_prefixed,
    },
    error::{DecodeError, DecodeResult},
    expr::Expression,
    registry::{self, Codec, FieldSlot, LinkKind, MacroLayout, link},
};

/// Argument list of a table-driven macro.
pub type Fields = SmallVec<[Expression; 4]>;

/// One unit of an SeString.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum Payload {
    /// Raw bytes, usually UTF-8 text. Never contains the start byte.
    Text(Vec<u8>),
    Macro(MacroPayload),
}

/// A framed macro.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroPayload {
    pub code: u8,
    pub body: MacroBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs)]
pub enum MacroBody {
    Fields(Fields),
    Switch {
        condition: Expression,
        cases: Vec<Expression>,
    },
    Fixed(FixedBody),
    /// Body of an unregistered code, kept byte for byte.
    Opaque(Vec<u8>),
}

impl Payload {
    /// Text run holding `text`.
    pub fn text(text: &str) -> Self {
        Payload::Text(text.as_bytes().to_vec())
    }

    /// Decode one payload from the front of `buf`.
    pub fn decode(buf: &mut &[u8]) -> DecodeResult<Self> {
        Self::decode_nested(buf, 0)
    }

    pub(crate) fn decode_nested(buf: &mut &[u8], depth: usize) -> DecodeResult<Self> {
        if buf.first() != Some(&START_BYTE) {
            let end = buf
                .iter()
                .position(|&b| b == START_BYTE)
                .unwrap_or(buf.len());
            let (text, rest) = buf.split_at(end);
            *buf = rest;
            return Ok(Payload::Text(text.to_vec()));
        }

        take_byte(buf, "start byte")?;
        let code = take_byte(buf, "macro code")?;
        let before = buf.len();
        let mut body = take_len_prefixed(buf, "macro body")?;
        if before - buf.len() - body.len() != integer::encoded_size_u32(body.len() as u32) {
            return Err(DecodeError::NonMinimalLength { code });
        }
        match buf.split_first() {
            Some((&END_BYTE, rest)) => *buf = rest,
            Some((&other, _)) => {
                return Err(DecodeError::MissingEndMarker {
                    code,
                    found: Some(other),
                });
            }
            None => return Err(DecodeError::MissingEndMarker { code, found: None }),
        }

        trace!("Decoding macro payload <{code:#04x}> with a {} byte body", body.len());
        let body = MacroBody::decode(code, &mut body, depth)?;
        Ok(Payload::Macro(MacroPayload { code, body }))
    }

    /// The macro payload when this is one.
    pub fn as_macro(&self) -> Option<&MacroPayload> {
        match self {
            Payload::Macro(payload) => Some(payload),
            Payload::Text(_) => None,
        }
    }
}

impl MacroBody {
    /// Decode the body of `code`.
    ///
    /// Bodies that do not match the layout of a registered code, or that use a
    /// non-minimal encoding, are kept opaque so they re-encode byte for byte.
    /// Malformed expressions are still errors.
    fn decode(code: u8, body: &mut &[u8], depth: usize) -> DecodeResult<Self> {
        let Some((code, layout)) = registry::lookup(code) else {
            trace!("Keeping body of unregistered macro <{code:#04x}> opaque");
            return Ok(MacroBody::Opaque(std::mem::take(body).to_vec()));
        };

        let raw = *body;
        match Self::decode_structured(code, layout, body, depth) {
            Ok(decoded) if decoded.encoded_size() == raw.len() && decoded.encode_vec() == raw => {
                Ok(decoded)
            }
            Ok(_) => {
                trace!("Keeping non-canonical body of <{}> opaque", layout.name);
                *body = &[];
                Ok(MacroBody::Opaque(raw.to_vec()))
            }
            Err(err @ (DecodeError::MissingField { .. } | DecodeError::TrailingData { .. })) => {
                trace!("Keeping body of <{}> opaque: {err}", layout.name);
                *body = &[];
                Ok(MacroBody::Opaque(raw.to_vec()))
            }
            Err(err) => Err(err),
        }
    }

    fn decode_structured(
        code: MacroCode,
        layout: &'static MacroLayout,
        body: &mut &[u8],
        depth: usize,
    ) -> DecodeResult<Self> {
        match layout.codec {
            Codec::Table => {
                let mut fields = Fields::new();
                decode_table(layout.name, layout.slots, body, depth, &mut fields)?;
                Ok(MacroBody::Fields(fields))
            }
            Codec::Polymorphic => {
                let mut fields = Fields::new();
                if !body.is_empty() {
                    fields.push(Expression::decode_nested(body, depth)?);
                }
                let slots = link::slots_for(fields.first().and_then(Expression::as_literal));
                decode_table(layout.name, slots, body, depth, &mut fields)?;
                Ok(MacroBody::Fields(fields))
            }
            Codec::Switch => {
                if body.is_empty() {
                    return Err(DecodeError::MissingField {
                        macro_name: layout.name,
                        field: "condition",
                    });
                }
                let condition = Expression::decode_nested(body, depth)?;
                let mut cases = Vec::new();
                while !body.is_empty() {
                    cases.push(Expression::decode_nested(body, depth)?);
                }
                Ok(MacroBody::Switch { condition, cases })
            }
            Codec::Fixed => {
                debug_assert_eq!(code, MacroCode::Fixed);
                FixedBody::decode(body, depth).map(MacroBody::Fixed)
            }
        }
    }
}

/// Decode the slots of `slots` not yet present in `fields`.
fn decode_table(
    macro_name: &'static str,
    slots: &'static [FieldSlot],
    body: &mut &[u8],
    depth: usize,
    fields: &mut Fields,
) -> DecodeResult<()> {
    let terminated = slots.contains(&FieldSlot::Terminator);

    for slot in slots.iter().skip(fields.len()) {
        let FieldSlot::Field(field) = *slot else {
            break;
        };
        if body.is_empty() {
            if terminated {
                return Ok(());
            }
            return Err(DecodeError::MissingField { macro_name, field });
        }
        fields.push(Expression::decode_nested(body, depth)?);
    }

    if !body.is_empty() {
        return Err(DecodeError::TrailingData {
            macro_name,
            remaining: body.len(),
        });
    }
    Ok(())
}

impl MacroPayload {
    /// Build a payload for a registered code from its arguments in wire order.
    ///
    /// `switch` takes its condition from the first argument (zero when there
    /// is none) and `fixed` bodies go through [`FixedBody::from_expressions`].
    /// Argument counts of table-driven codes are not checked.
    pub fn new(code: MacroCode, args: impl IntoIterator<Item = Expression>) -> Self {
        let mut args = args.into_iter();
        let body = match registry::layout(code).codec {
            Codec::Table | Codec::Polymorphic => MacroBody::Fields(args.collect()),
            Codec::Switch => MacroBody::Switch {
                condition: args.next().unwrap_or(Expression::Integer(0)),
                cases: args.collect(),
            },
            Codec::Fixed => MacroBody::Fixed(FixedBody::from_expressions(args.collect())),
        };
        Self {
            code: code.byte(),
            body,
        }
    }

    pub fn switch(condition: Expression, cases: Vec<Expression>) -> Self {
        Self {
            code: MacroCode::Switch.byte(),
            body: MacroBody::Switch { condition, cases },
        }
    }

    pub fn fixed(body: FixedBody) -> Self {
        Self {
            code: MacroCode::Fixed.byte(),
            body: MacroBody::Fixed(body),
        }
    }

    /// Payload of an arbitrary code carrying raw body bytes.
    pub fn opaque(code: u8, body: Vec<u8>) -> Self {
        Self {
            code,
            body: MacroBody::Opaque(body),
        }
    }

    /// Registered code, `None` for opaque payloads.
    pub fn macro_code(&self) -> Option<MacroCode> {
        MacroCode::from_repr(self.code)
    }

    pub fn layout(&self) -> Option<&'static MacroLayout> {
        self.macro_code().map(registry::layout)
    }

    /// Kind of a link payload, `None` for other payloads and unknown kinds.
    pub fn link_kind(&self) -> Option<LinkKind> {
        if self.macro_code() != Some(MacroCode::Link) {
            return None;
        }
        self.arg(0)
            .and_then(Expression::as_literal)
            .and_then(LinkKind::from_value)
    }

    /// Field slots describing this payload's arguments.
    pub fn slots(&self) -> &'static [FieldSlot] {
        match self.layout() {
            Some(layout) if layout.codec == Codec::Polymorphic => {
                link::slots_for(self.arg(0).and_then(Expression::as_literal))
            }
            Some(layout) => layout.slots,
            None => &[],
        }
    }

    /// Look an argument up by its slot name.
    pub fn field(&self, name: &str) -> Option<&Expression> {
        match &self.body {
            MacroBody::Fields(fields) => {
                let index = self
                    .slots()
                    .iter()
                    .filter_map(|slot| match slot {
                        FieldSlot::Field(field) => Some(*field),
                        FieldSlot::Terminator => None,
                    })
                    .position(|field| field == name)?;
                fields.get(index)
            }
            MacroBody::Switch { condition, .. } => (name == "condition").then_some(condition),
            MacroBody::Fixed(fixed) => match name {
                "group" => fixed.group(),
                "key" => fixed.key(),
                _ => None,
            },
            MacroBody::Opaque(_) => None,
        }
    }

    /// The `index`-th argument in wire order.
    pub fn arg(&self, index: usize) -> Option<&Expression> {
        self.expressions().nth(index)
    }

    /// Every expression argument in wire order, whatever the codec.
    #[auto_enum(Iterator)]
    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        match &self.body {
            MacroBody::Fields(fields) => fields.iter(),
            MacroBody::Switch { condition, cases } => std::iter::once(condition).chain(cases.iter()),
            MacroBody::Fixed(fixed) => fixed.expressions(),
            MacroBody::Opaque(_) => std::iter::empty(),
        }
    }

    /// Name used in macro strings.
    pub fn name(&self) -> Option<&'static str> {
        self.layout().map(|layout| layout.name)
    }
}

impl RawEncodable for MacroBody {
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F) {
        match self {
            MacroBody::Fields(fields) => {
                for field in fields {
                    field.encode_raw(sink);
                }
            }
            MacroBody::Switch { condition, cases } => {
                condition.encode_raw(sink);
                for case in cases {
                    case.encode_raw(sink);
                }
            }
            MacroBody::Fixed(fixed) => fixed.encode_raw(sink),
            MacroBody::Opaque(bytes) => sink(bytes),
        }
    }

    fn encoded_size(&self) -> usize {
        match self {
            MacroBody::Fields(fields) => fields.iter().map(|f| f.encoded_size()).sum(),
            MacroBody::Switch { condition, cases } => {
                condition.encoded_size() + cases.iter().map(|c| c.encoded_size()).sum::<usize>()
            }
            MacroBody::Fixed(fixed) => fixed.encoded_size(),
            MacroBody::Opaque(bytes) => bytes.len(),
        }
    }
}

impl RawEncodable for MacroPayload {
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F) {
        sink(&[START_BYTE, self.code]);
        push_len(self.body.encoded_size(), sink);
        self.body.encode_raw(sink);
        sink(&[END_BYTE]);
    }

    fn encoded_size(&self) -> usize {
        let body = self.body.encoded_size();
        3 + integer::encoded_size_u32(body as u32) + body
    }
}

impl RawEncodable for Payload {
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F) {
        match self {
            Payload::Text(bytes) => sink(bytes),
            Payload::Macro(payload) => payload.encode_raw(sink),
        }
    }

    fn encoded_size(&self) -> usize {
        match self {
            Payload::Text(bytes) => bytes.len(),
            Payload::Macro(payload) => payload.encoded_size(),
        }
    }
}

impl From<MacroPayload> for Payload {
    fn from(value: MacroPayload) -> Self {
        Payload::Macro(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_one(bytes: &[u8]) -> DecodeResult<Payload> {
        let mut cursor = bytes;
        let payload = Payload::decode(&mut cursor)?;
        assert!(cursor.is_empty(), "unconsumed bytes: {cursor:?}");
        Ok(payload)
    }

    #[test]
    fn frame_layout() {
        let payload = MacroPayload::new(MacroCode::Color, [Expression::int(0xFF00FF00)]);
        // 0xFF00FF00 packs its two non-zero bytes behind descriptor 0xF9.
        assert_eq!(
            payload.encode_vec(),
            vec![0x02, 0x13, 0x04, 0xF9, 0xFF, 0xFF, 0x03]
        );
        let newline = MacroPayload::new(MacroCode::NewLine, []);
        assert_eq!(newline.encode_vec(), vec![0x02, 0x10, 0x01, 0x03]);
    }

    #[test]
    fn text_run_stops_at_start_byte() {
        let mut cursor: &[u8] = b"abc\x02\x10\x01\x03";
        assert_eq!(Payload::decode(&mut cursor), Ok(Payload::text("abc")));
        assert_eq!(
            Payload::decode(&mut cursor),
            Ok(Payload::Macro(MacroPayload::new(MacroCode::NewLine, [])))
        );
        assert!(cursor.is_empty());
    }

    #[test]
    fn missing_end_marker() {
        assert_eq!(
            decode_one(&[0x02, 0x10, 0x01]),
            Err(DecodeError::MissingEndMarker { code: 0x10, found: None })
        );
        assert_eq!(
            decode_one(&[0x02, 0x10, 0x01, 0x04]),
            Err(DecodeError::MissingEndMarker { code: 0x10, found: Some(0x04) })
        );
    }

    #[test]
    fn required_and_optional_fields() {
        // `if` with two of its three fields keeps its body as is.
        let bytes = [0x02, 0x08, 0x03, 0x02, 0x02, 0x03];
        let payload = decode_one(&bytes).expect("decodes");
        assert_eq!(payload, Payload::Macro(MacroPayload::opaque(0x08, vec![0x02, 0x02])));
        assert_eq!(payload.encode_vec(), bytes);
        // `setresettime` may stop after the hour.
        let payload = decode_one(&[0x02, 0x06, 0x02, 0x06, 0x03]).expect("decodes");
        let payload = payload.as_macro().expect("macro");
        assert_eq!(payload.field("hour"), Some(&Expression::int(5)));
        assert_eq!(payload.field("weekday"), None);
    }

    #[test]
    fn extra_arguments_are_kept() {
        let bytes = [0x02, 0x20, 0x03, 0x02, 0x02, 0x03];
        let payload = decode_one(&bytes).expect("decodes");
        let payload = payload.as_macro().expect("macro");
        assert_eq!(payload.macro_code(), Some(MacroCode::Num));
        assert_eq!(payload.body, MacroBody::Opaque(vec![0x02, 0x02]));
        assert_eq!(payload.field("value"), None);
        assert_eq!(payload.encode_vec(), bytes);
    }

    #[test]
    fn non_minimal_integers_are_kept() {
        // `icon(5)` with the 5 spelled out as `F0 05` instead of `06`.
        let bytes = [0x02, 0x12, 0x03, 0xF0, 0x05, 0x03];
        let payload = decode_one(&bytes).expect("decodes");
        assert_eq!(payload, Payload::Macro(MacroPayload::opaque(0x12, vec![0xF0, 0x05])));
        assert_eq!(payload.encode_vec(), bytes);

        // The minimal form still decodes to fields.
        let payload = decode_one(&[0x02, 0x12, 0x02, 0x06, 0x03]).expect("decodes");
        assert_eq!(
            payload,
            Payload::Macro(MacroPayload::new(MacroCode::Icon, [Expression::int(5)]))
        );
    }

    #[test]
    fn frame_length_must_be_minimal() {
        assert_eq!(
            decode_one(&[0x02, 0x10, 0xF0, 0x00, 0x03]),
            Err(DecodeError::NonMinimalLength { code: 0x10 })
        );
    }

    #[test]
    fn malformed_expressions_are_still_errors() {
        assert_eq!(
            decode_one(&[0x02, 0x20, 0x03, 0x02, 0xE6, 0x03]),
            Err(DecodeError::InvalidTypeByte(0xE6))
        );
    }

    #[test]
    fn link_layout_follows_selector() {
        let quest = MacroPayload::new(MacroCode::Link, [Expression::int(4), Expression::int(65564)]);
        let decoded = decode_one(&quest.encode_vec()).expect("decodes");
        let decoded = decoded.as_macro().expect("macro");
        assert_eq!(decoded.link_kind(), Some(LinkKind::Quest));
        assert_eq!(decoded.field("quest_id"), Some(&Expression::int(65564)));

        // Quest links take a single argument.
        let too_long = MacroPayload::new(
            MacroCode::Link,
            [Expression::int(4), Expression::int(1), Expression::int(2)],
        );
        let bytes = too_long.encode_vec();
        let decoded = decode_one(&bytes).expect("decodes");
        assert!(decoded.as_macro().is_some_and(|m| m.body.is_opaque()));
        assert_eq!(decoded.encode_vec(), bytes);

        // Unknown kinds fall back to the generic layout.
        let generic = MacroPayload::new(
            MacroCode::Link,
            [Expression::int(1), Expression::int(9), Expression::int(8)],
        );
        let decoded = decode_one(&generic.encode_vec()).expect("decodes");
        assert_eq!(decoded.as_macro().and_then(|m| m.field("arg2")), Some(&Expression::int(8)));
    }

    #[test]
    fn switch_cases() {
        let switch = MacroPayload::switch(Expression::lnum(1), vec![]);
        assert_eq!(decode_one(&switch.encode_vec()), Ok(Payload::Macro(switch)));

        let switch = MacroPayload::switch(
            Expression::lnum(1),
            vec![Expression::text("a"), Expression::text("b"), Expression::text("c")],
        );
        let decoded = decode_one(&switch.encode_vec()).expect("decodes");
        assert_eq!(decoded.as_macro().map(|m| m.expressions().count()), Some(4));
        assert_eq!(decoded, Payload::Macro(switch));

        // No condition at all.
        let empty = decode_one(&[0x02, 0x09, 0x01, 0x03]).expect("decodes");
        assert_eq!(empty, Payload::Macro(MacroPayload::opaque(0x09, vec![])));
    }

    #[test]
    fn unregistered_code_is_opaque() {
        let bytes = [0x02, 0x05, 0x04, 0xDE, 0xAD, 0x00, 0x03];
        let decoded = decode_one(&bytes).expect("decodes");
        assert_eq!(
            decoded,
            Payload::Macro(MacroPayload::opaque(0x05, vec![0xDE, 0xAD, 0x00]))
        );
        assert_eq!(decoded.encode_vec(), bytes);
    }
}
