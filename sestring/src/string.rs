//! The SeString: an ordered sequence of payloads.
use log::trace;

use crate::{
    builder::SeStringBuilder,
    code::MacroCode,
    encoding::RawEncodable,
    error::{DecodeError, DecodeResult},
    expr::MAX_NESTING,
    payload::{MacroPayload, Payload},
};

/// Rich text made of text runs and macro payloads.
///
/// Values built through [`SeStringBuilder`] never hold empty or adjacent text
/// runs, which makes `decode(encode(s)) == s` hold structurally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SeString {
    payloads: Vec<Payload>,
}

impl SeString {
    /// The empty string.
    pub const fn new() -> Self {
        Self {
            payloads: Vec::new(),
        }
    }

    /// String holding a single text run, or no payload when `text` is empty.
    pub fn from_text(text: &str) -> Self {
        let mut builder = SeStringBuilder::new();
        builder.append_text(text);
        builder.build()
    }

    /// Wrap payloads as they are, without merging text runs.
    pub fn from_payloads(payloads: Vec<Payload>) -> Self {
        Self { payloads }
    }

    /// Decode a whole byte string.
    pub fn decode(bytes: &[u8]) -> DecodeResult<Self> {
        Self::decode_nested(bytes, 0)
    }

    pub(crate) fn decode_nested(mut bytes: &[u8], depth: usize) -> DecodeResult<Self> {
        if depth >= MAX_NESTING {
            return Err(DecodeError::NestingTooDeep { max: MAX_NESTING });
        }

        let mut payloads = Vec::new();
        while !bytes.is_empty() {
            payloads.push(Payload::decode_nested(&mut bytes, depth)?);
        }
        trace!("Decoded {} payload(s) at depth {depth}", payloads.len());
        Ok(Self { payloads })
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    pub fn into_payloads(self) -> Vec<Payload> {
        self.payloads
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Payload> {
        self.payloads.iter()
    }

    /// Number of payloads.
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Whether every payload is a text run.
    pub fn is_plain_text(&self) -> bool {
        self.payloads.iter().all(Payload::is_text)
    }

    /// Macro payloads, in order.
    pub fn macros(&self) -> impl Iterator<Item = &MacroPayload> {
        self.payloads.iter().filter_map(Payload::as_macro)
    }

    /// Display text: text runs verbatim, the four character macros as their
    /// characters, every other macro dropped.
    pub fn extract_text(&self) -> String {
        let mut out = String::new();
        for payload in &self.payloads {
            match payload {
                Payload::Text(bytes) => out.push_str(&String::from_utf8_lossy(bytes)),
                Payload::Macro(payload) => match payload.macro_code() {
                    Some(MacroCode::NewLine) => out.push('\n'),
                    Some(MacroCode::SoftHyphen) => out.push('\u{00AD}'),
                    Some(MacroCode::NonBreakingSpace) => out.push('\u{00A0}'),
                    Some(MacroCode::Hyphen) => out.push('-'),
                    _ => {}
                },
            }
        }
        out
    }

    /// Whether `needle` occurs inside a single text run.
    pub fn contains_text(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        self.payloads.iter().any(|payload| match payload {
            Payload::Text(bytes) => find_bytes(bytes, needle, 0).is_some(),
            Payload::Macro(_) => false,
        })
    }

    /// Replace every occurrence of `needle` inside text runs.
    pub fn replace_text(&self, needle: &str, replacement: &str) -> SeString {
        if needle.is_empty() {
            return self.clone();
        }

        let mut builder = SeStringBuilder::with_capacity(self.payloads.len());
        for payload in &self.payloads {
            match payload {
                Payload::Text(bytes) => {
                    builder.append_bytes(&replace_bytes(bytes, needle.as_bytes(), replacement.as_bytes()));
                }
                Payload::Macro(_) => {
                    builder.append_payload(payload.clone());
                }
            }
        }
        builder.build()
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn replace_bytes(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut cursor = 0;
    while let Some(pos) = find_bytes(haystack, needle, cursor) {
        out.extend_from_slice(&haystack[cursor..pos]);
        out.extend_from_slice(replacement);
        cursor = pos + needle.len();
    }
    out.extend_from_slice(&haystack[cursor..]);
    out
}

impl RawEncodable for SeString {
    fn encode_raw<F: FnMut(&[u8])>(&self, sink: &mut F) {
        for payload in &self.payloads {
            payload.encode_raw(sink);
        }
    }

    fn encoded_size(&self) -> usize {
        self.payloads.iter().map(|p| p.encoded_size()).sum()
    }
}

impl<'a> IntoIterator for &'a SeString {
    type Item = &'a Payload;
    type IntoIter = std::slice::Iter<'a, Payload>;

    fn into_iter(self) -> Self::IntoIter {
        self.payloads.iter()
    }
}

impl FromIterator<Payload> for SeString {
    /// Collects through the builder, merging text runs.
    fn from_iter<T: IntoIterator<Item = Payload>>(iter: T) -> Self {
        let mut builder = SeStringBuilder::new();
        for payload in iter {
            builder.append_payload(payload);
        }
        builder.build()
    }
}

impl From<&str> for SeString {
    fn from(value: &str) -> Self {
        SeString::from_text(value)
    }
}

impl From<MacroPayload> for SeString {
    fn from(value: MacroPayload) -> Self {
        Self {
            payloads: vec![Payload::Macro(value)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expression;

    #[test]
    fn decode_mixed_stream() {
        let bytes = b"Hello\x02\x10\x01\x03world";
        let string = SeString::decode(bytes).expect("decodes");
        assert_eq!(string.len(), 3);
        assert_eq!(string.extract_text(), "Hello\nworld");
        assert_eq!(string.encode_vec(), bytes);
    }

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(SeString::decode(&[]), Ok(SeString::new()));
        assert!(SeString::from_text("").is_empty());
    }

    #[test]
    fn character_macros_in_text() {
        let string: SeString = [
            Payload::text("a"),
            MacroPayload::new(MacroCode::SoftHyphen, []).into(),
            MacroPayload::new(MacroCode::NonBreakingSpace, []).into(),
            MacroPayload::new(MacroCode::Hyphen, []).into(),
            MacroPayload::new(MacroCode::Bold, [Expression::int(1)]).into(),
            Payload::text("b"),
        ]
        .into_iter()
        .collect();
        assert_eq!(string.extract_text(), "a\u{AD}\u{A0}-b");
    }

    #[test]
    fn replace_only_touches_text_runs() {
        let string: SeString = [
            Payload::text("[n] fish"),
            MacroPayload::new(MacroCode::String, [Expression::text("[n]")]).into(),
        ]
        .into_iter()
        .collect();
        assert!(string.contains_text("[n]"));

        let replaced = string.replace_text("[n]", "3");
        assert_eq!(replaced.payloads()[0], Payload::text("3 fish"));
        assert_eq!(replaced.payloads()[1], string.payloads()[1]);
        assert!(!replaced.contains_text("[n]"));
    }

    #[test]
    fn replace_can_empty_a_run() {
        let replaced = SeString::from_text("[t]").replace_text("[t]", "");
        assert!(replaced.is_empty());
    }
}
