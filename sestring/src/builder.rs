//! Incremental construction of [`SeString`] values.
use std::borrow::Cow;

use crate::{
    code::MacroCode,
    encoding::magic::START_BYTE,
    expr::Expression,
    payload::{MacroPayload, Payload},
    string::SeString,
};

/// Appends payloads, merging adjacent text runs and skipping empty ones.
///
/// ```
/// use sestring::{MacroCode, SeStringBuilder};
///
/// let mut builder = SeStringBuilder::new();
/// builder
///     .append_text("Hello, ")
///     .append_text("world")
///     .append_macro(MacroCode::NewLine, []);
/// let string = builder.build();
/// assert_eq!(string.len(), 2);
/// assert_eq!(string.extract_text(), "Hello, world\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SeStringBuilder {
    payloads: Vec<Payload>,
}

/// Position a builder can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    payloads: usize,
    /// Length of the last text run when it may still grow.
    text_len: Option<usize>,
}

impl SeStringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            payloads: Vec::with_capacity(capacity),
        }
    }

    /// Append UTF-8 text.
    pub fn append_text(&mut self, text: &str) -> &mut Self {
        self.append_bytes(text.as_bytes())
    }

    pub fn append_char(&mut self, ch: char) -> &mut Self {
        let mut buf = [0u8; 4];
        self.append_text(ch.encode_utf8(&mut buf))
    }

    /// Append raw text bytes. Start bytes cannot occur in a text run and are
    /// dropped.
    pub fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        let bytes: Cow<'_, [u8]> = if bytes.contains(&START_BYTE) {
            Cow::Owned(bytes.iter().copied().filter(|&b| b != START_BYTE).collect())
        } else {
            Cow::Borrowed(bytes)
        };
        if bytes.is_empty() {
            return self;
        }
        match self.payloads.last_mut() {
            Some(Payload::Text(run)) => run.extend_from_slice(&bytes),
            _ => self.payloads.push(Payload::Text(bytes.into_owned())),
        }
        self
    }

    pub fn append_payload(&mut self, payload: Payload) -> &mut Self {
        match payload {
            Payload::Text(bytes) => self.append_bytes(&bytes),
            Payload::Macro(payload) => {
                self.payloads.push(Payload::Macro(payload));
                self
            }
        }
    }

    pub fn append_macro_payload(&mut self, payload: MacroPayload) -> &mut Self {
        self.payloads.push(Payload::Macro(payload));
        self
    }

    /// Append a macro of a registered code, see [`MacroPayload::new`].
    pub fn append_macro(
        &mut self,
        code: MacroCode,
        args: impl IntoIterator<Item = Expression>,
    ) -> &mut Self {
        self.append_macro_payload(MacroPayload::new(code, args))
    }

    /// Append every payload of `string`.
    pub fn append(&mut self, string: &SeString) -> &mut Self {
        for payload in string {
            self.append_payload(payload.clone());
        }
        self
    }

    /// Number of payloads appended so far.
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    pub fn clear(&mut self) {
        self.payloads.clear();
    }

    /// Remember the current position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            payloads: self.payloads.len(),
            text_len: match self.payloads.last() {
                Some(Payload::Text(run)) => Some(run.len()),
                _ => None,
            },
        }
    }

    /// Drop everything appended since `checkpoint` was taken.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.payloads.truncate(checkpoint.payloads);
        if let (Some(len), Some(Payload::Text(run))) = (checkpoint.text_len, self.payloads.last_mut()) {
            run.truncate(len);
        }
    }

    /// Copy of the current content.
    pub fn to_se_string(&self) -> SeString {
        SeString::from_payloads(self.payloads.clone())
    }

    /// Move the content out, leaving the builder empty with its allocation.
    pub fn take(&mut self) -> SeString {
        SeString::from_payloads(self.payloads.drain(..).collect())
    }

    pub fn build(self) -> SeString {
        SeString::from_payloads(self.payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_adjacent_text() {
        let mut builder = SeStringBuilder::new();
        builder
            .append_text("a")
            .append_payload(Payload::text("b"))
            .append_text("")
            .append_char('c');
        assert_eq!(builder.build().payloads(), &[Payload::text("abc")]);
    }

    #[test]
    fn never_emits_empty_runs() {
        let mut builder = SeStringBuilder::new();
        builder.append_text("").append_bytes(&[START_BYTE]);
        assert!(builder.is_empty());
    }

    #[test]
    fn rollback_restores_partial_run() {
        let mut builder = SeStringBuilder::new();
        builder.append_text("keep");
        let checkpoint = builder.checkpoint();
        builder
            .append_text(" drop")
            .append_macro(MacroCode::NewLine, [])
            .append_text("more");
        builder.rollback(checkpoint);
        assert_eq!(builder.payloads(), &[Payload::text("keep")]);

        let mut builder = SeStringBuilder::new();
        builder.append_macro(MacroCode::NewLine, []);
        let checkpoint = builder.checkpoint();
        builder.append_text("x");
        builder.rollback(checkpoint);
        assert_eq!(builder.len(), 1);
    }
}
