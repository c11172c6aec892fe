//! Sestring: binary codec for SeString rich text.
//!
//! An SeString is a sequence of payloads: raw text runs interleaved with framed
//! macros carrying expression arguments (colors, conditionals, nouns, links,
//! time placeholders, ...). This crate decodes and encodes the wire format and
//! offers builders and a readable macro-string rendering. Evaluation lives in
//! the `sestring-eval` crate.
//!
//! Wire shape
//!  - Integers use a variable-length form: one byte for values below `0xCF`,
//!    otherwise a descriptor byte followed by the non-zero big-endian bytes.
//!  - Expressions are prefix trees identified by their leading type byte.
//!  - Macros are framed as `0x02 code len(body) body 0x03`; the registry maps
//!    each code to the layout of its body. Unregistered codes stay opaque and
//!    re-encode byte for byte.
//!
//! Example
//! ```
//! use sestring::{MacroCode, SeString, SeStringBuilder, RawEncodable, expr::Expression};
//!
//! let mut builder = SeStringBuilder::new();
//! builder
//!     .append_text("HP ")
//!     .append_macro(MacroCode::Num, [Expression::lnum(1)]);
//! let string = builder.build();
//!
//! let bytes = string.encode_vec();
//! assert_eq!(bytes, b"HP \x02\x20\x03\xE8\x02\x03");
//! assert_eq!(SeString::decode(&bytes).unwrap(), string);
//! assert_eq!(string.to_string(), "HP <num(lnum1)>");
//! ```
pub mod builder;
pub mod code;
pub mod encoding;
pub mod error;
pub mod expr;
pub mod fmt;
pub mod payload;
pub mod registry;
pub mod string;

pub use builder::{Checkpoint, SeStringBuilder};
pub use code::MacroCode;
pub use encoding::RawEncodable;
pub use error::{DecodeError, DecodeResult};
pub use expr::Expression;
pub use payload::{FixedBody, MacroBody, MacroPayload, Payload, SystemLinkKind};
pub use registry::LinkKind;
pub use string::SeString;
