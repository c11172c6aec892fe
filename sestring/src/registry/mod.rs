//! Static field layouts of registered macro codes.
//!
//! Each [`MacroCode`] maps to a [`MacroLayout`]: the name used in macro
//! strings, the codec driving its body and, for table-driven codecs, the
//! ordered list of named expression slots. The table is built once, on first
//! use, and shared for the lifetime of the process.
pub mod link;

use enum_map::EnumMap;
use once_cell::sync::Lazy;

pub use link::LinkKind;

use crate::code::MacroCode;

/// One position of a table-driven layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSlot {
    /// A named expression field.
    Field(&'static str),
    /// Never encoded. Marks every preceding field as an optional trailing
    /// argument: decoding stops as soon as the body is exhausted.
    Terminator,
}

/// How the body of a macro is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Fixed list of named expression slots.
    Table,
    /// A condition followed by any number of case expressions.
    Switch,
    /// Expressions interleaved with one raw length-prefixed byte string.
    Fixed,
    /// The first field selects the concrete table layout.
    Polymorphic,
}

/// Describes one registered macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroLayout {
    pub name: &'static str,
    pub codec: Codec,
    pub slots: &'static [FieldSlot],
}

impl MacroLayout {
    const fn table(name: &'static str, slots: &'static [FieldSlot]) -> Self {
        Self {
            name,
            codec: Codec::Table,
            slots,
        }
    }

    const fn bespoke(name: &'static str, codec: Codec, slots: &'static [FieldSlot]) -> Self {
        Self { name, codec, slots }
    }

    /// Names of the expression fields, in wire order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            FieldSlot::Field(name) => Some(*name),
            FieldSlot::Terminator => None,
        })
    }

    /// Whether trailing fields may be omitted.
    pub fn is_terminated(&self) -> bool {
        self.slots.contains(&FieldSlot::Terminator)
    }

    /// Position of the field called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.field_names().position(|field| field == name)
    }
}

use FieldSlot::{Field as F, Terminator as T};

const NO_FIELDS: &[FieldSlot] = &[];
const VALUE: &[FieldSlot] = &[F("value")];
const COLOR: &[FieldSlot] = &[F("color")];
const ENABLED: &[FieldSlot] = &[F("enabled")];
const EDGE: &[FieldSlot] = &[F("width"), F("strength")];
const TERNARY_ACTOR: &[FieldSlot] = &[F("object_id"), F("true_value"), F("false_value")];
const PARTICLE: &[FieldSlot] = &[F("word"), F("with_final"), F("without_final")];
const COLOR_TYPE: &[FieldSlot] = &[F("color_type")];
const NOUN: &[FieldSlot] = &[
    F("sheet"),
    F("article_type"),
    F("row"),
    F("amount"),
    F("case"),
    T,
];

fn describe(code: MacroCode) -> MacroLayout {
    use MacroCode::*;

    match code {
        SetResetTime => MacroLayout::table("setresettime", &[F("hour"), F("weekday"), T]),
        SetTime => MacroLayout::table("settime", &[F("timestamp")]),
        If => MacroLayout::table("if", &[F("condition"), F("true_value"), F("false_value")]),
        Switch => MacroLayout::bespoke("switch", Codec::Switch, &[F("condition")]),
        PcName => MacroLayout::table("pcname", &[F("object_id")]),
        IfPcGender => MacroLayout::table(
            "ifpcgender",
            &[F("object_id"), F("male_value"), F("female_value")],
        ),
        IfPcName => MacroLayout::table(
            "ifpcname",
            &[F("object_id"), F("name"), F("true_value"), F("false_value")],
        ),
        Josa => MacroLayout::table("josa", PARTICLE),
        Josaro => MacroLayout::table("josaro", PARTICLE),
        IfSelf => MacroLayout::table("ifself", TERNARY_ACTOR),
        NewLine => MacroLayout::table("br", NO_FIELDS),
        Wait => MacroLayout::table("wait", &[F("seconds")]),
        Icon => MacroLayout::table("icon", &[F("icon_id")]),
        Color => MacroLayout::table("color", COLOR),
        EdgeColor => MacroLayout::table("edgecolor", COLOR),
        ShadowColor => MacroLayout::table("shadowcolor", COLOR),
        SoftHyphen => MacroLayout::table("-", NO_FIELDS),
        Key => MacroLayout::table("key", NO_FIELDS),
        Scale => MacroLayout::table("scale", &[F("scale")]),
        Bold => MacroLayout::table("bold", ENABLED),
        Italic => MacroLayout::table("italic", ENABLED),
        Edge => MacroLayout::table("edge", EDGE),
        Shadow => MacroLayout::table("shadow", EDGE),
        NonBreakingSpace => MacroLayout::table("nbsp", NO_FIELDS),
        Icon2 => MacroLayout::table("icon2", &[F("icon_id"), T]),
        Hyphen => MacroLayout::table("--", NO_FIELDS),
        Num => MacroLayout::table("num", VALUE),
        Hex => MacroLayout::table("hex", VALUE),
        Kilo => MacroLayout::table("kilo", &[F("value"), F("separator")]),
        Byte => MacroLayout::table("byte", VALUE),
        Sec => MacroLayout::table("sec", VALUE),
        Time => MacroLayout::table("time", VALUE),
        Float => MacroLayout::table("float", &[F("value"), F("radix"), F("separator"), T]),
        Link => MacroLayout::bespoke("link", Codec::Polymorphic, link::GENERIC),
        Sheet => MacroLayout::table(
            "sheet",
            &[F("sheet"), F("row"), F("column"), F("column_param"), T],
        ),
        String => MacroLayout::table("string", VALUE),
        Caps => MacroLayout::table("caps", VALUE),
        Head => MacroLayout::table("head", VALUE),
        Split => MacroLayout::table("split", &[F("value"), F("separator"), F("index")]),
        HeadAll => MacroLayout::table("headall", VALUE),
        Fixed => MacroLayout::bespoke("fixed", Codec::Fixed, &[F("group"), F("key")]),
        Lower => MacroLayout::table("lower", VALUE),
        JaNoun => MacroLayout::table("janoun", NOUN),
        EnNoun => MacroLayout::table("ennoun", NOUN),
        DeNoun => MacroLayout::table("denoun", NOUN),
        FrNoun => MacroLayout::table("frnoun", NOUN),
        ChNoun => MacroLayout::table("chnoun", NOUN),
        LowerHead => MacroLayout::table("lowerhead", VALUE),
        ColorType => MacroLayout::table("colortype", COLOR_TYPE),
        EdgeColorType => MacroLayout::table("edgecolortype", COLOR_TYPE),
        Ruby => MacroLayout::table("ruby", &[F("base"), F("ruby")]),
        Digit => MacroLayout::table("digit", &[F("value"), F("length")]),
        Ordinal => MacroLayout::table("ordinal", VALUE),
        Sound => MacroLayout::table("sound", &[F("is_jingle"), F("sound_id")]),
        LevelPos => MacroLayout::table("levelpos", &[F("level_id")]),
    }
}

static REGISTRY: Lazy<EnumMap<MacroCode, MacroLayout>> = Lazy::new(|| EnumMap::from_fn(describe));

/// Layout of a registered code.
#[inline]
pub fn layout(code: MacroCode) -> &'static MacroLayout {
    &REGISTRY[code]
}

/// Layout of a raw code byte, `None` when the code is not registered.
pub fn lookup(code: u8) -> Option<(MacroCode, &'static MacroLayout)> {
    MacroCode::from_repr(code).map(|code| (code, layout(code)))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_code_has_a_layout() {
        for code in MacroCode::iter() {
            let layout = layout(code);
            assert!(!layout.name.is_empty());
            // The terminator, when present, is always the last slot.
            if let Some(pos) = layout.slots.iter().position(|s| *s == FieldSlot::Terminator) {
                assert_eq!(pos + 1, layout.slots.len(), "{}", layout.name);
            }
        }
    }

    #[test]
    fn optional_trailing_fields() {
        assert!(layout(MacroCode::SetResetTime).is_terminated());
        assert!(layout(MacroCode::EnNoun).is_terminated());
        assert!(!layout(MacroCode::If).is_terminated());
        assert_eq!(layout(MacroCode::Sheet).index_of("column_param"), Some(3));
        assert_eq!(layout(MacroCode::Color).index_of("colour"), None);
    }

    #[test]
    fn lookup_unregistered_code() {
        assert!(lookup(0x05).is_none());
        assert_eq!(lookup(0x27).map(|(c, l)| (c, l.codec)), Some((MacroCode::Link, Codec::Polymorphic)));
    }
}
