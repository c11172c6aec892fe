//! Registered macro codes.
use enum_map::Enum;
use strum::{EnumIter, FromRepr, IntoEnumIterator};

/// The byte following the start marker of a macro payload.
///
/// Codes absent from this enumeration are still decoded, as opaque payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum, EnumIter, FromRepr)]
#[repr(u8)]
pub enum MacroCode {
    SetResetTime = 0x06,
    SetTime = 0x07,
    If = 0x08,
    Switch = 0x09,
    PcName = 0x0A,
    IfPcGender = 0x0B,
    IfPcName = 0x0C,
    Josa = 0x0D,
    Josaro = 0x0E,
    IfSelf = 0x0F,
    NewLine = 0x10,
    Wait = 0x11,
    Icon = 0x12,
    Color = 0x13,
    EdgeColor = 0x14,
    ShadowColor = 0x15,
    SoftHyphen = 0x16,
    Key = 0x17,
    Scale = 0x18,
    Bold = 0x19,
    Italic = 0x1A,
    Edge = 0x1B,
    Shadow = 0x1C,
    NonBreakingSpace = 0x1D,
    Icon2 = 0x1E,
    Hyphen = 0x1F,
    Num = 0x20,
    Hex = 0x21,
    Kilo = 0x22,
    Byte = 0x23,
    Sec = 0x24,
    Time = 0x25,
    Float = 0x26,
    Link = 0x27,
    Sheet = 0x28,
    String = 0x29,
    Caps = 0x2A,
    Head = 0x2B,
    Split = 0x2C,
    HeadAll = 0x2D,
    Fixed = 0x2E,
    Lower = 0x2F,
    JaNoun = 0x30,
    EnNoun = 0x31,
    DeNoun = 0x32,
    FrNoun = 0x33,
    ChNoun = 0x34,
    LowerHead = 0x40,
    ColorType = 0x48,
    EdgeColorType = 0x49,
    Ruby = 0x4A,
    Digit = 0x50,
    Ordinal = 0x51,
    Sound = 0x60,
    LevelPos = 0x61,
}

impl MacroCode {
    /// The wire byte of this code.
    #[inline]
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Name used in macro strings, e.g. `if` or `edgecolortype`.
    pub fn name(self) -> &'static str {
        crate::registry::layout(self).name
    }

    /// Look a code up by its macro-string name.
    pub fn from_name(name: &str) -> Option<Self> {
        MacroCode::iter().find(|code| code.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_roundtrip_through_repr() {
        for code in MacroCode::iter() {
            assert_eq!(MacroCode::from_repr(code.byte()), Some(code));
        }
        assert_eq!(MacroCode::from_repr(0x05), None);
        assert_eq!(MacroCode::from_repr(0xFF), None);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = MacroCode::iter().map(MacroCode::name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
        assert_eq!(MacroCode::from_name("EdgeColorType"), Some(MacroCode::EdgeColorType));
    }
}
