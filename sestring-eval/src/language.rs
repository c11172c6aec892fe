use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Language of the client, selecting sheet text and noun grammar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ClientLanguage {
    Japanese,
    #[default]
    English,
    German,
    French,
    ChineseSimplified,
    Korean,
}

impl ClientLanguage {
    /// Two-letter code, as used by sheet files.
    pub fn to_str(self) -> &'static str {
        match self {
            ClientLanguage::Japanese => "ja",
            ClientLanguage::English => "en",
            ClientLanguage::German => "de",
            ClientLanguage::French => "fr",
            ClientLanguage::ChineseSimplified => "chs",
            ClientLanguage::Korean => "ko",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        ClientLanguage::iter().find(|lang| lang.to_str().eq_ignore_ascii_case(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for lang in ClientLanguage::iter() {
            assert_eq!(ClientLanguage::from_str(lang.to_str()), Some(lang));
        }
        assert_eq!(ClientLanguage::from_str("DE"), Some(ClientLanguage::German));
        assert_eq!(ClientLanguage::from_str("xx"), None);
    }
}
