//! Local and global parameters.
//!
//! Parameters are 1-based on the wire and 0-based in storage. A parameter
//! read as the other kind is converted: numbers render as decimal text and
//! strings parse their display text, falling back to 0.
use sestring::SeString;
use strum::{EnumIs, EnumTryAs};

use crate::providers::GlobalParameters;

/// Caller-supplied substitution value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs)]
pub enum LocalParameter {
    Number(i32),
    String(SeString),
}

impl LocalParameter {
    pub fn as_number(&self) -> i32 {
        match self {
            LocalParameter::Number(value) => *value,
            LocalParameter::String(string) => parse_number(string),
        }
    }

    /// Strings are returned as supplied, without evaluation.
    pub fn to_se_string(&self) -> SeString {
        match self {
            LocalParameter::Number(value) => SeString::from_text(&value.to_string()),
            LocalParameter::String(string) => string.clone(),
        }
    }
}

impl From<i32> for LocalParameter {
    fn from(value: i32) -> Self {
        LocalParameter::Number(value)
    }
}

impl From<&str> for LocalParameter {
    fn from(value: &str) -> Self {
        LocalParameter::String(SeString::from_text(value))
    }
}

impl From<SeString> for LocalParameter {
    fn from(value: SeString) -> Self {
        LocalParameter::String(value)
    }
}

/// Number held by the display text of `string`, 0 when there is none.
pub fn parse_number(string: &SeString) -> i32 {
    string.extract_text().trim().parse().unwrap_or(0)
}

/// Convert a 1-based wire index to a storage index.
#[inline]
pub fn storage_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()?.checked_sub(1)
}

/// Host-owned global parameters backed by a plain list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalParameterTable {
    values: Vec<LocalParameter>,
}

impl GlobalParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter at 0-based `index`, growing the table with zeros.
    pub fn set(&mut self, index: usize, value: impl Into<LocalParameter>) {
        if self.values.len() <= index {
            self.values.resize(index + 1, LocalParameter::Number(0));
        }
        self.values[index] = value.into();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<LocalParameter> for GlobalParameterTable {
    fn from_iter<T: IntoIterator<Item = LocalParameter>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl GlobalParameters for GlobalParameterTable {
    fn number(&self, index: usize) -> Option<i32> {
        self.values.get(index).map(LocalParameter::as_number)
    }

    fn string(&self, index: usize) -> Option<SeString> {
        self.values.get(index).map(LocalParameter::to_se_string)
    }
}
