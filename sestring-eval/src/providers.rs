//! Collaborators supplied by the host.
//!
//! The evaluator never owns game data. Sheets, system-message templates, actor
//! state and global parameters are reached through the traits below, bundled
//! in [`Services`]. [`Unavailable`] implements every trait with empty answers.
use sestring::SeString;
use strum::EnumIs;

use crate::language::ClientLanguage;

/// Address of a sheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetTarget {
    pub sheet: String,
    pub row: u32,
    pub column: u32,
}

impl SheetTarget {
    pub fn new(sheet: impl Into<String>, row: u32, column: u32) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            column,
        }
    }
}

/// Value of a sheet cell.
#[derive(Debug, Clone, PartialEq, EnumIs)]
pub enum CellValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    PackedBool(bool),
    String(SeString),
}

impl CellValue {
    /// Integer value of numeric cells. Floats truncate; strings have none.
    pub fn as_i64(&self) -> Option<i64> {
        Some(match self {
            CellValue::Bool(v) | CellValue::PackedBool(v) => *v as i64,
            CellValue::Int8(v) => *v as i64,
            CellValue::Int16(v) => *v as i64,
            CellValue::Int32(v) => *v as i64,
            CellValue::Int64(v) => *v,
            CellValue::UInt8(v) => *v as i64,
            CellValue::UInt16(v) => *v as i64,
            CellValue::UInt32(v) => *v as i64,
            CellValue::UInt64(v) => *v as i64,
            CellValue::Float32(v) => *v as i64,
            CellValue::String(_) => return None,
        })
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            CellValue::Float32(v) => Some(*v),
            other => other.as_i64().map(|v| v as f32),
        }
    }

    pub fn as_string(&self) -> Option<&SeString> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Decimal rendering of numeric cells: booleans as 0/1, floats in their
    /// shortest round-trip form.
    pub fn render_number(&self) -> Option<String> {
        Some(match self {
            CellValue::Bool(v) | CellValue::PackedBool(v) => u8::from(*v).to_string(),
            CellValue::Int8(v) => v.to_string(),
            CellValue::Int16(v) => v.to_string(),
            CellValue::Int32(v) => v.to_string(),
            CellValue::Int64(v) => v.to_string(),
            CellValue::UInt8(v) => v.to_string(),
            CellValue::UInt16(v) => v.to_string(),
            CellValue::UInt32(v) => v.to_string(),
            CellValue::UInt64(v) => v.to_string(),
            CellValue::Float32(v) => v.to_string(),
            CellValue::String(_) => return None,
        })
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(SeString::from_text(value))
    }
}

impl From<SeString> for CellValue {
    fn from(value: SeString) -> Self {
        CellValue::String(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int32(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::UInt32(value)
    }
}

impl From<f32> for CellValue {
    fn from(value: f32) -> Self {
        CellValue::Float32(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Read access to game data sheets.
pub trait SheetProvider {
    /// One redirect step: where a lookup of `target` should really go.
    fn redirect(&self, target: &SheetTarget) -> Option<SheetTarget> {
        let _ = target;
        None
    }

    fn cell(&self, sheet: &str, row: u32, column: u32, language: ClientLanguage) -> Option<CellValue>;

    fn string(&self, sheet: &str, row: u32, column: u32, language: ClientLanguage) -> Option<SeString> {
        match self.cell(sheet, row, column, language)? {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer cell, 0 when absent or not numeric.
    fn int(&self, sheet: &str, row: u32, column: u32, language: ClientLanguage) -> i64 {
        self.cell(sheet, row, column, language)
            .and_then(|cell| cell.as_i64())
            .unwrap_or(0)
    }
}

/// Grammatical case requested by a noun macro (0-based).
pub type GrammaticalCase = u32;

/// Everything a noun macro asks of the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NounRequest {
    pub language: ClientLanguage,
    pub sheet: String,
    pub row: u32,
    pub article_type: u32,
    pub amount: i32,
    pub case: GrammaticalCase,
}

/// Produces inflected nouns.
pub trait NounGrammar {
    fn noun(&self, request: &NounRequest) -> Option<SeString>;
}

/// System-message templates used to label system links.
pub trait TemplateProvider {
    fn system_message(&self, id: u32, language: ClientLanguage) -> Option<SeString>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum Gender {
    Male,
    Female,
}

/// Live state of actors referenced by object id.
pub trait ActorProvider {
    fn name(&self, object_id: u32) -> Option<SeString>;

    fn gender(&self, object_id: u32) -> Option<Gender>;

    /// Whether the actor is the local player, `None` when it is unknown.
    fn is_local_player(&self, object_id: u32) -> Option<bool>;

    fn home_world(&self, object_id: u32) -> Option<u32>;
}

/// Indexed global numbers and strings, 0-based.
pub trait GlobalParameters {
    fn number(&self, index: usize) -> Option<i32>;

    fn string(&self, index: usize) -> Option<SeString>;
}

/// Implements every collaborator, answering nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unavailable;

impl SheetProvider for Unavailable {
    fn cell(&self, _: &str, _: u32, _: u32, _: ClientLanguage) -> Option<CellValue> {
        None
    }
}

impl NounGrammar for Unavailable {
    fn noun(&self, _: &NounRequest) -> Option<SeString> {
        None
    }
}

impl TemplateProvider for Unavailable {
    fn system_message(&self, _: u32, _: ClientLanguage) -> Option<SeString> {
        None
    }
}

impl ActorProvider for Unavailable {
    fn name(&self, _: u32) -> Option<SeString> {
        None
    }

    fn gender(&self, _: u32) -> Option<Gender> {
        None
    }

    fn is_local_player(&self, _: u32) -> Option<bool> {
        None
    }

    fn home_world(&self, _: u32) -> Option<u32> {
        None
    }
}

impl GlobalParameters for Unavailable {
    fn number(&self, _: usize) -> Option<i32> {
        None
    }

    fn string(&self, _: usize) -> Option<SeString> {
        None
    }
}

/// Collaborators of one evaluator.
///
/// `nouns` overrides the built-in noun grammar, which reads noun sheets
/// through `sheets`.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub sheets: &'a dyn SheetProvider,
    pub templates: &'a dyn TemplateProvider,
    pub actors: &'a dyn ActorProvider,
    pub globals: &'a dyn GlobalParameters,
    pub nouns: Option<&'a dyn NounGrammar>,
}

impl Services<'static> {
    /// No collaborator at all.
    pub fn unavailable() -> Self {
        Self {
            sheets: &Unavailable,
            templates: &Unavailable,
            actors: &Unavailable,
            globals: &Unavailable,
            nouns: None,
        }
    }
}

impl Default for Services<'static> {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl<'a> Services<'a> {
    pub fn with_sheets(self, sheets: &'a dyn SheetProvider) -> Self {
        Self { sheets, ..self }
    }

    pub fn with_templates(self, templates: &'a dyn TemplateProvider) -> Self {
        Self { templates, ..self }
    }

    pub fn with_actors(self, actors: &'a dyn ActorProvider) -> Self {
        Self { actors, ..self }
    }

    pub fn with_globals(self, globals: &'a dyn GlobalParameters) -> Self {
        Self { globals, ..self }
    }

    pub fn with_nouns(self, nouns: &'a dyn NounGrammar) -> Self {
        Self {
            nouns: Some(nouns),
            ..self
        }
    }
}

impl std::fmt::Debug for Services<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("nouns", &self.nouns.is_some())
            .finish_non_exhaustive()
    }
}
