//! In-memory collaborators, for hosts that preload their data and for tests.
use std::collections::HashMap;

use sestring::SeString;

use crate::{
    language::ClientLanguage,
    providers::{ActorProvider, CellValue, Gender, SheetProvider, SheetTarget, TemplateProvider},
};

/// Sheets stored as a map of cells.
///
/// Cells inserted without a language answer every language; a cell inserted
/// for a specific language takes precedence for that language.
#[derive(Debug, Clone, Default)]
pub struct InMemorySheets {
    cells: HashMap<(String, u32, u32), CellValue>,
    localized: HashMap<(ClientLanguage, String, u32, u32), CellValue>,
    redirects: HashMap<(String, u32), SheetTarget>,
}

impl InMemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: &str, row: u32, column: u32, value: impl Into<CellValue>) -> &mut Self {
        self.cells.insert((sheet.to_string(), row, column), value.into());
        self
    }

    pub fn insert_localized(
        &mut self,
        language: ClientLanguage,
        sheet: &str,
        row: u32,
        column: u32,
        value: impl Into<CellValue>,
    ) -> &mut Self {
        self.localized
            .insert((language, sheet.to_string(), row, column), value.into());
        self
    }

    /// Insert a whole row, columns numbered from 0.
    pub fn insert_row<V: Into<CellValue>>(
        &mut self,
        sheet: &str,
        row: u32,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        for (column, value) in values.into_iter().enumerate() {
            self.insert(sheet, row, column as u32, value);
        }
        self
    }

    /// Redirect every column of `sheet` row `row` to `target`, keeping the
    /// requested column.
    pub fn insert_redirect(&mut self, sheet: &str, row: u32, target_sheet: &str, target_row: u32) -> &mut Self {
        self.redirects.insert(
            (sheet.to_string(), row),
            SheetTarget::new(target_sheet, target_row, 0),
        );
        self
    }
}

impl SheetProvider for InMemorySheets {
    fn redirect(&self, target: &SheetTarget) -> Option<SheetTarget> {
        self.redirects
            .get(&(target.sheet.clone(), target.row))
            .map(|to| SheetTarget::new(to.sheet.clone(), to.row, target.column))
    }

    fn cell(&self, sheet: &str, row: u32, column: u32, language: ClientLanguage) -> Option<CellValue> {
        self.localized
            .get(&(language, sheet.to_string(), row, column))
            .or_else(|| self.cells.get(&(sheet.to_string(), row, column)))
            .cloned()
    }
}

/// System-message templates keyed by id, shared by every language.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplates {
    templates: HashMap<u32, SeString>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, template: SeString) -> &mut Self {
        self.templates.insert(id, template);
        self
    }
}

impl TemplateProvider for InMemoryTemplates {
    fn system_message(&self, id: u32, _: ClientLanguage) -> Option<SeString> {
        self.templates.get(&id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub name: SeString,
    pub gender: Gender,
    pub home_world: u32,
}

/// Actors keyed by object id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActors {
    actors: HashMap<u32, Actor>,
    local_player: Option<u32>,
}

impl InMemoryActors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object_id: u32, name: &str, gender: Gender, home_world: u32) -> &mut Self {
        self.actors.insert(
            object_id,
            Actor {
                name: SeString::from_text(name),
                gender,
                home_world,
            },
        );
        self
    }

    pub fn set_local_player(&mut self, object_id: u32) -> &mut Self {
        self.local_player = Some(object_id);
        self
    }
}

impl ActorProvider for InMemoryActors {
    fn name(&self, object_id: u32) -> Option<SeString> {
        self.actors.get(&object_id).map(|actor| actor.name.clone())
    }

    fn gender(&self, object_id: u32) -> Option<Gender> {
        self.actors.get(&object_id).map(|actor| actor.gender)
    }

    fn is_local_player(&self, object_id: u32) -> Option<bool> {
        self.actors
            .contains_key(&object_id)
            .then(|| self.local_player == Some(object_id))
    }

    fn home_world(&self, object_id: u32) -> Option<u32> {
        self.actors.get(&object_id).map(|actor| actor.home_world)
    }
}
