//! Host-configured sheet redirects.
use serde::{Deserialize, Serialize};

use crate::{
    language::ClientLanguage,
    providers::{CellValue, SheetProvider, SheetTarget},
};

/// Sends lookups of a row range of one sheet to another sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub sheet: String,
    pub first_row: u32,
    pub last_row: u32,
    pub target_sheet: String,
    /// Added to the row number.
    #[serde(default)]
    pub row_offset: i64,
    /// Added to the column number.
    #[serde(default)]
    pub column_offset: i64,
}

impl RedirectRule {
    pub fn matches(&self, target: &SheetTarget) -> bool {
        self.sheet == target.sheet && (self.first_row..=self.last_row).contains(&target.row)
    }

    /// Apply the rule, `None` when it does not match or the offsets leave
    /// the `u32` range.
    pub fn apply(&self, target: &SheetTarget) -> Option<SheetTarget> {
        if !self.matches(target) {
            return None;
        }
        let row = u32::try_from(target.row as i64 + self.row_offset).ok()?;
        let column = u32::try_from(target.column as i64 + self.column_offset).ok()?;
        Some(SheetTarget::new(self.target_sheet.clone(), row, column))
    }
}

/// Ordered list of rules; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    rules: Vec<RedirectRule>,
}

impl RedirectTable {
    pub fn new(rules: Vec<RedirectRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    pub fn redirect(&self, target: &SheetTarget) -> Option<SheetTarget> {
        self.rules.iter().find_map(|rule| rule.apply(target))
    }
}

/// Wraps a provider so configured rules are consulted before the provider's
/// own redirects.
pub struct RedirectingSheets<'a> {
    inner: &'a dyn SheetProvider,
    table: RedirectTable,
}

impl<'a> RedirectingSheets<'a> {
    pub fn new(inner: &'a dyn SheetProvider, table: RedirectTable) -> Self {
        Self { inner, table }
    }
}

impl SheetProvider for RedirectingSheets<'_> {
    fn redirect(&self, target: &SheetTarget) -> Option<SheetTarget> {
        self.table
            .redirect(target)
            .or_else(|| self.inner.redirect(target))
    }

    fn cell(&self, sheet: &str, row: u32, column: u32, language: ClientLanguage) -> Option<CellValue> {
        self.inner.cell(sheet, row, column, language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySheets;

    fn rule() -> RedirectRule {
        RedirectRule {
            sheet: "EventItem".into(),
            first_row: 2_000_000,
            last_row: 2_999_999,
            target_sheet: "Item".into(),
            row_offset: -2_000_000,
            column_offset: 0,
        }
    }

    #[test]
    fn rule_applies_offsets_in_range() {
        let rule = rule();
        assert_eq!(
            rule.apply(&SheetTarget::new("EventItem", 2_000_005, 1)),
            Some(SheetTarget::new("Item", 5, 1))
        );
        assert_eq!(rule.apply(&SheetTarget::new("EventItem", 5, 1)), None);
        assert_eq!(rule.apply(&SheetTarget::new("Item", 2_000_005, 1)), None);
    }

    #[test]
    fn configured_rules_come_first() {
        let mut inner = InMemorySheets::new();
        inner.insert_redirect("EventItem", 2_000_005, "Quest", 1);
        let sheets = RedirectingSheets::new(&inner, RedirectTable::new(vec![rule()]));
        assert_eq!(
            sheets.redirect(&SheetTarget::new("EventItem", 2_000_005, 0)),
            Some(SheetTarget::new("Item", 5, 0))
        );
    }
}
