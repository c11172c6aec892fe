//! Built-in noun grammar over the game's noun sheets.
//!
//! Noun sheets share a column layout, shifted by a per-family offset:
//!
//! | column | meaning                                  |
//! |--------|------------------------------------------|
//! | 0      | singular                                 |
//! | 1      | adjective (declension row offset)        |
//! | 2      | plural                                   |
//! | 3      | possessive pronoun (declension row offset)|
//! | 4      | starts with a vowel                      |
//! | 5      | plural form flag                         |
//! | 6      | pronoun, i.e. grammatical gender         |
//! | 7      | article (non-zero for proper nouns)      |
//!
//! Articles and endings come from the `Attributive` sheet of the target
//! language and are substituted into the tokens `[t]`, `[p]`, `[pa]`, `[a]`
//! and `[n]` found in the noun text.
use log::trace;
use sestring::{SeString, SeStringBuilder};

use crate::{
    language::ClientLanguage,
    providers::{NounGrammar, NounRequest, SheetProvider},
};

pub const SINGULAR: u32 = 0;
pub const ADJECTIVE: u32 = 1;
pub const PLURAL: u32 = 2;
pub const POSSESSIVE: u32 = 3;
pub const STARTS_WITH_VOWEL: u32 = 4;
pub const PLURAL_FLAG: u32 = 5;
pub const PRONOUN: u32 = 6;
pub const ARTICLE: u32 = 7;

const ATTRIBUTIVE: &str = "Attributive";

/// Offset of the noun columns in `sheet`.
pub fn column_offset(sheet: &str) -> u32 {
    match sheet {
        "BeastTribe" => 10,
        "Glasses" => 4,
        "GlassesStyle" => 15,
        "Ornament" => 8,
        "DeepDungeonEquipment" | "DeepDungeonItem" | "DeepDungeonMagicStone" | "DeepDungeonDemiclone" => 1,
        _ => 0,
    }
}

/// German article types of noun macros.
mod german {
    pub const DEFINITE: u32 = 2;
    pub const POSSESSIVE: u32 = 3;
    pub const ZERO_ARTICLE: u32 = 5;
    pub const DEMONSTRATIVE: u32 = 6;
}

/// Inflects nouns read from a [`SheetProvider`].
#[derive(Clone, Copy)]
pub struct NounProcessor<'a> {
    sheets: &'a dyn SheetProvider,
}

struct NounRow<'r, 'a> {
    processor: &'r NounProcessor<'a>,
    request: &'r NounRequest,
    offset: u32,
}

impl NounRow<'_, '_> {
    fn int(&self, column: u32) -> i64 {
        self.processor.sheets.int(
            &self.request.sheet,
            self.request.row,
            self.offset + column,
            self.request.language,
        )
    }

    fn text(&self, column: u32) -> SeString {
        self.processor
            .sheets
            .string(&self.request.sheet, self.request.row, self.offset + column, self.request.language)
            .unwrap_or_default()
    }

    /// Singular for an amount of one, plural otherwise.
    fn number_column(&self) -> u32 {
        if self.request.amount == 1 { SINGULAR } else { PLURAL }
    }

    fn attributive(&self, row: i64, column: i64) -> SeString {
        match (u32::try_from(row), u32::try_from(column)) {
            (Ok(row), Ok(column)) => self
                .processor
                .sheets
                .string(ATTRIBUTIVE, row, column, self.request.language)
                .unwrap_or_default(),
            _ => SeString::new(),
        }
    }
}

impl<'a> NounProcessor<'a> {
    pub fn new(sheets: &'a dyn SheetProvider) -> Self {
        Self { sheets }
    }

    fn english(&self, row: &NounRow<'_, '_>) -> SeString {
        let mut builder = SeStringBuilder::new();
        if row.int(ARTICLE) == 0 {
            let vowel = row.int(STARTS_WITH_VOWEL);
            let column = vowel + 2 * (vowel + 1) + row.number_column() as i64;
            builder.append(&row.attributive(row.request.article_type as i64, column));
        }
        builder.append(&row.text(row.number_column()));
        with_amount(builder.build(), row.request.amount)
    }

    fn german(&self, row: &NounRow<'_, '_>) -> SeString {
        let request = row.request;
        let mut gender = row.int(PRONOUN);
        let article = row.int(ARTICLE);
        let case_column = 4 * request.case as i64 + 8;
        let case_row_offset = row.int(if request.amount == 1 { ADJECTIVE } else { POSSESSIVE });
        if request.amount != 1 {
            gender = 3;
        }
        let column = case_column + gender;

        let text = row.text(row.number_column());
        let has_article_token = text.contains_text("[t]");

        let mut builder = SeStringBuilder::new();
        if article == 0 && !has_article_token {
            builder.append(&row.attributive(request.article_type as i64, column));
        }
        builder.append(&text);
        let mut noun = builder.build();

        let ending = row.attributive(case_row_offset + 26, column);
        if noun.contains_text("[p]") {
            noun = noun.replace_text("[p]", &ending.extract_text());
        } else {
            noun = noun.into_payloads().into_iter().chain(ending.into_payloads()).collect();
        }

        if has_article_token {
            let definite = row.attributive(39, column);
            noun = noun.replace_text("[t]", &definite.extract_text());
        }

        let omission = row.attributive(24, column);
        noun = noun.replace_text("[pa]", &omission.extract_text());

        let declension_row = match request.article_type {
            german::POSSESSIVE | german::DEMONSTRATIVE => 25,
            german::ZERO_ARTICLE => 38,
            german::DEFINITE => 37,
            _ => 26,
        };
        let declension = row.attributive(declension_row, column);
        noun = noun.replace_text("[a]", &declension.extract_text());

        with_amount(noun, request.amount)
    }

    fn french(&self, row: &NounRow<'_, '_>) -> SeString {
        let request = row.request;
        let vowel = row.int(STARTS_WITH_VOWEL);
        let gender = row.int(PRONOUN);
        let article = row.int(ARTICLE);
        let base = 4 * (vowel + 6 + 2 * gender);
        let article_type = request.article_type as i64;

        let mut builder = SeStringBuilder::new();
        if article != 0 {
            builder.append(&row.attributive(article_type, base));
            let column = if request.amount <= 1 { SINGULAR } else { PLURAL };
            builder.append(&row.text(column));
            let noun = builder.build();
            return if request.amount <= 1 {
                with_amount(noun, request.amount)
            } else {
                noun
            };
        }

        let plural_flag = row.int(PLURAL_FLAG);
        if plural_flag != 0 && (request.amount > 1 || plural_flag == 2) {
            let prefix = row.attributive(article_type, base + 2);
            if !prefix.is_empty() {
                builder.append(&prefix).append(&row.text(PLURAL));
            }
        } else {
            let elision = if plural_flag != 0 { 1 } else { 3 };
            builder
                .append(&row.attributive(article_type, base + elision))
                .append(&row.text(SINGULAR));
        }
        with_amount(builder.build(), request.amount)
    }
}

fn with_amount(noun: SeString, amount: i32) -> SeString {
    noun.replace_text("[n]", &amount.to_string())
}

impl NounGrammar for NounProcessor<'_> {
    fn noun(&self, request: &NounRequest) -> Option<SeString> {
        let offset = column_offset(&request.sheet);
        // A row without a singular cell does not exist.
        self.sheets
            .cell(&request.sheet, request.row, offset + SINGULAR, request.language)?;

        let row = NounRow {
            processor: self,
            request,
            offset,
        };
        trace!(
            "Inflecting `{}` row {} ({:?}, amount {}, case {})",
            request.sheet, request.row, request.language, request.amount, request.case
        );
        Some(match request.language {
            ClientLanguage::English => self.english(&row),
            ClientLanguage::German => self.german(&row),
            ClientLanguage::French => self.french(&row),
            ClientLanguage::Japanese | ClientLanguage::ChineseSimplified | ClientLanguage::Korean => {
                with_amount(row.text(SINGULAR), request.amount)
            }
        })
    }
}
