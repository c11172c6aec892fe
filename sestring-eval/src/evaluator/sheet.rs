//! Sheet lookups: raw cells, nouns and level positions.
use log::trace;
use sestring::{MacroPayload, SeString};

use super::{Evaluator, invalid};
use crate::{
    context::EvaluationContext,
    error::{EvalResult, Unresolved},
    language::ClientLanguage,
    noun::NounProcessor,
    output::OutputBuilder,
    params::LocalParameter,
    providers::{CellValue, NounGrammar, NounRequest, SheetTarget},
};

/// `sheet(name, row, column[, param])`. String cells are evaluated with
/// `param` as their first local parameter.
pub(super) fn sheet(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    let name = ev.string_field(ctx, payload, "sheet")?.extract_text();
    let row = ev.number_field(ctx, payload, "row")? as u32;
    let column = ev.number_field(ctx, payload, "column")? as u32;
    let param = ev.optional_number_field(ctx, payload, "column_param")?.unwrap_or(0);

    match ev.cell(ctx, &name, row, column)? {
        CellValue::String(text) => {
            let text = ev.evaluate_with_locals(&text, ctx, vec![LocalParameter::Number(param)])?;
            out.append(&text);
        }
        cell => {
            if let Some(number) = cell.render_number() {
                out.append_text(&number);
            }
        }
    }
    Ok(())
}

/// `*noun(sheet, article_type, row[, amount[, case]])` in the language the
/// macro names. The case is 1-based on the wire.
fn noun(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
    language: ClientLanguage,
) -> EvalResult<()> {
    let name = ev.string_field(ctx, payload, "sheet")?.extract_text();
    let article_type = ev.number_field(ctx, payload, "article_type")? as u32;
    let row = ev.number_field(ctx, payload, "row")? as u32;
    let amount = ev.optional_number_field(ctx, payload, "amount")?.unwrap_or(1);
    let case = ev.optional_number_field(ctx, payload, "case")?.unwrap_or(1);

    let target = ev.follow_redirects(SheetTarget::new(name, row, 0))?;
    let request = NounRequest {
        language,
        sheet: target.sheet,
        row: target.row,
        article_type,
        amount,
        case: case.max(1) as u32 - 1,
    };

    let builtin = NounProcessor::new(ev.sheets());
    let grammar: &dyn NounGrammar = match ev.services().nouns {
        Some(nouns) => nouns,
        None => &builtin,
    };
    let noun = grammar.noun(&request).ok_or(Unresolved::MissingNoun {
        sheet: request.sheet.clone(),
        row: request.row,
    })?;
    let noun = ev.evaluate_nested(&noun, ctx)?;
    out.append(&noun);
    Ok(())
}

pub(super) fn ja_noun(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    noun(ev, ctx, payload, out, ClientLanguage::Japanese)
}

pub(super) fn en_noun(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    noun(ev, ctx, payload, out, ClientLanguage::English)
}

pub(super) fn de_noun(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    noun(ev, ctx, payload, out, ClientLanguage::German)
}

pub(super) fn fr_noun(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    noun(ev, ctx, payload, out, ClientLanguage::French)
}

pub(super) fn ch_noun(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    noun(ev, ctx, payload, out, ClientLanguage::ChineseSimplified)
}

/// Columns of the `Level` sheet.
mod level {
    pub const SHEET: &str = "Level";
    pub const X: u32 = 0;
    pub const Z: u32 = 2;
    pub const MAP: u32 = 3;
}

/// Columns of the `Map` sheet.
mod map {
    pub const SHEET: &str = "Map";
    pub const PLACE_NAME: u32 = 0;
    pub const SIZE_FACTOR: u32 = 1;
    pub const OFFSET_X: u32 = 2;
    pub const OFFSET_Y: u32 = 3;
}

const PLACE_NAME_SHEET: &str = "PlaceName";

/// Map coordinate, in tenths, of world coordinate `world` on a map scaled by
/// `size_factor` (percent) and shifted by `offset`.
pub fn map_coordinate(world: f32, offset: i32, size_factor: u32) -> i32 {
    let scale = size_factor as f32 / 100.0;
    (10.0 - ((world + offset as f32) * scale + 1024.0) * -0.2 / scale) as i32
}

/// Place name of `map_id` and the map coordinates of a world position.
pub(super) fn map_position(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    map_id: u32,
    world_x: f32,
    world_z: f32,
) -> EvalResult<(SeString, i32, i32)> {
    let size_factor = ev.cell_int(ctx, map::SHEET, map_id, map::SIZE_FACTOR)?;
    let size_factor = u32::try_from(size_factor).ok().filter(|s| *s > 0).ok_or(Unresolved::InvalidArgument {
        macro_name: "levelpos",
        reason: format!("map {map_id} has size factor {size_factor}"),
    })?;
    let offset_x = ev.cell_int(ctx, map::SHEET, map_id, map::OFFSET_X)? as i32;
    let offset_y = ev.cell_int(ctx, map::SHEET, map_id, map::OFFSET_Y)? as i32;
    let place_name = ev.cell_int(ctx, map::SHEET, map_id, map::PLACE_NAME)? as u32;
    let name = ev.cell_text(ctx, PLACE_NAME_SHEET, place_name, 0)?;

    let x = map_coordinate(world_x, offset_x, size_factor);
    let y = map_coordinate(world_z, offset_y, size_factor);
    trace!("Map {map_id}: ({world_x}, {world_z}) is ({x}, {y}) in tenths");
    Ok((name, x, y))
}

pub(super) fn level_pos(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    let level_id = ev.number_field(ctx, payload, "level_id")? as u32;
    let coordinate = |ctx: &EvaluationContext, column: u32| -> EvalResult<f32> {
        let cell = ev.cell(ctx, level::SHEET, level_id, column)?;
        cell.as_f32()
            .ok_or_else(|| invalid(payload, format!("level {level_id} column {column} is not numeric")))
    };
    let x = coordinate(ctx, level::X)?;
    let z = coordinate(ctx, level::Z)?;
    let map_id = ev.cell_int(ctx, level::SHEET, level_id, level::MAP)? as u32;

    let (name, x, y) = map_position(ev, ctx, map_id, x, z)?;
    let template = ev.config().templates.level_position;
    let label = ev.format_system_message(
        template,
        vec![
            LocalParameter::String(name),
            LocalParameter::Number(x),
            LocalParameter::Number(y),
        ],
        ctx,
    )?;
    out.append(&label);
    Ok(())
}
