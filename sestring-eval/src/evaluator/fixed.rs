//! System links and auto-translation references carried by `fixed`.
//!
//! A system link renders as
//! `[link start] [color types] U+E0BB label [color pops] [link end]`; the
//! label is a system-message template formatted with link-specific
//! arguments. Kinds that do not open a hyperlink skip the link framing.
use log::trace;
use sestring::{
    FixedBody, LinkKind, MacroBody, MacroPayload, SeString, SystemLinkKind,
    expr::Expression,
    payload::fixed::SYSTEM_LINK_GROUPS,
};

use super::{Evaluator, invalid};
use crate::{
    context::EvaluationContext,
    error::{EvalResult, Unresolved},
    output::OutputBuilder,
    params::LocalParameter,
};

/// Private-use glyph drawn before the label of a system link.
pub const LINK_MARKER: &str = "\u{E0BB}";
/// Glyphs enclosing auto-translated text.
pub const AUTO_TRANSLATE_OPEN: &str = "\u{E040} ";
pub const AUTO_TRANSLATE_CLOSE: &str = " \u{E041}";
/// Glyph appended to the name of high-quality items.
pub const HIGH_QUALITY_MARKER: &str = " \u{E03C}";

/// Item ids at or above this value denote the high-quality variant.
pub const HIGH_QUALITY_OFFSET: u32 = 1_000_000;

const LINK_COLOR_TYPE: u32 = 500;
const LINK_EDGE_COLOR_TYPE: u32 = 501;
const ITEM_COLOR_TYPE: u32 = 549;
const ITEM_EDGE_COLOR_TYPE: u32 = 550;

const COMPLETION_SHEET: &str = "Completion";

/// Color types of an item link, by rarity.
pub fn item_color_types(rarity: u32) -> (u32, u32) {
    let step = rarity.saturating_sub(1).saturating_mul(2);
    (
        ITEM_COLOR_TYPE.saturating_add(step),
        ITEM_EDGE_COLOR_TYPE.saturating_add(step),
    )
}

/// What a system link contributes around the shared framing.
struct SystemLink {
    link: Option<(LinkKind, Vec<Expression>)>,
    colors: (u32, u32),
    template: u32,
    args: Vec<LocalParameter>,
}

impl SystemLink {
    fn plain(template: u32, args: Vec<LocalParameter>) -> Self {
        Self {
            link: None,
            colors: (LINK_COLOR_TYPE, LINK_EDGE_COLOR_TYPE),
            template,
            args,
        }
    }

    fn linked(kind: LinkKind, link_args: Vec<Expression>, template: u32, args: Vec<LocalParameter>) -> Self {
        Self {
            link: Some((kind, link_args)),
            ..Self::plain(template, args)
        }
    }

    fn write(self, ev: &Evaluator<'_>, ctx: &mut EvaluationContext, out: &mut OutputBuilder) -> EvalResult<()> {
        let label = ev.format_system_message(self.template, self.args, ctx)?;
        let linked = self.link.is_some();
        if let Some((kind, args)) = self.link {
            out.push_link(kind, args);
        }
        out.push_color_type(self.colors.0)
            .push_edge_color_type(self.colors.1)
            .append_text(LINK_MARKER)
            .append(&label)
            .pop_edge_color_type()
            .pop_color_type();
        if linked {
            out.pop_link();
        }
        Ok(())
    }
}

struct FixedArgs<'p> {
    payload: &'p MacroPayload,
    body: &'p FixedBody,
}

impl FixedArgs<'_> {
    /// Expression at wire position `index`, raw string excluded.
    fn number(&self, ev: &Evaluator<'_>, ctx: &mut EvaluationContext, index: usize, field: &'static str) -> EvalResult<i32> {
        let expr = self.body.expression(index).ok_or(Unresolved::MissingArgument {
            macro_name: "fixed",
            field,
        })?;
        ev.resolve_number(expr, ctx)
    }

    fn raw_text(&self) -> EvalResult<SeString> {
        let bytes = self
            .body
            .text
            .as_deref()
            .ok_or_else(|| invalid(self.payload, "missing raw text"))?;
        Ok(SeString::decode(bytes)?)
    }
}

pub(super) fn fixed(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    let MacroBody::Fixed(body) = &payload.body else {
        return Err(invalid(payload, "not a fixed body"));
    };
    let args = FixedArgs { payload, body };
    let group = args.number(ev, ctx, 0, "group")? as u32;
    let key = args.number(ev, ctx, 1, "key")? as u32;

    match SystemLinkKind::from_group_key(group, key) {
        Some(kind) => {
            trace!("System link {kind:?}");
            system_link(ev, ctx, &args, kind)?.write(ev, ctx, out)
        }
        None if SYSTEM_LINK_GROUPS.contains(&group) => Err(invalid(payload, format!("unknown system link key {key}"))),
        None => {
            let text = auto_translate(ev, ctx, group, key)?;
            out.append_text(AUTO_TRANSLATE_OPEN)
                .append(&text)
                .append_text(AUTO_TRANSLATE_CLOSE);
            Ok(())
        }
    }
}

fn system_link(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    args: &FixedArgs<'_>,
    kind: SystemLinkKind,
) -> EvalResult<SystemLink> {
    use LocalParameter::{Number, String as Text};

    let templates = &ev.config().templates;
    Ok(match kind {
        SystemLinkKind::Player => {
            let world = args.number(ev, ctx, 2, "world_id")?;
            let name = args.raw_text()?;
            SystemLink::linked(
                LinkKind::Character,
                vec![
                    Expression::int(0),
                    Expression::int(world as u32),
                    Expression::int(0),
                    Expression::String(name.clone()),
                ],
                templates.player,
                vec![Text(name), Number(world)],
            )
        }
        SystemLinkKind::ClassJobLevel => {
            let class_job = args.number(ev, ctx, 2, "class_job")? as u32;
            let level = args.number(ev, ctx, 3, "level")?;
            let name = ev.cell_text(ctx, "ClassJob", class_job, 0)?;
            SystemLink::plain(templates.class_job_level, vec![Text(name), Number(level)])
        }
        SystemLinkKind::MapPosition => {
            let territory = args.number(ev, ctx, 2, "territory")? as u32;
            let map = args.number(ev, ctx, 3, "map")? as u32;
            let raw_x = args.number(ev, ctx, 4, "raw_x")?;
            let raw_y = args.number(ev, ctx, 5, "raw_y")?;
            let world_x = raw_x as f32 / 1000.0;
            let world_y = raw_y as f32 / 1000.0;
            let (name, x, y) = super::sheet::map_position(ev, ctx, map, world_x, world_y)?;
            SystemLink::linked(
                LinkKind::MapPosition,
                vec![
                    Expression::int((territory << 16) | (map & 0xFFFF)),
                    Expression::int(raw_x as u32),
                    Expression::int(raw_y as u32),
                ],
                templates.map_position,
                vec![Text(name), Number(x), Number(y)],
            )
        }
        SystemLinkKind::Item => {
            let item_id = args.number(ev, ctx, 2, "item_id")? as u32;
            let high_quality = item_id >= HIGH_QUALITY_OFFSET;
            let row = if high_quality { item_id - HIGH_QUALITY_OFFSET } else { item_id };
            let mut name = ev.cell_text(ctx, "Item", row, 0)?;
            let rarity = ev.cell_int(ctx, "Item", row, 1)?.clamp(0, u32::MAX as i64) as u32;
            let link_name = name.clone();
            if high_quality {
                name = name.into_payloads().into_iter().chain(SeString::from_text(HIGH_QUALITY_MARKER).into_payloads()).collect();
            }
            SystemLink {
                colors: item_color_types(rarity),
                ..SystemLink::linked(
                    LinkKind::Item,
                    vec![
                        Expression::int(item_id),
                        Expression::int(rarity),
                        Expression::int(0),
                        Expression::int(0),
                        Expression::String(link_name),
                    ],
                    templates.item,
                    vec![Text(name)],
                )
            }
        }
        SystemLinkKind::ChatSound => {
            let sound = args.number(ev, ctx, 2, "sound_id")?;
            SystemLink::plain(templates.chat_sound, vec![Number(sound)])
        }
        SystemLinkKind::ObjectName => {
            let object = args.number(ev, ctx, 2, "object_id")? as u32;
            let name = ev.cell_text(ctx, "EObjName", object, 0)?;
            SystemLink::plain(templates.object_name, vec![Text(name)])
        }
        SystemLinkKind::LiteralText => {
            SystemLink::plain(templates.literal_text, vec![Text(args.raw_text()?)])
        }
        SystemLinkKind::TimeRemaining => {
            let seconds = args.number(ev, ctx, 2, "seconds")?;
            SystemLink::plain(templates.time_remaining, vec![Number(seconds / 60), Number(seconds % 60)])
        }
        SystemLinkKind::Status => {
            let status = args.number(ev, ctx, 2, "status_id")? as u32;
            let name = ev.cell_text(ctx, "Status", status, 0)?;
            SystemLink::linked(
                LinkKind::Status,
                vec![Expression::int(status), Expression::int(0)],
                templates.status,
                vec![Text(name)],
            )
        }
        SystemLinkKind::PartyFinder => {
            let listing = args.number(ev, ctx, 2, "listing_id")?;
            let world = args.number(ev, ctx, 3, "world_id")?;
            SystemLink::linked(
                LinkKind::PartyFinder,
                vec![Expression::int(listing as u32), Expression::int(0), Expression::int(world as u32)],
                templates.party_finder,
                vec![Number(listing), Number(world)],
            )
        }
        SystemLinkKind::Quest => {
            let quest = args.number(ev, ctx, 2, "quest_id")? as u32;
            let name = ev.cell_text(ctx, "Quest", quest, 0)?;
            SystemLink::linked(
                LinkKind::Quest,
                vec![Expression::int(quest)],
                templates.quest,
                vec![Text(name)],
            )
        }
        SystemLinkKind::AutoTranslate => {
            let group = args.number(ev, ctx, 2, "group")? as u32;
            let key = args.number(ev, ctx, 3, "key")? as u32;
            let text = auto_translate(ev, ctx, group, key)?;
            SystemLink::plain(templates.auto_translate, vec![Text(text)])
        }
    })
}

/// Text of auto-translation entry `key` of `group`.
///
/// `Completion` row `key` must belong to `group`. Its lookup column names
/// the sheet holding the text, e.g. `Action[@row]`, read at row `key`; an
/// empty lookup means the text is stored in the entry itself.
fn auto_translate(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, group: u32, key: u32) -> EvalResult<SeString> {
    let entry_group = ev.cell_int(ctx, COMPLETION_SHEET, key, 0)?;
    if entry_group != group as i64 {
        return Err(Unresolved::InvalidArgument {
            macro_name: "fixed",
            reason: format!("completion {key} belongs to group {entry_group}, not {group}"),
        });
    }

    let lookup = ev
        .cell(ctx, COMPLETION_SHEET, key, 1)?
        .as_string()
        .map(SeString::extract_text)
        .unwrap_or_default();
    let sheet = lookup.split('[').next().unwrap_or_default().trim();
    if sheet.is_empty() {
        ev.cell_text(ctx, COMPLETION_SHEET, key, 2)
    } else {
        ev.cell_text(ctx, sheet, key, 0)
    }
}
