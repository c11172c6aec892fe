//! Color and emphasis stacks.
use sestring::MacroPayload;

use super::{Evaluator, required};
use crate::{
    context::EvaluationContext,
    error::EvalResult,
    output::{OutputBuilder, StyleStack},
};

/// Sheet of UI colors addressed by `colortype` and `edgecolortype`.
pub const UI_COLOR_SHEET: &str = "UIColor";

/// Convert an RGBA cell value to the BGRA layout of color macros.
#[inline]
pub fn rgba_to_bgra(rgba: u32) -> u32 {
    (rgba >> 8) | (rgba << 24)
}

fn stacked_color(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
    stack: StyleStack,
) -> EvalResult<()> {
    let color = required(payload, "color")?;
    if color.is_stack_color() {
        out.pop_style(stack);
    } else {
        let value = ev.resolve_number(color, ctx)? as u32;
        out.push_style(stack, value);
    }
    Ok(())
}

pub(super) fn color(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    stacked_color(ev, ctx, payload, out, StyleStack::Color)
}

pub(super) fn edge_color(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    stacked_color(ev, ctx, payload, out, StyleStack::EdgeColor)
}

pub(super) fn shadow_color(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    stacked_color(ev, ctx, payload, out, StyleStack::ShadowColor)
}

/// `column` 0 holds the foreground color, 1 the glow.
fn typed_color(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
    stack: StyleStack,
    column: u32,
) -> EvalResult<()> {
    let color_type = ev.number_field(ctx, payload, "color_type")?;
    if color_type == 0 {
        out.pop_style(stack);
        return Ok(());
    }
    let rgba = ev.cell_int(ctx, UI_COLOR_SHEET, color_type as u32, column)? as u32;
    out.push_style(stack, rgba_to_bgra(rgba));
    Ok(())
}

pub(super) fn color_type(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    typed_color(ev, ctx, payload, out, StyleStack::Color, 0)
}

pub(super) fn edge_color_type(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    typed_color(ev, ctx, payload, out, StyleStack::EdgeColor, 1)
}

fn emphasis(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
    stack: StyleStack,
) -> EvalResult<()> {
    if ev.number_field(ctx, payload, "enabled")? != 0 {
        out.push_style(stack, 1);
    } else {
        out.pop_style(stack);
    }
    Ok(())
}

pub(super) fn bold(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    emphasis(ev, ctx, payload, out, StyleStack::Bold)
}

pub(super) fn italic(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    emphasis(ev, ctx, payload, out, StyleStack::Italic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_conversion() {
        assert_eq!(rgba_to_bgra(0x11223344), 0x44112233);
        assert_eq!(rgba_to_bgra(0xFFFFFFFF), 0xFFFFFFFF);
    }
}
