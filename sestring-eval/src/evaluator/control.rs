//! Conditionals and actor tests.
use sestring::{MacroBody, MacroPayload, RawEncodable};

use super::{Evaluator, invalid};
use crate::{
    context::EvaluationContext,
    error::{EvalResult, Unresolved},
    output::OutputBuilder,
    providers::Gender,
};

fn append_branch(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
    take_true: bool,
    (true_field, false_field): (&'static str, &'static str),
) -> EvalResult<()> {
    let field = if take_true { true_field } else { false_field };
    let branch = ev.string_field(ctx, payload, field)?;
    out.append(&branch);
    Ok(())
}

pub(super) fn if_else(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
) -> EvalResult<()> {
    let condition = ev.number_field(ctx, payload, "condition")?;
    append_branch(ev, ctx, payload, out, condition != 0, ("true_value", "false_value"))
}

/// Cases are 1-based; 0 also selects the first case and a selector past the
/// last case selects nothing.
pub(super) fn switch(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
) -> EvalResult<()> {
    let MacroBody::Switch { condition, cases } = &payload.body else {
        return Err(invalid(payload, "not a switch body"));
    };
    let selector = ev.resolve_number(condition, ctx)?;
    let index = usize::try_from(selector.max(1) - 1).unwrap_or(0);
    if let Some(case) = cases.get(index) {
        let case = ev.resolve_string(case, ctx)?;
        out.append(&case);
    }
    Ok(())
}

fn object_id(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload) -> EvalResult<u32> {
    Ok(ev.number_field(ctx, payload, "object_id")? as u32)
}

pub(super) fn pc_name(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
) -> EvalResult<()> {
    let id = object_id(ev, ctx, payload)?;
    let name = ev.services().actors.name(id).ok_or(Unresolved::UnknownActor(id))?;
    out.append(&name);
    Ok(())
}

pub(super) fn if_pc_gender(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
) -> EvalResult<()> {
    let id = object_id(ev, ctx, payload)?;
    let gender = ev.services().actors.gender(id).ok_or(Unresolved::UnknownActor(id))?;
    append_branch(ev, ctx, payload, out, gender == Gender::Male, ("male_value", "female_value"))
}

pub(super) fn if_pc_name(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
) -> EvalResult<()> {
    let id = object_id(ev, ctx, payload)?;
    let actual = ev.services().actors.name(id).ok_or(Unresolved::UnknownActor(id))?;
    let expected = ev.string_field(ctx, payload, "name")?;
    let same = actual.encode_vec() == expected.encode_vec();
    append_branch(ev, ctx, payload, out, same, ("true_value", "false_value"))
}

pub(super) fn if_self(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
) -> EvalResult<()> {
    let id = object_id(ev, ctx, payload)?;
    let is_self = ev
        .services()
        .actors
        .is_local_player(id)
        .ok_or(Unresolved::UnknownActor(id))?;
    append_branch(ev, ctx, payload, out, is_self, ("true_value", "false_value"))
}
