use sestring::MacroPayload;

use super::{Evaluator, invalid};
use crate::{
    context::EvaluationContext,
    error::EvalResult,
    output::OutputBuilder,
    time::{from_unix, next_reset},
};

pub(super) fn set_time(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    _: &mut OutputBuilder,
) -> EvalResult<()> {
    // Timestamps are unsigned on the wire.
    let timestamp = ev.number_field(ctx, payload, "timestamp")? as u32;
    ctx.macro_time = from_unix(timestamp as i64).ok_or_else(|| invalid(payload, "timestamp out of range"))?;
    Ok(())
}

pub(super) fn set_reset_time(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    _: &mut OutputBuilder,
) -> EvalResult<()> {
    let hour = ev.number_field(ctx, payload, "hour")?;
    let weekday = ev.optional_number_field(ctx, payload, "weekday")?;
    ctx.macro_time = next_reset(ctx.now, hour, weekday)
        .ok_or_else(|| invalid(payload, format!("hour {hour} is not in 0..24")))?;
    Ok(())
}
