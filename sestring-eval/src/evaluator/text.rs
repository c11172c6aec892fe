//! String macros: case transforms, splitting and Korean particles.
use sestring::{MacroPayload, Payload, SeString};

use super::{Evaluator, invalid};
use crate::{context::EvaluationContext, error::EvalResult, output::OutputBuilder};

/// Rewrite text runs, leaving macros untouched. `transform` receives the
/// run and whether it is the first text run.
fn map_text(string: SeString, mut transform: impl FnMut(&str, bool) -> String) -> SeString {
    let mut first = true;
    string
        .into_payloads()
        .into_iter()
        .map(|payload| match payload {
            Payload::Text(bytes) => {
                let text = transform(&String::from_utf8_lossy(&bytes), first);
                first = false;
                Payload::Text(text.into_bytes())
            }
            other => other,
        })
        .collect()
}

fn map_first_char(text: &str, transform: impl FnOnce(char) -> String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => transform(first) + chars.as_str(),
        None => String::new(),
    }
}

/// Title-case every word; words written entirely in capitals are kept.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let flush = |word: &mut String, out: &mut String| {
        let is_acronym = word.chars().any(char::is_alphabetic)
            && word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
        if is_acronym {
            out.push_str(word);
        } else {
            out.push_str(&map_first_char(&word.to_lowercase(), |c| c.to_uppercase().collect()));
        }
        word.clear();
    };
    for ch in text.chars() {
        if ch.is_whitespace() {
            flush(&mut word, &mut out);
            out.push(ch);
        } else {
            word.push(ch);
        }
    }
    flush(&mut word, &mut out);
    out
}

fn transform_value(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
    transform: impl FnMut(&str, bool) -> String,
) -> EvalResult<()> {
    let value = ev.string_field(ctx, payload, "value")?;
    out.append(&map_text(value, transform));
    Ok(())
}

pub(super) fn string(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    let value = ev.string_field(ctx, payload, "value")?;
    out.append(&value);
    Ok(())
}

pub(super) fn caps(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    transform_value(ev, ctx, payload, out, |text, _| text.to_uppercase())
}

pub(super) fn lower(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    transform_value(ev, ctx, payload, out, |text, _| text.to_lowercase())
}

pub(super) fn head(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    transform_value(ev, ctx, payload, out, |text, first| {
        if first {
            map_first_char(text, |c| c.to_uppercase().collect())
        } else {
            text.to_string()
        }
    })
}

pub(super) fn lower_head(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    transform_value(ev, ctx, payload, out, |text, first| {
        if first {
            map_first_char(text, |c| c.to_lowercase().collect())
        } else {
            text.to_string()
        }
    })
}

pub(super) fn head_all(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    transform_value(ev, ctx, payload, out, |text, _| title_case(text))
}

/// 1-based piece of the value split on the first character of the separator.
pub(super) fn split(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    let value = ev.string_field(ctx, payload, "value")?.extract_text();
    let separator = ev.string_field(ctx, payload, "separator")?.extract_text();
    let index = ev.number_field(ctx, payload, "index")?;

    let separator = separator
        .chars()
        .next()
        .ok_or_else(|| invalid(payload, "empty separator"))?;
    let index = usize::try_from(index)
        .ok()
        .and_then(|index| index.checked_sub(1))
        .ok_or_else(|| invalid(payload, format!("index {index} is not 1-based")))?;

    if let Some(piece) = value.split(separator).nth(index) {
        out.append_text(piece);
    }
    Ok(())
}

const HANGUL_FIRST: u32 = 0xAC00;
const HANGUL_LAST: u32 = 0xD7A3;
/// Final consonant index of ㄹ.
const FINAL_RIEUL: u32 = 8;

/// Final consonant index of the last character, `None` unless it is a
/// Hangul syllable.
pub fn final_consonant(text: &str) -> Option<u32> {
    let last = text.chars().last()? as u32;
    (HANGUL_FIRST..=HANGUL_LAST)
        .contains(&last)
        .then(|| (last - HANGUL_FIRST) % 28)
}

fn particle(
    ev: &Evaluator<'_>,
    ctx: &mut EvaluationContext,
    payload: &MacroPayload,
    out: &mut OutputBuilder,
    rieul_is_final: bool,
) -> EvalResult<()> {
    let word = ev.string_field(ctx, payload, "word")?;
    let has_final = match final_consonant(&word.extract_text()) {
        Some(0) | None => false,
        Some(FINAL_RIEUL) => rieul_is_final,
        Some(_) => true,
    };
    let particle = ev.string_field(ctx, payload, if has_final { "with_final" } else { "without_final" })?;
    out.append(&word).append(&particle);
    Ok(())
}

pub(super) fn josa(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    particle(ev, ctx, payload, out, true)
}

/// Like `josa`, except that ㄹ takes the particle of words without final.
pub(super) fn josaro(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> EvalResult<()> {
    particle(ev, ctx, payload, out, false)
}
