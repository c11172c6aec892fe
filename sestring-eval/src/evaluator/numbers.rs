//! Number formatting macros.
use sestring::{MacroPayload, SeString};

use super::{Evaluator, invalid};
use crate::{
    context::EvaluationContext,
    error::{EvalResult, Unresolved},
    output::OutputBuilder,
};

/// Widest zero padding accepted by `digit`.
pub const MAX_DIGITS: i32 = 32;

type Resolved = EvalResult<()>;

pub(super) fn num(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> Resolved {
    let value = ev.number_field(ctx, payload, "value")?;
    out.append_text(&value.to_string());
    Ok(())
}

pub(super) fn hex(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> Resolved {
    let value = ev.number_field(ctx, payload, "value")?;
    out.append_text(&format!("0x{:08X}", value as u32));
    Ok(())
}

pub(super) fn sec(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> Resolved {
    let value = ev.number_field(ctx, payload, "value")?;
    out.append_text(&format!("{value:02}"));
    Ok(())
}

pub(super) fn digit(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> Resolved {
    let value = ev.number_field(ctx, payload, "value")?;
    let length = ev.number_field(ctx, payload, "length")?;
    if !(0..=MAX_DIGITS).contains(&length) {
        return Err(invalid(payload, format!("length {length} is not in 0..={MAX_DIGITS}")));
    }
    out.append_text(&pad_digits(value, length as usize));
    Ok(())
}

pub(super) fn ordinal(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> Resolved {
    let value = ev.number_field(ctx, payload, "value")?;
    out.append_text(&format!("{value}{}", ordinal_suffix(value)));
    Ok(())
}

pub(super) fn kilo(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> Resolved {
    let value = ev.number_field(ctx, payload, "value")?;
    let separator = ev.string_field(ctx, payload, "separator")?;
    write_kilo(value, &separator, out);
    Ok(())
}

pub(super) fn float(ev: &Evaluator<'_>, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) -> Resolved {
    let value = ev.number_field(ctx, payload, "value")?;
    let radix = ev.number_field(ctx, payload, "radix")?;
    let separator = match payload.field("separator") {
        Some(expr) => ev.resolve_string(expr, ctx)?,
        None => SeString::new(),
    };
    write_float(value, radix, &separator, out).ok_or(Unresolved::Overflow { macro_name: "float" })
}

/// Sign, then the magnitude padded with zeros to `length` digits.
pub fn pad_digits(value: i32, length: usize) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{:0length$}", value.unsigned_abs())
}

pub fn ordinal_suffix(value: i32) -> &'static str {
    let value = value.unsigned_abs();
    if (11..=19).contains(&(value % 100)) {
        return "th";
    }
    match value % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Decimal digits grouped by three, `separator` between groups.
pub fn write_kilo(value: i32, separator: &SeString, out: &mut OutputBuilder) {
    if value == i32::MIN {
        out.append_text("-2")
            .append(separator)
            .append_text("147")
            .append(separator)
            .append_text("483")
            .append(separator)
            .append_text("648");
        return;
    }
    if value < 0 {
        out.append_text("-");
    }
    let value = value.abs();
    if value == 0 {
        out.append_text("0");
        return;
    }

    let mut printed = false;
    let mut place = 1_000_000_000;
    let mut exponent = 9;
    while place > 0 {
        let digit = (value / place) % 10;
        if printed || digit != 0 {
            if printed && exponent % 3 == 2 {
                out.append(separator);
            }
            printed = true;
            out.append_text(&digit.to_string());
        }
        place /= 10;
        exponent -= 1;
    }
}

/// Fixed-point rendering of `value / radix`. The fraction is always
/// non-negative: `-5 / 100` renders as `-1.95`. `None` when `radix` is 0 or
/// the quotient overflows.
pub fn write_float(value: i32, radix: i32, separator: &SeString, out: &mut OutputBuilder) -> Option<()> {
    let mut integer = value.checked_div(radix)?;
    let mut fraction = value.checked_rem(radix)?;
    if fraction < 0 {
        integer = integer.checked_sub(1)?;
        fraction = fraction.checked_add(radix)?;
    }

    out.append_text(&integer.to_string()).append(separator);
    // One digit per decimal place of the radix, least significant first.
    let mut digits = String::new();
    let mut place = radix;
    while place > 1 {
        digits.push(char::from(b'0' + (fraction % 10) as u8));
        fraction /= 10;
        place /= 10;
    }
    out.append_text(&digits.chars().rev().collect::<String>());
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kilo_text(value: i32) -> String {
        let mut out = OutputBuilder::new();
        write_kilo(value, &SeString::from_text(","), &mut out);
        out.finish().extract_text()
    }

    fn float_text(value: i32, radix: i32) -> Option<String> {
        let mut out = OutputBuilder::new();
        write_float(value, radix, &SeString::from_text("."), &mut out)?;
        Some(out.finish().extract_text())
    }

    #[test]
    fn kilo_groups() {
        assert_eq!(kilo_text(1_234_567), "1,234,567");
        assert_eq!(kilo_text(i32::MIN), "-2,147,483,648");
        assert_eq!(kilo_text(i32::MAX), "2,147,483,647");
        assert_eq!(kilo_text(-1000), "-1,000");
        assert_eq!(kilo_text(999), "999");
        assert_eq!(kilo_text(0), "0");
    }

    #[test]
    fn float_fixed_point() {
        assert_eq!(float_text(205, 100).as_deref(), Some("2.05"));
        assert_eq!(float_text(-5, 100).as_deref(), Some("-1.95"));
        assert_eq!(float_text(7, 1).as_deref(), Some("7."));
        assert_eq!(float_text(149, 50).as_deref(), Some("2.49"));
        assert_eq!(float_text(150, 60).as_deref(), Some("2.30"));
        assert_eq!(float_text(-1, 60).as_deref(), Some("-1.59"));
        assert_eq!(float_text(1, 0), None);
        assert_eq!(float_text(i32::MIN, -1), None);
    }

    #[test]
    fn ordinals() {
        let render = |v: i32| format!("{v}{}", ordinal_suffix(v));
        assert_eq!(render(1), "1st");
        assert_eq!(render(11), "11th");
        assert_eq!(render(22), "22nd");
        assert_eq!(render(113), "113th");
        assert_eq!(render(103), "103rd");
    }

    #[test]
    fn padded_digits() {
        assert_eq!(pad_digits(7, 3), "007");
        assert_eq!(pad_digits(-7, 3), "-007");
        assert_eq!(pad_digits(1234, 2), "1234");
    }
}
