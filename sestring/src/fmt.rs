//! Macro-string rendering.
//!
//! `Display` renders the human-readable form used in logs and tests:
//! `Hello <color(0xFF00FF00)><if([lnum1>=2],a,b)><color(stackcolor)>`.
//! Text runs escape `\` and `<`; opaque payloads render as `<?XX:hexbody>`.
use std::fmt::{self, Display, Formatter, Write};

use crate::{
    code::MacroCode,
    expr::Expression,
    payload::{MacroBody, MacroPayload, Payload},
    string::SeString,
};

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Integer(value) => write!(f, "{value}"),
            Expression::Placeholder(kind) => f.write_str(kind.to_str()),
            Expression::Binary(op, lhs, rhs) => write!(f, "[{lhs}{}{rhs}]", op.to_str()),
            Expression::Parameter(kind, index) => match index.as_literal() {
                Some(index) => write!(f, "{}{index}", kind.to_str()),
                None => write!(f, "{}({index})", kind.to_str()),
            },
            Expression::String(string) => write!(f, "{string}"),
        }
    }
}

fn write_text(f: &mut Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for ch in String::from_utf8_lossy(bytes).chars() {
        if matches!(ch, '\\' | '<') {
            f.write_char('\\')?;
        }
        f.write_char(ch)?;
    }
    Ok(())
}

/// Colors read better in hexadecimal.
fn write_arg(f: &mut Formatter<'_>, code: Option<MacroCode>, arg: &Expression) -> fmt::Result {
    match (code, arg) {
        (
            Some(MacroCode::Color | MacroCode::EdgeColor | MacroCode::ShadowColor),
            Expression::Integer(value),
        ) => write!(f, "0x{value:08X}"),
        _ => write!(f, "{arg}"),
    }
}

impl Display for MacroPayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let code = self.macro_code();
        let name = match &self.body {
            MacroBody::Opaque(_) => None,
            _ => self.name(),
        };
        let Some(name) = name else {
            write!(f, "<?{:02X}", self.code)?;
            match &self.body {
                MacroBody::Opaque(bytes) if !bytes.is_empty() => {
                    f.write_char(':')?;
                    for byte in bytes {
                        write!(f, "{byte:02X}")?;
                    }
                }
                _ => {}
            }
            return f.write_char('>');
        };

        f.write_char('<')?;
        f.write_str(name)?;

        let mut first = true;
        let mut separator = |f: &mut Formatter<'_>| -> fmt::Result {
            let sep = if first { '(' } else { ',' };
            first = false;
            f.write_char(sep)
        };

        if let MacroBody::Fixed(fixed) = &self.body {
            for arg in &fixed.leading {
                separator(f)?;
                write_arg(f, code, arg)?;
            }
            if let Some(text) = &fixed.text {
                separator(f)?;
                write_text(f, text)?;
            }
            for arg in &fixed.trailing {
                separator(f)?;
                write_arg(f, code, arg)?;
            }
        } else {
            for arg in self.expressions() {
                separator(f)?;
                write_arg(f, code, arg)?;
            }
        }

        if !first {
            f.write_char(')')?;
        }
        f.write_char('>')
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(bytes) => write_text(f, bytes),
            Payload::Macro(payload) => write!(f, "{payload}"),
        }
    }
}

impl Display for SeString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for payload in self {
            write!(f, "{payload}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::SeStringBuilder, payload::FixedBody};

    #[test]
    fn renders_macro_string() {
        let mut builder = SeStringBuilder::new();
        builder
            .append_text("Hello <you> ")
            .append_macro(MacroCode::Color, [Expression::int(0xFF00FF00)])
            .append_macro(
                MacroCode::If,
                [
                    Expression::lnum(1).ge(2u32),
                    Expression::text("a"),
                    Expression::text("b"),
                ],
            )
            .append_macro(MacroCode::Color, [Expression::stack_color()])
            .append_macro(MacroCode::NewLine, []);
        assert_eq!(
            builder.build().to_string(),
            "Hello \\<you> <color(0xFF00FF00)><if([lnum1>=2],a,b)><color(stackcolor)><br>"
        );
    }

    #[test]
    fn renders_fixed_and_opaque() {
        let fixed = MacroPayload::fixed(FixedBody::literal_text(100, b"hi", vec![]));
        assert_eq!(fixed.to_string(), "<fixed(100,7,hi)>");
        assert_eq!(MacroPayload::opaque(0x05, vec![0xDE, 0xAD]).to_string(), "<?05:DEAD>");
        assert_eq!(MacroPayload::opaque(0x70, vec![]).to_string(), "<?70>");
        // Registered code whose body did not fit its layout.
        assert_eq!(MacroPayload::opaque(0x20, vec![0x02, 0x02]).to_string(), "<?20:0202>");
    }

    #[test]
    fn renders_computed_parameter_index() {
        let expr = Expression::Parameter(
            crate::expr::ParameterKind::GlobalString,
            Box::new(Expression::lnum(2)),
        );
        assert_eq!(expr.to_string(), "gstr(lnum2)");
    }
}
