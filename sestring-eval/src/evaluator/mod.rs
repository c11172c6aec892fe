//! The evaluator: walks an SeString and resolves its macros.
//!
//! Text payloads are copied. Macro payloads are dispatched through a table of
//! resolver functions keyed by [`MacroCode`], built once on first use. A
//! resolver writes into the output builder and may fail with an
//! [`Unresolved`] error; the output is then rolled back to where it was
//! before the resolver ran and the payload is appended verbatim. Evaluation
//! therefore always produces output.
mod control;
mod fixed;
mod numbers;
mod sheet;
mod style;
mod text;
mod time;

use enum_map::EnumMap;
use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use sestring::{
    MacroBody, MacroCode, MacroPayload, Payload, RawEncodable, SeString,
    expr::{BinaryOp, Expression, ParameterKind},
};

use crate::{
    config::EvaluatorConfig,
    context::EvaluationContext,
    error::{EvalResult, Unresolved},
    language::ClientLanguage,
    output::{BuilderPool, OutputBuilder},
    params::{LocalParameter, parse_number, storage_index},
    providers::{CellValue, Services, SheetProvider, SheetTarget},
    redirect::{RedirectTable, RedirectingSheets},
    time::{MacroTimeRegister, placeholder_value},
};

/// Resolution routine of one macro code.
pub type Resolver =
    fn(&Evaluator<'_>, &mut EvaluationContext, &MacroPayload, &mut OutputBuilder) -> EvalResult<()>;

fn resolver(code: MacroCode) -> Option<Resolver> {
    use MacroCode::*;

    let resolver: Resolver = match code {
        SetResetTime => time::set_reset_time,
        SetTime => time::set_time,
        If => control::if_else,
        Switch => control::switch,
        PcName => control::pc_name,
        IfPcGender => control::if_pc_gender,
        IfPcName => control::if_pc_name,
        IfSelf => control::if_self,
        Josa => text::josa,
        Josaro => text::josaro,
        Color => style::color,
        EdgeColor => style::edge_color,
        ShadowColor => style::shadow_color,
        ColorType => style::color_type,
        EdgeColorType => style::edge_color_type,
        Bold => style::bold,
        Italic => style::italic,
        Num => numbers::num,
        Hex => numbers::hex,
        Kilo => numbers::kilo,
        Sec => numbers::sec,
        Float => numbers::float,
        Digit => numbers::digit,
        Ordinal => numbers::ordinal,
        String => text::string,
        Caps => text::caps,
        Lower => text::lower,
        Head => text::head,
        LowerHead => text::lower_head,
        HeadAll => text::head_all,
        Split => text::split,
        Sheet => sheet::sheet,
        JaNoun => sheet::ja_noun,
        EnNoun => sheet::en_noun,
        DeNoun => sheet::de_noun,
        FrNoun => sheet::fr_noun,
        ChNoun => sheet::ch_noun,
        LevelPos => sheet::level_pos,
        Fixed => fixed::fixed,
        NewLine | Wait | Icon | SoftHyphen | Key | Scale | Edge | Shadow | NonBreakingSpace
        | Icon2 | Hyphen | Byte | Time | Link | Ruby | Sound => return None,
    };
    Some(resolver)
}

static RESOLVERS: Lazy<EnumMap<MacroCode, Option<Resolver>>> =
    Lazy::new(|| EnumMap::from_fn(resolver));

/// Whether the evaluator resolves `code` rather than passing it through.
pub fn is_resolved(code: MacroCode) -> bool {
    RESOLVERS[code].is_some()
}

/// Evaluates SeStrings against a set of collaborators.
pub struct Evaluator<'a> {
    config: EvaluatorConfig,
    services: Services<'a>,
    sheets: RedirectingSheets<'a>,
    pool: BuilderPool,
}

impl<'a> Evaluator<'a> {
    pub fn new(config: EvaluatorConfig, services: Services<'a>) -> Self {
        let sheets = RedirectingSheets::new(services.sheets, RedirectTable::new(config.redirects.clone()));
        let pool = BuilderPool::new(config.pool_capacity);
        Self {
            config,
            services,
            sheets,
            pool,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn services(&self) -> &Services<'a> {
        &self.services
    }

    /// The sheet provider, configured redirects included.
    pub fn sheets(&self) -> &dyn SheetProvider {
        &self.sheets
    }

    /// Fresh context in the configured default language.
    pub fn context(&self) -> EvaluationContext {
        EvaluationContext::new(self.config.default_language)
    }

    /// Evaluate `string`. Never fails: unresolvable macros are kept as they are.
    pub fn evaluate(&self, string: &SeString, ctx: &mut EvaluationContext) -> SeString {
        let mut out = self.pool.rent();
        self.evaluate_into(string, ctx, &mut out);
        out.finish()
    }

    /// Evaluate `string` in `language` with the given local parameters.
    pub fn evaluate_with(
        &self,
        string: &SeString,
        language: ClientLanguage,
        locals: impl IntoIterator<Item = LocalParameter>,
    ) -> SeString {
        let mut ctx = EvaluationContext::new(language).with_locals(locals);
        self.evaluate(string, &mut ctx)
    }

    /// Evaluate with the macro time loaded from `register`, storing it back
    /// when a macro changed it.
    pub fn evaluate_with_register(
        &self,
        string: &SeString,
        ctx: &mut EvaluationContext,
        register: &dyn MacroTimeRegister,
    ) -> SeString {
        ctx.macro_time = register.load();
        let before = ctx.macro_time;
        let output = self.evaluate(string, ctx);
        if ctx.macro_time != before {
            trace!("Storing macro time {}", ctx.macro_time);
            register.store(ctx.macro_time);
        }
        output
    }

    fn evaluate_into(&self, string: &SeString, ctx: &mut EvaluationContext, out: &mut OutputBuilder) {
        for payload in string {
            match payload {
                Payload::Text(_) => {
                    out.append_payload(payload.clone());
                }
                Payload::Macro(payload) => self.dispatch(ctx, payload, out),
            }
        }
    }

    fn dispatch(&self, ctx: &mut EvaluationContext, payload: &MacroPayload, out: &mut OutputBuilder) {
        let resolver = match payload.body {
            MacroBody::Opaque(_) => None,
            _ => payload.macro_code().and_then(|code| RESOLVERS[code]),
        };
        let Some(resolver) = resolver else {
            debug!("Passing through macro {:#04x}", payload.code);
            out.append_macro_payload(payload.clone());
            return;
        };

        trace!("Resolving {payload}");
        let checkpoint = out.checkpoint();
        if let Err(err) = resolver(self, ctx, payload, out) {
            debug!("Keeping {payload} unresolved: {err}");
            out.rollback(checkpoint);
            out.append_macro_payload(payload.clone());
        }
    }

    /// Evaluate a string nested inside the one being evaluated.
    pub(crate) fn evaluate_nested(&self, string: &SeString, ctx: &mut EvaluationContext) -> EvalResult<SeString> {
        if string.is_plain_text() {
            return Ok(string.clone());
        }
        if ctx.depth >= self.config.max_depth {
            warn!("Evaluation nested deeper than {} levels", self.config.max_depth);
            return Err(Unresolved::DepthLimit {
                max: self.config.max_depth,
            });
        }
        ctx.depth += 1;
        let output = self.evaluate(string, ctx);
        ctx.depth -= 1;
        Ok(output)
    }

    /// Evaluate a nested string with its own local parameters. The macro
    /// time is shared with the caller.
    pub(crate) fn evaluate_with_locals(
        &self,
        string: &SeString,
        ctx: &mut EvaluationContext,
        locals: Vec<LocalParameter>,
    ) -> EvalResult<SeString> {
        let saved = std::mem::replace(&mut ctx.locals, locals);
        let output = self.evaluate_nested(string, ctx);
        ctx.locals = saved;
        output
    }

    /// Evaluate system message `id` with `args` as its local parameters.
    pub fn format_system_message(
        &self,
        id: u32,
        args: Vec<LocalParameter>,
        ctx: &mut EvaluationContext,
    ) -> EvalResult<SeString> {
        let template = self
            .services
            .templates
            .system_message(id, ctx.language)
            .ok_or(Unresolved::MissingTemplate(id))?;
        self.evaluate_with_locals(&template, ctx, args)
    }

    /// Resolve `expr` to a number.
    pub fn resolve_number(&self, expr: &Expression, ctx: &mut EvaluationContext) -> EvalResult<i32> {
        Ok(match expr {
            Expression::Integer(value) => *value as i32,
            Expression::Placeholder(kind) => placeholder_value(*kind, ctx.macro_time),
            Expression::Binary(op, lhs, rhs) if op.compares_strings() => {
                let lhs = self.resolve_string(lhs, ctx)?;
                let rhs = self.resolve_string(rhs, ctx)?;
                let equal = lhs.encode_vec() == rhs.encode_vec();
                i32::from(equal == (*op == BinaryOp::Equal))
            }
            Expression::Binary(op, lhs, rhs) => {
                let lhs = self.resolve_number(lhs, ctx)?;
                let rhs = self.resolve_number(rhs, ctx)?;
                i32::from(match op {
                    BinaryOp::GreaterThanOrEqual => lhs >= rhs,
                    BinaryOp::GreaterThan => lhs > rhs,
                    BinaryOp::LessThanOrEqual => lhs <= rhs,
                    _ => lhs < rhs,
                })
            }
            Expression::Parameter(kind, index) => {
                let index = self.resolve_number(index, ctx)?;
                let Some(index) = storage_index(index) else {
                    return Ok(0);
                };
                match kind {
                    ParameterKind::LocalNumber | ParameterKind::LocalString => {
                        ctx.local(index).map_or(0, LocalParameter::as_number)
                    }
                    ParameterKind::GlobalNumber => self.services.globals.number(index).unwrap_or(0),
                    ParameterKind::GlobalString => self
                        .services
                        .globals
                        .string(index)
                        .map_or(0, |string| parse_number(&string)),
                }
            }
            Expression::String(string) => parse_number(&self.evaluate_nested(string, ctx)?),
        })
    }

    /// Resolve `expr` to a string. Integer literals render unsigned, every
    /// other number signed.
    pub fn resolve_string(&self, expr: &Expression, ctx: &mut EvaluationContext) -> EvalResult<SeString> {
        Ok(match expr {
            Expression::Integer(value) => SeString::from_text(&value.to_string()),
            Expression::Placeholder(_) | Expression::Binary(..) => {
                SeString::from_text(&self.resolve_number(expr, ctx)?.to_string())
            }
            Expression::Parameter(kind, index) => {
                let index = self.resolve_number(index, ctx)?;
                let Some(index) = storage_index(index) else {
                    return Ok(SeString::new());
                };
                match kind {
                    ParameterKind::LocalNumber | ParameterKind::LocalString => ctx
                        .local(index)
                        .map(LocalParameter::to_se_string)
                        .unwrap_or_default(),
                    ParameterKind::GlobalNumber => self
                        .services
                        .globals
                        .number(index)
                        .map(|value| SeString::from_text(&value.to_string()))
                        .unwrap_or_default(),
                    ParameterKind::GlobalString => self.services.globals.string(index).unwrap_or_default(),
                }
            }
            Expression::String(string) => self.evaluate_nested(string, ctx)?,
        })
    }

    /// Follow redirects from `target` until none applies.
    pub(crate) fn follow_redirects(&self, mut target: SheetTarget) -> EvalResult<SheetTarget> {
        let mut steps = 0;
        while let Some(next) = self.sheets.redirect(&target) {
            if steps == self.config.max_redirects {
                warn!(
                    "Redirect chain from `{}` row {} exceeds {} steps",
                    target.sheet, target.row, self.config.max_redirects
                );
                return Err(Unresolved::RedirectLimit {
                    max: self.config.max_redirects,
                });
            }
            trace!("Redirecting `{}` row {} to `{}` row {}", target.sheet, target.row, next.sheet, next.row);
            target = next;
            steps += 1;
        }
        Ok(target)
    }

    /// Read a cell, redirects applied.
    pub(crate) fn cell(&self, ctx: &EvaluationContext, sheet: &str, row: u32, column: u32) -> EvalResult<CellValue> {
        self.resolved_cell(ctx, sheet, row, column).map(|(_, cell)| cell)
    }

    /// Read a cell after redirects, along with the cell actually read.
    fn resolved_cell(
        &self,
        ctx: &EvaluationContext,
        sheet: &str,
        row: u32,
        column: u32,
    ) -> EvalResult<(SheetTarget, CellValue)> {
        let target = self.follow_redirects(SheetTarget::new(sheet, row, column))?;
        match self.sheets.cell(&target.sheet, target.row, target.column, ctx.language) {
            Some(cell) => Ok((target, cell)),
            None => Err(missing_cell(target)),
        }
    }

    pub(crate) fn cell_int(&self, ctx: &EvaluationContext, sheet: &str, row: u32, column: u32) -> EvalResult<i64> {
        let (target, cell) = self.resolved_cell(ctx, sheet, row, column)?;
        cell.as_i64().ok_or_else(|| missing_cell(target))
    }

    /// Read a string cell and evaluate it.
    pub(crate) fn cell_text(
        &self,
        ctx: &mut EvaluationContext,
        sheet: &str,
        row: u32,
        column: u32,
    ) -> EvalResult<SeString> {
        match self.resolved_cell(ctx, sheet, row, column)? {
            (_, CellValue::String(string)) => self.evaluate_nested(&string, ctx),
            (target, _) => Err(missing_cell(target)),
        }
    }
}

fn missing_cell(target: SheetTarget) -> Unresolved {
    Unresolved::MissingCell {
        sheet: target.sheet,
        row: target.row,
        column: target.column,
    }
}

/// The field called `field`, or a missing-argument failure.
pub(crate) fn required<'p>(payload: &'p MacroPayload, field: &'static str) -> EvalResult<&'p Expression> {
    payload.field(field).ok_or(Unresolved::MissingArgument {
        macro_name: payload.name().unwrap_or("?"),
        field,
    })
}

pub(crate) fn invalid(payload: &MacroPayload, reason: impl Into<String>) -> Unresolved {
    Unresolved::InvalidArgument {
        macro_name: payload.name().unwrap_or("?"),
        reason: reason.into(),
    }
}

impl Evaluator<'_> {
    pub(crate) fn number_field(
        &self,
        ctx: &mut EvaluationContext,
        payload: &MacroPayload,
        field: &'static str,
    ) -> EvalResult<i32> {
        self.resolve_number(required(payload, field)?, ctx)
    }

    pub(crate) fn optional_number_field(
        &self,
        ctx: &mut EvaluationContext,
        payload: &MacroPayload,
        field: &'static str,
    ) -> EvalResult<Option<i32>> {
        payload
            .field(field)
            .map(|expr| self.resolve_number(expr, ctx))
            .transpose()
    }

    pub(crate) fn string_field(
        &self,
        ctx: &mut EvaluationContext,
        payload: &MacroPayload,
        field: &'static str,
    ) -> EvalResult<SeString> {
        self.resolve_string(required(payload, field)?, ctx)
    }
}

/// Evaluation as a method of the evaluated value.
pub trait Resolve {
    fn resolve(&self, evaluator: &Evaluator<'_>, ctx: &mut EvaluationContext) -> SeString;
}

impl Resolve for SeString {
    fn resolve(&self, evaluator: &Evaluator<'_>, ctx: &mut EvaluationContext) -> SeString {
        evaluator.evaluate(self, ctx)
    }
}

impl Resolve for Expression {
    /// Resolution failures yield the empty string.
    fn resolve(&self, evaluator: &Evaluator<'_>, ctx: &mut EvaluationContext) -> SeString {
        evaluator.resolve_string(self, ctx).unwrap_or_default()
    }
}
