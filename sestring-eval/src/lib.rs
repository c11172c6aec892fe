//! Evaluation of SeStrings.
//!
//! [`Evaluator`] walks a decoded [`sestring::SeString`] and resolves its
//! macros against a language, caller-supplied local parameters and the host
//! collaborators bundled in [`Services`]: sheets, system-message templates,
//! actors, global parameters and, optionally, a noun grammar. Macros that
//! cannot be resolved are kept verbatim, so evaluation never fails.
//!
//! ```
//! use sestring::{MacroCode, SeStringBuilder, expr::Expression};
//! use sestring_eval::{ClientLanguage, Evaluator, EvaluatorConfig, LocalParameter, Services};
//!
//! let mut builder = SeStringBuilder::new();
//! builder
//!     .append_text("Gil: ")
//!     .append_macro(MacroCode::Kilo, [Expression::lnum(1), Expression::text(",")]);
//! let source = builder.build();
//!
//! let evaluator = Evaluator::new(EvaluatorConfig::default(), Services::unavailable());
//! let output = evaluator.evaluate_with(&source, ClientLanguage::English, [LocalParameter::Number(1_234_567)]);
//! assert_eq!(output.extract_text(), "Gil: 1,234,567");
//! ```
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod language;
pub mod memory;
pub mod noun;
pub mod output;
pub mod params;
pub mod providers;
pub mod redirect;
pub mod time;

pub use config::{EvaluatorConfig, LinkTemplateIds};
pub use context::EvaluationContext;
pub use error::{ConfigError, ConfigResult, EvalResult, Unresolved};
pub use evaluator::{Evaluator, Resolve, Resolver};
pub use language::ClientLanguage;
pub use noun::NounProcessor;
pub use output::{BuilderPool, OutputBuilder, StyleStack};
pub use params::{GlobalParameterTable, LocalParameter};
pub use providers::{
    ActorProvider, CellValue, Gender, GlobalParameters, NounGrammar, NounRequest, Services, SheetProvider,
    SheetTarget, TemplateProvider, Unavailable,
};
pub use redirect::{RedirectRule, RedirectTable};
pub use time::{MacroTimeRegister, ProcessMacroTime};
