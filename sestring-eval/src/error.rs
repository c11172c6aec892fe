use sestring::DecodeError;
use strum::EnumIs;
use thiserror::Error;

/// Soft evaluation failure.
///
/// Never escapes the evaluator: the macro that raised it is emitted verbatim
/// instead of its resolution.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Unresolved {
    #[error("<{macro_name}> is missing its `{field}` argument")]
    MissingArgument {
        macro_name: &'static str,
        field: &'static str,
    },

    #[error("<{macro_name}>: {reason}")]
    InvalidArgument {
        macro_name: &'static str,
        reason: String,
    },

    #[error("arithmetic overflow in <{macro_name}>")]
    Overflow { macro_name: &'static str },

    #[error("no actor with object id {0:#x}")]
    UnknownActor(u32),

    #[error("sheet `{sheet}` has no value at row {row}, column {column}")]
    MissingCell {
        sheet: String,
        row: u32,
        column: u32,
    },

    #[error("no system message template {0}")]
    MissingTemplate(u32),

    #[error("no noun for row {row} of `{sheet}`")]
    MissingNoun { sheet: String, row: u32 },

    #[error("sheet redirect chain longer than {max} steps")]
    RedirectLimit { max: usize },

    #[error("evaluation nested deeper than {max} levels")]
    DepthLimit { max: usize },

    #[error("text stored in a sheet is not a valid SeString: {0}")]
    Decode(#[from] DecodeError),
}

pub type EvalResult<T> = Result<T, Unresolved>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    Parse {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
