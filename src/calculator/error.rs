use thiserror::Error;

/// Why an expression failed to evaluate.
///
/// Every variant is reported to the user the same way (the configured error
/// marker); the detail only shows up in logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("malformed number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected {0}")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("missing closing parenthesis")]
    UnclosedParen,

    #[error("{function}({argument}) failed: {source}")]
    FunctionArgument {
        function: &'static str,
        argument: String,
        #[source]
        source: Box<EvalError>,
    },

    #[error("result is not a finite number")]
    NonFinite,
}
