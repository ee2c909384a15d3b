use thiserror::Error;

use crate::Func;

/// Errors produced while parsing expression text.
///
/// Positions are byte offsets into the input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unexpected '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("function '{name}' at position {pos} must be followed by '('")]
    BareFunction { name: String, pos: usize },

    #[error("unknown function '{name}' at position {pos}")]
    UnknownFunction { name: String, pos: usize },

    #[error("equation contains more than one '='")]
    MultipleEquals,

    #[error("expression nests too deeply at position {pos}")]
    TooDeep { pos: usize },
}

/// Errors produced while evaluating an expression at a point.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{func}({arg}) is undefined for real numbers")]
    Domain { func: Func, arg: f64 },

    #[error("{base}**{exponent} is not a real number")]
    NonReal { base: f64, exponent: f64 },

    #[error("result is not finite")]
    NonFinite,

    #[error("symbol '{0}' has no value")]
    UnboundSymbol(String),
}

/// Errors produced while simplifying an expression.
///
/// Simplification fails only when a constant subexpression has no real value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimplifyError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("undefined constant subexpression: {0}")]
    Undefined(String),
}
