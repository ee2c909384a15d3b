//! Symbolic expressions in a single free variable.
//!
//! This crate provides the small algebra engine the fixpoint toolkit needs to
//! turn user-entered text into iteration functions:
//!
//! - [`parse`] / [`parse_equation`] — text to [`Expr`]
//! - [`Expr::diff`] — symbolic differentiation
//! - [`simplify`] — canonicalization with constant folding and term collection
//! - [`Expr::eval`] — numeric evaluation with real-domain checks
//! - [`Function`] — an expression bound to its variable, usable as a
//!   [`Model`](fixpoint_core::Model)
//!
//! Expressions render through [`Display`](std::fmt::Display) as text that
//! [`parse`] accepts again, using `**` for powers.
//!
//! ```
//! use fixpoint_symbolic::{parse, simplify};
//!
//! let f = parse("x**2 - 2").unwrap();
//! let g = simplify(&(f.diff("x"))).unwrap();
//! assert_eq!(g.to_string(), "2*x");
//! ```

mod diff;
mod display;
mod error;
mod eval;
mod expr;
mod parse;
mod simplify;

pub use error::{EvalError, ParseError, SimplifyError};
pub use eval::Function;
pub use expr::{Constant, Expr, Func};
pub use parse::{parse, parse_equation};
pub use simplify::simplify;
