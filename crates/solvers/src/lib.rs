//! Root finding by fixed-point iteration.
//!
//! An equation `f(x) = 0` is rewritten as `x = g(x)` and solved by applying
//! `g` until successive iterates agree.
//!
//! # Modules
//!
//! - [`candidates`] — proposes rearrangements `g(x)` for a given `f(x)`
//! - [`fixed_point`] — the iteration engine, generic over any
//!   [`Model`](fixpoint_core::Model)
//! - [`iterate`] — text-in, result-out entry point combining parsing and
//!   iteration

pub mod candidates;
pub mod fixed_point;
pub mod iterate;

/// Name of the free variable in equations and iteration functions.
pub const VARIABLE: &str = "x";
