//! Text-level fixed-point solving.
//!
//! [`iterate`] parses `f(x)` and `g(x)`, validates the numeric settings, runs
//! [`fixed_point::solve`], and folds every failure into a [`SolveResult`].

use fixpoint_core::Observer;
use fixpoint_symbolic::{Function, parse, parse_equation};
use tracing::debug;

use crate::VARIABLE;
use crate::fixed_point::{self, Action, Config, Event, Status, Trace};

/// How a text-level solve finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A step moved the iterate by less than the tolerance.
    Converged,

    /// All `max_iter` steps ran without converging.
    ExceededIterations,

    /// An observer ended the solve.
    StoppedEarly,

    /// The input was rejected or `g` could not be evaluated.
    EvaluationError,
}

/// Everything a caller needs to report a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: Outcome,

    /// Every step taken. Empty when `status` is [`Outcome::EvaluationError`].
    pub trace: Trace,

    /// The final iterate, absent on error.
    pub solution: Option<f64>,

    /// Explanation of an error.
    pub message: Option<String>,
}

impl SolveResult {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Outcome::EvaluationError,
            trace: Trace::default(),
            solution: None,
            message: Some(message.into()),
        }
    }

    /// Returns true if the solve converged.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status == Outcome::Converged
    }
}

/// Solves `x = g(x)` starting from `x0`.
///
/// `f_text` is the equation `g` was derived from. It must parse, but only
/// `g_text` is evaluated.
#[must_use]
pub fn iterate(
    f_text: &str,
    g_text: &str,
    x0: f64,
    tolerance: f64,
    max_iter: usize,
) -> SolveResult {
    iterate_observed(f_text, g_text, x0, tolerance, max_iter, ())
}

/// Like [`iterate`], notifying `observer` after every step.
#[must_use]
pub fn iterate_observed<Obs>(
    f_text: &str,
    g_text: &str,
    x0: f64,
    tolerance: f64,
    max_iter: usize,
    observer: Obs,
) -> SolveResult
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    if let Err(error) = parse_equation(f_text) {
        return SolveResult::failed(format!("invalid equation: {error}"));
    }
    let g = match parse(g_text) {
        Ok(g) => Function::new(g, VARIABLE),
        Err(error) => return SolveResult::failed(format!("invalid g(x): {error}")),
    };
    let config = match Config::new(max_iter, tolerance) {
        Ok(config) => config,
        Err(error) => return SolveResult::failed(error.to_string()),
    };

    match fixed_point::solve(&g, x0, &config, observer) {
        Ok(solution) => SolveResult {
            status: match solution.status {
                Status::Converged => Outcome::Converged,
                Status::MaxIters => Outcome::ExceededIterations,
                Status::StoppedByObserver => Outcome::StoppedEarly,
            },
            solution: Some(solution.x),
            trace: solution.trace,
            message: None,
        },
        Err(error) => {
            debug!(%error, g_text, "fixed-point solve failed");
            match error.failed_at() {
                Some(x) => SolveResult::failed(format!(
                    "g(x) evaluation failed at x={x:.4}. Try a different g(x)."
                )),
                None => SolveResult::failed(error.to_string()),
            }
        }
    }
}
