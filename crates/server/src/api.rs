//! Request and response bodies for the JSON API.
//!
//! The handlers here are plain functions so they can be called without a
//! running server; [`routes`](crate::routes) wires them to HTTP.

use fixpoint_observers::TracingObserver;
use fixpoint_solvers::{
    candidates,
    iterate::{self, Outcome},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A numeric field that may arrive as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn to_f64(&self) -> Option<f64> {
        match self {
            NumericInput::Number(value) => Some(*value),
            NumericInput::Text(text) => text.trim().parse().ok(),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn to_usize(&self) -> Option<usize> {
        match self {
            NumericInput::Number(value)
                if value.fract() == 0.0 && *value >= 0.0 && *value <= usize::MAX as f64 =>
            {
                Some(*value as usize)
            }
            NumericInput::Number(_) => None,
            NumericInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(text: &str) -> Self {
        NumericInput::Text(text.to_owned())
    }
}

/// Body of `POST /suggest_g`.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestRequest {
    pub equation: String,
}

/// One suggested iteration function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateView {
    /// Template label, such as `Additive form: x = x + f(x)`.
    pub name: String,

    /// The simplified `g(x)`, in text that `/solve` accepts.
    pub expression: String,
}

/// Response to `POST /suggest_g`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatesResponse {
    pub g_functions: Vec<CandidateView>,
}

/// Body of `POST /solve`.
#[derive(Debug, Clone, Deserialize)]
pub struct SolveRequest {
    pub equation: String,
    pub g_function: String,
    pub x0: NumericInput,
    pub tolerance: NumericInput,
    pub max_iter: NumericInput,
}

/// Response to `POST /solve`.
///
/// Serialized with a `status` field of `"success"` or `"error"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SolveResponse {
    Success {
        iterations: Vec<usize>,
        x_values: Vec<f64>,
        g_values: Vec<f64>,
        errors: Vec<f64>,
        solution: f64,
        converged: bool,
    },
    Error {
        message: String,
    },
}

impl SolveResponse {
    fn error(message: impl Into<String>) -> Self {
        SolveResponse::Error {
            message: message.into(),
        }
    }
}

/// Suggests iteration functions for `equation`.
///
/// Text that does not parse yields an empty list.
#[must_use]
pub fn generate_candidates(equation: &str) -> CandidatesResponse {
    let g_functions: Vec<CandidateView> = candidates::generate(equation)
        .into_iter()
        .map(|candidate| CandidateView {
            name: candidate.label().to_owned(),
            expression: candidate.expr.to_string(),
        })
        .collect();

    debug!(equation, count = g_functions.len(), "suggested g(x) candidates");
    CandidatesResponse { g_functions }
}

/// Runs fixed-point iteration as described by `request`.
///
/// Running out of iterations is still a success, reported with
/// `converged: false`. Requests asking for more than `max_iter_limit`
/// iterations are refused.
#[must_use]
pub fn solve(request: &SolveRequest, max_iter_limit: usize) -> SolveResponse {
    let Some(x0) = request.x0.to_f64() else {
        return SolveResponse::error("x0 must be a number");
    };
    let Some(tolerance) = request.tolerance.to_f64() else {
        return SolveResponse::error("tolerance must be a number");
    };
    let Some(max_iter) = request.max_iter.to_usize() else {
        return SolveResponse::error("max_iter must be a positive integer");
    };
    if max_iter > max_iter_limit {
        return SolveResponse::error(format!("max_iter must not exceed {max_iter_limit}"));
    }

    let result = iterate::iterate_observed(
        &request.equation,
        &request.g_function,
        x0,
        tolerance,
        max_iter,
        TracingObserver,
    );

    match (result.status, result.solution) {
        (Outcome::EvaluationError, _) | (_, None) => {
            let message = result
                .message
                .unwrap_or_else(|| "fixed-point iteration failed".to_owned());
            debug!(g = %request.g_function, %message, "solve failed");
            SolveResponse::Error { message }
        }
        (status, Some(solution)) => {
            let columns = result.trace.columns();
            info!(
                g = %request.g_function,
                ?status,
                iterations = columns.iterations.len(),
                solution,
                "solve finished"
            );
            SolveResponse::Success {
                iterations: columns.iterations,
                x_values: columns.x_values,
                g_values: columns.g_values,
                errors: columns.errors,
                solution,
                converged: status == Outcome::Converged,
            }
        }
    }
}
