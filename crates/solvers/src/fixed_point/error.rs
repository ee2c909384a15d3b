use std::error::Error as StdError;

use thiserror::Error;

/// Errors that can occur during fixed-point iteration.
///
/// Any error ends the solve; the partial trace is not returned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("initial guess must be finite, got {x0}")]
    NonFiniteInitialGuess { x0: f64 },

    #[error("g(x) evaluation failed at x={x:.4}")]
    Evaluation {
        x: f64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("g(x) evaluation failed at x={x:.4}: produced {value}")]
    NonFiniteValue { x: f64, value: f64 },
}

impl Error {
    /// Returns the iterate at which `g` could not be evaluated, if any.
    #[must_use]
    pub fn failed_at(&self) -> Option<f64> {
        match self {
            Self::NonFiniteInitialGuess { .. } => None,
            Self::Evaluation { x, .. } | Self::NonFiniteValue { x, .. } => Some(*x),
        }
    }
}
