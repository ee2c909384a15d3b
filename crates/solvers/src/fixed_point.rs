//! Fixed-point iteration `x_{n+1} = g(x_n)`.
//!
//! The solver applies a [`Model`] with `f64` input and output to an initial
//! guess until one step moves the iterate by less than the configured
//! tolerance, or the iteration cap is reached. Every step is recorded in a
//! [`Trace`] and reported to an [`Observer`].
//!
//! ```
//! use std::convert::Infallible;
//!
//! use fixpoint_core::Model;
//! use fixpoint_solvers::fixed_point::{self, Config, Status};
//!
//! /// g(x) = cos(x), whose fixed point is the Dottie number.
//! struct Cosine;
//!
//! impl Model for Cosine {
//!     type Input = f64;
//!     type Output = f64;
//!     type Error = Infallible;
//!
//!     fn call(&self, x: &f64) -> Result<f64, Infallible> {
//!         Ok(x.cos())
//!     }
//! }
//!
//! let config = Config::new(200, 1e-10).unwrap();
//! let solution = fixed_point::solve_unobserved(&Cosine, 1.0, &config).unwrap();
//! assert_eq!(solution.status, Status::Converged);
//! assert!((solution.x - 0.739_085_133).abs() < 1e-8);
//! ```

mod config;
mod error;
mod event;
mod solution;
mod trace;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};
pub use trace::{Record, Trace, TraceColumns};

use fixpoint_core::{Model, Observer};
use tracing::debug;

/// Control actions supported by the fixed-point solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver and return the trace recorded so far.
    StopEarly,
}

/// Runs fixed-point iteration from `x0`.
///
/// Each iteration evaluates `g(x)`, records `|g(x) - x|`, and notifies the
/// observer. The first iteration is always recorded, even when `x0` is
/// already a fixed point. The solve ends when:
///
/// - a step error is strictly below the tolerance ([`Status::Converged`]),
/// - the observer returns [`Action::StopEarly`] ([`Status::StoppedByObserver`]),
/// - or `max_iters` steps have been taken ([`Status::MaxIters`]).
///
/// The reported `x` is always the last computed `g(x)`.
///
/// # Errors
///
/// Returns an error if `x0` is not finite, or if the model fails or returns a
/// non-finite value. The partial trace is discarded.
pub fn solve<M, Obs>(
    model: &M,
    x0: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    M: Model<Input = f64, Output = f64>,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    if !x0.is_finite() {
        return Err(Error::NonFiniteInitialGuess { x0 });
    }

    let mut trace = Trace::with_capacity(config.max_iters().min(1024));
    let mut x = x0;

    for iter in 1..=config.max_iters() {
        let gx = model.call(&x).map_err(|source| Error::Evaluation {
            x,
            source: Box::new(source),
        })?;
        if !gx.is_finite() {
            return Err(Error::NonFiniteValue { x, value: gx });
        }

        let record = Record {
            iter,
            x,
            gx,
            error: (gx - x).abs(),
        };
        let converged = record.error < config.tolerance();
        trace.push(record);
        x = gx;

        let event = Event {
            record: &record,
            converged,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            debug!(iter, x, "fixed-point iteration stopped by observer");
            return Ok(Solution::new(Status::StoppedByObserver, x, trace));
        }

        if converged {
            debug!(iter, x, error = record.error, "fixed-point iteration converged");
            return Ok(Solution::new(Status::Converged, x, trace));
        }
    }

    debug!(
        iters = config.max_iters(),
        x, "fixed-point iteration reached the iteration limit"
    );
    Ok(Solution::new(Status::MaxIters, x, trace))
}

/// Runs fixed-point iteration without observation.
///
/// # Errors
///
/// Returns an error if `x0` is not finite, or if the model fails or returns a
/// non-finite value.
pub fn solve_unobserved<M>(model: &M, x0: f64, config: &Config) -> Result<Solution, Error>
where
    M: Model<Input = f64, Output = f64>,
{
    solve(model, x0, config, ())
}
