//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types.
//!
//! # Event traits
//!
//! - [`HasIterate`] — events that report the iteration counter and iterate
//! - [`HasStepError`] — events that carry the size of the last step
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use fixpoint_core::Observer;
//! use fixpoint_observers::traits::{CanStopEarly, HasStepError};
//!
//! /// Stops once a step is smaller than `threshold`.
//! struct SmallStep {
//!     threshold: f64,
//! }
//!
//! impl<E: HasStepError, A: CanStopEarly> Observer<E, A> for SmallStep {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.step_error() < self.threshold).then(A::stop_early)
//!     }
//! }
//! ```

use fixpoint_solvers::fixed_point;

/// An event that reports where the solver is.
pub trait HasIterate {
    /// Returns the 1-based iteration counter.
    fn iter(&self) -> usize;

    /// Returns the iterate produced by this step.
    fn iterate(&self) -> f64;
}

/// An event that carries the size of the step just taken.
pub trait HasStepError {
    /// Returns the step error, `|x_next - x|` for fixed-point iteration.
    fn step_error(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasIterate for fixed_point::Event<'_> {
    fn iter(&self) -> usize {
        self.record.iter
    }

    fn iterate(&self) -> f64 {
        self.record.gx
    }
}

impl HasStepError for fixed_point::Event<'_> {
    fn step_error(&self) -> f64 {
        self.record.error
    }
}

impl CanStopEarly for fixed_point::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
