use fixpoint_core::Observer;
use tracing::debug;

use crate::traits::{CanStopEarly, HasStepError};

/// Stops a solve whose step error has not improved for `patience` steps.
///
/// Fixed-point iteration with a poor `g(x)` often diverges or cycles; this
/// guard ends such runs instead of spending the whole iteration budget.
/// A step counts as an improvement only if its error is strictly below the
/// best error seen so far. Non-finite errors never improve.
///
/// ```
/// use fixpoint_observers::StallGuard;
/// use fixpoint_solvers::iterate::{Outcome, iterate_observed};
///
/// // g(x) = 2x diverges from any nonzero start.
/// let result = iterate_observed("x", "2*x", 1.0, 1e-9, 1000, StallGuard::new(5));
/// assert_eq!(result.status, Outcome::StoppedEarly);
/// assert_eq!(result.trace.len(), 6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StallGuard {
    patience: usize,
    best: f64,
    stalled: usize,
}

impl StallGuard {
    /// Creates a guard that tolerates `patience` consecutive non-improving steps.
    #[must_use]
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best: f64::INFINITY,
            stalled: 0,
        }
    }

    /// Returns the smallest step error observed so far.
    #[must_use]
    pub fn best(&self) -> f64 {
        self.best
    }
}

impl<E, A> Observer<E, A> for StallGuard
where
    E: HasStepError,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let error = event.step_error();
        if error < self.best {
            self.best = error;
            self.stalled = 0;
            return None;
        }

        self.stalled += 1;
        if self.stalled < self.patience {
            return None;
        }

        debug!(
            best = self.best,
            steps = self.stalled,
            "step error stopped improving"
        );
        Some(A::stop_early())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Step(f64);

    impl HasStepError for Step {
        fn step_error(&self) -> f64 {
            self.0
        }
    }

    #[derive(Debug, PartialEq)]
    struct Stop;

    impl CanStopEarly for Stop {
        fn stop_early() -> Self {
            Stop
        }
    }

    fn feed(guard: &mut StallGuard, errors: &[f64]) -> Vec<Option<Stop>> {
        errors
            .iter()
            .map(|error| guard.observe(&Step(*error)))
            .collect()
    }

    #[test]
    fn improving_errors_never_stop() {
        let mut guard = StallGuard::new(2);
        let actions = feed(&mut guard, &[1.0, 0.5, 0.25, 0.125]);
        assert!(actions.iter().all(Option::is_none));
        assert_eq!(guard.best(), 0.125);
    }

    #[test]
    fn stops_after_patience_is_exhausted() {
        let mut guard = StallGuard::new(2);
        let actions = feed(&mut guard, &[1.0, 2.0, 4.0]);
        assert_eq!(actions, [None, None, Some(Stop)]);
    }

    #[test]
    fn improvement_resets_the_count() {
        let mut guard = StallGuard::new(2);
        let actions = feed(&mut guard, &[1.0, 1.5, 0.5, 0.7, 0.6]);
        assert_eq!(actions, [None, None, None, None, Some(Stop)]);
    }

    #[test]
    fn non_finite_errors_count_as_stalls() {
        let mut guard = StallGuard::new(1);
        let actions = feed(&mut guard, &[1.0, f64::NAN]);
        assert_eq!(actions, [None, Some(Stop)]);
    }
}
