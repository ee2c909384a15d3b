use fixpoint_core::Observer;
use tracing::trace;

use crate::traits::{HasIterate, HasStepError};

/// Logs every solver step at `trace` level.
///
/// Never returns an action. Fields are `iter`, `x` (the new iterate) and
/// `error` (the step size).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl<E, A> Observer<E, A> for TracingObserver
where
    E: HasIterate + HasStepError,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        trace!(
            iter = event.iter(),
            x = event.iterate(),
            error = event.step_error(),
            "fixed-point step"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use fixpoint_core::Model;
    use fixpoint_solvers::fixed_point::{self, Config, Status};

    struct Halve;

    impl Model for Halve {
        type Input = f64;
        type Output = f64;
        type Error = Infallible;

        fn call(&self, input: &f64) -> Result<f64, Infallible> {
            Ok(input / 2.0)
        }
    }

    #[test]
    fn does_not_interfere_with_the_solve() {
        let config = Config::new(200, 1e-9).expect("valid config");
        let solution =
            fixed_point::solve(&Halve, 1.0, &config, TracingObserver).expect("should solve");

        assert_eq!(solution.status, Status::Converged);
        assert!(solution.x.abs() < 1e-8);
    }
}
