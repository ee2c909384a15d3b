use super::Trace;

/// Indicates how the fixed-point solver finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A step moved the iterate by less than the tolerance.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a fixed-point solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// The last iterate, `g` applied to the previous one.
    pub x: f64,

    /// One record per iteration, in order.
    pub trace: Trace,

    /// Iteration count when the solver finished.
    pub iters: usize,
}

impl Solution {
    pub(super) fn new(status: Status, x: f64, trace: Trace) -> Self {
        Self {
            status,
            x,
            iters: trace.len(),
            trace,
        }
    }
}
