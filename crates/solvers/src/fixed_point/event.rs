use super::Record;

/// Iteration event emitted by the fixed-point solver after each step.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// The record just appended to the trace.
    pub record: &'a Record,

    /// Whether this step satisfied the tolerance.
    pub converged: bool,
}

impl Event<'_> {
    /// Iteration counter (1-based).
    #[must_use]
    pub fn iter(&self) -> usize {
        self.record.iter
    }

    /// The iterate `g` was applied to.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.record.x
    }

    /// The new iterate `g(x)`.
    #[must_use]
    pub fn gx(&self) -> f64 {
        self.record.gx
    }

    /// The step size `|g(x) - x|`.
    #[must_use]
    pub fn error(&self) -> f64 {
        self.record.error
    }
}
