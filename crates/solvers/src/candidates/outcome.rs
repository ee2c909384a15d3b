use fixpoint_symbolic::{Expr, SimplifyError};
use thiserror::Error;

use super::Template;

/// A proposed iteration function `g(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The rearrangement that produced this candidate.
    pub template: Template,

    /// The simplified iteration function.
    pub expr: Expr,
}

impl Candidate {
    /// Returns the template's label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.template.label()
    }
}

/// Result of applying one template to `f`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accepted(Candidate),
    Skipped {
        template: Template,
        reason: SkipReason,
    },
}

impl Outcome {
    /// Returns the template this outcome came from.
    #[must_use]
    pub fn template(&self) -> Template {
        match self {
            Outcome::Accepted(candidate) => candidate.template,
            Outcome::Skipped { template, .. } => *template,
        }
    }

    /// Returns the candidate if the template was accepted.
    #[must_use]
    pub fn accepted(self) -> Option<Candidate> {
        match self {
            Outcome::Accepted(candidate) => Some(candidate),
            Outcome::Skipped { .. } => None,
        }
    }
}

/// Why a template did not produce a candidate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("simplification failed: {0}")]
    Simplify(#[from] SimplifyError),

    #[error("g(x) simplifies to the constant {0}")]
    Constant(Expr),
}
