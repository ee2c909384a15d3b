use fixpoint_symbolic::{Expr, simplify};

use crate::VARIABLE;

use super::{Candidate, Outcome, SkipReason};

/// A rearrangement of `f(x) = 0` into `x = g(x)`.
///
/// Each template yields a `g` whose fixed points include the roots of `f`,
/// subject to the template's own side conditions (`f'(x) != 0` for
/// [`NewtonLike`](Template::NewtonLike), `f(x) + x > 0` for
/// [`Exponential`](Template::Exponential)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// `g = x - f`
    BasicRearrangement,
    /// `g = x - f / f'`
    NewtonLike,
    /// `g = x + f`
    Additive,
    /// `g = x / (1 + f)`
    Fractional,
    /// `g = exp(log(f + x))`
    Exponential,
}

impl Template {
    /// Every template, in the order candidates are proposed.
    pub const ALL: [Template; 5] = [
        Template::BasicRearrangement,
        Template::NewtonLike,
        Template::Additive,
        Template::Fractional,
        Template::Exponential,
    ];

    /// Human-readable name including the rearrangement.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Template::BasicRearrangement => "Basic rearrangement: x = x - f(x)",
            Template::NewtonLike => "Newton-like: x = x - f(x)/f'(x)",
            Template::Additive => "Additive form: x = x + f(x)",
            Template::Fractional => "Fractional form: x = x / (1 + f(x))",
            Template::Exponential => "Exponential form: x = exp(log(f(x) + x))",
        }
    }

    /// Builds the unsimplified `g` for `f`.
    #[must_use]
    pub fn build(self, f: &Expr) -> Expr {
        let x = Expr::symbol(VARIABLE);
        let f = f.clone();
        match self {
            Template::BasicRearrangement => x - f,
            Template::NewtonLike => {
                let derivative = f.diff(VARIABLE);
                x - f / derivative
            }
            Template::Additive => x + f,
            Template::Fractional => x / (Expr::number(1.0) + f),
            Template::Exponential => Expr::exp(Expr::log(f + x)),
        }
    }

    /// Builds and simplifies `g`, keeping it only if it still depends on `x`.
    #[must_use]
    pub fn apply(self, f: &Expr) -> Outcome {
        let expr = match simplify(&self.build(f)) {
            Ok(expr) => expr,
            Err(error) => {
                return Outcome::Skipped {
                    template: self,
                    reason: SkipReason::Simplify(error),
                };
            }
        };

        if expr.depends_on(VARIABLE) {
            Outcome::Accepted(Candidate {
                template: self,
                expr,
            })
        } else {
            Outcome::Skipped {
                template: self,
                reason: SkipReason::Constant(expr),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use fixpoint_symbolic::{SimplifyError, parse};

    #[test]
    fn labels_name_the_rearrangement() {
        let labels: Vec<_> = Template::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels[1], "Newton-like: x = x - f(x)/f'(x)");
        assert!(labels.iter().all(|label| label.contains("x = ")));
    }

    #[test]
    fn newton_like_divides_by_zero_for_constant_f() {
        let f = parse("5").expect("valid expression");
        assert_eq!(
            Template::NewtonLike.apply(&f),
            Outcome::Skipped {
                template: Template::NewtonLike,
                reason: SkipReason::Simplify(SimplifyError::DivisionByZero),
            }
        );
    }

    #[test]
    fn basic_rearrangement_of_identity_is_constant() {
        let f = parse("x").expect("valid expression");
        assert_eq!(
            Template::BasicRearrangement.apply(&f),
            Outcome::Skipped {
                template: Template::BasicRearrangement,
                reason: SkipReason::Constant(Expr::number(0.0)),
            }
        );
    }
}
