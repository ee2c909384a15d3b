//! Proposes fixed-point rearrangements `x = g(x)` of an equation `f(x) = 0`.
//!
//! [`attempt`] applies every [`Template`] in order and reports each result;
//! [`generate`] parses text and keeps only the accepted candidates.
//!
//! ```
//! use fixpoint_solvers::candidates;
//!
//! let candidates = candidates::generate("x**2 - 2");
//! assert_eq!(candidates.len(), 5);
//! assert_eq!(candidates[0].expr.to_string(), "-x**2 + x + 2");
//! ```

mod outcome;
mod template;

pub use outcome::{Candidate, Outcome, SkipReason};
pub use template::Template;

use fixpoint_symbolic::{Expr, parse_equation};
use tracing::debug;

/// Applies every template to `f`, in [`Template::ALL`] order.
#[must_use]
pub fn attempt(f: &Expr) -> Vec<Outcome> {
    Template::ALL.iter().map(|template| template.apply(f)).collect()
}

/// Parses `f_text` and returns the candidates that survive simplification.
///
/// The text may be an expression (`x**2 - 2`) or an equation
/// (`x**2 = 2`). Unparseable text yields no candidates.
#[must_use]
pub fn generate(f_text: &str) -> Vec<Candidate> {
    let f = match parse_equation(f_text) {
        Ok(f) => f,
        Err(error) => {
            debug!(%error, f_text, "cannot parse equation; no candidates");
            return Vec::new();
        }
    };

    attempt(&f)
        .into_iter()
        .filter_map(|outcome| match outcome {
            Outcome::Accepted(candidate) => Some(candidate),
            Outcome::Skipped { template, reason } => {
                debug!(template = template.label(), %reason, "skipping candidate");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use crate::VARIABLE;

    #[test]
    fn quadratic_yields_every_template() {
        let candidates = generate("x**2 - 2");
        let templates: Vec<_> = candidates.iter().map(|c| c.template).collect();
        assert_eq!(templates, Template::ALL);

        let rendered: Vec<_> = candidates.iter().map(|c| c.expr.to_string()).collect();
        assert_eq!(rendered[0], "-x**2 + x + 2");
        assert_eq!(rendered[2], "x**2 + x - 2");
        assert_eq!(rendered[3], "x/(x**2 - 1)");
        assert_eq!(rendered[4], "x**2 + x - 2");
    }

    #[test]
    fn deeply_nested_input_yields_nothing() {
        let parens = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(generate(&parens).is_empty());

        let signs = format!("{}x", "-".repeat(20_000));
        assert!(generate(&signs).is_empty());
    }

    #[test]
    fn out_of_range_literal_yields_nothing() {
        assert!(generate("x - 1e400").is_empty());
    }

    #[test]
    fn newton_candidate_is_newtons_map() {
        let newton = generate("x**2 - 2")
            .into_iter()
            .find(|c| c.template == Template::NewtonLike)
            .expect("newton-like candidate");

        // x - (x**2 - 2)/(2x) at x = 1 is 1.5
        assert_relative_eq!(newton.expr.eval(VARIABLE, 1.0).unwrap(), 1.5);
        assert_relative_eq!(newton.expr.eval(VARIABLE, 2.0).unwrap(), 1.5);
    }

    #[test]
    fn equations_are_moved_to_one_side() {
        let from_equation = generate("x**2 = 2");
        let from_expression = generate("x**2 - 2");
        assert_eq!(from_equation, from_expression);
    }

    #[test]
    fn constant_candidates_are_dropped() {
        let templates: Vec<_> = generate("x").iter().map(|c| c.template).collect();
        assert_eq!(
            templates,
            [Template::Additive, Template::Fractional, Template::Exponential]
        );
    }

    #[test]
    fn attempt_reports_skips() {
        let f = fixpoint_symbolic::parse("x").expect("valid expression");
        let outcomes = attempt(&f);
        assert_eq!(outcomes.len(), Template::ALL.len());
        assert!(matches!(
            &outcomes[0],
            Outcome::Skipped {
                reason: SkipReason::Constant(_),
                ..
            }
        ));
        assert!(matches!(&outcomes[2], Outcome::Accepted(_)));
        assert_eq!(outcomes[4].template(), Template::Exponential);
    }

    #[test]
    fn invalid_text_yields_nothing() {
        assert!(generate("").is_empty());
        assert!(generate("x +* 2").is_empty());
        assert!(generate("sin").is_empty());
        assert!(generate("log(0) + x").is_empty());
    }

    fn polynomial() -> impl Strategy<Value = String> {
        prop::collection::vec(-5i32..=5, 1..4).prop_map(|coefficients| {
            coefficients
                .iter()
                .enumerate()
                .map(|(power, c)| format!("({c})*x**{}", power + 1))
                .collect::<Vec<_>>()
                .join(" + ")
        })
    }

    proptest! {
        #[test]
        fn candidates_depend_on_x(text in polynomial()) {
            for candidate in generate(&text) {
                prop_assert!(candidate.expr.free_symbols().contains(VARIABLE));
            }
        }

        #[test]
        fn generation_is_repeatable(text in polynomial()) {
            let first = generate(&text);
            let second = generate(&text);
            prop_assert_eq!(&first, &second);

            let order: Vec<_> = first.iter().map(|c| c.template).collect();
            let mut sorted = order.clone();
            sorted.sort_by_key(|t| Template::ALL.iter().position(|a| a == t));
            prop_assert_eq!(order, sorted);
        }
    }
}
