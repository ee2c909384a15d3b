use crate::{Expr, Func};

impl Expr {
    /// Differentiates the expression with respect to `var`.
    ///
    /// The result is a raw application of the sum, product, power and chain
    /// rules; pass it through [`simplify`](crate::simplify) before display.
    #[must_use]
    pub fn diff(&self, var: &str) -> Expr {
        if !self.depends_on(var) {
            return Expr::Number(0.0);
        }

        match self {
            Expr::Number(_) | Expr::Constant(_) => Expr::Number(0.0),
            Expr::Symbol(_) => Expr::Number(1.0),
            Expr::Add(terms) => Expr::Add(terms.iter().map(|term| term.diff(var)).collect()),
            Expr::Mul(factors) => product_rule(factors, var),
            Expr::Pow(base, exponent) => power_rule(base, exponent, var),
            Expr::Func(func, arg) => outer_derivative(*func, arg) * arg.diff(var),
        }
    }
}

/// d(f1*f2*...*fn) = sum over i of fi' * (product of the others).
fn product_rule(factors: &[Expr], var: &str) -> Expr {
    let terms = factors
        .iter()
        .enumerate()
        .filter(|(_, factor)| factor.depends_on(var))
        .map(|(i, factor)| {
            let mut product: Vec<Expr> = Vec::with_capacity(factors.len());
            product.push(factor.diff(var));
            product.extend(
                factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, other)| other.clone()),
            );
            Expr::Mul(product)
        })
        .collect();

    Expr::Add(terms)
}

fn power_rule(base: &Expr, exponent: &Expr, var: &str) -> Expr {
    let base_varies = base.depends_on(var);
    let exponent_varies = exponent.depends_on(var);
    let power = base.clone().pow(exponent.clone());

    match (base_varies, exponent_varies) {
        (false, false) => Expr::Number(0.0),
        // d(u**c) = c * u**(c - 1) * u'
        (true, false) => Expr::Mul(vec![
            exponent.clone(),
            base.clone().pow(exponent.clone() - Expr::Number(1.0)),
            base.diff(var),
        ]),
        // d(c**v) = c**v * log(c) * v'
        (false, true) => Expr::Mul(vec![power, Expr::log(base.clone()), exponent.diff(var)]),
        // d(u**v) = u**v * (v' * log(u) + v * u' / u)
        (true, true) => {
            power
                * (exponent.diff(var) * Expr::log(base.clone())
                    + exponent.clone() * base.diff(var) / base.clone())
        }
    }
}

/// Returns f'(u) for an elementary function f, without the inner derivative.
fn outer_derivative(func: Func, arg: &Expr) -> Expr {
    let u = arg.clone();
    let one = || Expr::Number(1.0);
    let square = |e: Expr| e.pow(Expr::Number(2.0));

    match func {
        Func::Sin => Expr::func(Func::Cos, u),
        Func::Cos => -Expr::func(Func::Sin, u),
        Func::Tan => one() + square(Expr::func(Func::Tan, u)),
        Func::Asin => one() / Expr::func(Func::Sqrt, one() - square(u)),
        Func::Acos => -(one() / Expr::func(Func::Sqrt, one() - square(u))),
        Func::Atan => one() / (one() + square(u)),
        Func::Sinh => Expr::func(Func::Cosh, u),
        Func::Cosh => Expr::func(Func::Sinh, u),
        Func::Tanh => one() - square(Expr::func(Func::Tanh, u)),
        Func::Exp => Expr::exp(u),
        Func::Log => one() / u,
        Func::Sqrt => one() / (Expr::Number(2.0) * Expr::func(Func::Sqrt, u)),
        Func::Abs => u.clone() / Expr::func(Func::Abs, u),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{parse, simplify};

    /// Differentiates and simplifies `text`, returning the rendered result.
    fn derivative(text: &str) -> String {
        let expr = parse(text).expect("valid expression");
        simplify(&expr.diff("x"))
            .expect("derivative simplifies")
            .to_string()
    }

    /// Compares the symbolic derivative against a central difference.
    fn check_numerically(text: &str, at: f64) {
        let expr = parse(text).expect("valid expression");
        let exact = expr.diff("x").eval("x", at).expect("derivative evaluates");
        let h = 1e-6;
        let ahead = expr.eval("x", at + h).expect("evaluates ahead");
        let behind = expr.eval("x", at - h).expect("evaluates behind");
        assert_relative_eq!(exact, (ahead - behind) / (2.0 * h), epsilon = 1e-5);
    }

    #[test]
    fn polynomial_derivatives() {
        assert_eq!(derivative("x**2 - 2"), "2*x");
        assert_eq!(derivative("x**3 + 4*x"), "3*x**2 + 4");
        assert_eq!(derivative("5"), "0");
        assert_eq!(derivative("x"), "1");
    }

    #[test]
    fn treats_other_symbols_as_constants() {
        assert_eq!(derivative("a*x"), "a");
        assert_eq!(derivative("a**2"), "0");
    }

    #[test]
    fn chain_rule_through_functions() {
        assert_eq!(derivative("sin(2*x)"), "2*cos(2*x)");
        assert_eq!(derivative("exp(x)"), "exp(x)");
        assert_eq!(derivative("log(x)"), "1/x");
    }

    #[test]
    fn derivatives_match_finite_differences() {
        for text in [
            "cos(x) - x",
            "x*exp(-x)",
            "tan(x)",
            "asin(x/2)",
            "acos(x/2)",
            "atan(x**2)",
            "sinh(x)*cosh(x)",
            "tanh(x)",
            "sqrt(x + 1)",
            "abs(x - 3)",
            "2**x",
            "x**x",
            "log(x**2 + 1)/x",
        ] {
            check_numerically(text, 0.7);
        }
    }
}
