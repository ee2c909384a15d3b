use std::cmp::Ordering;

use crate::{Constant, Expr, Func, SimplifyError};

/// Upper bound on bottom-up rewrite passes.
const MAX_PASSES: usize = 16;

/// Largest magnitude for which folded powers are kept as exact integers.
const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Simplifies an expression into a canonical form.
///
/// Rewrites are applied bottom-up, repeatedly, until the tree stops changing:
///
/// - nested sums and products are flattened
/// - numeric literals are folded, and like terms (`x + x`) and like factors
///   (`x * x`) are collected
/// - a numeric coefficient is distributed over a single sum (`-(x - 2)`)
/// - `x**0`, `x**1`, `1**x`, `(x**a)**n` for integer `n`, `exp(log(u))` and
///   `log(exp(u))` are reduced
/// - functions of literals are folded when the result is an exact integer
///
/// Terms are ordered by descending degree, so `x - (x**2 - 2)` becomes
/// `-x**2 + x + 2`.
///
/// # Errors
///
/// Returns [`SimplifyError::DivisionByZero`] if a zero literal is raised to a
/// negative power, and [`SimplifyError::Undefined`] if a constant
/// subexpression has no finite real value, such as `log(0)`.
pub fn simplify(expr: &Expr) -> Result<Expr, SimplifyError> {
    let mut current = rewrite(expr)?;
    for _ in 1..MAX_PASSES {
        let next = rewrite(&current)?;
        if next == current {
            break;
        }
        current = next;
    }
    Ok(current)
}

fn rewrite(expr: &Expr) -> Result<Expr, SimplifyError> {
    match expr {
        Expr::Number(value) if !value.is_finite() => {
            Err(SimplifyError::Undefined(value.to_string()))
        }
        Expr::Number(_) | Expr::Constant(_) | Expr::Symbol(_) => Ok(expr.clone()),
        Expr::Add(terms) => {
            let terms = terms.iter().map(rewrite).collect::<Result<Vec<_>, _>>()?;
            collect_terms(terms)
        }
        Expr::Mul(factors) => {
            let factors = factors.iter().map(rewrite).collect::<Result<Vec<_>, _>>()?;
            collect_factors(factors)
        }
        Expr::Pow(base, exponent) => simplify_pow(rewrite(base)?, rewrite(exponent)?),
        Expr::Func(func, arg) => simplify_func(*func, rewrite(arg)?),
    }
}

/// Combines already-simplified terms into a canonical sum.
fn collect_terms(terms: Vec<Expr>) -> Result<Expr, SimplifyError> {
    let mut constant = 0.0;
    let mut collected: Vec<(Expr, Ratio)> = Vec::new();

    for term in flatten(terms, |expr| match expr {
        Expr::Add(inner) => Ok(inner),
        other => Err(other),
    }) {
        if let Expr::Number(value) = term {
            constant += value;
            continue;
        }

        let (coefficient, rest) = split_coefficient(term);
        match collected.iter_mut().find(|(existing, _)| *existing == rest) {
            Some((_, total)) => *total = total.add(coefficient),
            None => collected.push((rest, coefficient)),
        }
    }

    if !constant.is_finite() {
        return Err(SimplifyError::Undefined(constant.to_string()));
    }

    let mut out: Vec<Expr> = collected
        .into_iter()
        .filter(|(_, coefficient)| !coefficient.is_zero())
        .map(|(rest, coefficient)| with_coefficient(coefficient, rest))
        .collect();
    out.sort_by(term_order);

    if constant != 0.0 {
        out.push(Expr::Number(constant));
    }

    Ok(match out.len() {
        0 => Expr::Number(0.0),
        1 => out.remove(0),
        _ => Expr::Add(out),
    })
}

/// Combines already-simplified factors into a canonical product.
fn collect_factors(factors: Vec<Expr>) -> Result<Expr, SimplifyError> {
    let mut coefficient = 1.0;
    let mut collected: Vec<(Expr, Expr)> = Vec::new();

    for factor in flatten(factors, |expr| match expr {
        Expr::Mul(inner) => Ok(inner),
        other => Err(other),
    }) {
        let (base, exponent) = match factor {
            Expr::Number(value) => {
                coefficient *= value;
                continue;
            }
            Expr::Pow(base, exponent) => (*base, *exponent),
            other => (other, Expr::Number(1.0)),
        };

        match collected.iter_mut().find(|(existing, _)| *existing == base) {
            Some((_, total)) => {
                let sum = std::mem::replace(total, Expr::Number(0.0));
                *total = collect_terms(vec![sum, exponent])?;
            }
            None => collected.push((base, exponent)),
        }
    }

    let mut out = Vec::with_capacity(collected.len());
    for (base, exponent) in collected {
        let folded = match simplify_pow(base, exponent)? {
            Expr::Mul(inner) => inner,
            other => vec![other],
        };
        for factor in folded {
            match factor {
                Expr::Number(value) => coefficient *= value,
                other => out.push(other),
            }
        }
    }

    if !coefficient.is_finite() {
        return Err(SimplifyError::Undefined(coefficient.to_string()));
    }
    if coefficient == 0.0 {
        return Ok(Expr::Number(0.0));
    }

    out.sort_by(factor_order);

    // c * (a + b) => c*a + c*b
    if coefficient != 1.0 && out.len() == 1 && matches!(out[0], Expr::Add(_)) {
        if let Some(Expr::Add(terms)) = out.pop() {
            let scaled = terms
                .into_iter()
                .map(|term| collect_factors(vec![Expr::Number(coefficient), term]))
                .collect::<Result<Vec<_>, _>>()?;
            return collect_terms(scaled);
        }
    }

    Ok(match (coefficient, out.len()) {
        (_, 0) => Expr::Number(coefficient),
        (c, 1) if c == 1.0 => out.remove(0),
        (c, _) if c == 1.0 => Expr::Mul(out),
        (c, _) => {
            out.insert(0, Expr::Number(c));
            Expr::Mul(out)
        }
    })
}

fn simplify_pow(base: Expr, exponent: Expr) -> Result<Expr, SimplifyError> {
    match (&base, &exponent) {
        (_, Expr::Number(e)) if *e == 0.0 => Ok(Expr::Number(1.0)),
        (_, Expr::Number(e)) if *e == 1.0 => Ok(base),
        (Expr::Number(b), _) if *b == 1.0 => Ok(Expr::Number(1.0)),
        (Expr::Number(b), Expr::Number(e)) if *b == 0.0 => {
            if *e > 0.0 {
                Ok(Expr::Number(0.0))
            } else {
                Err(SimplifyError::DivisionByZero)
            }
        }
        (Expr::Number(b), Expr::Number(e)) => fold_power(*b, *e),
        (Expr::Pow(inner_base, inner_exponent), Expr::Number(e)) if e.fract() == 0.0 => {
            let combined = collect_factors(vec![(**inner_exponent).clone(), exponent.clone()])?;
            simplify_pow((**inner_base).clone(), combined)
        }
        _ => Ok(base.pow(exponent)),
    }
}

/// Folds `b**e` for literals, keeping it symbolic unless the result is exact.
fn fold_power(b: f64, e: f64) -> Result<Expr, SimplifyError> {
    if b < 0.0 && e.fract() != 0.0 {
        return Err(SimplifyError::Undefined(format!("({b})**{e}")));
    }

    let value = b.powf(e);
    if !value.is_finite() {
        return Err(SimplifyError::Undefined(format!("{b}**{e}")));
    }

    let exact = value.fract() == 0.0 && value.abs() < EXACT_LIMIT;
    if (e > 0.0 && e.fract() == 0.0) || exact {
        Ok(Expr::Number(value))
    } else {
        Ok(Expr::Number(b).pow(Expr::Number(e)))
    }
}

fn simplify_func(func: Func, arg: Expr) -> Result<Expr, SimplifyError> {
    match (func, arg) {
        (Func::Exp, Expr::Func(Func::Log, inner)) | (Func::Log, Expr::Func(Func::Exp, inner)) => {
            Ok(*inner)
        }
        (Func::Log, Expr::Constant(Constant::E)) => Ok(Expr::Number(1.0)),
        (Func::Abs, Expr::Number(value)) => Ok(Expr::Number(value.abs())),
        (func, Expr::Number(value)) => match func.apply(value) {
            Ok(result) if result.fract() == 0.0 => Ok(Expr::Number(result)),
            Ok(_) => Ok(Expr::func(func, Expr::Number(value))),
            Err(_) => Err(SimplifyError::Undefined(format!("{func}({value})"))),
        },
        (func, arg) => Ok(Expr::func(func, arg)),
    }
}

/// Expands nested nodes selected by `unwrap` into one flat list.
fn flatten(items: Vec<Expr>, unwrap: impl Fn(Expr) -> Result<Vec<Expr>, Expr> + Copy) -> Vec<Expr> {
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match unwrap(item) {
            Ok(inner) => flat.extend(flatten(inner, unwrap)),
            Err(leaf) => flat.push(leaf),
        }
    }
    flat
}

/// A term coefficient kept as `num/den`, so that reciprocals of integer
/// literals (`x/2`) collect with other terms instead of staying symbolic.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ratio {
    num: f64,
    den: f64,
}

impl Ratio {
    const ONE: Ratio = Ratio { num: 1.0, den: 1.0 };

    /// Normalizes the sign onto `num` and reduces integer ratios.
    fn new(num: f64, den: f64) -> Self {
        let (num, den) = if den < 0.0 { (-num, -den) } else { (num, den) };
        if is_integer(num) && is_integer(den) && den != 0.0 {
            let divisor = gcd(num.abs(), den);
            if divisor > 1.0 {
                return Self {
                    num: num / divisor,
                    den: den / divisor,
                };
            }
        }
        Self { num, den }
    }

    fn add(self, other: Ratio) -> Ratio {
        if self.den == other.den {
            Ratio::new(self.num + other.num, self.den)
        } else {
            Ratio::new(
                self.num * other.den + other.num * self.den,
                self.den * other.den,
            )
        }
    }

    fn is_zero(self) -> bool {
        self.num == 0.0
    }
}

fn is_integer(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < EXACT_LIMIT
}

fn gcd(mut a: f64, mut b: f64) -> f64 {
    while b != 0.0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Returns `d` if `factor` is `n**(-k)` for integers `n` and `k`, with
/// `d = n**k` an exact integer.
fn integer_reciprocal(factor: &Expr) -> Option<f64> {
    let Expr::Pow(base, exponent) = factor else {
        return None;
    };
    let (base, exponent) = (base.as_number()?, exponent.as_number()?);
    if base == 0.0 || exponent >= 0.0 || !is_integer(base) || !is_integer(exponent) {
        return None;
    }
    let denominator = base.powf(-exponent);
    is_integer(denominator).then_some(denominator)
}

/// Splits a canonical term into its numeric coefficient and the rest.
///
/// A product made only of numbers is left whole.
fn split_coefficient(term: Expr) -> (Ratio, Expr) {
    let Expr::Mul(factors) = term else {
        return (Ratio::ONE, term);
    };

    let mut num = 1.0;
    let mut den = 1.0;
    let mut rest = Vec::with_capacity(factors.len());
    for factor in &factors {
        if let Expr::Number(value) = factor {
            num *= value;
        } else if let Some(denominator) = integer_reciprocal(factor) {
            den *= denominator;
        } else {
            rest.push(factor.clone());
        }
    }

    match rest.len() {
        0 => (Ratio::ONE, Expr::Mul(factors)),
        1 => (Ratio::new(num, den), rest.remove(0)),
        _ => (Ratio::new(num, den), Expr::Mul(rest)),
    }
}

/// Rebuilds `num*rest/den`.
fn with_coefficient(coefficient: Ratio, rest: Expr) -> Expr {
    let mut factors = match rest {
        Expr::Mul(factors) => factors,
        other => vec![other],
    };
    if coefficient.num != 1.0 {
        factors.insert(0, Expr::Number(coefficient.num));
    }
    if coefficient.den != 1.0 {
        factors.push(Expr::Number(coefficient.den).pow(Expr::Number(-1.0)));
    }

    if factors.len() == 1 {
        factors.remove(0)
    } else {
        Expr::Mul(factors)
    }
}

/// Orders sum terms by descending polynomial degree, then by rendering.
fn term_order(a: &Expr, b: &Expr) -> Ordering {
    degree(b)
        .total_cmp(&degree(a))
        .then_with(|| sort_text(a).cmp(&sort_text(b)))
}

/// Orders product factors: symbols and powers, then functions, then sums.
fn factor_order(a: &Expr, b: &Expr) -> Ordering {
    factor_rank(a)
        .cmp(&factor_rank(b))
        .then_with(|| sort_text(a).cmp(&sort_text(b)))
}

fn factor_rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(_) => 0,
        Expr::Constant(_) => 1,
        Expr::Symbol(_) | Expr::Pow(..) => 2,
        Expr::Func(..) => 3,
        Expr::Mul(_) => 4,
        Expr::Add(_) => 5,
    }
}

/// Total polynomial degree over all symbols; non-polynomial parts count as 0.
fn degree(expr: &Expr) -> f64 {
    match expr {
        Expr::Symbol(_) => 1.0,
        Expr::Pow(base, exponent) => match exponent.as_number() {
            Some(e) => degree(base) * e,
            None => 0.0,
        },
        Expr::Mul(factors) => factors.iter().map(degree).sum(),
        Expr::Add(terms) => terms.iter().map(degree).fold(0.0, f64::max),
        Expr::Number(_) | Expr::Constant(_) | Expr::Func(..) => 0.0,
    }
}

/// Sort key that ignores numeric coefficients and power exponents.
fn sort_text(expr: &Expr) -> String {
    match expr {
        Expr::Mul(factors) => factors
            .iter()
            .filter(|factor| {
                !matches!(factor, Expr::Number(_)) && integer_reciprocal(factor).is_none()
            })
            .map(sort_text)
            .collect::<Vec<_>>()
            .join("*"),
        Expr::Pow(base, _) => sort_text(base),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use crate::parse;

    fn simplified(text: &str) -> String {
        let expr = parse(text).expect("valid expression");
        simplify(&expr).expect("simplifies").to_string()
    }

    #[test]
    fn collects_like_terms_and_orders_by_degree() {
        assert_eq!(simplified("x - (x**2 - 2)"), "-x**2 + x + 2");
        assert_eq!(simplified("x + (x**2 - 2)"), "x**2 + x - 2");
        assert_eq!(simplified("x + x + x"), "3*x");
        assert_eq!(simplified("2*x - 2*x"), "0");
    }

    #[test]
    fn collects_like_factors() {
        assert_eq!(simplified("x*x"), "x**2");
        assert_eq!(simplified("x**2/x"), "x");
        assert_eq!(simplified("x/x"), "1");
        assert_eq!(simplified("(x**2)**3"), "x**6");
    }

    #[test]
    fn keeps_fractions_readable() {
        assert_eq!(simplified("x/(1 + x**2 - 2)"), "x/(x**2 - 1)");
        assert_eq!(
            simplified("x - (x**2 - 2)/(2*x)"),
            "x - (x**2 - 2)/(2*x)"
        );
        assert_eq!(simplified("x/2"), "x/2");
    }

    #[test]
    fn collects_rational_coefficients() {
        assert_eq!(simplified("x - (sin(x) - x/2)"), "3*x/2 - sin(x)");
        assert_eq!(simplified("x/2 + x/3"), "5*x/6");
        assert_eq!(simplified("x/2 + x/2"), "x");
        assert_eq!(simplified("x/4 - x/4 + 1"), "1");
        assert_eq!(simplified("x/(-2) + sin(x)"), "-x/2 + sin(x)");
    }

    #[test]
    fn folds_literals() {
        assert_eq!(simplified("2 + 3*4"), "14");
        assert_eq!(simplified("2**10"), "1024");
        assert_eq!(simplified("4**0.5"), "2");
        assert_eq!(simplified("exp(0) + log(1) + cos(0)"), "2");
        assert_eq!(simplified("abs(-2.5)"), "2.5");
        assert_eq!(simplified("sin(1)"), "sin(1)");
    }

    #[test]
    fn cancels_exp_and_log() {
        assert_eq!(simplified("exp(log(x**2 - 2 + x))"), "x**2 + x - 2");
        assert_eq!(simplified("log(exp(x))"), "x");
        assert_eq!(simplified("log(E)"), "1");
    }

    #[test]
    fn reports_undefined_constants() {
        let zero_division = parse("x - 5/0").expect("valid expression");
        assert_eq!(simplify(&zero_division), Err(SimplifyError::DivisionByZero));

        let log_zero = parse("log(0) + x").expect("valid expression");
        assert!(matches!(simplify(&log_zero), Err(SimplifyError::Undefined(_))));

        let root = parse("(-8)**0.5").expect("valid expression");
        assert!(matches!(simplify(&root), Err(SimplifyError::Undefined(_))));
    }

    #[test]
    fn simplify_is_idempotent() {
        for text in [
            "x - (x**2 - 2)/(2*x)",
            "sin(x)*x*2",
            "exp(x)**2",
            "a*x + b*x",
            "x - (sin(x) - x/2)",
        ] {
            let once = simplify(&parse(text).expect("valid")).expect("simplifies");
            let twice = simplify(&once).expect("simplifies again");
            assert_eq!(once, twice, "{text}");
        }
    }

    proptest! {
        #[test]
        fn preserves_polynomial_values(
            a in -10i32..10,
            b in -10i32..10,
            c in -10i32..10,
            x in -5.0f64..5.0,
        ) {
            let text = format!("({a})*x**2 + x*({b}) - ({c}) + x - x");
            let expr = parse(&text).expect("valid expression");
            let simple = simplify(&expr).expect("simplifies");

            let expected = expr.eval("x", x).expect("evaluates");
            let actual = simple.eval("x", x).expect("simplified evaluates");
            assert_relative_eq!(actual, expected, epsilon = 1e-9, max_relative = 1e-12);
        }
    }
}
