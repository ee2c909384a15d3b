use fixpoint_core::Model;

use crate::{EvalError, Expr};

impl Expr {
    /// Evaluates the expression with `var` bound to `value`.
    ///
    /// Every intermediate result must be a finite real number.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] if the expression is undefined at `value`
    /// (division by zero, a function outside its real domain, a negative base
    /// raised to a non-integer power), overflows, or contains a symbol other
    /// than `var`.
    pub fn eval(&self, var: &str, value: f64) -> Result<f64, EvalError> {
        let result = match self {
            Expr::Number(number) => *number,
            Expr::Constant(constant) => constant.value(),
            Expr::Symbol(name) if name == var => value,
            Expr::Symbol(name) => return Err(EvalError::UnboundSymbol(name.clone())),
            Expr::Add(terms) => terms.iter().try_fold(0.0, |sum, term| {
                term.eval(var, value).map(|term| sum + term)
            })?,
            Expr::Mul(factors) => factors.iter().try_fold(1.0, |product, factor| {
                factor.eval(var, value).map(|factor| product * factor)
            })?,
            Expr::Pow(base, exponent) => {
                power(base.eval(var, value)?, exponent.eval(var, value)?)?
            }
            Expr::Func(func, arg) => func.apply(arg.eval(var, value)?)?,
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

fn power(base: f64, exponent: f64) -> Result<f64, EvalError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvalError::NonReal { base, exponent });
    }
    Ok(base.powf(exponent))
}

/// An expression bound to the variable it is a function of.
///
/// `Function` is the numeric face of an [`Expr`]: calling it as a [`Model`]
/// evaluates the expression at the given point.
///
/// ```
/// use fixpoint_core::Model;
/// use fixpoint_symbolic::{Function, parse};
///
/// let g = Function::new(parse("cos(x)").unwrap(), "x");
/// assert_eq!(g.call(&0.0).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    expr: Expr,
    var: String,
}

impl Function {
    /// Binds `expr` to the variable `var`.
    pub fn new(expr: Expr, var: impl Into<String>) -> Self {
        Self {
            expr,
            var: var.into(),
        }
    }

    /// Returns the underlying expression.
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Returns the bound variable name.
    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Model for Function {
    type Input = f64;
    type Output = f64;
    type Error = EvalError;

    fn call(&self, input: &f64) -> Result<f64, EvalError> {
        self.expr.eval(&self.var, *input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{Func, parse};

    fn eval(text: &str, at: f64) -> Result<f64, EvalError> {
        parse(text).expect("valid expression").eval("x", at)
    }

    #[test]
    fn evaluates_arithmetic() {
        assert_relative_eq!(eval("x**2 - 2", 3.0).unwrap(), 7.0);
        assert_relative_eq!(eval("(x + 1)/(x - 1)", 3.0).unwrap(), 2.0);
        assert_relative_eq!(eval("2*pi*x", 0.5).unwrap(), std::f64::consts::PI);
        assert_relative_eq!(eval("(-2)**3", 0.0).unwrap(), -8.0);
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(eval("1/x", 0.0), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn domain_errors_fail() {
        assert_eq!(
            eval("log(x)", -1.0),
            Err(EvalError::Domain {
                func: Func::Log,
                arg: -1.0
            })
        );
        assert_eq!(
            eval("x**0.5", -4.0),
            Err(EvalError::NonReal {
                base: -4.0,
                exponent: 0.5
            })
        );
    }

    #[test]
    fn overflow_fails() {
        assert_eq!(eval("exp(x)", 1000.0), Err(EvalError::NonFinite));
        assert_eq!(eval("x**400", 1e3), Err(EvalError::NonFinite));
    }

    #[test]
    fn unbound_symbols_fail() {
        assert_eq!(
            eval("a*x", 1.0),
            Err(EvalError::UnboundSymbol("a".into()))
        );
    }

    #[test]
    fn function_is_a_model() {
        let g = Function::new(parse("x/2 + 1").expect("valid expression"), "x");
        assert_eq!(g.var(), "x");
        assert_relative_eq!(g.call(&4.0).expect("evaluates"), 3.0);
        assert_eq!(g.expr().to_string(), "x/2 + 1");
    }
}
