use std::{collections::BTreeSet, fmt, ops};

use crate::EvalError;

/// A symbolic expression.
///
/// Sums and products are n-ary. Subtraction, negation and division have no
/// node of their own: `a - b` is `a + (-1)*b` and `a / b` is `a * b**(-1)`.
/// The arithmetic operators on `Expr` build these shapes directly, so
/// `x.clone() - f / df` reads like the formula it constructs.
///
/// Expressions are immutable values; every transformation returns a new tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A finite numeric literal.
    Number(f64),
    /// A named mathematical constant.
    Constant(Constant),
    /// A free symbol such as `x`.
    Symbol(String),
    /// Sum of all terms.
    Add(Vec<Expr>),
    /// Product of all factors.
    Mul(Vec<Expr>),
    /// `base ** exponent`.
    Pow(Box<Expr>, Box<Expr>),
    /// An elementary function applied to one argument.
    Func(Func, Box<Expr>),
}

impl Expr {
    /// Creates a numeric literal.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Creates a free symbol.
    #[must_use]
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Creates `self ** exponent`.
    #[must_use]
    pub fn pow(self, exponent: Expr) -> Self {
        Self::Pow(Box::new(self), Box::new(exponent))
    }

    /// Applies an elementary function to `arg`.
    #[must_use]
    pub fn func(func: Func, arg: Expr) -> Self {
        Self::Func(func, Box::new(arg))
    }

    /// Creates `exp(arg)`.
    #[must_use]
    pub fn exp(arg: Expr) -> Self {
        Self::func(Func::Exp, arg)
    }

    /// Creates `log(arg)`, the natural logarithm.
    #[must_use]
    pub fn log(arg: Expr) -> Self {
        Self::func(Func::Log, arg)
    }

    /// Returns the literal value if this is a [`Expr::Number`].
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the names of all symbols appearing in the expression.
    #[must_use]
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    /// Returns true if `var` appears anywhere in the expression.
    #[must_use]
    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Self::Number(_) | Self::Constant(_) => false,
            Self::Symbol(name) => name == var,
            Self::Add(items) | Self::Mul(items) => items.iter().any(|item| item.depends_on(var)),
            Self::Pow(base, exponent) => base.depends_on(var) || exponent.depends_on(var),
            Self::Func(_, arg) => arg.depends_on(var),
        }
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<String>) {
        match self {
            Self::Number(_) | Self::Constant(_) => {}
            Self::Symbol(name) => {
                symbols.insert(name.clone());
            }
            Self::Add(items) | Self::Mul(items) => {
                for item in items {
                    item.collect_symbols(symbols);
                }
            }
            Self::Pow(base, exponent) => {
                base.collect_symbols(symbols);
                exponent.collect_symbols(symbols);
            }
            Self::Func(_, arg) => arg.collect_symbols(symbols),
        }
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, rhs])
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::Add(vec![self, -rhs])
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, rhs])
    }
}

impl ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Mul(vec![self, rhs.pow(Expr::Number(-1.0))])
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Mul(vec![Expr::Number(-1.0), self])
    }
}

/// Named constants recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number.
    E,
}

impl Constant {
    /// Returns the numeric value of the constant.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    /// Returns the name used when rendering the constant.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "E",
        }
    }
}

/// Elementary functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    /// Natural logarithm; `ln` parses to this as well.
    Log,
    Sqrt,
    Abs,
}

impl Func {
    /// Every supported function.
    pub const ALL: [Func; 13] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Asin,
        Func::Acos,
        Func::Atan,
        Func::Sinh,
        Func::Cosh,
        Func::Tanh,
        Func::Exp,
        Func::Log,
        Func::Sqrt,
        Func::Abs,
    ];

    /// Returns the canonical name of the function.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "ln" {
            return Some(Self::Log);
        }
        Self::ALL.into_iter().find(|func| func.name() == name)
    }

    /// Applies the function to a real argument.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Domain`] if `arg` is outside the real domain of
    /// the function, or [`EvalError::NonFinite`] if the result overflows.
    pub fn apply(self, arg: f64) -> Result<f64, EvalError> {
        let in_domain = match self {
            Self::Log => arg > 0.0,
            Self::Sqrt => arg >= 0.0,
            Self::Asin | Self::Acos => (-1.0..=1.0).contains(&arg),
            _ => true,
        };
        if !in_domain {
            return Err(EvalError::Domain { func: self, arg });
        }

        let value = match self {
            Self::Sin => arg.sin(),
            Self::Cos => arg.cos(),
            Self::Tan => arg.tan(),
            Self::Asin => arg.asin(),
            Self::Acos => arg.acos(),
            Self::Atan => arg.atan(),
            Self::Sinh => arg.sinh(),
            Self::Cosh => arg.cosh(),
            Self::Tanh => arg.tanh(),
            Self::Exp => arg.exp(),
            Self::Log => arg.ln(),
            Self::Sqrt => arg.sqrt(),
            Self::Abs => arg.abs(),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn operators_build_canonical_shapes() {
        assert_eq!(
            x() - Expr::number(2.0),
            Expr::Add(vec![
                x(),
                Expr::Mul(vec![Expr::Number(-1.0), Expr::Number(2.0)])
            ])
        );
        assert_eq!(
            x() / Expr::number(2.0),
            Expr::Mul(vec![x(), Expr::number(2.0).pow(Expr::Number(-1.0))])
        );
    }

    #[test]
    fn free_symbols_collects_every_name() {
        let expr = Expr::symbol("a") * x().pow(Expr::symbol("b")) + Expr::func(Func::Sin, x());
        let names: Vec<_> = expr.free_symbols().into_iter().collect();
        assert_eq!(names, ["a", "b", "x"]);
        assert!(expr.depends_on("b"));
        assert!(!expr.depends_on("y"));
    }

    #[test]
    fn constants_have_no_free_symbols() {
        let expr = Expr::Constant(Constant::Pi) * Expr::number(2.0);
        assert!(expr.free_symbols().is_empty());
    }

    #[test]
    fn func_lookup_accepts_ln_alias() {
        assert_eq!(Func::from_name("ln"), Some(Func::Log));
        assert_eq!(Func::from_name("sqrt"), Some(Func::Sqrt));
        assert_eq!(Func::from_name("gamma"), None);
    }

    #[test]
    fn func_apply_checks_real_domain() {
        assert_eq!(
            Func::Log.apply(0.0),
            Err(EvalError::Domain {
                func: Func::Log,
                arg: 0.0
            })
        );
        assert!(matches!(Func::Sqrt.apply(-1.0), Err(EvalError::Domain { .. })));
        assert!(matches!(Func::Acos.apply(1.5), Err(EvalError::Domain { .. })));
        assert_eq!(Func::Exp.apply(1000.0), Err(EvalError::NonFinite));
        assert_eq!(Func::Sqrt.apply(9.0), Ok(3.0));
    }
}
