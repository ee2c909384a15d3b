use std::fmt;

use crate::Expr;

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 4;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => f.write_str(&format_number(*value)),
            Expr::Constant(constant) => f.write_str(constant.name()),
            Expr::Symbol(name) => f.write_str(name),
            Expr::Add(terms) => fmt_sum(terms, f),
            Expr::Mul(factors) => fmt_product(factors, f),
            Expr::Pow(_, exponent) if is_negative_number(exponent) => {
                fmt_product(std::slice::from_ref(self), f)
            }
            Expr::Pow(base, exponent) => {
                write!(f, "{}**{}", Wrap(base, PREC_ATOM), Wrap(exponent, PREC_ATOM))
            }
            Expr::Func(func, arg) => write!(f, "{func}({arg})"),
        }
    }
}

/// Renders integers without a fractional part so output reads like `x**2 - 2`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let integer = value as i64;
        integer.to_string()
    } else {
        value.to_string()
    }
}

fn is_negative_number(expr: &Expr) -> bool {
    matches!(expr, Expr::Number(value) if *value < 0.0)
}

/// Binding strength of the expression's outermost rendered operator.
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(value) if *value < 0.0 => PREC_SUM,
        Expr::Number(_) | Expr::Constant(_) | Expr::Symbol(_) | Expr::Func(..) => PREC_ATOM,
        Expr::Add(_) => PREC_SUM,
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Number(value)) if *value < 0.0 => PREC_SUM,
            _ => PREC_PRODUCT,
        },
        Expr::Pow(_, exponent) if is_negative_number(exponent) => PREC_PRODUCT,
        Expr::Pow(..) => PREC_POWER,
    }
}

/// Displays the inner expression, parenthesized if it binds looser than `min`.
struct Wrap<'a>(&'a Expr, u8);

impl fmt::Display for Wrap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if precedence(self.0) < self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn fmt_sum(terms: &[Expr], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if terms.is_empty() {
        return f.write_str("0");
    }

    for (i, term) in terms.iter().enumerate() {
        let (negative, magnitude) = split_sign(term);
        match (i, negative) {
            (0, true) => f.write_str("-")?,
            (0, false) => {}
            (_, true) => f.write_str(" - ")?,
            (_, false) => f.write_str(" + ")?,
        }
        write!(f, "{}", Wrap(&magnitude, PREC_PRODUCT))?;
    }
    Ok(())
}

/// Separates a leading negative sign from a term.
fn split_sign(term: &Expr) -> (bool, Expr) {
    match term {
        Expr::Number(value) if *value < 0.0 => (true, Expr::Number(-value)),
        Expr::Mul(factors) => match factors.split_first() {
            Some((Expr::Number(value), rest)) if *value < 0.0 => {
                let mut magnitude = rest.to_vec();
                #[allow(clippy::float_cmp)]
                if *value != -1.0 || magnitude.is_empty() {
                    magnitude.insert(0, Expr::Number(-value));
                }
                let magnitude = if magnitude.len() == 1 {
                    magnitude.remove(0)
                } else {
                    Expr::Mul(magnitude)
                };
                (true, magnitude)
            }
            _ => (false, term.clone()),
        },
        _ => (false, term.clone()),
    }
}

/// Renders a product as `coefficient*numerator/denominator`.
fn fmt_product(factors: &[Expr], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut coefficient = 1.0;
    let mut numerator: Vec<&Expr> = Vec::new();
    let mut denominator: Vec<Expr> = Vec::new();

    for factor in factors {
        match factor {
            Expr::Number(value) => coefficient *= value,
            Expr::Pow(base, exponent) if is_negative_number(exponent) => {
                let power = -exponent.as_number().unwrap_or(-1.0);
                #[allow(clippy::float_cmp)]
                if power == 1.0 {
                    denominator.push((**base).clone());
                } else {
                    denominator.push((**base).clone().pow(Expr::Number(power)));
                }
            }
            other => numerator.push(other),
        }
    }

    if coefficient < 0.0 {
        f.write_str("-")?;
        coefficient = -coefficient;
    }

    let mut parts: Vec<String> = Vec::with_capacity(numerator.len() + 1);
    #[allow(clippy::float_cmp)]
    if coefficient != 1.0 || numerator.is_empty() {
        parts.push(format_number(coefficient));
    }
    parts.extend(
        numerator
            .iter()
            .map(|factor| Wrap(factor, PREC_PRODUCT).to_string()),
    );
    f.write_str(&parts.join("*"))?;

    match denominator.as_slice() {
        [] => Ok(()),
        [single] => write!(f, "/{}", Wrap(single, PREC_POWER)),
        many => {
            let rendered: Vec<String> = many
                .iter()
                .map(|factor| Wrap(factor, PREC_PRODUCT).to_string())
                .collect();
            write!(f, "/({})", rendered.join("*"))
        }
    }
}
