use crate::{Constant, Expr, Func, ParseError};

/// Parses expression text into an [`Expr`].
///
/// The grammar covers numbers, symbols, the constants `pi` and `E` (or `e`),
/// the functions listed in [`Func`], parentheses, unary `+`/`-`, and the
/// binary operators `+ - * /` plus `^` or `**` for powers. Powers are
/// right-associative and bind tighter than unary minus, so `-x**2` is
/// `-(x**2)`. Multiplication must be explicit.
///
/// The result is not simplified.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut parser = Parser {
        tokens,
        next: 0,
        depth: 0,
    };
    let expr = parser.sum()?;

    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(token.unexpected()),
    }
}

/// Parses an equation `lhs = rhs` into the expression `lhs - (rhs)`.
///
/// Text without `=` is parsed as a plain expression, read as `expr = 0`.
///
/// # Errors
///
/// Returns a [`ParseError`] if either side fails to parse or the text
/// contains more than one `=`.
pub fn parse_equation(text: &str) -> Result<Expr, ParseError> {
    let mut sides = text.split('=');
    let lhs = sides.next().unwrap_or_default();

    match (sides.next(), sides.next()) {
        (None, _) => parse(lhs),
        (Some(rhs), None) => Ok(parse(lhs)? - parse(rhs)?),
        (Some(_), Some(_)) => Err(ParseError::MultipleEquals),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
struct Spanned {
    token: Token,
    pos: usize,
}

impl Spanned {
    fn unexpected(&self) -> ParseError {
        let found = match &self.token {
            Token::Number(value) => value.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Caret => "^".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        };
        ParseError::UnexpectedToken {
            found,
            pos: self.pos,
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];

        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let literal = &text[start..i];
                match literal.parse::<f64>() {
                    Ok(value) if value.is_finite() => Token::Number(value),
                    _ => {
                        return Err(ParseError::InvalidNumber {
                            text: literal.to_owned(),
                            pos: start,
                        });
                    }
                }
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                Token::Ident(text[start..i].to_owned())
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                Token::Caret
            }
            b'+' | b'-' | b'*' | b'/' | b'^' | b'(' | b')' => {
                i += 1;
                match c {
                    b'+' => Token::Plus,
                    b'-' => Token::Minus,
                    b'*' => Token::Star,
                    b'/' => Token::Slash,
                    b'^' => Token::Caret,
                    b'(' => Token::LParen,
                    _ => Token::RParen,
                }
            }
            _ => {
                let ch = text[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(ParseError::UnexpectedChar { ch, pos: start });
            }
        };

        tokens.push(Spanned { token, pos: start });
    }

    Ok(tokens)
}

/// Returns the end of a numeric literal starting at `start`.
///
/// An exponent marker is consumed only when digits follow it, so `2e` stays
/// a number followed by the identifier `e`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    i
}

/// Deepest nesting of parentheses, signs and powers the parser accepts.
///
/// Every later pass over an expression recurses once per level, so this also
/// bounds their stack use.
const MAX_DEPTH: usize = 200;

struct Parser {
    tokens: Vec<Spanned>,
    next: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.next)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|spanned| &spanned.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.next).cloned();
        if spanned.is_some() {
            self.next += 1;
        }
        spanned
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), ParseError> {
        match self.advance() {
            Some(spanned) if spanned.token == *token => Ok(()),
            Some(spanned) => Err(spanned.unexpected()),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    /// sum := product (('+' | '-') product)*
    fn sum(&mut self) -> Result<Expr, ParseError> {
        let mut terms = vec![self.product()?];
        loop {
            match self.peek_token() {
                Some(Token::Plus) => {
                    self.advance();
                    terms.push(self.product()?);
                }
                Some(Token::Minus) => {
                    self.advance();
                    terms.push(-self.product()?);
                }
                _ => break,
            }
        }

        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::Add(terms)
        })
    }

    /// product := unary (('*' | '/') unary)*
    fn product(&mut self) -> Result<Expr, ParseError> {
        let mut factors = vec![self.unary()?];
        loop {
            match self.peek_token() {
                Some(Token::Star) => {
                    self.advance();
                    factors.push(self.unary()?);
                }
                Some(Token::Slash) => {
                    self.advance();
                    factors.push(self.unary()?.pow(Expr::Number(-1.0)));
                }
                _ => break,
            }
        }

        Ok(if factors.len() == 1 {
            factors.remove(0)
        } else {
            Expr::Mul(factors)
        })
    }

    /// unary := ('-' | '+') unary | power
    ///
    /// Every nested operand passes through here, so nesting depth is
    /// tracked on entry.
    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.depth >= MAX_DEPTH {
            let pos = self.peek().or(self.tokens.last()).map_or(0, |spanned| spanned.pos);
            return Err(ParseError::TooDeep { pos });
        }

        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Expr, ParseError> {
        match self.peek_token() {
            Some(Token::Minus) => {
                self.advance();
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    /// power := primary ('^' unary)?
    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.primary()?;
        if self.peek_token() == Some(&Token::Caret) {
            self.advance();
            let exponent = self.unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    /// primary := number | constant | symbol | function '(' sum ')' | '(' sum ')'
    fn primary(&mut self) -> Result<Expr, ParseError> {
        let Some(Spanned { token, pos }) = self.advance() else {
            return Err(ParseError::UnexpectedEnd {
                expected: "an operand",
            });
        };

        match token {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::LParen => {
                let inner = self.sum()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Ident(name) => self.identifier(name, pos),
            other => Err(Spanned { token: other, pos }.unexpected()),
        }
    }

    fn identifier(&mut self, name: String, pos: usize) -> Result<Expr, ParseError> {
        let called = self.peek_token() == Some(&Token::LParen);

        if let Some(func) = Func::from_name(&name) {
            if !called {
                return Err(ParseError::BareFunction { name, pos });
            }
            self.advance();
            let arg = self.sum()?;
            self.expect(&Token::RParen, "')'")?;
            return Ok(Expr::func(func, arg));
        }

        if called {
            return Err(ParseError::UnknownFunction { name, pos });
        }

        Ok(match name.as_str() {
            "pi" => Expr::Constant(Constant::Pi),
            "e" | "E" => Expr::Constant(Constant::E),
            _ => Expr::Symbol(name),
        })
    }
}
