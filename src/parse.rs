//! Structured parsing of polynomial expressions and complex points.
//!
//! Polynomials are written as algebraic expressions in one variable, e.g.
//! `s**2 - 4*s + 13`, `(s + 2)(s + 3)` or `2.5s^3 - s / 4`. The grammar is
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/' | <implicit>) unary)*
//! unary  := ('+' | '-') unary | power
//! power  := base (('^' | '**') UINT)?
//! base   := NUMBER | VAR | '(' expr ')'
//! ```
//!
//! Implicit multiplication applies when a variable or an opening parenthesis
//! follows another factor (`3s`, `2(s + 1)`). Division is only allowed by
//! non-zero constants. Complex points reuse the same grammar with the
//! imaginary unit `j` or `i` as the variable, so `7+9j`, `7 + 9*i` and
//! `(7+9j)` are all accepted.

use std::str::FromStr;

use itertools::Itertools;
use num::Complex;

use crate::{util::casting::f64_to_scalar, Error, Poly, RealScalar, Result};

/// Highest exponent accepted after `^` or `**`
const MAX_EXPONENT: u32 = 64;

/// Highest degree of any intermediate polynomial
const MAX_DEGREE: usize = 64;

/// Deepest nesting of parentheses and unary signs
const MAX_DEPTH: usize = 64;

#[derive(Clone, Debug, PartialEq)]
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

/// Which identifiers are accepted as the variable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VarRule {
    /// Any single identifier, fixed by its first occurrence
    Any,
    /// The imaginary unit, `i` or `j`
    ImaginaryUnit,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let chars = input.char_indices().collect_vec();
    let mut tokens = vec![];
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
            }
            '+' => {
                tokens.push((pos, Token::Plus));
                i += 1;
            }
            '-' => {
                tokens.push((pos, Token::Minus));
                i += 1;
            }
            '*' => {
                if chars.get(i + 1).is_some_and(|(_, c)| *c == '*') {
                    tokens.push((pos, Token::Caret));
                    i += 2;
                } else {
                    tokens.push((pos, Token::Star));
                    i += 1;
                }
            }
            '/' => {
                tokens.push((pos, Token::Slash));
                i += 1;
            }
            '^' => {
                tokens.push((pos, Token::Caret));
                i += 1;
            }
            '(' => {
                tokens.push((pos, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((pos, Token::RParen));
                i += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                    i += 1;
                }
                // exponent, only if digits follow so that `2e` stays `2 * e`
                if i < chars.len() && matches!(chars[i].1, 'e' | 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && matches!(chars[j].1, '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].1.is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].1.is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                let value = text.parse::<f64>().map_err(|_| {
                    Error::invalid_expression(input, pos, format!("malformed number {text:?}"))
                })?;
                tokens.push((pos, Token::Number(value)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_alphanumeric() || chars[i].1 == '_') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                tokens.push((pos, Token::Ident(text)));
            }
            other => {
                return Err(Error::invalid_expression(
                    input,
                    pos,
                    format!("unexpected character {other:?}"),
                ));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(usize, Token)>,
    cursor: usize,
    rule: VarRule,
    variable: Option<String>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, rule: VarRule) -> Result<Self> {
        Ok(Self {
            input,
            tokens: tokenize(input)?,
            cursor: 0,
            rule,
            variable: None,
            depth: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(_, t)| t)
    }

    /// Position of the next token, or the end of the input
    fn position(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map_or(self.input.len(), |(p, _)| *p)
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::invalid_expression(self.input, self.position(), reason)
    }

    /// Enter one more level of nesting, undone by `ascend`
    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!(
                "expression nested more than {MAX_DEPTH} levels deep"
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn check_degree(&self, degree: usize, position: usize) -> Result<()> {
        if degree > MAX_DEGREE {
            return Err(Error::invalid_expression(
                self.input,
                position,
                format!("degree {degree} is above the maximum of {MAX_DEGREE}"),
            ));
        }
        Ok(())
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.cursor).map(|(_, t)| t.clone());
        self.cursor += 1;
        t
    }

    fn parse<T: RealScalar>(mut self) -> Result<Poly<T>> {
        if self.tokens.is_empty() {
            return Err(self.error("empty expression"));
        }
        let p = self.expr()?;
        if self.peek().is_some() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(p)
    }

    fn expr<T: RealScalar>(&mut self) -> Result<Poly<T>> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    acc = acc + self.term()?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    acc = acc - self.term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn term<T: RealScalar>(&mut self) -> Result<Poly<T>> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    let position = self.position();
                    let rhs = self.unary()?;
                    self.check_degree(acc.degree() + rhs.degree(), position)?;
                    acc = acc * rhs;
                }
                Some(Token::Slash) => {
                    self.bump();
                    let position = self.position();
                    let divisor: Poly<T> = self.unary()?;
                    if divisor.degree() > 0 {
                        return Err(Error::invalid_expression(
                            self.input,
                            position,
                            "can only divide by a constant",
                        ));
                    }
                    if divisor.is_zero() {
                        return Err(Error::invalid_expression(
                            self.input,
                            position,
                            "division by zero",
                        ));
                    }
                    acc = acc.scaled(divisor.leading().recip());
                }
                Some(Token::Ident(_) | Token::LParen) => {
                    let position = self.position();
                    let rhs = self.unary()?;
                    self.check_degree(acc.degree() + rhs.degree(), position)?;
                    acc = acc * rhs;
                }
                Some(Token::Number(_)) => {
                    return Err(self.error("expected an operator before this number"));
                }
                _ => return Ok(acc),
            }
        }
    }

    fn unary<T: RealScalar>(&mut self) -> Result<Poly<T>> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                self.descend()?;
                let inner = self.unary()?;
                self.ascend();
                Ok(-inner)
            }
            Some(Token::Plus) => {
                self.bump();
                self.descend()?;
                let inner = self.unary()?;
                self.ascend();
                Ok(inner)
            }
            _ => self.power(),
        }
    }

    fn power<T: RealScalar>(&mut self) -> Result<Poly<T>> {
        let base = self.base()?;
        if self.peek() != Some(&Token::Caret) {
            return Ok(base);
        }
        self.bump();
        let position = self.position();
        match self.bump() {
            Some(Token::Number(e)) if e.fract() == 0.0 && (0.0..=f64::from(MAX_EXPONENT)).contains(&e) => {
                // checked above to be a small non-negative integer
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let e = e as u32;
                let exponent = usize::try_from(e).unwrap_or(usize::MAX);
                self.check_degree(base.degree().saturating_mul(exponent), position)?;
                Ok(base.pow(e))
            }
            _ => Err(Error::invalid_expression(
                self.input,
                position,
                format!("exponent must be an integer between 0 and {MAX_EXPONENT}"),
            )),
        }
    }

    fn base<T: RealScalar>(&mut self) -> Result<Poly<T>> {
        let position = self.position();
        match self.bump() {
            Some(Token::Number(x)) => Ok(Poly::constant(f64_to_scalar(x))),
            Some(Token::Ident(name)) => {
                self.check_variable(&name, position)?;
                Ok(Poly::variable())
            }
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.expr()?;
                self.ascend();
                if self.bump() != Some(Token::RParen) {
                    return Err(Error::invalid_expression(
                        self.input,
                        position,
                        "unclosed parenthesis",
                    ));
                }
                Ok(inner)
            }
            Some(_) => Err(Error::invalid_expression(
                self.input,
                position,
                "expected a number, a variable or '('",
            )),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    fn check_variable(&mut self, name: &str, position: usize) -> Result<()> {
        match self.rule {
            VarRule::ImaginaryUnit => {
                if name == "j" || name == "i" {
                    Ok(())
                } else {
                    Err(Error::invalid_expression(
                        self.input,
                        position,
                        format!("expected the imaginary unit 'j' or 'i', found {name:?}"),
                    ))
                }
            }
            VarRule::Any => match &self.variable {
                Some(v) if v != name => Err(Error::invalid_expression(
                    self.input,
                    position,
                    format!("expected a single variable {v:?}, found {name:?}"),
                )),
                Some(_) => Ok(()),
                None => {
                    self.variable = Some(name.to_owned());
                    Ok(())
                }
            },
        }
    }
}

/// Parse a polynomial expression in a single variable.
///
/// # Errors
/// `InvalidExpression` with the byte position of the offending token.
pub fn parse_poly<T: RealScalar>(input: &str) -> Result<Poly<T>> {
    Parser::new(input, VarRule::Any)?.parse()
}

/// Parse a complex number such as `7+9j`, `7 - 9*i`, `-2j` or `3`.
///
/// ```
/// use root_locus::parse_complex;
/// use num::Complex;
///
/// assert_eq!(parse_complex::<f64>("7+9j").unwrap(), Complex::new(7.0, 9.0));
/// assert_eq!(parse_complex::<f64>("(7 - 9*i)").unwrap(), Complex::new(7.0, -9.0));
/// ```
///
/// # Errors
/// `InvalidExpression` when the text is not a complex number.
pub fn parse_complex<T: RealScalar>(input: &str) -> Result<Complex<T>> {
    let p: Poly<T> = Parser::new(input, VarRule::ImaginaryUnit)?.parse()?;
    // powers of the imaginary unit cycle through 1, j, -1, -j
    let mut z = Complex::new(T::zero(), T::zero());
    for k in 0..=p.degree() {
        let c = p.coeff_of_degree(k);
        z = z + match k % 4 {
            0 => Complex::new(c, T::zero()),
            1 => Complex::new(T::zero(), c),
            2 => Complex::new(-c, T::zero()),
            _ => Complex::new(T::zero(), -c),
        };
    }
    Ok(z)
}

impl<T: RealScalar> FromStr for Poly<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_poly(s)
    }
}

#[cfg(test)]
mod test {
    use num::Complex;

    use super::{parse_complex, parse_poly};
    use crate::{Error, Poly64};

    fn p(s: &str) -> Poly64 {
        s.parse().unwrap()
    }

    #[test]
    fn python_style() {
        assert_eq!(p("s**2 - 4*s + 13"), poly![1.0, -4.0, 13.0]);
        assert_eq!(p("2 * s + 4"), poly![2.0, 4.0]);
        assert_eq!(p("s**2 + 3 * s + 6"), poly![1.0, 3.0, 6.0]);
    }

    #[test]
    fn products_and_powers() {
        assert_eq!(p("(s+2)*(s+3)"), poly![1.0, 5.0, 6.0]);
        assert_eq!(p("(s+2)(s+3)"), poly![1.0, 5.0, 6.0]);
        assert_eq!(p("s(s+1)(s+2)"), poly![1.0, 3.0, 2.0, 0.0]);
        assert_eq!(p("(s+1)^3"), poly![1.0, 3.0, 3.0, 1.0]);
        assert_eq!(p("3s^2"), poly![3.0, 0.0, 0.0]);
    }

    #[test]
    fn signs_and_constants() {
        assert_eq!(p("-s^2"), poly![-1.0, 0.0, 0.0]);
        assert_eq!(p("-(s - 1)"), poly![-1.0, 1.0]);
        assert_eq!(p("1"), poly![1.0]);
        assert_eq!(p("+2.5e1"), poly![25.0]);
        assert_eq!(p("s/4 + 1"), poly![0.25, 1.0]);
    }

    #[test]
    fn any_single_variable() {
        assert_eq!(p("x^2 + 1"), poly![1.0, 0.0, 1.0]);
        assert!(matches!(
            parse_poly::<f64>("s + x"),
            Err(Error::InvalidExpression { position: 4, .. })
        ));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "s +", "(s + 1", "s ^ 1.5", "s ^ -1", "2 3", "s / s", "s / 0", "s $ 1", "1..2"] {
            assert!(
                matches!(parse_poly::<f64>(bad), Err(Error::InvalidExpression { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn nesting_is_limited() {
        assert_eq!(p("((((s))))"), poly![1.0, 0.0]);
        assert_eq!(p("--s"), poly![1.0, 0.0]);
        let deep = format!("{}s{}", "(".repeat(1000), ")".repeat(1000));
        assert!(matches!(
            parse_poly::<f64>(&deep),
            Err(Error::InvalidExpression { .. })
        ));
        let signs = format!("{}s", "-".repeat(10_000));
        assert!(matches!(
            parse_poly::<f64>(&signs),
            Err(Error::InvalidExpression { .. })
        ));
    }

    #[test]
    fn degree_is_limited() {
        assert_eq!(p("s^64").degree(), 64);
        assert_eq!(p("(s^32)^2").degree(), 64);
        for bad in ["((s^64)^64)^64", "s^40 * s^40", "s^40 s^30", "(s + 1)^33 (s + 1)^32"] {
            assert!(
                matches!(parse_poly::<f64>(bad), Err(Error::InvalidExpression { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn never_executes_code() {
        assert!(parse_poly::<f64>("__import__('os').system('ls')").is_err());
    }

    #[test]
    fn complex_points() {
        let c = |s: &str| parse_complex::<f64>(s).unwrap();
        assert_eq!(c("7+9j"), Complex::new(7.0, 9.0));
        assert_eq!(c("7+9*i"), Complex::new(7.0, 9.0));
        assert_eq!(c("7 - 9j"), Complex::new(7.0, -9.0));
        assert_eq!(c("-2j"), Complex::new(0.0, -2.0));
        assert_eq!(c("j"), Complex::new(0.0, 1.0));
        assert_eq!(c("3"), Complex::new(3.0, 0.0));
        assert_eq!(c("(1.5+0.5j)"), Complex::new(1.5, 0.5));
        assert_eq!(c("1e-3j"), Complex::new(0.0, 1E-3));
    }

    #[test]
    fn complex_rejects_other_variables() {
        assert!(parse_complex::<f64>("7+9s").is_err());
        assert!(parse_complex::<f64>("seven").is_err());
    }
}
