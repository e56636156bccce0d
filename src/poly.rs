use std::fmt::Display;

use itertools::Itertools;
use num::{Complex, One, Zero};

use crate::{util::complex::complex_sort_mut, RealScalar};

mod base;
mod calculus;
mod impl_num;
mod indexing;
pub mod roots;

/// A polynomial with real coefficients, stored from the highest degree term
/// down to the constant term.
///
/// `Poly::new(&[1.0, 5.0, 6.0])` is `s^2 + 5s + 6`. Polynomials are always
/// normalized: leading zeros are stripped on construction, and only the
/// constant polynomial may have a zero leading coefficient (the zero
/// polynomial is `[0]`).
#[derive(Clone, Debug, PartialEq)]
pub struct Poly<T: RealScalar>(pub(crate) Vec<T>);

impl<T: RealScalar> Poly<T> {
    /// Create a polynomial from coefficients of descending degree.
    ///
    /// ```
    /// use root_locus::Poly64;
    ///
    /// let p = Poly64::new(&[0.0, 0.0, 1.0, 5.0, 6.0]);
    /// assert_eq!(p.coeffs(), &[1.0, 5.0, 6.0]);
    /// assert_eq!(p.degree(), 2);
    /// ```
    #[must_use]
    pub fn new(coeffs: &[T]) -> Self {
        Self(coeffs.to_owned()).normalize()
    }

    #[must_use]
    pub fn from_vec(coeffs: Vec<T>) -> Self {
        Self(coeffs).normalize()
    }

    #[must_use]
    pub fn constant(c: T) -> Self {
        Self(vec![c])
    }

    /// The polynomial `s`
    #[must_use]
    pub fn variable() -> Self {
        Self(vec![T::one(), T::zero()])
    }

    /// Monic polynomial from its roots.
    ///
    /// Complex roots should come in conjugate pairs, as only the real part of
    /// the expanded product is kept.
    ///
    /// ```
    /// use root_locus::{poly, Poly64};
    /// use num::Complex;
    ///
    /// let p = Poly64::from_roots(&[Complex::new(-2.0, 0.0), Complex::new(-3.0, 0.0)]);
    /// assert_eq!(p, poly![1.0, 5.0, 6.0]);
    /// ```
    #[must_use]
    pub fn from_roots(roots: &[Complex<T>]) -> Self {
        let mut roots = roots.to_owned();
        complex_sort_mut(roots.as_mut_slice());

        // expand (s - r0)(s - r1)... in complex arithmetic, highest degree first
        let mut acc: Vec<Complex<T>> = vec![Complex::one()];
        for r in roots {
            let mut next = vec![Complex::zero(); acc.len() + 1];
            for (i, c) in acc.iter().enumerate() {
                next[i] = next[i] + c;
                next[i + 1] = next[i + 1] - c * r;
            }
            acc = next;
        }
        Self::from_vec(acc.into_iter().map(|c| c.re).collect_vec())
    }

    /// Degree of the polynomial. The zero polynomial has degree 0.
    #[must_use]
    pub fn degree(&self) -> usize {
        debug_assert!(self.is_normalized());
        self.degree_raw()
    }

    /// Coefficients, from the highest degree down to the constant term
    #[must_use]
    pub fn coeffs(&self) -> &[T] {
        self.0.as_slice()
    }

    /// Coefficient of the highest degree term
    #[must_use]
    pub fn leading(&self) -> T {
        self.0[0]
    }

    /// Returns true if every coefficient is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        debug_assert!(self.is_normalized());
        self.len_raw() == 1 && self.0[0].is_zero()
    }

    /// Evaluate the polynomial at a complex point.
    ///
    /// ```
    /// use root_locus::poly;
    /// use num::Complex;
    ///
    /// let p = poly![1.0, 0.0, 1.0];
    /// assert_eq!(p.eval(Complex::new(0.0, 1.0)), Complex::new(0.0, 0.0));
    /// ```
    #[must_use]
    pub fn eval(&self, x: Complex<T>) -> Complex<T> {
        // Horner's method, coefficients are already highest degree first
        self.0
            .iter()
            .fold(Complex::zero(), |acc, c| acc * x + Complex::from(*c))
    }

    /// Evaluate the polynomial at a real point.
    #[must_use]
    pub fn eval_real(&self, x: T) -> T {
        self.0.iter().fold(T::zero(), |acc, c| acc * x + *c)
    }

    /// Evaluate at many points at once, `out` must be as long as `points`.
    pub fn eval_multiple(&self, points: &[Complex<T>], out: &mut [Complex<T>]) {
        debug_assert_eq!(points.len(), out.len());
        for (y, x) in out.iter_mut().zip(points) {
            *y = self.eval(*x);
        }
    }

    /// Multiply every coefficient by `factor`
    #[must_use]
    pub fn scaled(mut self, factor: T) -> Self {
        self.scale(factor);
        self.normalize()
    }
}

impl<T: RealScalar> Display for Poly<T> {
    /// Formats as a polynomial in `s`, e.g. `s^2 - 4s + 13`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let n = self.degree_raw();
        let mut first = true;
        for (i, c) in self.0.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            let power = n - i;
            let magnitude = c.abs();
            match (first, c.is_sign_negative()) {
                (true, true) => write!(f, "-")?,
                (true, false) => {}
                (false, true) => write!(f, " - ")?,
                (false, false) => write!(f, " + ")?,
            }
            first = false;
            if power == 0 || !magnitude.is_one() {
                write!(f, "{magnitude}")?;
            }
            match power {
                0 => {}
                1 => write!(f, "s")?,
                _ => write!(f, "s^{power}")?,
            }
        }
        Ok(())
    }
}
