//! Rational transfer functions `G(s) = N(s) / D(s)`.

use std::fmt::Display;

use num::Complex;

use crate::{
    config::RootsConfig, roots::RootsResultExt, scalar::SafeConstants,
    util::casting::{scalar_to_f64, usize_to_scalar},
    Error, Poly, RealScalar, Result,
};

/// Open-loop transfer function of a single-input, single-output system.
///
/// Both polynomials are guaranteed to be non-zero. Poles, zeros and the
/// relative degree are derived on demand.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction<T: RealScalar> {
    num: Poly<T>,
    den: Poly<T>,
}

pub type TransferFunction64 = TransferFunction<f64>;

impl<T: RealScalar> TransferFunction<T> {
    /// Build a transfer function from its numerator and denominator.
    ///
    /// ```
    /// use root_locus::{poly, TransferFunction};
    ///
    /// let g = TransferFunction::new(poly![1.0], poly![1.0, 5.0, 6.0]).unwrap();
    /// assert_eq!(g.relative_degree(), 2);
    /// ```
    ///
    /// # Errors
    /// `DegenerateInput` if either polynomial is all zeros.
    pub fn new(num: Poly<T>, den: Poly<T>) -> Result<Self> {
        if den.is_zero() {
            return Err(Error::degenerate("the denominator is the zero polynomial"));
        }
        if num.is_zero() {
            return Err(Error::degenerate("the numerator is the zero polynomial"));
        }
        Ok(Self { num, den })
    }

    /// Build a transfer function from coefficients, highest degree first.
    ///
    /// # Errors
    /// `DegenerateInput` if either coefficient list is all zeros.
    pub fn from_coeffs(num: &[T], den: &[T]) -> Result<Self> {
        Self::new(Poly::new(num), Poly::new(den))
    }

    /// Build a transfer function from two polynomial expressions, such as
    /// `"2*s + 4"` and `"s**2 + 3*s + 6"`.
    ///
    /// # Errors
    /// `InvalidExpression` if either text does not parse, `DegenerateInput`
    /// if either parses to zero.
    pub fn parse(num: &str, den: &str) -> Result<Self> {
        Self::new(num.parse()?, den.parse()?)
    }

    #[must_use]
    pub const fn num(&self) -> &Poly<T> {
        &self.num
    }

    #[must_use]
    pub const fn den(&self) -> &Poly<T> {
        &self.den
    }

    /// `deg(D) - deg(N)`, the number of branches that go to infinity
    #[must_use]
    pub fn relative_degree(&self) -> isize {
        let n = isize::try_from(self.den.degree()).unwrap_or(isize::MAX);
        let m = isize::try_from(self.num.degree()).unwrap_or(isize::MAX);
        n - m
    }

    /// A system is proper when it has at least as many poles as zeros
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.relative_degree() >= 0
    }

    /// Roots of the denominator
    ///
    /// # Errors
    /// Never fails for a valid transfer function unless the root finder
    /// returns an unexpected error; non-converged roots are returned as the
    /// best guess.
    pub fn poles(&self, config: &RootsConfig<T>) -> Result<Vec<Complex<T>>> {
        self.den
            .roots(config.epsilon, config.max_iter)
            .ignore_no_converge()
    }

    /// Roots of the numerator
    ///
    /// # Errors
    /// See [`TransferFunction::poles`].
    pub fn zeros(&self, config: &RootsConfig<T>) -> Result<Vec<Complex<T>>> {
        self.num
            .roots(config.epsilon, config.max_iter)
            .ignore_no_converge()
    }

    /// Closed-loop characteristic polynomial `D(s) + K N(s)`.
    ///
    /// Leading coefficients that cancel down to rounding noise are dropped,
    /// so the degree is lower than `deg(D)` exactly when poles escaped to
    /// infinity. The noise level of each coefficient is a few ulps of the
    /// terms that were summed into it.
    #[must_use]
    pub fn characteristic(&self, gain: T) -> Poly<T> {
        let ulps = usize_to_scalar::<T>(8) * T::epsilon();
        let mut p = &self.den + &self.num * gain;
        p.trim(|degree| {
            ulps * (self.den.coeff_of_degree(degree).abs()
                + gain.abs() * self.num.coeff_of_degree(degree).abs())
        });
        p
    }

    /// Evaluate `N(s) / D(s)`.
    ///
    /// # Errors
    /// `NumericDivision` if `|D(s)|` is below `tolerance`.
    pub fn eval(&self, s: Complex<T>, tolerance: T) -> Result<Complex<T>> {
        let d = self.den.eval(s);
        if d.norm() <= tolerance.max(T::tiny_safe()) {
            return Err(Error::numeric_division(
                "evaluating the transfer function",
                scalar_to_f64(d.norm()),
            ));
        }
        Ok(self.num.eval(s) / d)
    }

    /// Gain that places a closed-loop pole at the real point `sigma`, i.e.
    /// `K = -D(sigma) / N(sigma)`. `None` where `N(sigma)` vanishes.
    #[must_use]
    pub fn gain_at(&self, sigma: T, tolerance: T) -> Option<T> {
        let n = self.num.eval_real(sigma);
        if n.abs() <= tolerance.max(T::tiny_safe()) {
            return None;
        }
        Some(-self.den.eval_real(sigma) / n)
    }
}

impl<T: RealScalar> Display for TransferFunction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) / ({})", self.num, self.den)
    }
}

#[cfg(test)]
mod test {
    use num::Complex;

    use crate::{config::RootsConfig, util::__testing::check_roots, Error, TransferFunction64};

    #[test]
    fn rejects_zero_polynomials() {
        assert!(matches!(
            TransferFunction64::from_coeffs(&[1.0], &[0.0, 0.0]),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            TransferFunction64::from_coeffs(&[0.0], &[1.0, 2.0]),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn poles_and_zeros() {
        let g = TransferFunction64::from_coeffs(&[1.0, 1.0], &[1.0, 5.0, 6.0]).unwrap();
        let config = RootsConfig::default();
        assert!(check_roots(
            g.poles(&config).unwrap(),
            vec![Complex::new(-2.0, 0.0), Complex::new(-3.0, 0.0)],
            1E-12
        ));
        assert!(check_roots(
            g.zeros(&config).unwrap(),
            vec![Complex::new(-1.0, 0.0)],
            1E-12
        ));
        assert_eq!(g.relative_degree(), 1);
        assert!(g.is_proper());
    }

    #[test]
    fn characteristic_polynomial() {
        let g = TransferFunction64::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
        assert_eq!(g.characteristic(0.0), poly![1.0, 5.0, 6.0]);
        assert_eq!(g.characteristic(4.0), poly![1.0, 5.0, 10.0]);
    }

    #[test]
    fn characteristic_drops_cancelled_leading_term() {
        // 0.3 - 3 * 0.1 leaves about -5.6e-17 instead of zero
        let g = TransferFunction64::from_coeffs(&[-0.1, 0.0], &[0.3, 1.0]).unwrap();
        assert_eq!(g.characteristic(3.0), poly![1.0]);
        assert_eq!(g.characteristic(1.0).degree(), 1);
        // a small leading coefficient that is not the result of cancellation is kept
        let g = TransferFunction64::from_coeffs(&[1.0], &[1E-17, 1.0]).unwrap();
        assert_eq!(g.characteristic(1.0).degree(), 1);
    }

    #[test]
    fn parse_and_display() {
        let g = TransferFunction64::parse("2*s + 4", "s**2 + 3*s + 6").unwrap();
        assert_eq!(g.to_string(), "(2s + 4) / (s^2 + 3s + 6)");
    }

    #[test]
    fn eval_near_pole_fails() {
        let g = TransferFunction64::from_coeffs(&[1.0], &[1.0, 2.0]).unwrap();
        assert!(matches!(
            g.eval(Complex::new(-2.0, 0.0), 1E-12),
            Err(Error::NumericDivision { .. })
        ));
        assert_eq!(g.eval(Complex::new(0.0, 0.0), 1E-12).unwrap(), Complex::new(0.5, 0.0));
    }

    #[test]
    fn gain_on_real_axis() {
        let g = TransferFunction64::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
        // -D(-2.5) = -(6.25 - 12.5 + 6) = 0.25
        assert_eq!(g.gain_at(-2.5, 1E-12), Some(0.25));
        let g = TransferFunction64::from_coeffs(&[1.0, 1.0], &[1.0, 5.0, 6.0]).unwrap();
        assert_eq!(g.gain_at(-1.0, 1E-12), None);
    }
}
