use num::{Complex, Zero};

use crate::{
    scalar::SafeConstants,
    util::{
        casting::f64_to_scalar,
        complex::complex_sort_mut,
        doc_macros::{errors_degenerate, errors_no_converge},
    },
    Poly, RealScalar,
};

mod aberth_ehrlich;
pub use aberth_ehrlich::aberth_ehrlich;
mod initial_guess;
pub use initial_guess::{initial_guesses_circle, lower_bound, upper_bound};

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error<T> {
    #[error("root finder did not converge within {max_iter} iterations")]
    NoConverge { max_iter: usize, best: T },

    #[error("cannot find the roots of the zero polynomial")]
    Degenerate,

    #[error("unexpected error while running root finder")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<Vec<Complex<T>>, Error<Vec<Complex<T>>>>;

/// Extension trait for root finder results.
pub trait RootsResultExt<T> {
    /// Get roots even if the root finder ran out of iterations. Other errors
    /// are passed through.
    ///
    /// # Errors
    /// Any error other than `NoConverge`.
    fn ignore_no_converge(self) -> std::result::Result<Vec<Complex<T>>, crate::Error>;
}

impl<T: RealScalar> RootsResultExt<T> for Result<T> {
    fn ignore_no_converge(self) -> std::result::Result<Vec<Complex<T>>, crate::Error> {
        match self {
            Ok(roots) => Ok(roots),
            Err(Error::NoConverge { max_iter, best }) => {
                log::debug!("using best guess after {max_iter} iterations: {best:?}");
                Ok(best)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<T: RealScalar> Poly<T> {
    /// A convenient way of finding roots, with a pre-configured root finder.
    /// Should work well for most real polynomials of low degree.
    ///
    /// Returns exactly [`Poly::degree`] roots, repeated roots are repeated in
    /// the output. Roots are sorted by real part, then by imaginary part.
    ///
    /// ```
    /// use root_locus::{poly, Poly64};
    ///
    /// let p: Poly64 = poly![1.0, 5.0, 6.0];
    /// let roots = p.roots(1E-14, 100).unwrap();
    /// assert_eq!(roots.len(), 2);
    /// assert!((roots[0].re + 3.0).abs() < 1E-12);
    /// assert!((roots[1].re + 2.0).abs() < 1E-12);
    /// ```
    ///
    /// # Errors
    #[doc = errors_degenerate!()]
    #[doc = errors_no_converge!()]
    pub fn roots(&self, epsilon: T, max_iter: usize) -> Result<T> {
        debug_assert!(self.is_normalized());

        if self.is_zero() {
            return Err(Error::Degenerate);
        }

        let mut this = self.clone();

        let mut roots: Vec<Complex<T>> = this.zero_roots();

        match this.degree_raw() {
            0 => {}
            1 => roots.extend(this.linear_roots()),
            2 => roots.extend(this.quadratic_roots()),
            _ => {
                this.make_monic();
                let mut guesses = vec![Complex::<T>::zero(); this.degree_raw()];
                initial_guesses_circle(
                    &this,
                    f64_to_scalar(0.5),
                    1,
                    f64_to_scalar(0.5),
                    &mut guesses,
                );
                match aberth_ehrlich(&mut this, Some(epsilon), Some(max_iter), &guesses) {
                    Ok(found) => roots.extend(found),
                    Err(Error::NoConverge { max_iter, best }) => {
                        roots.extend(best);
                        return Err(Error::NoConverge {
                            max_iter,
                            best: finish_roots(roots),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        debug_assert_eq!(roots.len(), self.degree_raw());
        Ok(finish_roots(roots))
    }
}

/// Snap numerically real roots onto the real axis and sort
fn finish_roots<T: RealScalar>(mut roots: Vec<Complex<T>>) -> Vec<Complex<T>> {
    for z in &mut roots {
        if z.im.abs() <= T::small_safe() * z.re.abs().max(T::one()) {
            z.im = T::zero();
        }
    }
    complex_sort_mut(roots.as_mut_slice());
    roots
}

// private
impl<T: RealScalar> Poly<T> {
    /// Factor out roots at zero, which are trivial to find and slow down the
    /// iterative root finders.
    fn zero_roots(&mut self) -> Vec<Complex<T>> {
        debug_assert!(self.is_normalized());

        let n = self.0.iter().rev().take_while(|c| c.is_zero()).count();
        // never strip the whole polynomial, that is only possible for zero
        let n = n.min(self.degree_raw());
        *self = self.shift_down(n);
        vec![Complex::zero(); n]
    }

    fn linear_roots(&mut self) -> Vec<Complex<T>> {
        debug_assert!(self.is_normalized());
        debug_assert_eq!(self.degree_raw(), 1);

        let a = self.0[0];
        let b = self.0[1];

        // we found all the roots
        *self = Self::constant(T::one());

        vec![Complex::from(-b / a)]
    }

    /// Quadratic formula
    fn quadratic_roots(&mut self) -> Vec<Complex<T>> {
        debug_assert!(self.is_normalized());
        debug_assert_eq!(self.degree_raw(), 2);

        let a = self.0[0];
        let b = self.0[1];
        let c = self.0[2];
        let two = T::one() + T::one();
        let four = two * two;

        // we found all the roots
        *self = Self::constant(T::one());

        let discriminant = b * b - four * a * c;
        if discriminant < T::zero() {
            let re = -b / (two * a);
            let im = (-discriminant).sqrt() / (two * a).abs();
            return vec![Complex::new(re, im), Complex::new(re, -im)];
        }

        // avoid cancellation between b and the square root by never
        // subtracting quantities of equal sign
        let q = -(b + b.signum() * discriminant.sqrt()) / two;
        if q.is_zero() {
            // only possible when b == 0 and c == 0, which zero_roots removed
            return vec![Complex::zero(), Complex::zero()];
        }
        vec![Complex::from(q / a), Complex::from(c / q)]
    }
}

#[cfg(test)]
mod test {
    use num::Complex;

    use crate::{util::__testing::check_roots, Poly64};

    use super::{Error, RootsResultExt};

    #[test]
    fn linear() {
        let roots = poly![2.0, 4.0].roots(1E-14, 100).unwrap();
        assert_eq!(roots, vec![Complex::new(-2.0, 0.0)]);
    }

    #[test]
    fn quadratic_real() {
        let roots = poly![1.0, 5.0, 6.0].roots(1E-14, 100).unwrap();
        assert_eq!(roots, vec![Complex::new(-3.0, 0.0), Complex::new(-2.0, 0.0)]);
    }

    #[test]
    fn quadratic_complex() {
        let roots = poly![1.0, 1.0, 1.0].roots(1E-14, 100).unwrap();
        let expected = vec![
            Complex::new(-0.5, -0.75_f64.sqrt()),
            Complex::new(-0.5, 0.75_f64.sqrt()),
        ];
        assert!(check_roots(roots, expected, 1E-12));
    }

    #[test]
    fn zero_roots_are_factored_out() {
        let roots = poly![1.0, 3.0, 2.0, 0.0, 0.0].roots(1E-14, 100).unwrap();
        let expected = vec![
            Complex::new(-2.0, 0.0),
            Complex::new(-1.0, 0.0),
            Complex::new(0.0, 0.0),
            Complex::new(0.0, 0.0),
        ];
        assert!(check_roots(roots, expected, 1E-12));
    }

    #[test]
    fn cubic() {
        let expected = vec![
            Complex::new(-1.0, 0.0),
            Complex::new(-2.0, 1.0),
            Complex::new(-2.0, -1.0),
        ];
        let p = Poly64::from_roots(&expected);
        let roots = p.roots(1E-14, 500).unwrap();
        assert_eq!(roots.len(), 3);
        assert!(check_roots(roots, expected, 1E-9));
    }

    #[test]
    fn constant_has_no_roots() {
        assert!(poly![4.0].roots(1E-14, 100).unwrap().is_empty());
    }

    #[test]
    fn zero_polynomial_is_degenerate() {
        assert!(matches!(poly![0.0].roots(1E-14, 100), Err(Error::Degenerate)));
        assert!(poly![0.0].roots(1E-14, 100).ignore_no_converge().is_err());
    }

    #[test]
    fn ignore_no_converge_keeps_best_guess() {
        let p = Poly64::from_roots(&[
            Complex::new(1.0, 0.0),
            Complex::new(2.0, 0.0),
            Complex::new(3.0, 0.0),
            Complex::new(4.0, 0.0),
        ]);
        // a single iteration is never enough
        let res = p.roots(1E-30, 1);
        assert!(matches!(res, Err(Error::NoConverge { .. })));
        let roots = p.roots(1E-30, 1).ignore_no_converge().unwrap();
        assert_eq!(roots.len(), 4);
    }
}
