use crate::{scalar::SafeConstants, Poly, RealScalar};

impl<T: RealScalar> Poly<T> {
    /// Applies a closure to each coefficient in-place
    pub(crate) fn apply(&mut self, f: impl FnMut(&mut T)) {
        self.0.iter_mut().for_each(f);
    }

    /// The length of the polynomial without checking pre-conditions
    pub(crate) fn len_raw(&self) -> usize {
        self.0.len()
    }

    /// The degree of the polynomial without checking pre-conditions
    #[inline]
    pub(crate) fn degree_raw(&self) -> usize {
        self.len_raw().saturating_sub(1)
    }

    /// Scale a polynomial in-place
    pub(crate) fn scale(&mut self, factor: T) {
        self.apply(|z| *z = *z * factor);
    }

    pub(crate) fn is_normalized(&self) -> bool {
        let n = self.len_raw();
        if n == 0 {
            // zero-polynomials are stored as [0]
            return false;
        }
        // a constant is always normalized, as it may be just a constant zero
        if n == 1 {
            return true;
        }
        !self.0[0].is_zero()
    }

    pub(crate) fn normalize(self) -> Self {
        if self.is_normalized() {
            return self;
        }
        let first = self.0.iter().position(|c| !c.is_zero());
        let ret = match first {
            Some(i) => Self(self.0[i..].to_vec()),
            None => Self(vec![T::zero()]),
        };

        // post-condition: polynomial is now normalized
        debug_assert!(ret.is_normalized());
        ret
    }

    /// The constant term
    pub(crate) fn last(&self) -> T {
        self.0[self.len_raw() - 1]
    }

    /// Make the polynomial monic in-place.
    ///
    /// Monic polynomials are scaled such that the leading coefficient is 1,
    /// and the roots are preserved
    pub(crate) fn make_monic(&mut self) {
        debug_assert!(self.is_normalized());
        let leading = self.leading();
        if leading.is_one() || leading.is_zero() {
            return;
        }
        self.apply(|x| *x = *x / leading);
    }

    /// Divide by `s^n`, discarding the `n` lowest degree coefficients
    pub(crate) fn shift_down(&self, n: usize) -> Self {
        let keep = self.len_raw().saturating_sub(n);
        Self::new(&self.0[..keep])
    }

    /// Drop leading coefficients whose magnitude is within `noise(degree)`,
    /// the rounding error expected for the coefficient of that degree.
    pub(crate) fn trim(&mut self, noise: impl Fn(usize) -> T) {
        while self.len_raw() > 1 {
            let lead = self.leading();
            if !lead.is_tiny() && lead.abs() > noise(self.degree_raw()) {
                break;
            }
            self.0.remove(0);
        }
        *self = self.clone().normalize();
    }
}

#[cfg(test)]
mod test {
    use crate::{Poly, Poly64};

    /// This was a bug
    #[test]
    fn normalize0() {
        let p = Poly(vec![0.0_f64]);
        assert_eq!(p.normalize().0.as_slice(), &[0.0]);
    }

    #[test]
    fn is_normalized0() {
        let p = Poly(vec![0.0_f64]);
        assert!(p.is_normalized());
        assert!(!Poly(vec![0.0_f64, 1.0]).is_normalized());
    }

    #[test]
    fn monic() {
        let mut p = poly![2.0, 3.0, 1.0];
        p.make_monic();
        assert_eq!(p, poly![1.0, 1.5, 0.5]);
    }

    #[test]
    fn shift_down() {
        assert_eq!(poly![1.0, 2.0, 0.0, 0.0].shift_down(2), poly![1.0, 2.0]);
        assert!(poly![1.0].shift_down(1).is_zero());
        assert_eq!(Poly64::variable().shift_down(1), poly![1.0]);
    }

    #[test]
    fn trim() {
        let mut p = Poly(vec![1E-40_f64, 1.0, 2.0]);
        p.trim(|_| 0.0);
        assert_eq!(p, poly![1.0, 2.0]);

        // only the degree 2 and 1 coefficients count as noise here
        let mut p = Poly(vec![1E-17_f64, 1E-3, 2.0]);
        p.trim(|degree| if degree > 0 { 1E-2 } else { 0.0 });
        assert_eq!(p, poly![2.0]);

        let mut p = Poly(vec![1E-17_f64, 1.0, 2.0]);
        p.trim(|_| 1E-18);
        assert_eq!(p, Poly(vec![1E-17, 1.0, 2.0]));
    }
}
