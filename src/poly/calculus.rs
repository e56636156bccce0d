use crate::{util::casting::usize_to_scalar, Poly, RealScalar};

impl<T: RealScalar> Poly<T> {
    /// Derivative
    ///
    /// ```
    /// use root_locus::poly;
    ///
    /// assert_eq!(poly![1.0, 5.0, 6.0].diff(), poly![2.0, 5.0]);
    /// ```
    #[must_use]
    pub fn diff(&self) -> Self {
        debug_assert!(self.is_normalized());

        // derivative of constant is zero
        if self.degree_raw() == 0 {
            return Self::constant(T::zero());
        }

        let n = self.degree_raw();
        let coeffs: Vec<_> = self
            .0
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, c)| *c * usize_to_scalar::<T>(n - i))
            .collect();
        Self::from_vec(coeffs)
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn diff() {
        let p = poly![3.0, 2.0, 1.0];
        assert_eq!(p.diff(), poly![6.0, 2.0]);
    }

    /// This was a bug
    #[test]
    fn diff1() {
        let one = poly![1.0];
        assert_eq!(one.diff().degree(), 0);
        assert!(one.diff().is_zero());
    }

    #[test]
    fn diff_lowers_degree() {
        let p = poly![2.0, 0.0, -3.0, 7.0];
        assert_eq!(p.diff(), poly![6.0, 0.0, -3.0]);
        assert_eq!(p.diff().diff().diff(), poly![12.0]);
    }
}
