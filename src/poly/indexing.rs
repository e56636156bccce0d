use crate::{Poly, RealScalar};

impl<T: RealScalar> Poly<T> {
    /// Coefficient of the `s^degree` term, zero above the degree of the
    /// polynomial.
    ///
    /// ```
    /// use root_locus::poly;
    ///
    /// let p = poly![1.0, 5.0, 6.0];
    /// assert_eq!(p.coeff_of_degree(0), 6.0);
    /// assert_eq!(p.coeff_of_degree(2), 1.0);
    /// assert_eq!(p.coeff_of_degree(7), 0.0);
    /// ```
    #[must_use]
    pub fn coeff_of_degree(&self, degree: usize) -> T {
        debug_assert!(self.is_normalized());

        if degree > self.degree_raw() {
            return T::zero();
        }
        self.0[self.degree_raw() - degree]
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn coeff_of_degree() {
        let p = poly![1.0, -4.0, 13.0];
        assert_eq!(p.coeff_of_degree(2), 1.0);
        assert_eq!(p.coeff_of_degree(0), 13.0);
        assert_eq!(p.coeff_of_degree(3), 0.0);
        assert_eq!(poly![0.0].coeff_of_degree(0), 0.0);
    }
}
