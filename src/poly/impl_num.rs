#![allow(clippy::op_ref)]

// Implementation of traits related to numeric operations and operators

use itertools::{EitherOrBoth, Itertools};
use std::{
    iter::Sum,
    ops::{Add, Mul, Neg, Sub},
};

use crate::{Poly, RealScalar};

impl<T: RealScalar> Poly<T> {
    /// Raise to a non-negative integer power by repeated multiplication.
    ///
    /// ```
    /// use root_locus::poly;
    ///
    /// assert_eq!(poly![1.0, 1.0].pow(2), poly![1.0, 2.0, 1.0]);
    /// ```
    #[must_use]
    pub fn pow(&self, pow: u32) -> Self {
        // invariant: poly is normalized
        debug_assert!(self.is_normalized());

        if pow == 0 {
            return Self::constant(T::one());
        }

        if pow == 1 || self.is_zero() {
            return self.clone();
        }

        let mut res = self.clone();
        for _ in 2..=pow {
            res = &res * self;
        }
        res
    }

    /// Coefficient-wise combination aligned on the constant term
    fn zip_with(self, rhs: Self, f: impl Fn(EitherOrBoth<T, T>) -> T) -> Self {
        // invariant: polynomials are normalized
        debug_assert!(self.is_normalized());
        debug_assert!(rhs.is_normalized());

        let mut coeffs = self
            .0
            .into_iter()
            .rev()
            .zip_longest(rhs.0.into_iter().rev())
            .map(f)
            .collect_vec();
        coeffs.reverse();
        Self::from_vec(coeffs)
    }
}

impl<T: RealScalar> Add<Self> for Poly<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |p| match p {
            EitherOrBoth::Both(l, r) => l + r,
            EitherOrBoth::Left(l) => l,
            EitherOrBoth::Right(r) => r,
        })
    }
}

impl<T: RealScalar> Add<&Self> for Poly<T> {
    type Output = Self;

    fn add(self, rhs: &Self) -> Self::Output {
        self + rhs.clone()
    }
}

impl<T: RealScalar> Add<Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn add(self, rhs: Poly<T>) -> Self::Output {
        self.clone() + rhs
    }
}

impl<T: RealScalar> Add<&Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn add(self, rhs: &Poly<T>) -> Self::Output {
        self.clone() + rhs.clone()
    }
}

impl<T: RealScalar> Sub<Self> for Poly<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |p| match p {
            EitherOrBoth::Both(l, r) => l - r,
            EitherOrBoth::Left(l) => l,
            EitherOrBoth::Right(r) => -r,
        })
    }
}

impl<T: RealScalar> Sub<&Self> for Poly<T> {
    type Output = Self;

    fn sub(self, rhs: &Self) -> Self::Output {
        self - rhs.clone()
    }
}

impl<T: RealScalar> Sub<Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn sub(self, rhs: Poly<T>) -> Self::Output {
        self.clone() - rhs
    }
}

impl<T: RealScalar> Sub<&Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn sub(self, rhs: &Poly<T>) -> Self::Output {
        self.clone() - rhs.clone()
    }
}

impl<T: RealScalar> Mul<&Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn mul(self, rhs: &Poly<T>) -> Self::Output {
        // invariant: polynomials are normalized
        debug_assert!(self.is_normalized());
        debug_assert!(rhs.is_normalized());

        if self.is_zero() || rhs.is_zero() {
            return Poly::constant(T::zero());
        }

        // full convolution of the two coefficient sequences
        let mut out = vec![T::zero(); self.len_raw() + rhs.len_raw() - 1];
        for (i, a) in self.0.iter().enumerate() {
            for (j, b) in rhs.0.iter().enumerate() {
                out[i + j] = out[i + j] + *a * *b;
            }
        }
        Poly::from_vec(out)
    }
}

impl<T: RealScalar> Mul<Self> for Poly<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl<T: RealScalar> Mul<&Self> for Poly<T> {
    type Output = Self;

    fn mul(self, rhs: &Self) -> Self::Output {
        &self * rhs
    }
}

impl<T: RealScalar> Mul<Poly<T>> for &Poly<T> {
    type Output = Poly<T>;

    fn mul(self, rhs: Poly<T>) -> Self::Output {
        self * &rhs
    }
}

impl<T: RealScalar> Mul<T> for Poly<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        self.scaled(rhs)
    }
}

impl<T: RealScalar> Mul<T> for &Poly<T> {
    type Output = Poly<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.clone().scaled(rhs)
    }
}

impl<T: RealScalar> Neg for Poly<T> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        self.apply(|c| *c = -*c);
        self
    }
}

impl<T: RealScalar> Sum for Poly<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::constant(T::zero()), |acc, x| acc + x)
    }
}
