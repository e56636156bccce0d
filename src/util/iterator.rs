//! Iterator helpers shared by the iterative solvers and the sampling grids

use crate::{util::casting::usize_to_scalar, RealScalar};

/// An iterator that counts up until it reaches max, at which point it saturates
///
/// This is an endless iterator.
#[inline]
pub fn saturating_counter() -> impl Iterator<Item = usize> {
    (0..usize::MAX).chain(std::iter::repeat(usize::MAX))
}

/// `count` evenly spaced values over the closed interval `[start, stop]`.
///
/// A single point yields `start`, zero points yield nothing.
pub fn linspace<T: RealScalar>(start: T, stop: T, count: usize) -> impl Iterator<Item = T> {
    let intervals = usize_to_scalar::<T>(count.saturating_sub(1).max(1));
    (0..count).map(move |i| {
        if i + 1 == count && count > 1 {
            // land exactly on the end point
            return stop;
        }
        start + (stop - start) * usize_to_scalar::<T>(i) / intervals
    })
}

/// `count` logarithmically spaced values from `start` to `stop`, both positive.
pub fn logspace<T: RealScalar>(start: T, stop: T, count: usize) -> impl Iterator<Item = T> {
    let ten = usize_to_scalar::<T>(10);
    linspace(start.log10(), stop.log10(), count).map(move |e| ten.powf(e))
}
