use crate::RealScalar;

/// Convert usize to a real scalar, saturating to infinity
pub(crate) fn usize_to_scalar<T: RealScalar>(x: usize) -> T {
    T::from_usize(x).unwrap_or_else(T::infinity)
}

/// Convert an `f64` constant to a real scalar, `NaN` if not representable
pub(crate) fn f64_to_scalar<T: RealScalar>(x: f64) -> T {
    T::from_f64(x).unwrap_or_else(T::nan)
}

/// Convert a real scalar to `f64` for reporting, `NaN` if not representable
pub(crate) fn scalar_to_f64<T: RealScalar>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
