//! floating point utilities

use crate::{scalar::SafeConstants, util::casting::usize_to_scalar, RealScalar};

/// Makes a degenerate float normal again by either clamping it or replacing
/// NaN with zero.
pub fn f64_make_normal(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }

    if x.is_infinite() {
        return if x.is_sign_positive() { f64::MAX } else { f64::MIN };
    }

    if x.is_subnormal() {
        return 0.0;
    }

    x
}

/// If a float is subnormal or zero, bump it to `MIN_POSITIVE`.
pub fn f64_make_nonzero(x: f64) -> f64 {
    let x = f64_make_normal(x);
    if x.abs() < f64::MIN_POSITIVE {
        f64::MIN_POSITIVE.copysign(x)
    } else {
        x
    }
}

/// If a float's absolute value is smaller than `f64::small_safe()`, bump it
/// up. Zeros are bumped as well, so the result can always be divided by.
pub fn f64_make_safe(x: f64) -> f64 {
    let x = f64_make_normal(x);
    if x.is_small() {
        f64::small_safe().copysign(x)
    } else {
        x
    }
}

/// Round to a number of decimal places.
pub fn round_decimals<T: RealScalar>(x: T, decimals: u32) -> T {
    if !x.is_finite() {
        return x;
    }
    let exponent = i32::try_from(decimals).unwrap_or(i32::MAX);
    let scale = usize_to_scalar::<T>(10).powi(exponent);
    (x * scale).round() / scale
}

/// Round to a number of significant digits, e.g. `12.3456 -> 12.35` for 4.
pub fn round_significant<T: RealScalar>(x: T, digits: u32) -> T {
    if x.is_zero() || !x.is_finite() || digits == 0 {
        return x;
    }
    let magnitude = x.abs().log10().floor();
    let digits = T::from_u32(digits).unwrap_or_else(T::one);
    let ten = T::from_u32(10).unwrap_or_else(T::one);
    let scale = ten.powf(digits - T::one() - magnitude);
    (x * scale).round() / scale
}

#[cfg(test)]
mod test {
    use super::{f64_make_nonzero, f64_make_safe, round_decimals, round_significant};

    #[test]
    fn make_safe() {
        assert!(f64_make_safe(0.0) > 0.0);
        assert!(f64_make_safe(-1E-300) < 0.0);
        assert_eq!(f64_make_safe(2.5), 2.5);
        assert_eq!(f64_make_nonzero(f64::NAN), f64::MIN_POSITIVE);
    }

    #[test]
    fn significant_digits() {
        assert!((round_significant(12.3456_f64, 4) - 12.35).abs() < 1E-12);
        assert!((round_significant(0.001_234_56_f64, 4) - 0.001_235).abs() < 1E-15);
        assert!((round_significant(98_765.0_f64, 2) - 99_000.0).abs() < 1E-9);
        assert_eq!(round_significant(0.0_f64, 4), 0.0);
    }

    #[test]
    fn decimals() {
        assert!((round_decimals(-37.87_f64, 1) - -37.9).abs() < 1E-12);
        assert!((round_decimals(2.04_f64, 0) - 2.0).abs() < 1E-12);
    }
}
