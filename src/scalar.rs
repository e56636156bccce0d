use std::{
    fmt::{Debug, Display},
    iter::Sum,
};

use num::{traits::FloatConst, Float, FromPrimitive};

/// Real floating point numbers the analysis can be carried out in.
///
/// This is implemented for `f32` and `f64`, and any other type that provides
/// the same numeric traits.
pub trait RealScalar:
    Float + FloatConst + FromPrimitive + Sum + Debug + Display + Send + Sync + 'static
{
}

impl<T> RealScalar for T where
    T: Float + FloatConst + FromPrimitive + Sum + Debug + Display + Send + Sync + 'static
{
}

/// Thresholds below which a value is treated as numerically unusable.
pub trait SafeConstants: RealScalar {
    /// Smallest magnitude that is still safe to divide by.
    fn tiny_safe() -> Self {
        Self::epsilon() * Self::epsilon()
    }

    /// Magnitudes below this are considered noise for tolerances.
    fn small_safe() -> Self {
        Self::epsilon().sqrt()
    }

    fn is_tiny(&self) -> bool {
        self.abs() < Self::tiny_safe()
    }

    fn is_small(&self) -> bool {
        self.abs() < Self::small_safe()
    }
}

impl<T: RealScalar> SafeConstants for T {}

#[cfg(test)]
mod test {
    use super::SafeConstants;

    #[test]
    fn thresholds_are_ordered() {
        assert!(f64::tiny_safe() < f64::small_safe());
        assert!(f32::tiny_safe() < f32::small_safe());
        assert!(1E-40_f64.is_tiny());
        assert!(!1E-3_f64.is_small());
    }
}
