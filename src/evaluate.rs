//! Evaluation of a transfer function at a single complex point.
//!
//! The value is computed twice: once in complex arithmetic, once treating
//! every complex number as a real 2-vector and spelling out each product and
//! quotient component by component. The two paths share no arithmetic
//! beyond real `+ - * /`, so their agreement is a cheap sanity check of the
//! result.

use std::{
    fmt::Display,
    ops::{Add, Mul},
};

use num::Complex;

use crate::{
    config::AnalysisConfig,
    scalar::SafeConstants,
    util::{
        casting::scalar_to_f64,
        complex::complex_fmt,
        float::{round_decimals, round_significant},
    },
    Error, Poly, RealScalar, Result, TransferFunction,
};

/// Magnitude and angle of a complex number, the angle in degrees within
/// `(-180, 180]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polar<T> {
    pub magnitude: T,
    pub angle_deg: T,
}

impl<T: RealScalar> Polar<T> {
    #[must_use]
    pub fn from_complex(z: Complex<T>) -> Self {
        let (magnitude, angle) = z.to_polar();
        Self {
            magnitude,
            angle_deg: angle.to_degrees(),
        }
    }

    #[must_use]
    pub fn to_complex(self) -> Complex<T> {
        Complex::from_polar(self.magnitude, self.angle_deg.to_radians())
    }

    /// Round for display: the magnitude to significant digits, the angle to
    /// decimal places.
    #[must_use]
    pub fn rounded(self, magnitude_digits: u32, angle_decimals: u32) -> Self {
        Self {
            magnitude: round_significant(self.magnitude, magnitude_digits),
            angle_deg: round_decimals(self.angle_deg, angle_decimals),
        }
    }
}

impl<T: RealScalar> Display for Polar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ∠ {}°", self.magnitude, self.angle_deg)
    }
}

/// `F(s0)` by both evaluation paths.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation<T> {
    pub point: Complex<T>,
    /// Complex arithmetic
    pub direct: Complex<T>,
    /// Componentwise 2-vector arithmetic
    pub vector: Complex<T>,
    /// Whether `direct` and `vector` agree within the relative tolerance
    pub agree: bool,
    /// Polar form of `direct`, unrounded
    pub polar: Polar<T>,
    /// Polar form rounded for display
    pub polar_display: Polar<T>,
    decimals: usize,
}

impl<T: RealScalar> Evaluation<T> {
    /// Evaluate `tf` at `point` by both paths.
    ///
    /// ```
    /// use num::Complex;
    /// use root_locus::{AnalysisConfig, Evaluation, TransferFunction};
    ///
    /// let tf = TransferFunction::parse("2*s + 4", "s**2 + 3*s + 6").unwrap();
    /// let eval = Evaluation::compute(&tf, Complex::new(7.0, 9.0), &AnalysisConfig::default()).unwrap();
    /// assert!(eval.agree);
    /// assert_eq!(eval.polar_display.magnitude, 0.1663);
    /// assert_eq!(eval.polar_display.angle_deg, -46.9);
    /// ```
    ///
    /// # Errors
    /// `NumericDivision` if the denominator vanishes at `point`.
    pub fn compute(
        tf: &TransferFunction<T>,
        point: Complex<T>,
        config: &AnalysisConfig<T>,
    ) -> Result<Self> {
        let direct = tf.eval(point, config.division_tolerance)?;
        let vector = eval_componentwise(tf.num(), tf.den(), point, config.division_tolerance)?;

        let scale = direct.norm().max(vector.norm()).max(T::tiny_safe());
        let agree = (direct - vector).norm() <= config.agreement_tolerance * scale;
        if !agree {
            log::warn!(
                "evaluation paths disagree at {point}: {direct} (complex) vs {vector} (componentwise)"
            );
        }

        let polar = Polar::from_complex(direct);
        Ok(Self {
            point,
            direct,
            vector,
            agree,
            polar,
            polar_display: polar
                .rounded(config.display.magnitude_digits, config.display.angle_decimals),
            decimals: config.display.decimals,
        })
    }
}

impl<T: RealScalar> Display for Evaluation<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let precision = self.decimals;
        writeln!(f, "F({})", complex_fmt(&self.point, precision))?;
        writeln!(f, "  complex:       {}", complex_fmt(&self.direct, precision))?;
        writeln!(f, "  componentwise: {}", complex_fmt(&self.vector, precision))?;
        writeln!(
            f,
            "  paths {}",
            if self.agree { "agree" } else { "DISAGREE" }
        )?;
        write!(f, "  polar:         {}", self.polar_display)
    }
}

/// A complex number as a real 2-vector `(x, y)`
#[derive(Clone, Copy, Debug, PartialEq)]
struct Vec2<T> {
    x: T,
    y: T,
}

impl<T: RealScalar> Vec2<T> {
    const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    fn norm_sqr(self) -> T {
        self.x * self.x + self.y * self.y
    }
}

impl<T: RealScalar> Add for Vec2<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: RealScalar> Mul for Vec2<T> {
    type Output = Self;

    /// `(a, b)(x, y) = (ax - by, ay + bx)`
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.x * rhs.x - self.y * rhs.y,
            self.x * rhs.y + self.y * rhs.x,
        )
    }
}

/// Horner's method on 2-vectors
fn eval_vec2<T: RealScalar>(poly: &Poly<T>, s: Vec2<T>) -> Vec2<T> {
    poly.coeffs()
        .iter()
        .fold(Vec2::new(T::zero(), T::zero()), |acc, c| {
            acc * s + Vec2::new(*c, T::zero())
        })
}

fn eval_componentwise<T: RealScalar>(
    num: &Poly<T>,
    den: &Poly<T>,
    point: Complex<T>,
    tolerance: T,
) -> Result<Complex<T>> {
    let s = Vec2::new(point.re, point.im);
    let n = eval_vec2(num, s);
    let d = eval_vec2(den, s);

    let d_norm_sqr = d.norm_sqr();
    if d_norm_sqr.sqrt() <= tolerance.max(T::tiny_safe()) || d_norm_sqr.is_zero() {
        return Err(Error::numeric_division(
            "evaluating the transfer function componentwise",
            scalar_to_f64(d_norm_sqr.sqrt()),
        ));
    }
    // (a, b) / (c, d) = ((ac + bd), (bc - ad)) / (c^2 + d^2)
    let x = (n.x * d.x + n.y * d.y) / d_norm_sqr;
    let y = (n.y * d.x - n.x * d.y) / d_norm_sqr;
    Ok(Complex::new(x, y))
}

#[cfg(test)]
mod test {
    use num::complex::Complex64;

    use crate::{AnalysisConfig, Error, Evaluation, TransferFunction64};

    use super::{eval_vec2, Polar, Vec2};

    #[test]
    fn both_paths_agree() {
        let tf = TransferFunction64::parse("2*s + 4", "s**2 + 3*s + 6").unwrap();
        let eval =
            Evaluation::compute(&tf, Complex64::new(7.0, 9.0), &AnalysisConfig::default()).unwrap();
        assert!(eval.agree);
        let expected = Complex64::new(2664.0, -2844.0) / 23434.0;
        assert!((eval.direct - expected).norm() < 1E-14);
        assert!((eval.vector - expected).norm() < 1E-14);
        assert_eq!(eval.polar_display.magnitude, 0.1663);
        assert_eq!(eval.polar_display.angle_deg, -46.9);
    }

    #[test]
    fn vanishing_denominator() {
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 0.0, 1.0]).unwrap();
        assert!(matches!(
            Evaluation::compute(&tf, Complex64::new(0.0, 1.0), &AnalysisConfig::default()),
            Err(Error::NumericDivision { .. })
        ));
    }

    #[test]
    fn polar_round_trip() {
        for z in [
            Complex64::new(3.0, 4.0),
            Complex64::new(-1.0, 0.5),
            Complex64::new(-2.0, -7.0),
            Complex64::new(0.0, -1.0),
        ] {
            let back = Polar::from_complex(z).to_complex();
            assert!((back - z).norm() < 1E-12 * z.norm(), "{z} -> {back}");
        }
        let p = Polar::from_complex(Complex64::new(3.0, 4.0));
        assert_eq!(p.magnitude, 5.0);
        assert!((p.angle_deg - 53.130_102_354).abs() < 1E-8);
    }

    #[test]
    fn vec2_horner() {
        // s^2 + 1 at j
        let v = eval_vec2(&poly![1.0, 0.0, 1.0], Vec2::new(0.0, 1.0));
        assert_eq!(v, Vec2::new(0.0, 0.0));
        // (1 + 2j)(3 - j) = 5 + 5j
        assert_eq!(Vec2::new(1.0, 2.0) * Vec2::new(3.0, -1.0), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn display() {
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 1.0]).unwrap();
        let eval =
            Evaluation::compute(&tf, Complex64::new(0.0, 1.0), &AnalysisConfig::default()).unwrap();
        let text = eval.to_string();
        assert!(text.contains("paths agree"), "{text}");
        assert!(text.contains("0.7071 ∠ -45°"), "{text}");
    }
}
