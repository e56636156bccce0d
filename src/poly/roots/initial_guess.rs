use itertools::Itertools;
use num::Complex;

use crate::{
    util::casting::{f64_to_scalar, scalar_to_f64, usize_to_scalar},
    Poly, RealScalar,
};

/// Initial guesses spread evenly on a circle centered at the origin.
///
/// The radius is interpolated between [`lower_bound`] and [`upper_bound`] of
/// the root magnitudes using `bias` in `[0, 1]`. Each guess is then moved
/// by a random amount in angle and radius, scaled by `perturbation` in
/// `[0, 1]`, so that no guess starts exactly on the real axis or on the same
/// circle as the others. The same `seed` always yields the same guesses.
///
/// # Panics
/// If `poly` has degree zero, as it has no roots to guess.
pub fn initial_guesses_circle<T: RealScalar>(
    poly: &Poly<T>,
    bias: T,
    seed: u64,
    perturbation: T,
    out: &mut [Complex<T>],
) {
    assert!(
        poly.degree_raw() >= 1,
        "there are no guesses for a polynomial with no roots"
    );

    let mut rng = fastrand::Rng::with_seed(seed);
    let low = lower_bound(poly);
    let high = upper_bound(poly);
    let radius = low + bias * (high - low);
    let n = usize_to_scalar::<T>(out.len().max(1));
    let sector = T::TAU() / n;
    // start half a sector away from the positive real axis
    let offset = sector / (T::one() + T::one());
    let half = f64_to_scalar::<T>(0.5);

    for (i, y) in out.iter_mut().enumerate() {
        let jitter_angle = f64_to_scalar::<T>(rng.f64()) - half;
        let jitter_radius = f64_to_scalar::<T>(rng.f64()) - half;
        let angle = offset + sector * (usize_to_scalar::<T>(i) + perturbation * jitter_angle);
        let r = radius * (T::one() + perturbation * jitter_radius);
        *y = Complex::from_polar(r, angle);
    }
    log::trace!(
        "initial guesses on radius {:.3e} in [{:.3e}, {:.3e}]",
        scalar_to_f64(radius),
        scalar_to_f64(low),
        scalar_to_f64(high)
    );
}

/// The radius of a disk containing all the roots
///
/// Uses Fujiwara's bound, `2 * max |a_{n-k} / a_n|^(1/k)`, which unlike
/// ratio-based bounds tolerates zero coefficients.
#[must_use]
pub fn upper_bound<T: RealScalar>(poly: &Poly<T>) -> T {
    debug_assert!(
        poly.degree_raw() >= 1,
        "there are no bounds for a polynomial with no roots"
    );

    let n = poly.degree_raw();
    let lead = poly.leading();
    let two = T::one() + T::one();
    let bound = poly
        .coeffs()
        .iter()
        .enumerate()
        .skip(1)
        .map(|(k, c)| {
            let mut ratio = (*c / lead).abs();
            // the constant term enters halved
            if k == n {
                ratio = ratio / two;
            }
            ratio.powf(usize_to_scalar::<T>(k).recip())
        })
        .fold(T::zero(), T::max);
    two * bound
}

/// The radius of a disk containing none of the roots
///
/// This is the reciprocal of the [`upper_bound`] of the reversed polynomial,
/// or zero if the polynomial has a root at zero.
#[must_use]
pub fn lower_bound<T: RealScalar>(poly: &Poly<T>) -> T {
    if poly.last().is_zero() {
        return T::zero();
    }
    let reversed = Poly::from_vec(poly.coeffs().iter().copied().rev().collect_vec());
    let bound = upper_bound(&reversed);
    if bound.is_zero() {
        T::zero()
    } else {
        bound.recip()
    }
}

#[cfg(test)]
mod test {
    use num::{complex::Complex64, Complex, Zero};

    use crate::Poly64;

    use super::{initial_guesses_circle, lower_bound, upper_bound};

    #[test]
    fn bounds_contain_roots() {
        let roots = [
            Complex::new(-0.5, 0.0),
            Complex::new(2.0, 3.0),
            Complex::new(2.0, -3.0),
            Complex::new(-7.0, 0.0),
        ];
        let p = Poly64::from_roots(&roots) * 3.0;
        let high = upper_bound(&p);
        let low = lower_bound(&p);
        for r in roots {
            assert!(r.norm() <= high, "{} > {high}", r.norm());
            assert!(r.norm() >= low, "{} < {low}", r.norm());
        }
    }

    #[test]
    fn bound_with_zero_coefficients() {
        // s^3 + 8, roots of magnitude 2
        let p: Poly64 = poly![1.0, 0.0, 0.0, 8.0];
        assert!(upper_bound(&p).is_finite());
        assert!(upper_bound(&p) >= 2.0);
        assert!(lower_bound(&p) <= 2.0);
    }

    #[test]
    fn guesses_are_distinct_and_reproducible() {
        let p = poly![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut a = [Complex64::zero(); 4];
        let mut b = [Complex64::zero(); 4];
        initial_guesses_circle(&p, 0.5, 1, 0.5, &mut a);
        initial_guesses_circle(&p, 0.5, 1, 0.5, &mut b);
        assert_eq!(a, b);
        for i in 0..4 {
            assert!(a[i].im.abs() > 0.0);
            for j in (i + 1)..4 {
                assert!((a[i] - a[j]).norm() > 0.0);
            }
        }
    }
}
