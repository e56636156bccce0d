use num::{Complex, One, Zero};

use crate::{
    roots,
    scalar::SafeConstants,
    util::{self, complex::c_is_finite, doc_macros::errors_no_converge},
    Poly, RealScalar,
};

/// Find all roots using Aberth Ehrlich method.
///
/// # Caveats
/// This method performs poorly around zero roots, so you should remove them
/// first (zero roots are trivial to factor out). Convergence is only linear
/// around roots with multiplicity, so a looser `epsilon` is recommended for
/// those.
///
/// `epsilon` bounds the squared norm of the last correction applied to every
/// root.
///
/// # Errors
#[doc = errors_no_converge!()]
///
/// # Panics
/// If the number of provided guesses is wrong, there must be exactly one guess
/// per root, i.e. as many guesses as the degree of the polynomial.
pub fn aberth_ehrlich<T: RealScalar>(
    poly: &mut Poly<T>,
    epsilon: Option<T>,
    max_iter: Option<usize>,
    initial_guesses: &[Complex<T>],
) -> roots::Result<T> {
    debug_assert!(poly.is_normalized());
    assert_eq!(
        initial_guesses.len(),
        poly.degree_raw(),
        "exactly one initial guess per root is required"
    );

    let n = poly.degree_raw();
    let epsilon = epsilon.unwrap_or_else(T::tiny_safe);

    if n == 0 {
        return Ok(vec![]);
    }

    poly.make_monic();
    let p_diff = poly.diff();

    let mut points = initial_guesses.to_vec();
    let mut alphas_buff = vec![Complex::<T>::zero(); n];
    let mut betas_buff = vec![Complex::<T>::zero(); n];

    for i in util::iterator::saturating_counter() {
        if max_iter.is_some_and(|max| i >= max) {
            return Err(roots::Error::NoConverge {
                max_iter: i,
                best: points,
            });
        }

        alphas(poly, &p_diff, &points, &mut alphas_buff);
        betas(&points, &mut betas_buff);

        // alphas become deltas in-place
        for (a, b) in alphas_buff.iter_mut().zip(betas_buff.iter()) {
            *a = *a / (Complex::<T>::one() - *a * b);
        }
        let deltas_buff = &alphas_buff;

        if !deltas_buff.iter().all(c_is_finite) {
            // a guess landed on a critical point or two guesses collided,
            // the current points are the best we have
            log::debug!("non-finite correction at iteration {i}");
            return Err(roots::Error::NoConverge {
                max_iter: i,
                best: points,
            });
        }

        for (y, d) in points.iter_mut().zip(deltas_buff.iter()) {
            *y = *y - d;
        }

        log::trace!("{points:?}");

        // stopping criteria
        if deltas_buff.iter().all(|d| d.norm_sqr() <= epsilon) {
            log::debug!("aberth-ehrlich converged after {} iterations", i + 1);
            return Ok(points);
        }
    }
    unreachable!("saturating_counter never ends");
}

/// Alpha coefficients of the Aberth-Ehrlich method, the Newton correction
/// `p(z) / p'(z)` at every point.
///
/// Needs `points.len() == out.len()`.
fn alphas<T: RealScalar>(
    poly: &Poly<T>,
    p_diff: &Poly<T>,
    points: &[Complex<T>],
    out: &mut [Complex<T>],
) {
    debug_assert_eq!(points.len(), out.len());

    poly.eval_multiple(points, out);
    for (y, x) in out.iter_mut().zip(points) {
        if y.is_zero() {
            // already a root, avoid 0 / 0 at multiple roots
            continue;
        }
        *y = *y / p_diff.eval(*x);
    }
}

/// Beta coefficients of the Aberth-Ehrlich method
///
/// Needs `points.len() == out.len()`.
fn betas<T: RealScalar>(points: &[Complex<T>], out: &mut [Complex<T>]) {
    debug_assert_eq!(points.len(), out.len());

    let n = points.len();
    out.fill(Complex::zero());
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            out[i] = out[i] + Complex::<T>::one() / (points[i] - points[j]);
        }
    }
}
