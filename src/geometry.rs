//! Geometric features of the root locus: asymptotes, breakaway points and
//! imaginary axis crossings.
//!
//! Breakaway points and crossings are located by sampling, with the grid
//! density and tolerances taken from [`AnalysisConfig`]. They are
//! approximate by nature: a coarse grid can miss a crossing entirely.

use itertools::Itertools;
use num::Complex;

use crate::{
    config::{AnalysisConfig, SampleGrid},
    roots::RootsResultExt,
    scalar::SafeConstants,
    util::{casting::usize_to_scalar, complex::complex_sort_mut, doc_macros::soft_failure},
    Poly, RealScalar, Result, TransferFunction,
};

/// A sampled frequency at which the open loop response is real, so that a
/// closed loop pole sits on the imaginary axis for some real gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JwCrossing<T> {
    /// `w` of the sample `s = jw`
    pub frequency: T,
    /// `Re G(jw)`
    pub response_real: T,
    /// `K = -1 / Re G(jw)` when that gain is positive
    pub critical_gain: Option<T>,
}

/// One dashed asymptote line, ready to be drawn
#[derive(Clone, Debug, PartialEq)]
pub struct AsymptoteLine<T> {
    /// Radians
    pub angle: T,
    pub points: Vec<(T, T)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeometrySummary<T> {
    pub poles: Vec<Complex<T>>,
    pub zeros: Vec<Complex<T>>,
    pub relative_degree: isize,
    /// Where the asymptotes meet the real axis, `None` without asymptotes
    pub centroid: Option<T>,
    /// Radians, one per asymptote
    pub asymptote_angles: Vec<T>,
    /// Result of the sampled breakaway search
    pub breakaway_points: Vec<T>,
    /// Real roots of `N D' - N' D` on the locus
    pub breakaway_exact: Vec<T>,
    pub crossings: Vec<JwCrossing<T>>,
}

impl<T: RealScalar> GeometrySummary<T> {
    /// Run every geometric analysis on `tf`.
    ///
    /// # Errors
    /// Only if the root finder fails on the poles or zeros for reasons other
    /// than convergence.
    pub fn compute(tf: &TransferFunction<T>, config: &AnalysisConfig<T>) -> Result<Self> {
        let poles = tf.poles(&config.roots)?;
        let zeros = tf.zeros(&config.roots)?;
        let relative_degree = tf.relative_degree();
        let (centroid, asymptote_angles) = match asymptotes(&poles, &zeros, relative_degree) {
            Some((c, angles)) => (Some(c), angles),
            None => (None, vec![]),
        };
        Ok(Self {
            breakaway_points: breakaway_points(tf, config),
            breakaway_exact: breakaway_exact(tf, config)?,
            crossings: jw_crossings(tf, config),
            poles,
            zeros,
            relative_degree,
            centroid,
            asymptote_angles,
        })
    }

    /// Sample the asymptotes as lines `y = tan(angle) (x - centroid)` over
    /// the x values of `grid`. Vertical asymptotes use `grid` for y instead.
    #[must_use]
    pub fn asymptote_lines(&self, grid: &SampleGrid<T>) -> Vec<AsymptoteLine<T>> {
        let Some(centroid) = self.centroid else {
            return vec![];
        };
        self.asymptote_angles
            .iter()
            .map(|&angle| {
                let points = if angle.cos().abs() <= T::small_safe() {
                    grid.points().map(|y| (centroid, y)).collect_vec()
                } else {
                    let slope = angle.tan();
                    grid.points()
                        .map(|x| (x, slope * (x - centroid)))
                        .collect_vec()
                };
                AsymptoteLine { angle, points }
            })
            .collect_vec()
    }
}

/// Centroid and angles of the asymptotes.
///
/// The centroid is `(sum Re(poles) - sum Re(zeros)) / n_diff` and the angles
/// are `(2i + 1) pi / n_diff` for `i` in `0..n_diff`. `None` when
/// `n_diff <= 0`.
///
/// ```
/// use num::Complex;
/// use root_locus::geometry::asymptotes;
///
/// let poles = [Complex::new(-2.0, 0.0), Complex::new(-3.0, 0.0)];
/// let (centroid, angles) = asymptotes(&poles, &[], 2).unwrap();
/// assert_eq!(centroid, -2.5);
/// assert_eq!(angles.len(), 2);
/// ```
#[must_use]
pub fn asymptotes<T: RealScalar>(
    poles: &[Complex<T>],
    zeros: &[Complex<T>],
    n_diff: isize,
) -> Option<(T, Vec<T>)> {
    let n = usize::try_from(n_diff).ok().filter(|n| *n > 0)?;
    let n_scalar = usize_to_scalar::<T>(n);
    let sum_poles: T = poles.iter().map(|p| p.re).sum();
    let sum_zeros: T = zeros.iter().map(|z| z.re).sum();
    let centroid = (sum_poles - sum_zeros) / n_scalar;
    let two = T::one() + T::one();
    let angles = (0..n)
        .map(|i| (two * usize_to_scalar::<T>(i) + T::one()) * T::PI() / n_scalar)
        .collect_vec();
    Some((centroid, angles))
}

/// Sampled breakaway search.
///
/// Every point `r` of the breakaway grid where `|D'(r)|` is above the
/// division tolerance contributes the candidate `r - D(r) / D'(r)`. When
/// `breakaway_on_locus_only` is set, only candidates with a non-negative
/// gain `K = -D / N` are kept. The result is sorted and de-duplicated.
///
#[doc = soft_failure!()]
pub fn breakaway_points<T: RealScalar>(
    tf: &TransferFunction<T>,
    config: &AnalysisConfig<T>,
) -> Vec<T> {
    let den = tf.den();
    let den_diff = den.diff();
    let tolerance = config.division_tolerance;

    let mut skipped = 0;
    let mut candidates = vec![];
    for r in config.breakaway_grid.points() {
        let slope = den_diff.eval_real(r);
        if slope.abs() <= tolerance.max(T::tiny_safe()) {
            skipped += 1;
            continue;
        }
        let candidate = r - den.eval_real(r) / slope;
        if !candidate.is_finite() {
            skipped += 1;
            continue;
        }
        if config.breakaway_on_locus_only && !on_locus(tf, candidate, tolerance) {
            continue;
        }
        candidates.push(candidate);
    }
    if skipped > 0 {
        log::warn!("breakaway search skipped {skipped} samples with a flat denominator");
    }

    let points = dedup_sorted(candidates, config.breakaway_dedup_tolerance);
    log::debug!("{} breakaway points found by sampling", points.len());
    points
}

/// Breakaway points as the real roots of `dK/ds = 0`, i.e. of
/// `N D' - N' D`, that lie on the locus.
///
/// # Errors
/// Only if the root finder fails for reasons other than convergence.
pub fn breakaway_exact<T: RealScalar>(
    tf: &TransferFunction<T>,
    config: &AnalysisConfig<T>,
) -> Result<Vec<T>> {
    let (num, den) = (tf.num(), tf.den());
    let condition: Poly<T> = num * &den.diff() - &num.diff() * den;
    if condition.is_zero() {
        // K does not depend on s, e.g. N = c D
        return Ok(vec![]);
    }
    let mut roots = condition
        .roots(config.roots.epsilon, config.roots.max_iter)
        .ignore_no_converge()?;
    complex_sort_mut(&mut roots);
    let candidates = roots
        .into_iter()
        .filter(|z| z.im.abs() <= T::small_safe() * z.re.abs().max(T::one()))
        .map(|z| z.re)
        .filter(|&c| on_locus(tf, c, config.division_tolerance))
        .collect_vec();
    Ok(dedup_sorted(candidates, config.breakaway_dedup_tolerance))
}

/// Sampled imaginary axis crossings.
///
/// Evaluates `G(jw)` over the crossing grid and keeps the samples whose
/// imaginary part is within the crossing tolerance.
///
#[doc = soft_failure!()]
pub fn jw_crossings<T: RealScalar>(
    tf: &TransferFunction<T>,
    config: &AnalysisConfig<T>,
) -> Vec<JwCrossing<T>> {
    let mut skipped = 0;
    let mut crossings = vec![];
    for w in config.crossing_grid.points() {
        let Ok(g) = tf.eval(Complex::new(T::zero(), w), config.division_tolerance) else {
            skipped += 1;
            continue;
        };
        if g.im.abs() > config.crossing_tolerance {
            continue;
        }
        let critical_gain = if g.re < T::zero() {
            Some(-g.re.recip())
        } else {
            None
        };
        crossings.push(JwCrossing {
            frequency: w,
            response_real: g.re,
            critical_gain,
        });
    }
    if skipped > 0 {
        log::warn!("crossing search skipped {skipped} samples on a pole");
    }
    log::debug!("{} imaginary axis crossings found", crossings.len());
    crossings
}

/// The real point `sigma` is on the locus for some `K >= 0`
fn on_locus<T: RealScalar>(tf: &TransferFunction<T>, sigma: T, tolerance: T) -> bool {
    tf.gain_at(sigma, tolerance)
        .is_some_and(|k| k.is_finite() && k >= T::zero())
}

/// Sort and merge values closer than `tolerance` to the previously kept one
fn dedup_sorted<T: RealScalar>(mut values: Vec<T>, tolerance: T) -> Vec<T> {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for v in values {
        match out.last() {
            Some(last) if (v - *last).abs() <= tolerance => {}
            _ => out.push(v),
        }
    }
    if out.iter().any(|v| v.is_zero() && v.is_sign_negative()) {
        // -0 and 0 print differently
        out.iter_mut()
            .filter(|v| v.is_zero())
            .for_each(|v| *v = T::zero());
    }
    out
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;

    use crate::{config::SampleGrid, AnalysisConfig, GeometrySummary, TransferFunction64};

    use super::{asymptotes, breakaway_points, dedup_sorted, jw_crossings};

    #[test]
    fn second_order_system() {
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
        let summary = GeometrySummary::compute(&tf, &AnalysisConfig::default()).unwrap();
        assert_eq!(summary.poles.len(), 2);
        assert!(summary.zeros.is_empty());
        assert_eq!(summary.relative_degree, 2);
        assert_eq!(summary.centroid, Some(-2.5));
        let degrees: Vec<f64> = summary.asymptote_angles.iter().map(|a| a.to_degrees()).collect();
        assert!((degrees[0] - 90.0).abs() < 1E-12);
        assert!((degrees[1] - 270.0).abs() < 1E-12);
        assert_eq!(summary.breakaway_exact, vec![-2.5]);
        // r - D/D' = (r^2 - 6) / (2r + 5) only reaches [-3, -2] at the poles,
        // which are not on the default grid
        assert!(summary.breakaway_points.is_empty());
        let raw = breakaway_points(
            &tf,
            &AnalysisConfig::default().with_all_breakaway_candidates(),
        );
        assert_eq!(raw.len(), 1000);
    }

    fn assert_close(got: &[f64], expected: &[f64]) {
        assert_eq!(got.len(), expected.len(), "{got:?} != {expected:?}");
        for (g, e) in got.iter().zip(expected) {
            assert!((g - e).abs() < 1E-12, "{got:?} != {expected:?}");
        }
    }

    #[test]
    fn breakaway_candidates_on_small_grid() {
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
        let config = AnalysisConfig::default().with_breakaway_grid(SampleGrid::new(-4.0, 0.0, 5));
        assert_close(
            &breakaway_points(&tf, &config.clone().with_all_breakaway_candidates()),
            &[-10.0 / 3.0, -3.0, -2.0, -5.0 / 3.0, -1.2],
        );
        // grid points on a pole stay there, and K = 0 is on the locus
        assert_eq!(breakaway_points(&tf, &config), vec![-3.0, -2.0]);
    }

    #[test]
    fn breakaway_candidates_left_of_zero() {
        // (s + 4) / (s^2 + s), the locus covers (-inf, -4] and [-1, 0]
        let tf = TransferFunction64::from_coeffs(&[1.0, 4.0], &[1.0, 1.0, 0.0]).unwrap();
        let config =
            AnalysisConfig::default().with_breakaway_grid(SampleGrid::new(-10.0, -6.0, 3));
        let expected = [-100.0 / 19.0, -64.0 / 15.0, -36.0 / 11.0];
        assert_close(
            &breakaway_points(&tf, &config.clone().with_all_breakaway_candidates()),
            &expected,
        );
        // -36/11 lies between the zero and the poles, where K < 0
        assert_close(&breakaway_points(&tf, &config), &expected[..2]);
    }

    #[test]
    fn breakaway_skips_flat_denominator() {
        // D'(-2.5) = 0 and -2.5 is the sixth grid point
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
        let config = AnalysisConfig::default()
            .with_breakaway_grid(SampleGrid::new(-5.0, 0.0, 11))
            .with_all_breakaway_candidates();
        let raw = breakaway_points(&tf, &config);
        assert_eq!(raw.len(), 10);
        assert_close(
            &raw,
            &[-3.8, -3.5625, -10.0 / 3.0, -3.125, -3.0, -2.0, -1.875, -5.0 / 3.0, -1.4375, -1.2],
        );
    }

    #[test]
    fn crossings_skip_samples_on_a_pole() {
        // 1 / (s^2 + 1) has poles at +-j, G(jw) = 1 / (1 - w^2) elsewhere
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 0.0, 1.0]).unwrap();
        let config = AnalysisConfig::default().with_crossing_grid(SampleGrid::new(-2.0, 2.0, 5));
        let crossings = jw_crossings(&tf, &config);
        assert_eq!(
            crossings.iter().map(|c| c.frequency).collect::<Vec<_>>(),
            vec![-2.0, 0.0, 2.0]
        );
        assert!((crossings[0].critical_gain.unwrap() - 3.0).abs() < 1E-12);
        assert_eq!(crossings[1].response_real, 1.0);
        assert_eq!(crossings[1].critical_gain, None);
        assert!((crossings[2].critical_gain.unwrap() - 3.0).abs() < 1E-12);
    }

    #[test]
    fn complex_poles_have_no_breakaway() {
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 1.0, 1.0]).unwrap();
        let summary = GeometrySummary::compute(&tf, &AnalysisConfig::default()).unwrap();
        assert!(summary.breakaway_points.is_empty());
        assert!(summary.breakaway_exact.is_empty());
        assert!((summary.poles[0].re + 0.5).abs() < 1E-12);
        assert!((summary.poles[0].im.abs() - 0.75_f64.sqrt()).abs() < 1E-12);
    }

    #[test]
    fn all_candidates_when_filter_disabled() {
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 1.0, 1.0]).unwrap();
        let config = AnalysisConfig::default().with_all_breakaway_candidates();
        assert!(!breakaway_points(&tf, &config).is_empty());
    }

    #[test]
    fn asymptote_angles_are_evenly_spaced() {
        for n_diff in 1..=6_isize {
            let (_, angles) = asymptotes::<f64>(&[], &[], n_diff).unwrap();
            assert_eq!(angles.len(), n_diff as usize);
            let step = 2.0 * PI / n_diff as f64;
            assert!((angles[0] - PI / n_diff as f64).abs() < 1E-12);
            for w in angles.windows(2) {
                assert!((w[1] - w[0] - step).abs() < 1E-12);
            }
        }
        assert!(asymptotes::<f64>(&[], &[], 0).is_none());
        assert!(asymptotes::<f64>(&[], &[], -1).is_none());
    }

    #[test]
    fn asymptote_lines() {
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 3.0, 2.0, 0.0]).unwrap();
        let summary = GeometrySummary::compute(&tf, &AnalysisConfig::default()).unwrap();
        assert_eq!(summary.centroid, Some(-1.0));
        let lines = summary.asymptote_lines(&SampleGrid::new(-10.0, 10.0, 100));
        assert_eq!(lines.len(), 3);
        // the 180 degree asymptote lies on the real axis
        assert!(lines[1].points.iter().all(|(_, y)| y.abs() < 1E-12));
        // 60 degrees through the centroid
        let (x, y) = lines[0].points[99];
        assert!((y - 3.0_f64.sqrt() * (x + 1.0)).abs() < 1E-9);

        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
        let summary = GeometrySummary::compute(&tf, &AnalysisConfig::default()).unwrap();
        let lines = summary.asymptote_lines(&SampleGrid::new(-10.0, 10.0, 100));
        assert!(lines[0].points.iter().all(|(x, _)| *x == -2.5));
    }

    #[test]
    fn crossing_with_critical_gain() {
        // s^3 + 2s^2 + 4s + 1 has D(j2) = -7
        let tf = TransferFunction64::from_coeffs(&[1.0], &[1.0, 2.0, 4.0, 1.0]).unwrap();
        let config =
            AnalysisConfig::default().with_crossing_grid(SampleGrid::new(-10.0, 10.0, 1001));
        let crossings = jw_crossings(&tf, &config);
        assert_eq!(crossings.len(), 3, "{crossings:?}");
        assert_eq!(crossings[0].frequency, -2.0);
        assert_eq!(crossings[1].frequency, 0.0);
        assert_eq!(crossings[1].response_real, 1.0);
        assert_eq!(crossings[1].critical_gain, None);
        assert_eq!(crossings[2].frequency, 2.0);
        assert!((crossings[2].response_real + 1.0 / 7.0).abs() < 1E-15);
        assert!((crossings[2].critical_gain.unwrap() - 7.0).abs() < 1E-12);
    }

    #[test]
    fn no_asymptotes_for_equal_degrees() {
        let tf = TransferFunction64::from_coeffs(&[1.0, 1.0], &[1.0, 2.0]).unwrap();
        let summary = GeometrySummary::compute(&tf, &AnalysisConfig::default()).unwrap();
        assert_eq!(summary.centroid, None);
        assert!(summary.asymptote_angles.is_empty());
        assert!(summary
            .asymptote_lines(&SampleGrid::new(-1.0, 1.0, 10))
            .is_empty());
    }

    #[test]
    fn dedup() {
        assert_eq!(
            dedup_sorted(vec![1.0, -1.0, 1.0 + 1E-9, 0.5], 1E-6),
            vec![-1.0, 0.5, 1.0]
        );
        assert_eq!(dedup_sorted(vec![2.0, 2.0, 1.0], 0.0), vec![1.0, 2.0]);
        assert_eq!(dedup_sorted(vec![-0.0], 0.0)[0].to_string(), "0");
    }
}
