//! Closed loop poles of `1 + K G(s) = 0` over a sweep of gains.

use itertools::Itertools;
use num::Complex;

use crate::{
    config::AnalysisConfig, roots::RootsResultExt, util::doc_macros::soft_failure, Error,
    RealScalar, Result, TransferFunction,
};

/// Closed loop poles at one gain
#[derive(Clone, Debug, PartialEq)]
pub struct LocusPoint<T> {
    pub gain: T,
    pub poles: Vec<Complex<T>>,
}

/// The sampled root locus, ordered by increasing gain.
///
/// Every sample has exactly as many poles as the open loop denominator has
/// roots. When branch tracking is enabled, the `i`-th pole of every sample
/// belongs to the same branch.
#[derive(Clone, Debug, PartialEq)]
pub struct RootLocus<T> {
    points: Vec<LocusPoint<T>>,
    order: usize,
    skipped: usize,
}

impl<T: RealScalar> RootLocus<T> {
    /// Sample the locus of `tf` at every gain of `config.sweep`.
    ///
    /// ```
    /// use root_locus::{AnalysisConfig, GainSweep, RootLocus, TransferFunction};
    ///
    /// let tf = TransferFunction::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
    /// let config = AnalysisConfig::default().with_sweep(GainSweep::Linear { stop: 10.0, count: 21 });
    /// let locus = RootLocus::compute(&tf, &config).unwrap();
    /// assert_eq!(locus.points().len(), 21);
    /// assert!(locus.points().iter().all(|p| p.poles.len() == 2));
    /// ```
    ///
    #[doc = soft_failure!()]
    /// Samples where the root finder runs out of iterations keep its best
    /// guess.
    ///
    /// # Errors
    /// - `DegenerateInput` if the system has more zeros than poles
    /// - `InvalidConfig` if the gain sweep is invalid
    /// - `DegenerateInput` if no gain of the sweep could be sampled
    pub fn compute(tf: &TransferFunction<T>, config: &AnalysisConfig<T>) -> Result<Self> {
        if !tf.is_proper() {
            return Err(Error::degenerate(format!(
                "the system is not proper, the numerator has degree {} but the denominator only {}",
                tf.num().degree(),
                tf.den().degree()
            )));
        }
        let gains = config.sweep.gains()?;
        let order = tf.den().degree();

        let mut points: Vec<LocusPoint<T>> = Vec::with_capacity(gains.len());
        let mut skipped = 0;
        for gain in gains {
            let characteristic = tf.characteristic(gain);
            if characteristic.degree() != order {
                // leading coefficients cancel, some poles went to infinity
                log::debug!("skipping K = {gain}, the characteristic polynomial lost degree");
                skipped += 1;
                continue;
            }
            let poles = match characteristic
                .roots(config.roots.epsilon, config.roots.max_iter)
                .ignore_no_converge()
            {
                Ok(poles) => poles,
                Err(e) => {
                    log::debug!("skipping K = {gain}: {e}");
                    skipped += 1;
                    continue;
                }
            };
            let poles = match (config.track_branches, points.last()) {
                (true, Some(previous)) => match_branches(&previous.poles, poles),
                _ => poles,
            };
            points.push(LocusPoint { gain, poles });
        }

        if skipped > 0 {
            log::warn!("{skipped} gain samples of the root locus were skipped");
        }
        if points.is_empty() {
            return Err(Error::degenerate("no gain of the sweep could be sampled"));
        }
        Ok(Self {
            points,
            order,
            skipped,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[LocusPoint<T>] {
        &self.points
    }

    /// Number of gains of the sweep that could not be sampled
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn gains(&self) -> impl Iterator<Item = T> + '_ {
        self.points.iter().map(|p| p.gain)
    }

    /// The locus as one sequence of points per branch
    #[must_use]
    pub fn branches(&self) -> Vec<Vec<Complex<T>>> {
        (0..self.order)
            .map(|i| self.points.iter().map(|p| p.poles[i]).collect_vec())
            .collect_vec()
    }
}

/// Reorder `poles` so that each one continues the branch of the closest
/// pole in `previous`.
///
/// Greedy: the branches of `previous` pick their nearest free pole in order.
fn match_branches<T: RealScalar>(
    previous: &[Complex<T>],
    mut poles: Vec<Complex<T>>,
) -> Vec<Complex<T>> {
    debug_assert_eq!(previous.len(), poles.len());

    let mut ordered = Vec::with_capacity(poles.len());
    for p in previous {
        let Some((nearest, _)) = poles
            .iter()
            .enumerate()
            .map(|(i, z)| (i, (z - p).norm_sqr()))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        else {
            break;
        };
        ordered.push(poles.swap_remove(nearest));
    }
    ordered
}
