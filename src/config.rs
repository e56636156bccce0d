//! Tunables for a root locus analysis.
//!
//! Every value has a sensible default, so most users only need
//! `AnalysisConfig::default()` and the occasional `with_*` override:
//!
//! ```
//! use root_locus::{AnalysisConfig, GainSweep};
//!
//! let config = AnalysisConfig::<f64>::default()
//!     .with_sweep(GainSweep::Linear { stop: 50.0, count: 200 })
//!     .with_crossing_tolerance(1E-4);
//! assert!(config.validate().is_ok());
//! ```

use std::str::FromStr;

use itertools::Itertools;

use crate::{
    util::{
        casting::f64_to_scalar,
        iterator::{linspace, logspace},
    },
    Error, RealScalar, Result,
};

/// Root finder settings used for poles, zeros and every locus sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootsConfig<T> {
    /// Bound on the squared norm of the last correction of every root
    pub epsilon: T,
    pub max_iter: usize,
}

impl<T: RealScalar> Default for RootsConfig<T> {
    fn default() -> Self {
        Self {
            epsilon: f64_to_scalar(1E-14),
            max_iter: 500,
        }
    }
}

/// Evenly spaced samples over a closed interval
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleGrid<T> {
    pub start: T,
    pub stop: T,
    pub count: usize,
}

impl<T: RealScalar> SampleGrid<T> {
    #[must_use]
    pub const fn new(start: T, stop: T, count: usize) -> Self {
        Self { start, stop, count }
    }

    pub fn points(&self) -> impl Iterator<Item = T> {
        linspace(self.start, self.stop, self.count)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.start.is_finite() || !self.stop.is_finite() {
            return Err(Error::invalid_config(format!(
                "{name} bounds must be finite"
            )));
        }
        if self.start >= self.stop {
            return Err(Error::invalid_config(format!(
                "{name} must have start < stop, got [{}, {}]",
                self.start, self.stop
            )));
        }
        if self.count < 2 {
            return Err(Error::invalid_config(format!(
                "{name} needs at least 2 points"
            )));
        }
        Ok(())
    }
}

impl<T: RealScalar> Default for SampleGrid<T> {
    /// 1000 points over `[-10, 10]`
    fn default() -> Self {
        Self::new(f64_to_scalar(-10.0), f64_to_scalar(10.0), 1000)
    }
}

/// The gains `K` at which the closed loop poles are computed
#[derive(Clone, Debug, PartialEq)]
pub enum GainSweep<T> {
    /// Exactly these gains, in ascending order after validation
    Explicit(Vec<T>),

    /// `count` evenly spaced gains over `[0, stop]`
    Linear { stop: T, count: usize },

    /// `K = 0` followed by `count` logarithmically spaced gains over
    /// `[start, stop]`
    Logarithmic { start: T, stop: T, count: usize },
}

impl<T: RealScalar> Default for GainSweep<T> {
    fn default() -> Self {
        Self::Logarithmic {
            start: f64_to_scalar(1E-3),
            stop: f64_to_scalar(1E3),
            count: 500,
        }
    }
}

impl<T: RealScalar> GainSweep<T> {
    /// The gains of this sweep, ascending.
    ///
    /// # Errors
    /// `InvalidConfig` for negative, non-finite or empty sweeps.
    pub fn gains(&self) -> Result<Vec<T>> {
        let gains = match self {
            Self::Explicit(gains) => {
                if let Some(bad) = gains.iter().find(|k| !k.is_finite() || **k < T::zero()) {
                    return Err(Error::invalid_config(format!(
                        "gains must be finite and non-negative, got {bad}"
                    )));
                }
                gains
                    .iter()
                    .copied()
                    .sorted_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                    .collect_vec()
            }
            Self::Linear { stop, count } => {
                if !stop.is_finite() || *stop <= T::zero() {
                    return Err(Error::invalid_config(format!(
                        "linear sweep must end at a positive gain, got {stop}"
                    )));
                }
                linspace(T::zero(), *stop, *count).collect_vec()
            }
            Self::Logarithmic { start, stop, count } => {
                if !(start.is_finite() && stop.is_finite())
                    || *start <= T::zero()
                    || *start >= *stop
                {
                    return Err(Error::invalid_config(format!(
                        "logarithmic sweep needs 0 < start < stop, got [{start}, {stop}]"
                    )));
                }
                std::iter::once(T::zero())
                    .chain(logspace(*start, *stop, *count))
                    .collect_vec()
            }
        };
        if gains.is_empty() {
            return Err(Error::invalid_config("the gain sweep is empty"));
        }
        Ok(gains)
    }
}

/// Visible region of the s-plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisLimits<T> {
    pub x_min: T,
    pub x_max: T,
    pub y_min: T,
    pub y_max: T,
}

impl<T: RealScalar> Default for AxisLimits<T> {
    fn default() -> Self {
        Self {
            x_min: f64_to_scalar(-10.0),
            x_max: f64_to_scalar(2.0),
            y_min: f64_to_scalar(-10.0),
            y_max: f64_to_scalar(10.0),
        }
    }
}

impl<T: RealScalar> AxisLimits<T> {
    fn validate(&self) -> Result<()> {
        let all_finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite || self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(Error::invalid_config(format!(
                "axis limits must be finite with min < max, got x [{}, {}] y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        Ok(())
    }
}

impl<T: RealScalar> FromStr for AxisLimits<T> {
    type Err = Error;

    /// Parses four whitespace separated numbers, `xmin xmax ymin ymax`.
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split_whitespace()
            .map(|v| {
                v.parse::<f64>()
                    .map(f64_to_scalar)
                    .map_err(|e| Error::invalid_config(format!("bad axis limit {v:?}: {e}")))
            })
            .collect::<Result<Vec<T>>>()?;
        let [x_min, x_max, y_min, y_max] = values[..] else {
            return Err(Error::invalid_config(format!(
                "expected 4 axis limits, got {}",
                values.len()
            )));
        };
        let limits = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        limits.validate()?;
        Ok(limits)
    }
}

/// Rounding applied when results are displayed. Stored values are never
/// rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayPrecision {
    pub magnitude_digits: u32,
    pub angle_decimals: u32,
    /// Decimals of complex numbers and scalars in reports
    pub decimals: usize,
}

impl Default for DisplayPrecision {
    fn default() -> Self {
        Self {
            magnitude_digits: 4,
            angle_decimals: 1,
            decimals: 4,
        }
    }
}

/// All the knobs of an analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig<T> {
    pub roots: RootsConfig<T>,
    pub sweep: GainSweep<T>,
    /// Reorder every locus sample to continue the branches of the previous one
    pub track_branches: bool,

    /// Real axis grid searched for breakaway points
    pub breakaway_grid: SampleGrid<T>,
    /// Candidates closer than this are merged, 0 merges exact duplicates only
    pub breakaway_dedup_tolerance: T,
    /// Keep only candidates on a real axis segment of the locus (`K >= 0`)
    pub breakaway_on_locus_only: bool,

    /// Frequency grid searched for imaginary axis crossings
    pub crossing_grid: SampleGrid<T>,
    /// Largest `|Im G(jw)|` still counted as a crossing
    pub crossing_tolerance: T,

    /// x samples of the asymptote lines
    pub asymptote_grid: SampleGrid<T>,

    /// Divisors with a smaller magnitude are treated as zero
    pub division_tolerance: T,
    /// Relative tolerance between the two evaluation paths
    pub agreement_tolerance: T,

    pub axis_limits: AxisLimits<T>,
    pub display: DisplayPrecision,
}

impl<T: RealScalar> Default for AnalysisConfig<T> {
    fn default() -> Self {
        Self {
            roots: RootsConfig::default(),
            sweep: GainSweep::default(),
            track_branches: true,
            breakaway_grid: SampleGrid::default(),
            breakaway_dedup_tolerance: f64_to_scalar(1E-6),
            breakaway_on_locus_only: true,
            crossing_grid: SampleGrid::default(),
            crossing_tolerance: f64_to_scalar(1E-5),
            asymptote_grid: SampleGrid::new(f64_to_scalar(-10.0), f64_to_scalar(10.0), 100),
            division_tolerance: f64_to_scalar(1E-12),
            agreement_tolerance: f64_to_scalar(1E-6),
            axis_limits: AxisLimits::default(),
            display: DisplayPrecision::default(),
        }
    }
}

impl<T: RealScalar> AnalysisConfig<T> {
    #[must_use]
    pub fn with_roots(mut self, epsilon: T, max_iter: usize) -> Self {
        self.roots = RootsConfig { epsilon, max_iter };
        self
    }

    #[must_use]
    pub fn with_sweep(mut self, sweep: GainSweep<T>) -> Self {
        self.sweep = sweep;
        self
    }

    /// Keep the closed loop poles of every sample in solver order
    #[must_use]
    pub fn without_branch_tracking(mut self) -> Self {
        self.track_branches = false;
        self
    }

    #[must_use]
    pub fn with_breakaway_grid(mut self, grid: SampleGrid<T>) -> Self {
        self.breakaway_grid = grid;
        self
    }

    #[must_use]
    pub fn with_breakaway_dedup_tolerance(mut self, tolerance: T) -> Self {
        self.breakaway_dedup_tolerance = tolerance;
        self
    }

    /// Report every candidate of the breakaway search, including the ones
    /// that are not on the locus
    #[must_use]
    pub fn with_all_breakaway_candidates(mut self) -> Self {
        self.breakaway_on_locus_only = false;
        self
    }

    #[must_use]
    pub fn with_crossing_grid(mut self, grid: SampleGrid<T>) -> Self {
        self.crossing_grid = grid;
        self
    }

    #[must_use]
    pub fn with_crossing_tolerance(mut self, tolerance: T) -> Self {
        self.crossing_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_asymptote_grid(mut self, grid: SampleGrid<T>) -> Self {
        self.asymptote_grid = grid;
        self
    }

    #[must_use]
    pub fn with_division_tolerance(mut self, tolerance: T) -> Self {
        self.division_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_agreement_tolerance(mut self, tolerance: T) -> Self {
        self.agreement_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_axis_limits(mut self, limits: AxisLimits<T>) -> Self {
        self.axis_limits = limits;
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayPrecision) -> Self {
        self.display = display;
        self
    }

    /// Check every setting, so that analysis errors are never caused by the
    /// configuration.
    ///
    /// # Errors
    /// `InvalidConfig` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if !self.roots.epsilon.is_finite() || self.roots.epsilon <= T::zero() {
            return Err(Error::invalid_config(
                "root finder epsilon must be positive and finite",
            ));
        }
        if self.roots.max_iter == 0 {
            return Err(Error::invalid_config(
                "root finder needs at least one iteration",
            ));
        }
        self.sweep.gains()?;
        self.breakaway_grid.validate("breakaway grid")?;
        self.crossing_grid.validate("crossing grid")?;
        self.asymptote_grid.validate("asymptote grid")?;
        for (name, tolerance) in [
            ("breakaway dedup tolerance", self.breakaway_dedup_tolerance),
            ("crossing tolerance", self.crossing_tolerance),
            ("division tolerance", self.division_tolerance),
            ("agreement tolerance", self.agreement_tolerance),
        ] {
            if !tolerance.is_finite() || tolerance < T::zero() {
                return Err(Error::invalid_config(format!(
                    "{name} must be finite and non-negative, got {tolerance}"
                )));
            }
        }
        self.axis_limits.validate()
    }
}

#[cfg(test)]
mod test {
    use crate::Error;

    use super::{AnalysisConfig, AxisLimits, GainSweep, SampleGrid};

    #[test]
    fn default_is_valid() {
        assert!(AnalysisConfig::<f64>::default().validate().is_ok());
        assert!(AnalysisConfig::<f32>::default().validate().is_ok());
    }

    #[test]
    fn logarithmic_sweep_starts_at_zero() {
        let gains = GainSweep::<f64>::default().gains().unwrap();
        assert_eq!(gains.len(), 501);
        assert_eq!(gains[0], 0.0);
        assert!((gains[1] - 1E-3).abs() < 1E-15);
        assert!((gains[500] - 1E3).abs() < 1E-9);
        assert!(gains.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn linear_sweep() {
        let gains = GainSweep::Linear { stop: 10.0, count: 11 }.gains().unwrap();
        assert_eq!(gains, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn explicit_sweep_is_sorted_and_checked() {
        let gains = GainSweep::Explicit(vec![5.0, 0.0, 1.0]).gains().unwrap();
        assert_eq!(gains, vec![0.0, 1.0, 5.0]);
        assert!(matches!(
            GainSweep::Explicit(vec![1.0, -1.0]).gains(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            GainSweep::<f64>::Explicit(vec![]).gains(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(GainSweep::Explicit(vec![f64::NAN]).gains().is_err());
    }

    #[test]
    fn invalid_settings() {
        let config = AnalysisConfig::<f64>::default().with_roots(0.0, 100);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = AnalysisConfig::<f64>::default()
            .with_crossing_grid(SampleGrid::new(1.0, -1.0, 100));
        assert!(config.validate().is_err());

        let config = AnalysisConfig::<f64>::default().with_crossing_tolerance(-1.0);
        assert!(config.validate().is_err());

        let config = AnalysisConfig::<f64>::default().with_sweep(GainSweep::Logarithmic {
            start: 0.0,
            stop: 10.0,
            count: 10,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_axis_limits() {
        let limits: AxisLimits<f64> = "-20 5 -15 15".parse().unwrap();
        assert_eq!(
            limits,
            AxisLimits {
                x_min: -20.0,
                x_max: 5.0,
                y_min: -15.0,
                y_max: 15.0
            }
        );
        assert!("1 2 3".parse::<AxisLimits<f64>>().is_err());
        assert!("5 1 0 1".parse::<AxisLimits<f64>>().is_err());
        assert!("a b c d".parse::<AxisLimits<f64>>().is_err());
    }
}
