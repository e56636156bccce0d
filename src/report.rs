use std::fmt::Display;

use itertools::Itertools;
use num::Complex;

use crate::{
    config::{AnalysisConfig, DisplayPrecision},
    util::complex::complex_fmt,
    Evaluation, GeometrySummary, RealScalar, Result, RootLocus, TransferFunction,
};

/// Everything computed in one analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct RootLocusReport<T: RealScalar> {
    pub transfer: TransferFunction<T>,
    pub locus: RootLocus<T>,
    pub geometry: GeometrySummary<T>,
    pub evaluation: Option<Evaluation<T>>,
    display: DisplayPrecision,
}

impl<T: RealScalar> RootLocusReport<T> {
    /// Sample the locus and run the geometric analysis.
    ///
    /// ```
    /// use root_locus::{AnalysisConfig, RootLocusReport, TransferFunction};
    ///
    /// let tf = TransferFunction::from_coeffs(&[1.0], &[1.0, 5.0, 6.0]).unwrap();
    /// let report = RootLocusReport::analyze(tf, &AnalysisConfig::default()).unwrap();
    /// assert_eq!(report.geometry.centroid, Some(-2.5));
    /// println!("{report}");
    /// ```
    ///
    /// # Errors
    /// - `InvalidConfig` if `config` does not validate
    /// - `DegenerateInput` if the system is not proper
    pub fn analyze(transfer: TransferFunction<T>, config: &AnalysisConfig<T>) -> Result<Self> {
        config.validate()?;
        log::info!("analyzing G(s) = {transfer}");
        let locus = RootLocus::compute(&transfer, config)?;
        let geometry = GeometrySummary::compute(&transfer, config)?;
        Ok(Self {
            transfer,
            locus,
            geometry,
            evaluation: None,
            display: config.display,
        })
    }

    /// Add the evaluation of the transfer function at `point`.
    ///
    /// # Errors
    /// `NumericDivision` if `point` is a pole.
    pub fn with_evaluation(mut self, point: Complex<T>, config: &AnalysisConfig<T>) -> Result<Self> {
        self.evaluation = Some(Evaluation::compute(&self.transfer, point, config)?);
        Ok(self)
    }
}

impl<T: RealScalar> Display for RootLocusReport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.display.decimals;
        let complex_list = |v: &[Complex<T>]| {
            if v.is_empty() {
                "none".to_owned()
            } else {
                v.iter().map(|z| complex_fmt(z, p)).join(", ")
            }
        };
        let real_list = |v: &[T]| {
            if v.is_empty() {
                "none".to_owned()
            } else {
                v.iter().map(|x| format!("{x:.p$}")).join(", ")
            }
        };
        let g = &self.geometry;

        writeln!(f, "G(s) = {}", self.transfer)?;
        writeln!(f, "poles: {}", complex_list(&g.poles))?;
        writeln!(f, "zeros: {}", complex_list(&g.zeros))?;
        writeln!(f, "relative degree: {}", g.relative_degree)?;
        match g.centroid {
            Some(c) => writeln!(
                f,
                "asymptotes: centroid {c:.p$}, angles {}",
                g.asymptote_angles
                    .iter()
                    .map(|a| format!("{:.1}°", a.to_degrees()))
                    .join(", ")
            )?,
            None => writeln!(f, "asymptotes: none")?,
        }
        writeln!(
            f,
            "breakaway points (sampled): {}",
            real_list(&g.breakaway_points)
        )?;
        writeln!(
            f,
            "breakaway points (dK/ds = 0): {}",
            real_list(&g.breakaway_exact)
        )?;
        if g.crossings.is_empty() {
            writeln!(f, "jw axis crossings: none")?;
        } else {
            writeln!(f, "jw axis crossings:")?;
            for c in &g.crossings {
                write!(f, "  w = {:.p$}, Re G = {:.p$}", c.frequency, c.response_real)?;
                match c.critical_gain {
                    Some(k) => writeln!(f, ", K = {k:.p$}")?,
                    None => writeln!(f)?,
                }
            }
        }
        let (first, last) = match (self.locus.points().first(), self.locus.points().last()) {
            (Some(first), Some(last)) => (first.gain, last.gain),
            _ => (T::zero(), T::zero()),
        };
        write!(
            f,
            "locus: {} gains over [{first}, {last}], {} skipped",
            self.locus.points().len(),
            self.locus.skipped()
        )?;
        if let Some(eval) = &self.evaluation {
            write!(f, "\n{eval}")?;
        }
        Ok(())
    }
}
