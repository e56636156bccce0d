//! Root locus analysis of single-input, single-output transfer functions.
//!
//! Given an open loop transfer function `G(s) = N(s) / D(s)`, this crate
//! samples the closed loop poles of `1 + K G(s) = 0` as the gain `K` grows,
//! derives the classical construction aids (asymptotes, centroid, breakaway
//! points, imaginary axis crossings) and evaluates `G` at arbitrary complex
//! points.
//!
//! ```
//! use root_locus::{AnalysisConfig, RootLocusReport, TransferFunction};
//!
//! let tf = TransferFunction::parse("1", "s^2 + 5s + 6").unwrap();
//! let report = RootLocusReport::analyze(tf, &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.geometry.relative_degree, 2);
//! assert_eq!(report.geometry.centroid, Some(-2.5));
//! ```
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub use num;

/// A more convenient way of writing `Poly::new(&[1.0, 2.0, 3.0])`
///
/// # Examples
/// ```
/// use root_locus::{poly, Poly};
///
/// assert_eq!(poly![1.0, 2.0, 3.0], Poly::new(&[1.0, 2.0, 3.0]));
/// ```
#[macro_export]
macro_rules! poly {
    () => {{
        $crate::Poly::new(&[])
    }};
    ($($c:expr),+ $(,)?) => {{
        $crate::Poly::new(&[$($c),+])
    }};
}

/// A more convenient way of writing `Complex::new(1.0, 2.0)`
///
/// # Examples
/// ```
/// use root_locus::{complex, num::Complex};
///
/// assert_eq!(complex!(1.0, 2.0), Complex::new(1.0, 2.0));
/// assert_eq!(complex!(3.0), Complex::new(3.0, 0.0));
/// ```
#[macro_export]
macro_rules! complex {
    ($re:expr) => {{
        $crate::num::Complex::new($re, $crate::num::Zero::zero())
    }};
    ($re:expr, $im:expr) => {{
        $crate::num::Complex::new($re, $im)
    }};
}

mod config;
mod error;
mod evaluate;
pub mod geometry;
mod locus;
mod parse;
mod plot;
mod poly;
mod report;
mod scalar;
mod transfer;
mod util;

pub use config::{AnalysisConfig, AxisLimits, DisplayPrecision, GainSweep, RootsConfig, SampleGrid};
pub use error::{Error, Result};
pub use evaluate::{Evaluation, Polar};
pub use geometry::{AsymptoteLine, GeometrySummary, JwCrossing};
pub use locus::{LocusPoint, RootLocus};
pub use parse::{parse_complex, parse_poly};
pub use plot::{
    Annotation, GuideLine, LineStyle, MarkerShape, Markers, Orientation, PlotModel, Series,
};
pub use poly::{roots, Poly};
pub use report::RootLocusReport;
pub use scalar::RealScalar;
pub use transfer::{TransferFunction, TransferFunction64};

pub type Poly64 = Poly<f64>;

#[doc(hidden)]
pub use util::__testing;
