//! Renderer independent description of a root locus plot.
//!
//! A [`PlotModel`] lists everything to draw in plain data. Rendering is left
//! to the caller, see `demos/root_locus_plot.rs` for a `plotly` renderer.

use itertools::Itertools;
use num::Complex;

use crate::{config::AxisLimits, AnalysisConfig, RealScalar, RootLocusReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerShape {
    /// Poles
    Cross,
    /// Zeros
    Circle,
    /// Centroid
    Plus,
    /// Breakaway points
    Diamond,
    /// Imaginary axis crossings
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A connected line through `points`
#[derive(Clone, Debug, PartialEq)]
pub struct Series<T> {
    pub name: String,
    pub points: Vec<(T, T)>,
    pub style: LineStyle,
}

/// Unconnected markers
#[derive(Clone, Debug, PartialEq)]
pub struct Markers<T> {
    pub name: String,
    pub points: Vec<(T, T)>,
    pub shape: MarkerShape,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation<T> {
    pub x: T,
    pub y: T,
    pub text: String,
}

/// An infinite horizontal or vertical line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideLine<T> {
    pub orientation: Orientation,
    pub at: T,
    pub style: LineStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlotModel<T> {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Locus branches and asymptotes
    pub series: Vec<Series<T>>,
    pub markers: Vec<Markers<T>>,
    /// Gain values along the first branch
    pub annotations: Vec<Annotation<T>>,
    /// Axis lines and the dashed guides at the real parts of the poles
    pub guides: Vec<GuideLine<T>>,
    pub limits: AxisLimits<T>,
}

fn to_xy<T: RealScalar>(z: &Complex<T>) -> (T, T) {
    (z.re, z.im)
}

impl<T: RealScalar> PlotModel<T> {
    /// Lay out the plot of `report`.
    #[must_use]
    pub fn from_report(report: &RootLocusReport<T>, config: &AnalysisConfig<T>) -> Self {
        let geometry = &report.geometry;
        let branches = report.locus.branches();

        let mut series = branches
            .iter()
            .enumerate()
            .map(|(i, branch)| Series {
                name: format!("branch {}", i + 1),
                points: branch.iter().map(to_xy).collect_vec(),
                style: LineStyle::Solid,
            })
            .collect_vec();
        series.extend(
            geometry
                .asymptote_lines(&config.asymptote_grid)
                .into_iter()
                .map(|line| Series {
                    name: format!("asymptote {:.1}°", line.angle.to_degrees()),
                    points: line.points,
                    style: LineStyle::Dashed,
                }),
        );

        let zero = T::zero();
        let mut markers = vec![
            Markers {
                name: "poles".to_owned(),
                points: geometry.poles.iter().map(to_xy).collect_vec(),
                shape: MarkerShape::Cross,
            },
            Markers {
                name: "zeros".to_owned(),
                points: geometry.zeros.iter().map(to_xy).collect_vec(),
                shape: MarkerShape::Circle,
            },
        ];
        if let Some(c) = geometry.centroid {
            markers.push(Markers {
                name: "centroid".to_owned(),
                points: vec![(c, zero)],
                shape: MarkerShape::Plus,
            });
        }
        let breakaway = geometry
            .breakaway_exact
            .iter()
            .chain(&geometry.breakaway_points)
            .map(|b| (*b, zero))
            .collect_vec();
        if !breakaway.is_empty() {
            markers.push(Markers {
                name: "breakaway points".to_owned(),
                points: breakaway,
                shape: MarkerShape::Diamond,
            });
        }
        if !geometry.crossings.is_empty() {
            markers.push(Markers {
                name: "jw crossings".to_owned(),
                points: geometry
                    .crossings
                    .iter()
                    .map(|c| (zero, c.frequency))
                    .collect_vec(),
                shape: MarkerShape::Square,
            });
        }

        let annotations = match branches.first() {
            Some(first) => {
                // about ten labels, whatever the number of samples
                let step = (first.len() / 10).max(1);
                report
                    .locus
                    .gains()
                    .zip(first)
                    .step_by(step)
                    .map(|(k, z)| Annotation {
                        x: z.re,
                        y: z.im,
                        text: format!("K={k:.2}"),
                    })
                    .collect_vec()
            }
            None => vec![],
        };

        let mut guides = vec![
            GuideLine {
                orientation: Orientation::Horizontal,
                at: zero,
                style: LineStyle::Solid,
            },
            GuideLine {
                orientation: Orientation::Vertical,
                at: zero,
                style: LineStyle::Solid,
            },
        ];
        guides.extend(geometry.poles.iter().map(|p| GuideLine {
            orientation: Orientation::Vertical,
            at: p.re,
            style: LineStyle::Dashed,
        }));

        Self {
            title: format!("Root locus of G(s) = {}", report.transfer),
            x_label: "Real axis".to_owned(),
            y_label: "Imaginary axis".to_owned(),
            series,
            markers,
            annotations,
            guides,
            limits: config.axis_limits,
        }
    }
}
