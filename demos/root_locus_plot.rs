//! This example renders a root locus plot to HTML using the Plotly crate.
//!
//! Usage: `cargo run --example root_locus_plot -- "s + 3" "s(s + 1)(s + 2)(s + 4)" [output.html]`
//!
//! The output defaults to `temp/root_locus.html`; missing directories are created.

use std::path::Path;

use itertools::Itertools;
use plotly::{
    color::NamedColor,
    common::{DashType, Line, Marker, MarkerSymbol, Mode, Title},
    layout::Axis,
    Layout, Plot, Scatter,
};
use root_locus::{
    AnalysisConfig, LineStyle, MarkerShape, Orientation, PlotModel, RootLocusReport,
    TransferFunction64,
};

fn main() -> anyhow::Result<()> {
    let _ = simple_logger::init_with_level(log::Level::Info);

    let mut args = std::env::args().skip(1);
    let num = args.next().unwrap_or_else(|| "1".to_owned());
    let den = args.next().unwrap_or_else(|| "s^2 + 5s + 6".to_owned());
    let location = args.next().unwrap_or_else(|| "temp/root_locus.html".to_owned());

    let tf = TransferFunction64::parse(&num, &den)?;
    let config = AnalysisConfig::default();
    let report = RootLocusReport::analyze(tf, &config)?;
    println!("{report}");

    create_parent_dir(Path::new(&location))?;
    let model = PlotModel::from_report(&report, &config);
    render(&model).write_html(&location);
    println!("plot written to {location}");
    Ok(())
}

/// Create the directory that will hold `location`, if it has one
fn create_parent_dir(location: &Path) -> std::io::Result<()> {
    match location.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

fn marker_style(shape: MarkerShape) -> (MarkerSymbol, NamedColor) {
    match shape {
        MarkerShape::Cross => (MarkerSymbol::X, NamedColor::Red),
        MarkerShape::Circle => (MarkerSymbol::CircleOpen, NamedColor::Blue),
        MarkerShape::Plus => (MarkerSymbol::Cross, NamedColor::Green),
        MarkerShape::Diamond => (MarkerSymbol::Diamond, NamedColor::Purple),
        MarkerShape::Square => (MarkerSymbol::Square, NamedColor::Orange),
    }
}

/// Translate the plot model into Plotly traces
fn render(model: &PlotModel<f64>) -> Plot {
    let mut plot = Plot::new();
    let limits = model.limits;

    for guide in &model.guides {
        let (x, y) = match guide.orientation {
            Orientation::Horizontal => (vec![limits.x_min, limits.x_max], vec![guide.at; 2]),
            Orientation::Vertical => (vec![guide.at; 2], vec![limits.y_min, limits.y_max]),
        };
        let line = match guide.style {
            LineStyle::Solid => Line::new().color(NamedColor::Black).width(1.0),
            LineStyle::Dashed => Line::new()
                .color(NamedColor::Grey)
                .dash(DashType::Dash)
                .width(0.7),
        };
        plot.add_trace(
            Scatter::new(x, y)
                .mode(Mode::Lines)
                .line(line)
                .show_legend(false),
        );
    }

    for series in &model.series {
        let (x, y): (Vec<f64>, Vec<f64>) = series.points.iter().copied().unzip();
        let line = match series.style {
            LineStyle::Solid => Line::new().width(2.0),
            LineStyle::Dashed => Line::new()
                .color(NamedColor::Black)
                .dash(DashType::Dash)
                .width(1.0),
        };
        plot.add_trace(
            Scatter::new(x, y)
                .mode(Mode::Lines)
                .line(line)
                .name(&series.name),
        );
    }

    for markers in model.markers.iter().filter(|m| !m.points.is_empty()) {
        let (symbol, color) = marker_style(markers.shape);
        let (x, y): (Vec<f64>, Vec<f64>) = markers.points.iter().copied().unzip();
        plot.add_trace(
            Scatter::new(x, y)
                .mode(Mode::Markers)
                .marker(Marker::new().symbol(symbol).size(12).color(color))
                .name(&markers.name),
        );
    }

    let (x, y, text): (Vec<f64>, Vec<f64>, Vec<String>) = model
        .annotations
        .iter()
        .map(|a| (a.x, a.y, a.text.clone()))
        .multiunzip();
    plot.add_trace(
        Scatter::new(x, y)
            .mode(Mode::Text)
            .text_array(text)
            .name("gain"),
    );

    plot.set_layout(
        Layout::new()
            .title(Title::new(&model.title))
            .x_axis(
                Axis::new()
                    .title(Title::new(&model.x_label))
                    .range(vec![limits.x_min, limits.x_max]),
            )
            .y_axis(
                Axis::new()
                    .title(Title::new(&model.y_label))
                    .range(vec![limits.y_min, limits.y_max]),
            ),
    );
    plot
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::create_parent_dir;

    #[test]
    fn creates_missing_output_dir() {
        let root = std::env::temp_dir().join(format!("root-locus-{}", fastrand::u64(..)));
        let location = root.join("nested").join("root_locus.html");
        create_parent_dir(&location).unwrap();
        assert!(root.join("nested").is_dir());
        // existing directories are fine too
        create_parent_dir(&location).unwrap();
        std::fs::remove_dir_all(&root).unwrap();

        create_parent_dir(Path::new("root_locus.html")).unwrap();
    }
}
