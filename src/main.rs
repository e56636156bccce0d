//! Interactive root locus analysis.
//!
//! Reads the numerator and denominator of `G(s)` from the console, then
//! optionally a complex point to evaluate `G` at and the plot axis limits,
//! and prints the analysis report.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::LevelFilter;
use num::complex::Complex64;
use root_locus::{
    parse_complex, AnalysisConfig, AxisLimits, PlotModel, RootLocusReport, TransferFunction64,
};
use simple_logger::SimpleLogger;

/// Print `message` and read one trimmed line, `None` at end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> anyhow::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

/// Ask for the evaluation point, asking again once if it does not parse.
fn prompt_point(input: &mut impl BufRead) -> anyhow::Result<Option<Complex64>> {
    for attempt in 0..2 {
        let Some(text) = prompt(
            input,
            "Evaluate G at a complex point, e.g. 7+9j (empty to skip): ",
        )?
        else {
            return Ok(None);
        };
        if text.is_empty() {
            return Ok(None);
        }
        match parse_complex(&text) {
            Ok(z) => return Ok(Some(z)),
            Err(e) if attempt == 0 => println!("{e}, please try again"),
            Err(e) => println!("{e}, skipping the evaluation"),
        }
    }
    Ok(None)
}

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .context("failed to set up logging")?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let num = prompt(
        &mut input,
        "Enter the numerator as a function of s (e.g. 2*s + 4): ",
    )?
    .context("no numerator given")?;
    let den = prompt(
        &mut input,
        "Enter the denominator as a function of s (e.g. s**2 + 3*s + 6): ",
    )?
    .context("no denominator given")?;
    let tf = TransferFunction64::parse(&num, &den).context("invalid transfer function")?;

    let point = prompt_point(&mut input)?;

    let mut config = AnalysisConfig::default();
    if let Some(text) = prompt(
        &mut input,
        "Axis limits as xmin xmax ymin ymax (empty for -10 2 -10 10): ",
    )? {
        if !text.is_empty() {
            match text.parse::<AxisLimits<f64>>() {
                Ok(limits) => config = config.with_axis_limits(limits),
                Err(e) => log::warn!("{e}, using the default axis limits"),
            }
        }
    }

    let mut report = RootLocusReport::analyze(tf, &config).context("analysis failed")?;
    if let Some(point) = point {
        match report.clone().with_evaluation(point, &config) {
            Ok(with_eval) => report = with_eval,
            Err(e) => println!("cannot evaluate G({point}): {e}"),
        }
    }
    println!("\n{report}");

    let plot = PlotModel::from_report(&report, &config);
    log::info!(
        "plot ready: {} lines, {} marker groups, {} gain labels",
        plot.series.len(),
        plot.markers.len(),
        plot.annotations.len()
    );
    Ok(())
}
