//! SVG charts of lesson results
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use probsim::conditional::SimpsonTable;
use probsim::geometry::{Experiment, Point, Square};
use probsim::summary::DiscreteSummary;
use std::path::Path;

const SIZE: (u32, u32) = (1000, 600);
const WIDE: (u32, u32) = (1400, 600);
const FONT: (&str, u32) = ("sans-serif", 20);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// A named polyline
pub struct Series<'a> {
    pub label: String,
    pub xs: &'a [f64],
    pub ys: &'a [f64],
}

fn root(path: &Path, size: (u32, u32)) -> Result<Area<'_>> {
    tracing::info!(path = %path.display(), "writing chart");
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    Ok(root)
}

fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |acc, v| {
        (acc.0.min(v), acc.1.max(v))
    });
    if lo.is_finite() && hi.is_finite() && lo < hi {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

/// Densities of `xs` in `bins` equal bins over [lo, hi), as (left, right,
/// height) triples
pub fn density_bins(
    xs: &[f64],
    lo: f64,
    hi: f64,
    bins: usize,
) -> Vec<(f64, f64, f64)> {
    let bins = bins.max(1);
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0_usize; bins];
    xs.iter()
        .filter(|x| (lo..hi).contains(*x))
        .for_each(|x| {
            let ix = (((x - lo) / width) as usize).min(bins - 1);
            counts[ix] += 1;
        });
    let scale = (xs.len().max(1) as f64 * width).recip();
    counts
        .iter()
        .enumerate()
        .map(|(ix, &c)| {
            let left = lo + ix as f64 * width;
            (left, left + width, c as f64 * scale)
        })
        .collect()
}

/// Running totals of `density_bins`: the share of draws below each bin's
/// right edge
pub fn cumulative_bins(bins: &[(f64, f64, f64)]) -> Vec<(f64, f64, f64)> {
    bins.iter()
        .scan(0.0, |acc, &(lo, hi, h)| {
            *acc += h * (hi - lo);
            Some((lo, hi, *acc))
        })
        .collect()
}

/// Scatter of the points coloured by region next to theory/experiment bars
pub fn regions(
    path: &Path,
    square: &Square,
    points: &[Point],
    classes: &[usize],
    experiment: &Experiment,
) -> Result<()> {
    let root = root(path, WIDE)?;
    let (left, right) = root.split_horizontally(WIDE.0 / 2);

    let (x0, y0) = (square.origin().x, square.origin().y);
    let side = square.side();
    let mut scatter = ChartBuilder::on(&left)
        .caption("uniform points by region", FONT)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x0..x0 + side, y0..y0 + side)?;
    scatter.configure_mesh().draw()?;
    scatter.draw_series(points.iter().zip(classes).map(|(p, &class)| {
        Circle::new((p.x, p.y), 1, Palette99::pick(class).filled())
    }))?;

    let summaries = experiment.regions();
    let top = summaries
        .iter()
        .map(|r| r.theoretical.max(r.empirical))
        .fold(0.0, f64::max);
    let mut bars = ChartBuilder::on(&right)
        .caption(format!("N = {}", experiment.n()), FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..summaries.len() as f64, 0.0..top * 1.15)?;
    bars.configure_mesh()
        .disable_x_mesh()
        .x_labels(summaries.len())
        .x_label_formatter(&|x| {
            summaries
                .get(x.floor() as usize)
                .map(|r| r.label.clone())
                .unwrap_or_default()
        })
        .y_desc("probability")
        .draw()?;

    let halves = [
        ("theory", BLUE.mix(0.6), 0.1),
        ("experiment", RED.mix(0.6), 0.55),
    ];
    for (ix, (label, colour, offset)) in halves.into_iter().enumerate() {
        bars.draw_series(summaries.iter().enumerate().map(|(jx, r)| {
            let x = jx as f64 + offset;
            let p = if ix == 0 { r.theoretical } else { r.empirical };
            Rectangle::new([(x, 0.0), (x + 0.35, p)], colour.filled())
        }))?
        .label(label)
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 5), (x + 15, y + 5)], colour.filled())
        });
    }
    bars.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Line chart with an optional horizontal reference line
pub fn lines(
    path: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[Series],
    reference: Option<f64>,
) -> Result<()> {
    let root = root(path, SIZE)?;
    let (xlo, xhi) = range(series.iter().flat_map(|s| s.xs.iter().copied()));
    let (ylo, yhi) = range(
        series
            .iter()
            .flat_map(|s| s.ys.iter().copied())
            .chain(reference),
    );
    let pad = 0.05 * (yhi - ylo);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xlo..xhi, (ylo - pad)..(yhi + pad))?;
    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    for (ix, s) in series.iter().enumerate() {
        let colour = Palette99::pick(ix);
        chart
            .draw_series(LineSeries::new(
                s.xs.iter().copied().zip(s.ys.iter().copied()),
                colour.stroke_width(2),
            ))?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], Palette99::pick(ix))
            });
    }

    if let Some(y) = reference {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(xlo, y), (xhi, y)],
                BLACK.mix(0.6),
            )))?
            .label(format!("P = {}", y))
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], BLACK)
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Success rate bars for every group and treatment, pooled rates last
pub fn simpson(path: &Path, table: &SimpsonTable) -> Result<()> {
    let root = root(path, SIZE)?;
    let mut groups: Vec<String> =
        table.groups().into_iter().map(String::from).collect();
    groups.push(String::from("pooled"));
    let treatments = table.treatments();
    let aggregate = table.aggregate();
    let width = 0.8 / treatments.len() as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption("success rate by group", FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..groups.len() as f64, 0.0..1.0)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(groups.len())
        .x_label_formatter(&|x| {
            groups.get(x.floor() as usize).cloned().unwrap_or_default()
        })
        .y_desc("rate")
        .draw()?;

    for (tx, treatment) in treatments.iter().enumerate() {
        let colour = Palette99::pick(tx).mix(0.8);
        let rates = groups.iter().enumerate().filter_map(|(gx, group)| {
            let rate = if gx + 1 == groups.len() {
                aggregate
                    .iter()
                    .find(|a| a.treatment == *treatment)
                    .map(|a| a.rate)
            } else {
                table.rate(group, treatment)
            };
            rate.map(|r| (gx, r))
        });
        chart
            .draw_series(rates.map(|(gx, r)| {
                let x = gx as f64 + 0.1 + tx as f64 * width;
                Rectangle::new([(x, 0.0), (x + width, r)], colour.filled())
            }))?
            .label(treatment.to_string())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 15, y + 5)], colour.filled())
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Labelled count bars, one per outcome
pub fn counts(
    path: &Path,
    caption: &str,
    bars: &[(&str, usize)],
) -> Result<()> {
    let root = root(path, SIZE)?;
    let top = bars.iter().map(|b| b.1).max().unwrap_or(0).max(1) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..bars.len() as f64, 0.0..top * 1.2)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|x| {
            bars.get(x.floor() as usize)
                .map(|b| b.0.to_string())
                .unwrap_or_default()
        })
        .y_desc("count")
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(ix, &(_, n))| {
        let x = ix as f64;
        let style = Palette99::pick(ix).mix(0.7).filled();
        Rectangle::new([(x + 0.2, 0.0), (x + 0.8, n as f64)], style)
    }))?;
    chart.draw_series(bars.iter().enumerate().map(|(ix, &(_, n))| {
        let at = (ix as f64 + 0.45, n as f64 + top * 0.06);
        Text::new(n.to_string(), at, FONT)
    }))?;

    root.present()?;
    Ok(())
}

/// One PMF bar chart per distribution on a grid
pub fn pmfs(path: &Path, summaries: &[DiscreteSummary]) -> Result<()> {
    let root = root(path, (1200, 800))?;
    let cols = 2;
    let rows = ((summaries.len() + cols - 1) / cols).max(1);
    let areas = root.split_evenly((rows, cols));

    for (area, summary) in areas.iter().zip(summaries) {
        let top = summary.pmf.iter().copied().fold(0.0, f64::max);
        let mut chart = ChartBuilder::on(area)
            .caption(&summary.name, FONT)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(
                -0.5..summary.support_max as f64 + 0.5,
                0.0..top * 1.15,
            )?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("P(X = k)")
            .draw()?;
        chart.draw_series(summary.pmf.iter().enumerate().map(|(k, &p)| {
            let x = k as f64;
            let colour = if k as u32 == summary.mode { RED } else { BLUE };
            let style = colour.mix(0.7).filled();
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, p)], style)
        }))?;
    }

    root.present()?;
    Ok(())
}

/// Curves over a histogram of draws
pub fn histogram(
    path: &Path,
    caption: &str,
    y_desc: &str,
    samples: &[f64],
    bins: &[(f64, f64, f64)],
    series: &[Series],
) -> Result<()> {
    let root = root(path, SIZE)?;
    let (xlo, xhi) = range(
        bins.iter()
            .flat_map(|b| [b.0, b.1])
            .chain(series.iter().flat_map(|s| s.xs.iter().copied())),
    );
    let top = bins
        .iter()
        .map(|b| b.2)
        .chain(series.iter().flat_map(|s| s.ys.iter().copied()))
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} (n = {})", caption, samples.len()), FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xlo..xhi, 0.0..top * 1.1)?;
    chart.configure_mesh().y_desc(y_desc).draw()?;

    chart
        .draw_series(bins.iter().map(|&(lo, hi, h)| {
            Rectangle::new([(lo, 0.0), (hi, h)], BLUE.mix(0.3).filled())
        }))?
        .label("draws")
        .legend(|(x, y)| {
            let style = BLUE.mix(0.3).filled();
            Rectangle::new([(x, y - 5), (x + 15, y + 5)], style)
        });

    for (ix, s) in series.iter().enumerate() {
        let colour = Palette99::pick(ix + 1);
        chart
            .draw_series(LineSeries::new(
                s.xs.iter().copied().zip(s.ys.iter().copied()),
                colour.stroke_width(2),
            ))?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                let colour = Palette99::pick(ix + 1);
                PathElement::new(vec![(x, y), (x + 20, y)], colour)
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
