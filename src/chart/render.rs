use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

use image::RgbImage;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::{Axis, LineStyle, Marker, Series, Snapshot};
use crate::config::{CAPTION_FONT_SIZE, FIGURE_SIZE};
use crate::error::ExploreError;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Draw the snapshot into an in-memory RGB buffer.
pub(crate) fn rasterize(snapshot: &Snapshot) -> Result<RgbImage, ExploreError> {
    let (w, h) = FIGURE_SIZE;
    let mut buffer = vec![0u8; (w * h * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        draw(&root, snapshot)?;
        root.present().map_err(render_err)?;
    }
    RgbImage::from_raw(w, h, buffer)
        .ok_or_else(|| ExploreError::Render("raster buffer does not match figure size".into()))
}

/// Draw the snapshot as an SVG document at `path`.
pub(crate) fn write_svg(snapshot: &Snapshot, path: &Path) -> Result<(), ExploreError> {
    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    draw(&root, snapshot)?;
    root.present().map_err(|e| ExploreError::Save {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn render_err<E: Display>(e: E) -> ExploreError {
    ExploreError::Render(e.to_string())
}

// ---------------------------------------------------------------------------
// Chart body
// ---------------------------------------------------------------------------

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    snapshot: &Snapshot,
) -> Result<(), ExploreError> {
    let (x_range, y_range) = ranges(snapshot);

    let mut chart = ChartBuilder::on(root)
        .caption(&snapshot.title, ("sans-serif", CAPTION_FONT_SIZE))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    let x_fmt = tick_formatter(&snapshot.x_axis);
    let y_fmt = tick_formatter(&snapshot.y_axis);
    chart
        .configure_mesh()
        .x_desc(snapshot.x_label.as_str())
        .y_desc(snapshot.y_label.as_str())
        .x_labels(tick_count(&snapshot.x_axis))
        .y_labels(tick_count(&snapshot.y_axis))
        .x_label_formatter(&*x_fmt)
        .y_label_formatter(&*y_fmt)
        .draw()
        .map_err(render_err)?;

    match &snapshot.series {
        Series::Bars { bins, fill, edge } => {
            let bar = |b: &super::Bin| [(b.start, 0.0), (b.end, b.count as f64)];
            chart
                .draw_series(bins.iter().map(|b| Rectangle::new(bar(b), fill.filled())))
                .map_err(render_err)?;
            chart
                .draw_series(bins.iter().map(|b| Rectangle::new(bar(b), edge.stroke_width(1))))
                .map_err(render_err)?;
        }
        Series::Line {
            points,
            color,
            marker,
            style,
            width,
        } => {
            let stroke = color.stroke_width(*width);
            let path = points.iter().copied();
            match style {
                LineStyle::Solid => {
                    chart
                        .draw_series(LineSeries::new(path, stroke))
                        .map_err(render_err)?;
                }
                LineStyle::Dashed => {
                    chart
                        .draw_series(DashedLineSeries::new(path, 8, 4, stroke))
                        .map_err(render_err)?;
                }
                LineStyle::Dotted => {
                    chart
                        .draw_series(DashedLineSeries::new(path, 2, 3, stroke))
                        .map_err(render_err)?;
                }
                LineStyle::None => {}
            }
            draw_markers(&mut chart, points, *marker, 3, *color)?;
        }
        Series::Scatter {
            points,
            color,
            marker,
            radius,
        } => draw_markers(&mut chart, points, *marker, *radius, *color)?,
    }
    Ok(())
}

fn draw_markers<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    points: &[(f64, f64)],
    marker: Marker,
    radius: u32,
    color: RGBColor,
) -> Result<(), ExploreError> {
    let fill = color.filled();
    let stroke = color.stroke_width(1);
    let r = radius as i32;
    let pts = points.iter().copied();

    let drawn = match marker {
        Marker::None => return Ok(()),
        Marker::Circle => chart.draw_series(pts.map(move |p| Circle::new(p, radius, fill))),
        Marker::Point => chart.draw_series(pts.map(move |p| Circle::new(p, 1, fill))),
        Marker::Triangle => {
            chart.draw_series(pts.map(move |p| TriangleMarker::new(p, radius, fill)))
        }
        Marker::Cross => chart.draw_series(pts.map(move |p| Cross::new(p, radius, stroke))),
        Marker::Square => chart.draw_series(
            pts.map(move |p| EmptyElement::at(p) + Rectangle::new([(-r, -r), (r, r)], fill)),
        ),
        Marker::Plus => chart.draw_series(pts.map(move |p| {
            EmptyElement::at(p)
                + PathElement::new(vec![(-r, 0), (r, 0)], stroke)
                + PathElement::new(vec![(0, -r), (0, r)], stroke)
        })),
    };
    drawn.map(|_| ()).map_err(render_err)
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

fn ranges(snapshot: &Snapshot) -> (Range<f64>, Range<f64>) {
    match &snapshot.series {
        Series::Bars { bins, .. } => {
            let lo = bins.first().map_or(0.0, |b| b.start);
            let hi = bins.last().map_or(1.0, |b| b.end);
            let top = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
            (padded(lo, hi), 0.0..top * 1.05)
        }
        Series::Line { points, .. } | Series::Scatter { points, .. } => (
            axis_range(points.iter().map(|p| p.0), &snapshot.x_axis),
            axis_range(points.iter().map(|p| p.1), &snapshot.y_axis),
        ),
    }
}

fn axis_range(values: impl Iterator<Item = f64>, axis: &Axis) -> Range<f64> {
    if let Axis::Categorical(labels) = axis {
        return -0.5..(labels.len().max(1) as f64 - 0.5);
    }
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return 0.0..1.0;
    }
    padded(lo, hi)
}

/// Widen by 5% each side; a zero-width range becomes one unit wide.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn tick_count(axis: &Axis) -> usize {
    match axis {
        Axis::Numeric => 10,
        Axis::Categorical(labels) => labels.len().clamp(1, 12),
    }
}

fn tick_formatter(axis: &Axis) -> Box<dyn Fn(&f64) -> String + '_> {
    match axis {
        Axis::Numeric => Box::new(|v: &f64| format_tick(*v)),
        Axis::Categorical(labels) => Box::new(move |v: &f64| {
            let nearest = v.round();
            if (v - nearest).abs() > 1e-6 || nearest < 0.0 {
                return String::new();
            }
            labels.get(nearest as usize).cloned().unwrap_or_default()
        }),
    }
}

fn format_tick(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_drop_trailing_zeros() {
        assert_eq!(format_tick(3.0), "3");
        assert_eq!(format_tick(2.50), "2.5");
        assert_eq!(format_tick(-0.126), "-0.13");
    }

    #[test]
    fn categorical_ticks_only_on_positions() {
        let axis = Axis::Categorical(vec!["a".into(), "b".into()]);
        let fmt = tick_formatter(&axis);
        assert_eq!(fmt(&1.0), "b");
        assert_eq!(fmt(&0.5), "");
        assert_eq!(fmt(&7.0), "");
    }

    #[test]
    fn ranges_are_padded() {
        let r = padded(0.0, 10.0);
        assert_eq!((r.start, r.end), (-0.5, 10.5));
        let flat = padded(3.0, 3.0);
        assert_eq!((flat.start, flat.end), (2.5, 3.5));
    }
}
