/// Chart layer: options, the owned data snapshot, and rendering.
///
/// Architecture:
/// ```text
///   Column(s) + *Config
///        │
///        ▼
///   ┌──────────┐
///   │ Snapshot  │  owned points / bins, parsed colours, title, labels
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  render   │  plotters → RGB raster (kept) or SVG (on save)
///   └──────────┘
/// ```
pub mod config;
mod render;

use std::collections::HashMap;
use std::path::Path;

use image::RgbImage;
use plotters::style::RGBColor;

pub use config::{HistogramConfig, LineConfig, LineStyle, Marker, ScatterConfig};

use crate::color::parse_color;
use crate::config::FIGURE_DPI;
use crate::data::model::{CellValue, Column};
use crate::error::ExploreError;

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Histogram,
    Line,
    Scatter,
}

/// How an axis maps cell values to positions.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    Numeric,
    /// Each distinct value sits at its first-seen index.
    Categorical(Vec<String>),
}

/// One histogram bar: `[start, end)`, the last bar closed on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub(crate) enum Series {
    Bars {
        bins: Vec<Bin>,
        fill: RGBColor,
        edge: RGBColor,
    },
    Line {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        marker: Marker,
        style: LineStyle,
        width: u32,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        color: RGBColor,
        marker: Marker,
        radius: u32,
    },
}

/// Everything needed to draw a figure again, detached from the dataset.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Series,
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

/// A rendered chart. The raster is produced once, at creation.
#[derive(Debug, Clone)]
pub struct Figure {
    kind: ChartKind,
    snapshot: Snapshot,
    raster: RgbImage,
}

impl Figure {
    pub(crate) fn histogram(column: &Column, config: &HistogramConfig) -> Result<Self, ExploreError> {
        if config.bins == 0 {
            return Err(ExploreError::invalid("bin count", "0"));
        }
        if !column.dtype.is_numeric() {
            return Err(ExploreError::NonNumericColumn(column.name.clone()));
        }
        let fill = parse_color(&config.color)?;
        let edge = parse_color(&config.edge_color)?;

        let snapshot = Snapshot {
            title: config
                .title
                .clone()
                .unwrap_or_else(|| format!("Histogram: {}", column.name)),
            x_label: column.name.clone(),
            y_label: "Frequency".into(),
            x_axis: Axis::Numeric,
            y_axis: Axis::Numeric,
            series: Series::Bars {
                bins: histogram_bins(&column.numeric_values(), config.bins),
                fill,
                edge,
            },
        };
        Self::render(ChartKind::Histogram, snapshot)
    }

    pub(crate) fn line(x: &Column, y: &Column, config: &LineConfig) -> Result<Self, ExploreError> {
        let color = parse_color(&config.color)?;
        let (points, x_axis, y_axis) = paired_points(x, y);
        let snapshot = Snapshot {
            title: config
                .title
                .clone()
                .unwrap_or_else(|| format!("Line plot: {} vs {}", x.name, y.name)),
            x_label: x.name.clone(),
            y_label: y.name.clone(),
            x_axis,
            y_axis,
            series: Series::Line {
                points,
                color,
                marker: config.marker,
                style: config.line_style,
                width: config.line_width.max(1),
            },
        };
        Self::render(ChartKind::Line, snapshot)
    }

    pub(crate) fn scatter(x: &Column, y: &Column, config: &ScatterConfig) -> Result<Self, ExploreError> {
        if !(config.size.is_finite() && config.size > 0.0) {
            return Err(ExploreError::invalid("point size", config.size.to_string()));
        }
        let color = parse_color(&config.color)?;
        let (points, x_axis, y_axis) = paired_points(x, y);
        let snapshot = Snapshot {
            title: config
                .title
                .clone()
                .unwrap_or_else(|| format!("Scatter plot: {} vs {}", x.name, y.name)),
            x_label: x.name.clone(),
            y_label: y.name.clone(),
            x_axis,
            y_axis,
            series: Series::Scatter {
                points,
                color,
                marker: config.marker,
                radius: area_to_radius(config.size),
            },
        };
        Self::render(ChartKind::Scatter, snapshot)
    }

    fn render(kind: ChartKind, snapshot: Snapshot) -> Result<Self, ExploreError> {
        let raster = render::rasterize(&snapshot)?;
        Ok(Figure {
            kind,
            snapshot,
            raster,
        })
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.snapshot.title
    }

    pub fn x_label(&self) -> &str {
        &self.snapshot.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.snapshot.y_label
    }

    pub fn x_axis(&self) -> &Axis {
        &self.snapshot.x_axis
    }

    /// The rendered pixels.
    pub fn image(&self) -> &RgbImage {
        &self.raster
    }

    /// Histogram bars, for histogram figures.
    pub fn bins(&self) -> Option<&[Bin]> {
        match &self.snapshot.series {
            Series::Bars { bins, .. } => Some(bins),
            _ => None,
        }
    }

    /// Plotted points, for line and scatter figures.
    pub fn points(&self) -> Option<&[(f64, f64)]> {
        match &self.snapshot.series {
            Series::Line { points, .. } | Series::Scatter { points, .. } => Some(points),
            Series::Bars { .. } => None,
        }
    }

    /// Write the figure to `path`. `.svg` is re-drawn as vector output;
    /// other extensions are encoded from the raster.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ExploreError> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        if is_svg {
            render::write_svg(&self.snapshot, path)
        } else {
            self.raster.save(path).map_err(|e| ExploreError::Save {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Data preparation
// ---------------------------------------------------------------------------

/// Split the value range into `n` equal-width bins and count into them.
pub fn histogram_bins(values: &[f64], n: usize) -> Vec<Bin> {
    let n = n.max(1);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if values.is_empty() {
        (0.0, 1.0)
    } else if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = (hi - lo) / n as f64;
    let mut counts = vec![0usize; n];
    for &v in values {
        let idx = ((v - lo) / width).floor() as usize;
        counts[idx.min(n - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: if i + 1 == n { hi } else { lo + (i + 1) as f64 * width },
            count,
        })
        .collect()
}

/// Matplotlib's `s` is an area in points²; convert to a pixel radius.
fn area_to_radius(area: f64) -> u32 {
    let radius_pt = area.sqrt() / 2.0;
    ((radius_pt * FIGURE_DPI / 72.0).round() as u32).max(1)
}

enum AxisEncoder {
    Numeric,
    Categorical {
        labels: Vec<String>,
        index: HashMap<String, usize>,
    },
}

impl AxisEncoder {
    fn for_column(column: &Column) -> Self {
        if column.dtype.is_numeric() {
            AxisEncoder::Numeric
        } else {
            AxisEncoder::Categorical {
                labels: Vec::new(),
                index: HashMap::new(),
            }
        }
    }

    fn encode(&mut self, value: &CellValue) -> Option<f64> {
        match self {
            AxisEncoder::Numeric => value.as_f64(),
            AxisEncoder::Categorical { labels, index } => {
                let key = value.to_string();
                let next = labels.len();
                let pos = *index.entry(key.clone()).or_insert_with(|| {
                    labels.push(key);
                    next
                });
                Some(pos as f64)
            }
        }
    }

    fn into_axis(self) -> Axis {
        match self {
            AxisEncoder::Numeric => Axis::Numeric,
            AxisEncoder::Categorical { labels, .. } => Axis::Categorical(labels),
        }
    }
}

/// Row-aligned `(x, y)` points, skipping rows where either side is missing.
fn paired_points(x: &Column, y: &Column) -> (Vec<(f64, f64)>, Axis, Axis) {
    let mut xs = AxisEncoder::for_column(x);
    let mut ys = AxisEncoder::for_column(y);
    let points = x
        .values
        .iter()
        .zip(&y.values)
        .filter(|(a, b)| !a.is_null() && !b.is_null())
        .filter_map(|(a, b)| Some((xs.encode(a)?, ys.encode(b)?)))
        .collect();
    (points, xs.into_axis(), ys.into_axis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_bin_is_closed() {
        let bins = histogram_bins(&[0.0, 1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(bins.len(), 2);
        assert_eq!((bins[0].start, bins[0].end, bins[0].count), (0.0, 2.0, 2));
        assert_eq!((bins[1].start, bins[1].end, bins[1].count), (2.0, 4.0, 3));
    }

    #[test]
    fn constant_values_get_a_unit_range() {
        let bins = histogram_bins(&[2.0, 2.0], 4);
        assert_eq!(bins[0].start, 1.5);
        assert_eq!(bins[3].end, 2.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn scatter_area_converts_to_pixels() {
        assert_eq!(area_to_radius(20.0), 3);
        assert_eq!(area_to_radius(0.01), 1);
    }

    #[test]
    fn text_axis_is_categorical_in_first_seen_order() {
        let x = Column::new(
            "Date",
            vec![CellValue::from("b"), CellValue::from("a"), CellValue::from("b")],
        );
        let y = Column::new(
            "FTHG",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Integer(3)],
        );
        let (points, x_axis, y_axis) = paired_points(&x, &y);
        assert_eq!(points, vec![(0.0, 1.0), (0.0, 3.0)]);
        assert_eq!(x_axis, Axis::Categorical(vec!["b".into()]));
        assert_eq!(y_axis, Axis::Numeric);
    }
}
