use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ExploreError;

// ---------------------------------------------------------------------------
// Marker / line style
// ---------------------------------------------------------------------------

/// Point marker, parsed from the usual one-character codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Circle,
    Square,
    Triangle,
    Cross,
    Plus,
    Point,
    None,
}

impl FromStr for Marker {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "o" => Marker::Circle,
            "s" => Marker::Square,
            "^" => Marker::Triangle,
            "x" => Marker::Cross,
            "+" => Marker::Plus,
            "." => Marker::Point,
            "" | "none" | "None" => Marker::None,
            other => return Err(ExploreError::invalid("marker", other)),
        })
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Marker::Circle => "o",
            Marker::Square => "s",
            Marker::Triangle => "^",
            Marker::Cross => "x",
            Marker::Plus => "+",
            Marker::Point => ".",
            Marker::None => "none",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    None,
}

impl FromStr for LineStyle {
    type Err = ExploreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" | "solid" => LineStyle::Solid,
            "--" | "dashed" => LineStyle::Dashed,
            ":" | "dotted" => LineStyle::Dotted,
            "" | "none" | "None" => LineStyle::None,
            other => return Err(ExploreError::invalid("line style", other)),
        })
    }
}

// ---------------------------------------------------------------------------
// Per-chart options
// ---------------------------------------------------------------------------

/// Options for [`Explorer::add_histogram`](crate::Explorer::add_histogram).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramConfig {
    pub bins: usize,
    pub color: String,
    pub edge_color: String,
    /// Defaults to `Histogram: <column>`.
    pub title: Option<String>,
    /// Written immediately when set.
    pub save_path: Option<PathBuf>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: 15,
            color: "skyblue".into(),
            edge_color: "black".into(),
            title: None,
            save_path: None,
        }
    }
}

/// Options for [`Explorer::add_line_plot`](crate::Explorer::add_line_plot).
#[derive(Debug, Clone, PartialEq)]
pub struct LineConfig {
    pub color: String,
    pub marker: Marker,
    pub line_style: LineStyle,
    pub line_width: u32,
    pub title: Option<String>,
    pub save_path: Option<PathBuf>,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            color: "blue".into(),
            marker: Marker::Circle,
            line_style: LineStyle::Solid,
            line_width: 1,
            title: None,
            save_path: None,
        }
    }
}

/// Options for [`Explorer::add_scatter_plot`](crate::Explorer::add_scatter_plot).
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterConfig {
    pub color: String,
    pub marker: Marker,
    /// Marker area in points², as matplotlib's `s`.
    pub size: f64,
    pub title: Option<String>,
    pub save_path: Option<PathBuf>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            color: "red".into(),
            marker: Marker::Circle,
            size: 20.0,
            title: None,
            save_path: None,
        }
    }
}
