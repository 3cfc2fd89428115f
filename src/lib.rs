//! Exploratory analysis of football match results.
//!
//! Load a season from CSV, JSON or an HTTP API into a [`Dataset`], inspect
//! and fill missing values, and draw histograms, line plots and scatter
//! plots that are kept by name and written to disk on request.
//!
//! ```no_run
//! use pitchside::{Explorer, FillStrategy, HistogramConfig};
//!
//! let mut explorer = Explorer::new();
//! explorer.load_from_csv("season-2324.csv")?;
//! explorer.report_missing_values();
//! explorer.fill_missing_values(&FillStrategy::Median, Some(&["FTHG"]))?;
//! explorer.add_histogram("FTHG", "hist_goals", &HistogramConfig::default())?;
//! explorer.save_all_figures(".", "png")?;
//! # Ok::<(), pitchside::ExploreError>(())
//! ```

pub mod analysis;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod explorer;

pub use chart::{ChartKind, Figure, HistogramConfig, LineConfig, LineStyle, Marker, ScatterConfig};
pub use data::missing::{FillStrategy, FillSummary, MissingCounts, SkipReason};
pub use data::model::{CellValue, Column, DType, Dataset};
pub use error::ExploreError;
pub use explorer::{Explorer, Removal};
