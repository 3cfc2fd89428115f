use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::chart::{Figure, HistogramConfig, LineConfig, ScatterConfig};
use crate::data::loader::{self, HttpStatus};
use crate::data::missing::{self, FillStrategy, FillSummary, MissingCounts};
use crate::data::model::{Column, Dataset};
use crate::data::query;
use crate::error::ExploreError;

/// Result of [`Explorer::remove_visualization`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotFound,
}

// ---------------------------------------------------------------------------
// Explorer
// ---------------------------------------------------------------------------

/// Holds at most one dataset and a collection of named figures.
///
/// Every operation fails soft: on error it logs, records the message in
/// `status_message`, returns the error, and leaves the dataset and figures
/// as they were.
#[derive(Debug, Default)]
pub struct Explorer {
    /// Loaded dataset (None until a load succeeds).
    dataset: Option<Dataset>,

    /// Figures by name.
    figures: BTreeMap<String, Figure>,

    /// Last error message, cleared by the next successful load.
    pub status_message: Option<String>,
}

impl Explorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Mutable access for derived columns and ad hoc edits.
    pub fn dataset_mut(&mut self) -> Option<&mut Dataset> {
        self.dataset.as_mut()
    }

    /// Replace the current dataset.
    pub fn set_dataset(&mut self, dataset: Dataset) -> &Dataset {
        self.status_message = None;
        self.dataset.insert(dataset)
    }

    pub fn figures(&self) -> &BTreeMap<String, Figure> {
        &self.figures
    }

    pub fn figure(&self, name: &str) -> Option<&Figure> {
        self.figures.get(name)
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    pub fn load_from_csv(&mut self, path: impl AsRef<Path>) -> Result<&Dataset, ExploreError> {
        let path = path.as_ref();
        let result = loader::load_csv(path);
        self.finish_load(format!("CSV {}", path.display()), result)
    }

    pub fn load_from_json(&mut self, path: impl AsRef<Path>) -> Result<&Dataset, ExploreError> {
        let path = path.as_ref();
        let result = loader::load_json(path);
        self.finish_load(format!("JSON {}", path.display()), result)
    }

    pub fn load_from_api(&mut self, url: &str) -> Result<&Dataset, ExploreError> {
        let result = loader::load_api(url);
        self.finish_load(format!("API {url}"), result)
    }

    fn finish_load(
        &mut self,
        origin: String,
        result: anyhow::Result<Dataset>,
    ) -> Result<&Dataset, ExploreError> {
        match result {
            Ok(dataset) => {
                info!(
                    "Loaded {} rows with columns {:?} from {origin}",
                    dataset.len(),
                    dataset.column_names()
                );
                Ok(self.set_dataset(dataset))
            }
            Err(e) => {
                let err = match e.downcast_ref::<HttpStatus>() {
                    Some(HttpStatus(code)) => ExploreError::HttpStatus(*code),
                    None => ExploreError::Load {
                        origin,
                        message: format!("{e:#}"),
                    },
                };
                Err(self.fail(err))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Missing values
    // -----------------------------------------------------------------------

    /// Missing entries per column, or `None` when nothing is loaded.
    ///
    /// Takes `&mut self` because a missing dataset is recorded in
    /// `status_message` like every other failed operation. Read-only callers
    /// can use [`missing::count_missing`] on [`Explorer::dataset`] instead.
    pub fn count_missing_values(&mut self) -> Option<MissingCounts> {
        if self.dataset.is_none() {
            self.fail(ExploreError::NoDataset);
            return None;
        }
        self.dataset.as_ref().map(missing::count_missing)
    }

    /// Print the missing-value report to stdout and return the counts behind it.
    pub fn report_missing_values(&mut self) -> Option<MissingCounts> {
        let counts = self.count_missing_values()?;
        println!("\n{counts}");
        Some(counts)
    }

    /// Fill missing entries in place; see [`missing::fill_missing`].
    pub fn fill_missing_values(
        &mut self,
        strategy: &FillStrategy,
        columns: Option<&[&str]>,
    ) -> Result<FillSummary, ExploreError> {
        let Some(ds) = self.dataset.as_mut() else {
            return Err(self.fail(ExploreError::NoDataset));
        };
        Ok(missing::fill_missing(ds, strategy, columns))
    }

    /// Remove columns by name, warning about names that are not present.
    /// Returns how many were removed.
    pub fn drop_columns(&mut self, names: &[&str]) -> Result<usize, ExploreError> {
        let Some(ds) = self.dataset.as_mut() else {
            return Err(self.fail(ExploreError::NoDataset));
        };
        let mut dropped = 0;
        for name in names {
            if ds.drop_column(name).is_some() {
                dropped += 1;
            } else {
                warn!("Column '{name}' does not exist, nothing to drop");
            }
        }
        Ok(dropped)
    }

    // -----------------------------------------------------------------------
    // Charts
    // -----------------------------------------------------------------------

    /// Histogram of a numeric column, stored under `figure_name`.
    pub fn add_histogram(
        &mut self,
        column: &str,
        figure_name: &str,
        config: &HistogramConfig,
    ) -> Result<&Figure, ExploreError> {
        let built = self
            .loaded()
            .and_then(|ds| query::column(ds, column))
            .and_then(|col| Figure::histogram(col, config));
        self.store_figure(figure_name, built, config.save_path.as_deref())
    }

    /// Line plot of `y_column` against `x_column`, stored under `figure_name`.
    pub fn add_line_plot(
        &mut self,
        x_column: &str,
        y_column: &str,
        figure_name: &str,
        config: &LineConfig,
    ) -> Result<&Figure, ExploreError> {
        let built = self
            .column_pair(x_column, y_column)
            .and_then(|(x, y)| Figure::line(x, y, config));
        self.store_figure(figure_name, built, config.save_path.as_deref())
    }

    /// Scatter plot of `y_column` against `x_column`, stored under `figure_name`.
    pub fn add_scatter_plot(
        &mut self,
        x_column: &str,
        y_column: &str,
        figure_name: &str,
        config: &ScatterConfig,
    ) -> Result<&Figure, ExploreError> {
        let built = self
            .column_pair(x_column, y_column)
            .and_then(|(x, y)| Figure::scatter(x, y, config));
        self.store_figure(figure_name, built, config.save_path.as_deref())
    }

    /// Release and remove a figure. An unknown name is not an error.
    pub fn remove_visualization(&mut self, figure_name: &str) -> Removal {
        match self.figures.remove(figure_name) {
            Some(_) => {
                info!("Figure '{figure_name}' removed");
                Removal::Removed
            }
            None => {
                info!("Figure '{figure_name}' not found");
                Removal::NotFound
            }
        }
    }

    /// Save every figure as `<dir>/<name>.<ext>`, stopping at the first failure.
    pub fn save_all_figures(
        &mut self,
        dir: impl AsRef<Path>,
        ext: &str,
    ) -> Result<Vec<PathBuf>, ExploreError> {
        let dir = dir.as_ref();
        let mut written = Vec::with_capacity(self.figures.len());
        let mut failure = None;
        for (name, figure) in &self.figures {
            let path = dir.join(format!("{name}.{ext}"));
            if let Err(e) = figure.save(&path) {
                failure = Some(e);
                break;
            }
            debug!("Saved figure '{name}' to {}", path.display());
            written.push(path);
        }
        if let Some(e) = failure {
            return Err(self.fail(e));
        }
        info!("Saved {} figures to {}", written.len(), dir.display());
        Ok(written)
    }

    fn loaded(&self) -> Result<&Dataset, ExploreError> {
        self.dataset.as_ref().ok_or(ExploreError::NoDataset)
    }

    fn column_pair(
        &self,
        x: &str,
        y: &str,
    ) -> Result<(&Column, &Column), ExploreError> {
        let ds = self.loaded()?;
        Ok((query::column(ds, x)?, query::column(ds, y)?))
    }

    /// Save (when asked) and insert a freshly built figure, replacing any
    /// figure of the same name.
    fn store_figure(
        &mut self,
        name: &str,
        built: Result<Figure, ExploreError>,
        save_path: Option<&Path>,
    ) -> Result<&Figure, ExploreError> {
        let figure = built.map_err(|e| self.fail(e))?;
        if let Some(path) = save_path {
            figure.save(path).map_err(|e| self.fail(e))?;
            info!("Figure '{name}' saved to {}", path.display());
        }
        if self.figures.remove(name).is_some() {
            debug!("Figure '{name}' replaced");
        }
        info!("Figure '{name}' created");
        Ok(self.figures.entry(name.to_string()).or_insert(figure))
    }

    fn fail(&mut self, err: ExploreError) -> ExploreError {
        error!("{err}");
        self.status_message = Some(format!("Error: {err}"));
        err
    }
}
