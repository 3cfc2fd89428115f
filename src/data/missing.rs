use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use log::{info, warn};

use super::model::{CellValue, Column, DType, Dataset};

// ---------------------------------------------------------------------------
// Counting and reporting
// ---------------------------------------------------------------------------

/// Missing entries per column, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingCounts {
    pub total_rows: usize,
    pub per_column: Vec<(String, usize)>,
}

impl MissingCounts {
    pub fn total(&self) -> usize {
        self.per_column.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, column: &str) -> Option<usize> {
        self.per_column
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, n)| *n)
    }
}

/// The printed report: a banner, then either a clean bill or one line per
/// column that has gaps.
impl fmt::Display for MissingCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(40);
        writeln!(f, "{rule}")?;
        writeln!(f, "Missing values report:")?;
        writeln!(f, "{rule}")?;

        if self.total() == 0 {
            return writeln!(f, "No missing values found!");
        }
        for (name, count) in self.per_column.iter().filter(|(_, n)| *n > 0) {
            let pct = *count as f64 / self.total_rows as f64 * 100.0;
            writeln!(f, "- Column '{name}': {count} missing ({pct:.1}%)")?;
        }
        Ok(())
    }
}

pub fn count_missing(dataset: &Dataset) -> MissingCounts {
    MissingCounts {
        total_rows: dataset.len(),
        per_column: dataset
            .columns()
            .iter()
            .map(|c| (c.name.clone(), c.missing_count()))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Fill strategies
// ---------------------------------------------------------------------------

/// How missing entries in a column are replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStrategy {
    /// Arithmetic mean of the present values. Numeric columns only.
    Mean,
    /// Median of the present values. Numeric columns only.
    Median,
    /// Most frequent present value; the smallest one on ties.
    Mode,
    /// A fixed replacement.
    Value(CellValue),
}

impl FillStrategy {
    pub fn requires_numeric(&self) -> bool {
        matches!(self, FillStrategy::Mean | FillStrategy::Median)
    }

    /// The value this strategy would write into `column`, if one exists.
    pub fn fill_value(&self, column: &Column) -> Option<CellValue> {
        match self {
            FillStrategy::Mean => {
                let values = column.numeric_values();
                if values.is_empty() {
                    return None;
                }
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                Some(numeric_cell(column.dtype, mean))
            }
            FillStrategy::Median => median(column.numeric_values()).map(|m| numeric_cell(column.dtype, m)),
            FillStrategy::Mode => mode(column),
            FillStrategy::Value(v) => Some(v.clone()),
        }
    }
}

/// `mean`, `median` and `mode` select a strategy; any other text is a
/// literal replacement, typed like a CSV cell.
impl FromStr for FillStrategy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "mean" => FillStrategy::Mean,
            "median" => FillStrategy::Median,
            "mode" => FillStrategy::Mode,
            literal => FillStrategy::Value(CellValue::parse(literal)),
        })
    }
}

impl From<CellValue> for FillStrategy {
    fn from(v: CellValue) -> Self {
        FillStrategy::Value(v)
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStrategy::Mean => f.write_str("mean"),
            FillStrategy::Median => f.write_str("median"),
            FillStrategy::Mode => f.write_str("mode"),
            FillStrategy::Value(v) => write!(f, "value {v}"),
        }
    }
}

/// Keep integer columns integral when the statistic allows it.
fn numeric_cell(dtype: DType, v: f64) -> CellValue {
    if dtype == DType::Integer && v.fract() == 0.0 {
        CellValue::Integer(v as i64)
    } else {
        CellValue::Float(v)
    }
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn mode(column: &Column) -> Option<CellValue> {
    let mut counts: HashMap<&CellValue, usize> = HashMap::new();
    for v in column.present() {
        *counts.entry(v).or_default() += 1;
    }
    let best = counts.values().copied().max()?;
    counts
        .into_iter()
        .filter(|(_, n)| *n == best)
        .map(|(v, _)| v)
        .min()
        .cloned()
}

// ---------------------------------------------------------------------------
// Filling
// ---------------------------------------------------------------------------

/// Why a requested column was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingColumn,
    NonNumeric,
    NoValues,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MissingColumn => "column does not exist",
            SkipReason::NonNumeric => "strategy needs a numeric column",
            SkipReason::NoValues => "no present values to derive a fill value from",
        };
        f.write_str(text)
    }
}

/// Outcome of a fill pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillSummary {
    /// Column name and number of cells filled.
    pub filled: Vec<(String, usize)>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Fill missing entries in `columns` (all columns when `None`) in place.
///
/// Unknown columns, non-numeric columns under `mean`/`median`, and columns
/// with nothing to derive a value from are skipped with a warning; the rest
/// are still processed.
pub fn fill_missing(
    dataset: &mut Dataset,
    strategy: &FillStrategy,
    columns: Option<&[&str]>,
) -> FillSummary {
    let targets: Vec<String> = match columns {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => dataset.column_names().into_iter().map(String::from).collect(),
    };

    let mut summary = FillSummary::default();
    for name in targets {
        let Some(column) = dataset.column_mut(&name) else {
            warn!("Column '{name}' does not exist, skipping");
            summary.skipped.push((name, SkipReason::MissingColumn));
            continue;
        };

        if strategy.requires_numeric() && !column.dtype.is_numeric() {
            warn!("Strategy '{strategy}' does not apply to non-numeric column '{name}', skipping");
            summary.skipped.push((name, SkipReason::NonNumeric));
            continue;
        }

        let Some(value) = strategy.fill_value(column) else {
            warn!("Column '{name}' has no values to compute '{strategy}' from, skipping");
            summary.skipped.push((name, SkipReason::NoValues));
            continue;
        };

        let filled = column.fill_nulls(&value);
        info!("Column '{name}': filled {filled} missing values ({strategy})");
        summary.filled.push((name, filled));
    }
    summary
}
