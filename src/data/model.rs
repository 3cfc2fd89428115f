use std::cmp::Ordering;
use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the common Pandas dtypes.
/// Aggregations key maps by cells, so `CellValue` must be `Ord` and `Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so cells can key BTreeMaps and be sorted --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl CellValue {
    /// Guess the type of a single text cell, the same way a CSV column is typed.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if let Some(b) = parse_bool(s) {
            return CellValue::Bool(b);
        }
        CellValue::String(s.to_string())
    }

    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Render a float the way the report and driver print numbers: integral
/// values keep one decimal, others use the shortest round-trip form.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Render an aggregate (sum, difference) without a trailing `.0` when integral.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// DType – the inferred type of a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Integer,
    Float,
    Bool,
    /// Strings, or a mix of value kinds.
    Text,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Integer | DType::Float)
    }

    /// Infer the column type from already-typed cells.
    ///
    /// A column with no present values is `Float`, matching how an empty
    /// CSV column reads in Pandas.
    pub fn infer(values: &[CellValue]) -> DType {
        let mut saw_int = false;
        let mut saw_float = false;
        let mut saw_bool = false;
        let mut saw_text = false;
        for v in values {
            match v {
                CellValue::Integer(_) => saw_int = true,
                CellValue::Float(_) => saw_float = true,
                CellValue::Bool(_) => saw_bool = true,
                CellValue::String(_) => saw_text = true,
                CellValue::Null => {}
            }
        }
        match (saw_int, saw_float, saw_bool, saw_text) {
            (_, _, _, true) => DType::Text,
            (true, false, false, false) => DType::Integer,
            (_, _, false, false) => DType::Float,
            (false, false, true, false) => DType::Bool,
            _ => DType::Text,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Integer => "int64",
            DType::Float => "float64",
            DType::Bool => "bool",
            DType::Text => "object",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// A named, typed column. All columns of a [`Dataset`] have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, inferring its type. Integers in a float column are
    /// widened so the column holds a single numeric kind.
    pub fn new(name: impl Into<String>, mut values: Vec<CellValue>) -> Self {
        let dtype = DType::infer(&values);
        if dtype == DType::Float {
            widen_to_float(&mut values);
        }
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Non-missing cells in row order.
    pub fn present(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Present numeric values; empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        if !self.dtype.is_numeric() {
            return Vec::new();
        }
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    /// Replace every missing cell with `value`, adjusting the column type
    /// when the value does not fit it. Returns the number of cells filled.
    pub fn fill_nulls(&mut self, value: &CellValue) -> usize {
        let missing = self.missing_count();
        if missing == 0 || value.is_null() {
            return 0;
        }

        let value = match (self.dtype, value) {
            (DType::Text, v) => v.clone(),
            (DType::Integer, CellValue::Integer(_))
            | (DType::Float, CellValue::Float(_))
            | (DType::Bool, CellValue::Bool(_)) => value.clone(),
            (DType::Float, CellValue::Integer(i)) => CellValue::Float(*i as f64),
            (DType::Integer, CellValue::Float(_)) => {
                widen_to_float(&mut self.values);
                self.dtype = DType::Float;
                value.clone()
            }
            (_, v) => {
                self.dtype = DType::Text;
                v.clone()
            }
        };

        for cell in self.values.iter_mut().filter(|c| c.is_null()) {
            *cell = value.clone();
        }
        missing
    }
}

fn widen_to_float(values: &mut [CellValue]) {
    for v in values.iter_mut() {
        if let CellValue::Integer(i) = v {
            *v = CellValue::Float(*i as f64);
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An in-memory table: columns in header order, rows addressed by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Assemble a table from columns of equal length and distinct names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, Column::len);
        for (i, col) in columns.iter().enumerate() {
            if col.len() != rows {
                bail!(
                    "column '{}' has {} values but the table has {rows} rows",
                    col.name,
                    col.len()
                );
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                bail!("duplicate column '{}'", col.name);
            }
        }
        Ok(Dataset { columns, rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Cell at (`row`, `column`).
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.column(column)?.values.get(row)
    }

    /// One row as `(column, value)` pairs in column order.
    pub fn row(&self, index: usize) -> Option<Vec<(&str, &CellValue)>> {
        if index >= self.rows {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.as_str(), &c.values[index]))
                .collect(),
        )
    }

    /// Add a derived column, replacing any existing column of the same name.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.rows {
            bail!(
                "column '{}' has {} values but the table has {} rows",
                column.name,
                column.len(),
                self.rows
            );
        }
        if self.columns.is_empty() {
            self.rows = column.len();
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Remove a column, returning it if it existed.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_guesses_cell_types() {
        assert_eq!(CellValue::parse("3"), CellValue::Integer(3));
        assert_eq!(CellValue::parse("2.5"), CellValue::Float(2.5));
        assert_eq!(CellValue::parse("True"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("N/A"), CellValue::String("N/A".into()));
        assert_eq!(CellValue::parse(""), CellValue::Null);
    }

    #[test]
    fn mixed_numeric_column_is_widened() {
        let col = Column::new(
            "x",
            vec![CellValue::Integer(1), CellValue::Float(2.5), CellValue::Null],
        );
        assert_eq!(col.dtype, DType::Float);
        assert_eq!(col.values[0], CellValue::Float(1.0));
        assert_eq!(col.missing_count(), 1);
    }

    #[test]
    fn all_null_column_is_float() {
        let col = Column::new("empty", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(col.dtype, DType::Float);
    }

    #[test]
    fn fill_with_fraction_promotes_integer_column() {
        let mut col = Column::new("g", vec![CellValue::Integer(1), CellValue::Null]);
        assert_eq!(col.fill_nulls(&CellValue::Float(1.5)), 1);
        assert_eq!(col.dtype, DType::Float);
        assert_eq!(col.values, vec![CellValue::Float(1.0), CellValue::Float(1.5)]);
    }

    #[test]
    fn fill_with_text_turns_column_into_text() {
        let mut col = Column::new("ref", vec![CellValue::Null, CellValue::Null]);
        col.fill_nulls(&CellValue::from("Unknown"));
        assert_eq!(col.dtype, DType::Text);
        assert!(col.values.iter().all(|v| v.as_str() == Some("Unknown")));
    }

    #[test]
    fn fill_without_gaps_keeps_type() {
        let mut col = Column::new("g", vec![CellValue::Integer(1)]);
        assert_eq!(col.fill_nulls(&CellValue::from("x")), 0);
        assert_eq!(col.dtype, DType::Integer);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let a = Column::new("a", vec![CellValue::Integer(1)]);
        let b = Column::new("b", vec![]);
        assert!(Dataset::from_columns(vec![a, b]).is_err());
    }

    #[test]
    fn add_column_replaces_same_name() {
        let a = Column::new("a", vec![CellValue::Integer(1)]);
        let mut ds = Dataset::from_columns(vec![a]).unwrap();
        ds.add_column(Column::new("a", vec![CellValue::Integer(9)])).unwrap();
        assert_eq!(ds.width(), 1);
        assert_eq!(ds.get(0, "a"), Some(&CellValue::Integer(9)));
    }

    #[test]
    fn display_matches_report_format() {
        assert_eq!(CellValue::Float(3.0).to_string(), "3.0");
        assert_eq!(CellValue::Float(2.25).to_string(), "2.25");
        assert_eq!(CellValue::Integer(4).to_string(), "4");
        assert_eq!(format_number(-3.0), "-3");
    }
}
