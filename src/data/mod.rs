/// Data layer: the table model, loading, missing values, and queries.
///
/// Architecture:
/// ```text
///  .csv / .json / HTTP GET
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse → Dataset (typed columns, nulls)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  named Columns of CellValue, equal length
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ missing   │   │  query    │  filter / count / group / sum
///   └──────────┘   └──────────┘
///   count, report, fill
/// ```

pub mod loader;
pub mod missing;
pub mod model;
pub mod query;
