use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{CellValue, Column, Dataset, parse_bool};
use crate::config::{NA_TOKENS, USER_AGENT};

/// Non-success status returned by the API endpoint. Carried inside the
/// `anyhow` chain so the caller can recover the code with `downcast_ref`.
#[derive(Debug, Error)]
#[error("HTTP status {0}")]
pub struct HttpStatus(pub u16);

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a delimited file with a header row. Column types are inferred per
/// column; see [`infer_text_column`].
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV from any reader.
pub fn read_csv<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > headers.len() {
            bail!(
                "CSV row {row_no} has {} fields but the header has {}",
                record.len(),
                headers.len()
            );
        }
        // Short rows are padded with missing cells.
        for (col_idx, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(col_idx).unwrap_or_default().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_text_column(name, &cells))
        .collect();
    Dataset::from_columns(columns)
}

/// Type a column of raw text cells.
///
/// Missing tokens become `Null`. If every present cell parses as an integer
/// the column is integer; else as a float, float; else `true`/`false`, bool.
/// Anything else keeps every cell verbatim as text.
pub fn infer_text_column(name: String, cells: &[String]) -> Column {
    let present: Vec<&str> = cells
        .iter()
        .map(String::as_str)
        .filter(|s| !is_na(s))
        .collect();

    let convert: fn(&str) -> CellValue = if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        |s| s.parse().map_or(CellValue::Null, CellValue::Integer)
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        |s| s.parse().map_or(CellValue::Null, CellValue::Float)
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        |s| parse_bool(s).map_or(CellValue::Null, CellValue::Bool)
    } else {
        |s| CellValue::String(s.to_string())
    };

    let values = cells
        .iter()
        .map(|s| if is_na(s) { CellValue::Null } else { convert(s) })
        .collect();
    Column::new(name, values)
}

fn is_na(s: &str) -> bool {
    NA_TOKENS.contains(&s)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepted layouts:
///
/// ```json
/// [ { "HomeTeam": "A", "FTHG": 2 }, ... ]            // records
/// { "HomeTeam": ["A", ...], "FTHG": [2, ...] }        // columns of arrays
/// { "HomeTeam": { "0": "A" }, "FTHG": { "0": 2 } }    // columns keyed by index
/// ```
pub fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    dataset_from_json(&root)
}

/// Build a table from an already-parsed JSON document.
pub fn dataset_from_json(root: &JsonValue) -> Result<Dataset> {
    match root {
        JsonValue::Array(records) => from_records(records),
        JsonValue::Object(columns) => from_columns(columns),
        other => bail!("Expected a JSON array of records or an object of columns, got {}", kind(other)),
    }
}

fn from_records(records: &[JsonValue]) -> Result<Dataset> {
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map_or(CellValue::Null, json_to_cell))
                .collect();
            Column::new(name, values)
        })
        .collect();
    Dataset::from_columns(columns)
}

fn from_columns(columns: &Map<String, JsonValue>) -> Result<Dataset> {
    // Index-keyed columns may list rows in any order and may skip some;
    // collect the union of row labels in first-seen order.
    let mut labels: Vec<&str> = Vec::new();
    for (name, col) in columns {
        match col {
            JsonValue::Array(_) => {}
            JsonValue::Object(cells) => {
                for key in cells.keys() {
                    if !labels.contains(&key.as_str()) {
                        labels.push(key);
                    }
                }
            }
            other => bail!("Column '{name}' is a {}, expected an array or object", kind(other)),
        }
    }

    let built = columns
        .iter()
        .map(|(name, col)| {
            let values = match col {
                JsonValue::Array(items) => items.iter().map(json_to_cell).collect(),
                JsonValue::Object(cells) => labels
                    .iter()
                    .map(|label| cells.get(*label).map_or(CellValue::Null, json_to_cell))
                    .collect(),
                _ => unreachable!("column shapes checked above"),
            };
            Column::new(name.clone(), values)
        })
        .collect();
    Dataset::from_columns(built).context("JSON columns differ in length")
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

fn kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// API loader
// ---------------------------------------------------------------------------

/// GET `url` and parse the JSON body into a table. A non-success status
/// fails with [`HttpStatus`] before the body is read.
pub fn load_api(url: &str) -> Result<Dataset> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("building HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("requesting {url}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HttpStatus(status.as_u16()).into());
    }

    let root: JsonValue = response.json().context("parsing API response as JSON")?;
    dataset_from_json(&root)
}
