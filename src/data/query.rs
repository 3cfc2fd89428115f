use std::collections::{BTreeMap, HashMap};

use super::model::{CellValue, Column, Dataset};
use crate::error::ExploreError;

/// Fail with [`ExploreError::ColumnNotFound`] for the first absent column.
pub fn require_columns(dataset: &Dataset, names: &[&str]) -> Result<(), ExploreError> {
    match names.iter().find(|n| !dataset.has_column(n)) {
        Some(missing) => Err(ExploreError::ColumnNotFound(missing.to_string())),
        None => Ok(()),
    }
}

pub fn column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ExploreError> {
    dataset
        .column(name)
        .ok_or_else(|| ExploreError::ColumnNotFound(name.to_string()))
}

fn numeric_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ExploreError> {
    let col = column(dataset, name)?;
    if !col.dtype.is_numeric() {
        return Err(ExploreError::NonNumericColumn(name.to_string()));
    }
    Ok(col)
}

/// Indices of rows whose `column` equals `value`.
pub fn filtered_indices(
    dataset: &Dataset,
    column_name: &str,
    value: &CellValue,
) -> Result<Vec<usize>, ExploreError> {
    let col = column(dataset, column_name)?;
    Ok(col
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| *v == value)
        .map(|(i, _)| i)
        .collect())
}

/// Frequency of each present value of `column`, most frequent first.
///
/// `rows` restricts the count to the given row indices. Ties keep the order
/// in which values first appear.
pub fn value_counts(
    dataset: &Dataset,
    column_name: &str,
    rows: Option<&[usize]>,
) -> Result<Vec<(CellValue, usize)>, ExploreError> {
    let col = column(dataset, column_name)?;
    let selected: Box<dyn Iterator<Item = &CellValue> + '_> = match rows {
        Some(idx) => Box::new(idx.iter().filter_map(|&i| col.values.get(i))),
        None => Box::new(col.values.iter()),
    };

    let mut order: Vec<(CellValue, usize)> = Vec::new();
    let mut slot: HashMap<&CellValue, usize> = HashMap::new();
    for v in selected.filter(|v| !v.is_null()) {
        match slot.get(v) {
            Some(&i) => order[i].1 += 1,
            None => {
                slot.insert(v, order.len());
                order.push((v.clone(), 1));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(order)
}

/// Count rows per `(a, b)` pair, most frequent first.
///
/// Pairs are grouped in ascending key order before the (stable) count sort,
/// so ties come out in key order. Rows missing either value are dropped.
pub fn pair_counts(
    dataset: &Dataset,
    a: &str,
    b: &str,
) -> Result<Vec<((CellValue, CellValue), usize)>, ExploreError> {
    let col_a = column(dataset, a)?;
    let col_b = column(dataset, b)?;

    let mut groups: BTreeMap<(&CellValue, &CellValue), usize> = BTreeMap::new();
    for (va, vb) in col_a.values.iter().zip(&col_b.values) {
        if va.is_null() || vb.is_null() {
            continue;
        }
        *groups.entry((va, vb)).or_default() += 1;
    }

    let mut counts: Vec<((CellValue, CellValue), usize)> = groups
        .into_iter()
        .map(|((va, vb), n)| ((va.clone(), vb.clone()), n))
        .collect();
    counts.sort_by(|x, y| y.1.cmp(&x.1));
    Ok(counts)
}

/// Per-group sums of each of `value_columns`, keyed by the `key` column
/// (ascending). Missing numbers contribute nothing to the sum.
pub fn group_sums(
    dataset: &Dataset,
    key: &str,
    value_columns: &[&str],
) -> Result<BTreeMap<CellValue, Vec<f64>>, ExploreError> {
    let key_col = column(dataset, key)?;
    let value_cols = value_columns
        .iter()
        .map(|name| numeric_column(dataset, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: BTreeMap<CellValue, Vec<f64>> = BTreeMap::new();
    for (row, k) in key_col.values.iter().enumerate() {
        if k.is_null() {
            continue;
        }
        let sums = groups
            .entry(k.clone())
            .or_insert_with(|| vec![0.0; value_cols.len()]);
        for (sum, col) in sums.iter_mut().zip(&value_cols) {
            *sum += col.values[row].as_f64().unwrap_or(0.0);
        }
    }
    Ok(groups)
}

/// Sum of the present values of a numeric column.
pub fn column_sum(dataset: &Dataset, name: &str) -> Result<f64, ExploreError> {
    Ok(numeric_column(dataset, name)?.numeric_values().iter().sum())
}

/// Index of the first row holding the maximum of a numeric column.
pub fn idxmax(dataset: &Dataset, name: &str) -> Result<Option<usize>, ExploreError> {
    let col = numeric_column(dataset, name)?;
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in col.values.iter().enumerate() {
        let Some(x) = v.as_f64() else { continue };
        match best {
            Some((_, b)) if x <= b => {}
            _ => best = Some((i, x)),
        }
    }
    Ok(best.map(|(i, _)| i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Dataset {
        let text = |v: &[&str]| v.iter().map(|s| CellValue::from(*s)).collect::<Vec<_>>();
        let int = |v: &[i64]| v.iter().map(|&i| CellValue::Integer(i)).collect::<Vec<_>>();
        Dataset::from_columns(vec![
            Column::new("team", text(&["b", "a", "b", "c", "a"])),
            Column::new("res", text(&["H", "H", "A", "H", "H"])),
            Column::new("g", int(&[1, 4, 2, 4, 0])),
        ])
        .unwrap()
    }

    #[test]
    fn value_counts_ties_keep_first_seen_order() {
        let ds = table();
        let counts = value_counts(&ds, "team", None).unwrap();
        assert_eq!(
            counts,
            vec![
                (CellValue::from("b"), 2),
                (CellValue::from("a"), 2),
                (CellValue::from("c"), 1)
            ]
        );
    }

    #[test]
    fn value_counts_over_filtered_rows() {
        let ds = table();
        let rows = filtered_indices(&ds, "res", &CellValue::from("H")).unwrap();
        assert_eq!(rows, vec![0, 1, 3, 4]);
        let counts = value_counts(&ds, "team", Some(&rows)).unwrap();
        assert_eq!(counts[0], (CellValue::from("a"), 2));
    }

    #[test]
    fn idxmax_returns_first_maximum() {
        assert_eq!(idxmax(&table(), "g").unwrap(), Some(1));
    }

    #[test]
    fn sums_reject_text_columns() {
        let ds = table();
        assert!(matches!(
            column_sum(&ds, "team"),
            Err(ExploreError::NonNumericColumn(_))
        ));
        assert_eq!(column_sum(&ds, "g").unwrap(), 11.0);
    }

    #[test]
    fn group_sums_are_keyed_in_order() {
        let ds = table();
        let groups = group_sums(&ds, "team", &["g"]).unwrap();
        let keys: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(groups[&CellValue::from("a")], vec![4.0]);
    }

    #[test]
    fn pair_counts_sort_by_count_then_key() {
        let ds = table();
        let pairs = pair_counts(&ds, "res", "g").unwrap();
        assert_eq!(pairs[0], ((CellValue::from("H"), CellValue::Integer(4)), 2));
        assert_eq!(pairs[1], ((CellValue::from("A"), CellValue::Integer(2)), 1));
    }

    #[test]
    fn unknown_column_is_reported() {
        assert!(matches!(
            require_columns(&table(), &["team", "nope"]),
            Err(ExploreError::ColumnNotFound(c)) if c == "nope"
        ));
    }
}
