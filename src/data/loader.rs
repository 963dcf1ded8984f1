use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value as JsonValue;

use super::model::Table;
use super::normalize::normalize;
use crate::error::SourceError;

// ---------------------------------------------------------------------------
// RawRows – what a data source hands to the normalizer
// ---------------------------------------------------------------------------

/// A header row plus possibly ragged data rows, all as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRows {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawRows {
    /// Split a values grid (first row is the header).
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return RawRows::default();
        }
        let header = grid.remove(0);
        RawRows { header, rows: grid }
    }

    /// No header means no data.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    pub fn normalize(&self) -> Table {
        normalize(&self.header, &self.rows)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read raw rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by data rows; ragged rows are allowed
/// * `.json` – `[["col", ...], ["cell", ...]]`, `{"values": [[...], ...]}`
///   or records `[{ "col": "cell", ... }, ...]`
pub fn read_raw(path: &Path) -> Result<RawRows> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(path),
        "json" => read_json(path),
        other => Err(SourceError::UnsupportedFormat(other.to_string()).into()),
    }?;
    info!(
        "read {} data rows from {}",
        raw.rows.len(),
        path.display()
    );
    Ok(raw)
}

/// Read and normalize a file in one step.
pub fn load_file(path: &Path) -> Result<Table> {
    Ok(read_raw(path)?.normalize())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawRows> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let mut grid = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawRows::from_grid(grid))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn read_json(path: &Path) -> Result<RawRows> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    Ok(parse_json_rows(root)?)
}

/// Accept a values grid, a `{"values": ...}` envelope or an array of records.
pub fn parse_json_rows(root: JsonValue) -> Result<RawRows, SourceError> {
    let items = match root {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut obj) => match obj.remove("values") {
            Some(JsonValue::Array(items)) => items,
            // an envelope without values is an empty sheet
            None => Vec::new(),
            Some(_) => return Err(SourceError::UnexpectedJsonShape),
        },
        _ => return Err(SourceError::UnexpectedJsonShape),
    };

    if items.is_empty() {
        return Ok(RawRows::default());
    }
    if matches!(items.first(), Some(JsonValue::Object(_))) {
        return records_to_rows(items);
    }

    let grid = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Array(cells) => Ok(cells.iter().map(json_to_text).collect()),
            _ => Err(SourceError::InvalidJsonRow(i)),
        })
        .collect::<Result<Vec<Vec<String>>, _>>()?;
    Ok(RawRows::from_grid(grid))
}

fn records_to_rows(items: Vec<JsonValue>) -> Result<RawRows, SourceError> {
    let mut header: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let JsonValue::Object(obj) = item else {
            return Err(SourceError::InvalidJsonRow(i));
        };
        for key in obj.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
        records.push(obj);
    }

    let rows = records
        .iter()
        .map(|obj| {
            header
                .iter()
                .map(|col| obj.get(col).map(json_to_text).unwrap_or_default())
                .collect()
        })
        .collect();
    debug!("converted {} JSON records over {} keys", records.len(), header.len());
    Ok(RawRows { header, rows })
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn grid_json_splits_header() {
        let raw = parse_json_rows(json!([["Naam", "Prijs"], ["A", 2], ["B"]])).unwrap();
        assert_eq!(raw.header, ["Naam", "Prijs"]);
        assert_eq!(raw.rows, vec![vec!["A".to_string(), "2".to_string()], vec!["B".to_string()]]);
    }

    #[test]
    fn values_envelope_is_unwrapped() {
        let raw = parse_json_rows(json!({"range": "Opties!A1:P", "values": [["budget"], ["10"]]}))
            .unwrap();
        assert_eq!(raw.rows.len(), 1);
        assert!(parse_json_rows(json!({"range": "empty"})).unwrap().is_empty());
    }

    #[test]
    fn records_use_union_of_keys() {
        let raw = parse_json_rows(json!([
            {"naam": "A", "stad": "Ubud", "budget": "1"},
            {"naam": "B", "keuken": null}
        ]))
        .unwrap();
        assert_eq!(raw.header, ["naam", "stad", "budget", "keuken"]);
        let table = raw.normalize();
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(1).unwrap().text("keuken"), "");
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(matches!(
            parse_json_rows(json!("nope")),
            Err(SourceError::UnexpectedJsonShape)
        ));
        assert!(matches!(
            parse_json_rows(json!([["a"], 3])),
            Err(SourceError::InvalidJsonRow(1))
        ));
    }
}
