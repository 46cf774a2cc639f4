use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::codebook;
use super::model::{Row, Table, Value};
use super::normalize;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Loading failures. All variants halt the load cycle; the UI maps
/// [`LoadError::NotFound`] to remediation guidance and everything else to a
/// generic error message with the underlying cause.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Absent at the given path and at its basename in the working directory.
    #[error("data file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {} as delimited text: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to parse {} as JSON records: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: {detail}", .path.display())]
    Malformed { path: PathBuf, detail: String },

    #[error("unsupported data file extension: .{extension}")]
    UnsupportedFormat { extension: String },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Resolve the two known file placements: the path as given, or its bare
/// basename in the process working directory.
pub fn resolve_path(path: &Path) -> Result<PathBuf, LoadError> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if let Some(name) = path.file_name() {
        let fallback = PathBuf::from(name);
        if fallback.exists() {
            return Ok(fallback);
        }
    }
    Err(LoadError::NotFound {
        path: path.to_path_buf(),
    })
}

/// Load and normalize a survey table. Dispatches on the file extension,
/// applies the rename/recode/derive steps, then attaches job names from the
/// codebook side file when one is available (a soft step, see
/// [`codebook::attach_job_names`]).
///
/// Pure function of the resolved file bytes: loading the same unchanged path
/// twice yields an equal table.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    let resolved = resolve_path(path)?;

    let ext = resolved
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut table = match ext.as_str() {
        "csv" | "tsv" => parse_delimited(&resolved)?,
        "json" => parse_json(&resolved)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            });
        }
    };

    normalize::apply(&mut table);
    codebook::attach_job_names(&mut table, &resolved);

    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// UTF-8 delimited text with a header row. The delimiter is detected from
/// the header line; cells are typed by [`guess_value`].
fn parse_delimited(path: &Path) -> Result<Table, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Strip a UTF-8 BOM so the first header name survives intact.
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    if content.trim().is_empty() {
        return Err(LoadError::Malformed {
            path: path.to_path_buf(),
            detail: "file is empty".into(),
        });
    }

    let delimiter = detect_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let mut row = Row::new();
        for (idx, cell) in record.iter().enumerate() {
            if let Some(column) = columns.get(idx) {
                row.insert(column.clone(), guess_value(cell));
            }
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

/// Pick the separator with the most occurrences in the header line; comma
/// wins ties.
pub(crate) fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    let candidates = [b',', b';', b'\t', b'|'];

    let mut best = b',';
    let mut best_count = 0;
    for &sep in &candidates {
        let count = header.matches(sep as char).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }
    best
}

/// Empty cells and the usual missing-data tokens become `Null`; otherwise
/// integer, then float, then string.
pub(crate) fn guess_value(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
    {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Str(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape `df.to_json(orient="records")` emits:
///
/// ```json
/// [
///   { "h10_g3": 1, "h10_g4": 1975, "p1002_8aq1": 320.5 },
///   ...
/// ]
/// ```
///
/// Nested arrays/objects have no tabular meaning and are rejected.
fn parse_json(path: &Path) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root.as_array().ok_or_else(|| LoadError::Malformed {
        path: path.to_path_buf(),
        detail: "expected a top-level array of records".into(),
    })?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or_else(|| LoadError::Malformed {
            path: path.to_path_buf(),
            detail: format!("record {i} is not an object"),
        })?;

        let mut row = Row::new();
        for (key, value) in object {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_value(value, path, i, key)?);
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

fn json_to_value(
    value: &JsonValue,
    path: &Path,
    record: usize,
    key: &str,
) -> Result<Value, LoadError> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::String(s) => Ok(Value::Str(s.clone())),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Ok(Value::Str(n.to_string()))
            }
        }
        JsonValue::Bool(b) => Ok(Value::Str(b.to_string())),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(LoadError::Malformed {
            path: path.to_path_buf(),
            detail: format!("record {record}, field '{key}': nested values are not tabular"),
        }),
    }
}
