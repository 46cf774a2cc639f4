use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell of the survey table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a survey extract
/// actually contains. `Null` stands for "no answer" after sentinel recoding
/// as well as for cells that were empty in the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

impl Value {
    /// Whether this cell counts as missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view for aggregation; `None` for strings and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Integer view; integral floats (e.g. `1975.0` from a lossy export)
    /// are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// String view; `None` for non-strings and nulls.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Row / Table – the loaded survey dataset
// ---------------------------------------------------------------------------

/// One survey respondent: column name → cell value. Keys a row never had
/// (possible with JSON input) are treated the same as `Null` downstream.
pub type Row = BTreeMap<String, Value>;

/// The full parsed table. `columns` preserves source header order, with
/// derived columns appended in creation order; `rows` is one entry per
/// respondent, always.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Table { columns, rows }
    }

    /// Number of respondents.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Rename a column in the header list and in every row. A no-op (returns
    /// `false`) when `from` is absent, so optional renames can be applied
    /// unconditionally.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        let Some(slot) = self.columns.iter_mut().find(|c| *c == from) else {
            return false;
        };
        *slot = to.to_string();
        for row in &mut self.rows {
            if let Some(value) = row.remove(from) {
                row.insert(to.to_string(), value);
            }
        }
        true
    }

    /// Register a (derived) column name if it is not present yet.
    pub fn push_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    /// Sorted distinct display strings of the non-null values in a column.
    /// Used to build the filter option lists.
    pub fn unique_strings(&self, column: &str) -> Vec<String> {
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for row in &self.rows {
            if let Some(value) = row.get(column) {
                if !value.is_null() {
                    seen.insert(value.to_string());
                }
            }
        }
        seen.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn integral_floats_read_back_as_integers() {
        assert_eq!(Value::Float(1975.0).as_i64(), Some(1975));
        assert_eq!(Value::Float(1975.5).as_i64(), None);
        assert_eq!(Value::Int(1975).as_i64(), Some(1975));
        assert_eq!(Value::Str("1975".into()).as_i64(), None);
        assert_eq!(Value::Null.as_i64(), None);
    }

    #[test]
    fn rename_updates_header_and_every_row() {
        let mut table = Table::new(
            vec!["h10_g3".into(), "other".into()],
            vec![
                row(&[("h10_g3", Value::Int(1)), ("other", Value::Int(7))]),
                row(&[("h10_g3", Value::Int(2)), ("other", Value::Int(8))]),
            ],
        );

        assert!(table.rename_column("h10_g3", "sex"));
        assert!(table.has_column("sex"));
        assert!(!table.has_column("h10_g3"));
        assert_eq!(table.rows[0].get("sex"), Some(&Value::Int(1)));
        assert_eq!(table.rows[1].get("sex"), Some(&Value::Int(2)));

        // Renaming an absent column is a silent no-op.
        assert!(!table.rename_column("h10_g4", "birth_year"));
        assert_eq!(table.columns, vec!["sex".to_string(), "other".to_string()]);
    }

    #[test]
    fn unique_strings_skips_nulls_and_sorts() {
        let table = Table::new(
            vec!["job".into()],
            vec![
                row(&[("job", Value::Str("Clerk".into()))]),
                row(&[("job", Value::Null)]),
                row(&[("job", Value::Str("Baker".into()))]),
                row(&[("job", Value::Str("Clerk".into()))]),
            ],
        );
        assert_eq!(table.unique_strings("job"), vec!["Baker", "Clerk"]);
        assert!(table.unique_strings("absent").is_empty());
    }
}
