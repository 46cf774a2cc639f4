//! Job-code lookup: joins occupation names onto the survey table.
//!
//! The codebook is a small side file next to the data file, delimited text
//! with a code column and a name column. Real codebooks are inconsistently
//! headed, so the name column is resolved by a prioritized strategy list
//! (exact header, known alias, positional) and the code column by exact
//! header or position. The whole step is soft: any failure is logged and the
//! table simply ends up without a `job` column.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::loader::{detect_delimiter, guess_value, resolve_path};
use super::model::{Table, Value};

/// Expected file name of the codebook, looked up next to the data file (and,
/// via the usual fallback, in the working directory).
pub const CODEBOOK_FILE_NAME: &str = "welfare_2015_codebook.csv";

/// Alternate headers the name column is published under. "직종" is the
/// header the official KOWEPS codebook sheet uses.
const NAME_ALIASES: &[&str] = &["직종", "occupation", "job_name"];

/// How the name column was found; anything but `Exact` gets logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameResolution {
    Exact,
    Alias(&'static str),
    /// Second column, on the convention that codebooks are code-then-name.
    Positional,
}

/// Attach a `job` column by left lookup of `job_code` against the codebook
/// found beside `data_path`. Runs only when `job_code` exists and never
/// fails: an unusable codebook is logged at `warn` and skipped, leaving the
/// table without a `job` column. Rows are never added or dropped.
pub fn attach_job_names(table: &mut Table, data_path: &Path) {
    if !table.has_column("job_code") {
        return;
    }
    let candidate = data_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CODEBOOK_FILE_NAME);
    attach_from(table, &candidate);
}

/// Same as [`attach_job_names`] but with an explicit codebook path.
pub fn attach_from(table: &mut Table, codebook_path: &Path) {
    if !table.has_column("job_code") {
        return;
    }
    match load_codebook(codebook_path) {
        Ok(codes) => {
            join_job_names(table, &codes);
            log::info!(
                "attached job names for {} codes from {}",
                codes.len(),
                codebook_path.display()
            );
        }
        Err(e) => {
            log::warn!(
                "job codebook unavailable ({}), job column skipped: {e:#}",
                codebook_path.display()
            );
        }
    }
}

/// Parse the codebook into a code → name map. Rows with an unparsable code
/// or an empty name are skipped; on duplicate codes the first occurrence
/// wins, keeping the downstream join strictly 1:1.
fn load_codebook(path: &Path) -> Result<BTreeMap<i64, String>> {
    let resolved = resolve_path(path)?;
    let content = std::fs::read_to_string(&resolved)
        .with_context(|| format!("reading {}", resolved.display()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    if content.trim().is_empty() {
        bail!("codebook file is empty");
    }

    let delimiter = detect_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading codebook headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let (code_idx, name_idx) = resolve_columns(&headers)?;

    let mut codes: BTreeMap<i64, String> = BTreeMap::new();
    for record in reader.records() {
        let record = record.context("reading codebook row")?;
        let Some(code) = record.get(code_idx).map(guess_value).and_then(|v| v.as_i64()) else {
            continue;
        };
        let name = record.get(name_idx).map(str::trim).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        if codes.contains_key(&code) {
            log::warn!("duplicate job code {code} in codebook, keeping the first name");
            continue;
        }
        codes.insert(code, name.to_string());
    }

    Ok(codes)
}

/// Resolve (code column, name column) indices, or fail when no usable pair
/// exists (e.g. a single-column file).
fn resolve_columns(headers: &[String]) -> Result<(usize, usize)> {
    let (name_idx, resolution) = resolve_name_column(headers)
        .context("codebook has no recognizable job name column")?;

    let code_idx = match headers.iter().position(|h| h == "job_code") {
        Some(i) => i,
        None => {
            log::warn!(
                "codebook has no 'job_code' header, assuming the first column ('{}') holds codes",
                headers.first().map(String::as_str).unwrap_or("")
            );
            0
        }
    };

    match resolution {
        NameResolution::Exact => {}
        NameResolution::Alias(alias) => {
            log::warn!("codebook name column found under alias '{alias}'");
        }
        NameResolution::Positional => {
            log::warn!(
                "codebook name column assumed positionally: column 2 ('{}')",
                headers[name_idx]
            );
        }
    }

    if code_idx == name_idx {
        bail!("codebook code and name columns coincide");
    }
    Ok((code_idx, name_idx))
}

/// First success wins: exact `job` header, then the alias list in order,
/// then the second column.
fn resolve_name_column(headers: &[String]) -> Option<(usize, NameResolution)> {
    if let Some(i) = headers.iter().position(|h| h == "job") {
        return Some((i, NameResolution::Exact));
    }
    for alias in NAME_ALIASES {
        if let Some(i) = headers.iter().position(|h| h == alias) {
            return Some((i, NameResolution::Alias(alias)));
        }
    }
    if headers.len() >= 2 {
        return Some((1, NameResolution::Positional));
    }
    None
}

/// Left join by construction: every survey row is visited exactly once and
/// gets a `job` cell, either the matched name or `Null` when the code is
/// missing or unmatched.
fn join_job_names(table: &mut Table, codes: &BTreeMap<i64, String>) {
    for row in &mut table.rows {
        let name = row
            .get("job_code")
            .and_then(Value::as_i64)
            .and_then(|code| codes.get(&code))
            .cloned();
        row.insert("job".into(), name.map_or(Value::Null, Value::Str));
    }
    table.push_column("job");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;
    use std::path::PathBuf;

    fn job_table(codes: &[Option<i64>]) -> Table {
        let rows = codes
            .iter()
            .map(|c| {
                let mut row = Row::new();
                row.insert(
                    "job_code".into(),
                    c.map_or(Value::Null, Value::Int),
                );
                row
            })
            .collect();
        Table::new(vec!["job_code".into()], rows)
    }

    fn write_codebook(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CODEBOOK_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn exact_header_wins() {
        let headers = vec!["job_code".to_string(), "job".to_string()];
        assert_eq!(
            resolve_name_column(&headers),
            Some((1, NameResolution::Exact))
        );
    }

    #[test]
    fn alias_beats_positional() {
        let headers = vec!["job_code".to_string(), "memo".to_string(), "직종".to_string()];
        assert_eq!(
            resolve_name_column(&headers),
            Some((2, NameResolution::Alias("직종")))
        );
    }

    #[test]
    fn positional_fallback_takes_the_second_column() {
        let headers = vec!["code".to_string(), "label".to_string()];
        assert_eq!(
            resolve_name_column(&headers),
            Some((1, NameResolution::Positional))
        );
        // And the code column is then assumed to be the first.
        assert_eq!(resolve_columns(&headers).unwrap(), (0, 1));
    }

    #[test]
    fn single_column_codebook_is_unusable() {
        assert_eq!(resolve_name_column(&["job_code".to_string()]), None);
        assert!(resolve_columns(&["job".to_string()]).is_err());
    }

    #[test]
    fn join_preserves_every_row() {
        let (_dir, path) = write_codebook("job_code,job\n111,Legislator\n152,Clerk\n");
        let mut table = job_table(&[Some(111), Some(999), None, Some(152)]);
        attach_from(&mut table, &path);

        assert_eq!(table.len(), 4);
        assert!(table.has_column("job"));
        assert_eq!(table.rows[0]["job"], Value::Str("Legislator".into()));
        assert_eq!(table.rows[1]["job"], Value::Null); // unmatched code
        assert_eq!(table.rows[2]["job"], Value::Null); // missing code
        assert_eq!(table.rows[3]["job"], Value::Str("Clerk".into()));
    }

    #[test]
    fn duplicate_codes_keep_the_first_name() {
        let (_dir, path) = write_codebook("job_code,job\n111,First\n111,Second\n");
        let mut table = job_table(&[Some(111)]);
        attach_from(&mut table, &path);

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0]["job"], Value::Str("First".into()));
    }

    #[test]
    fn missing_codebook_skips_the_join_silently() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = job_table(&[Some(111)]);
        attach_from(&mut table, &dir.path().join(CODEBOOK_FILE_NAME));

        assert_eq!(table.len(), 1);
        assert!(!table.has_column("job"));
    }

    #[test]
    fn malformed_codebook_skips_the_join_silently() {
        let (_dir, path) = write_codebook("only_one_column\n111\n");
        let mut table = job_table(&[Some(111)]);
        attach_from(&mut table, &path);
        assert!(!table.has_column("job"));
    }

    #[test]
    fn rows_with_unparsable_codes_or_empty_names_are_skipped() {
        let (_dir, path) = write_codebook("job_code,job\nnot_a_code,Ghost\n152,\n111,Clerk\n");
        let mut table = job_table(&[Some(111), Some(152)]);
        attach_from(&mut table, &path);

        assert_eq!(table.rows[0]["job"], Value::Str("Clerk".into()));
        assert_eq!(table.rows[1]["job"], Value::Null);
    }

    #[test]
    fn tables_without_job_code_are_left_alone() {
        let (_dir, path) = write_codebook("job_code,job\n111,Clerk\n");
        let mut table = Table::new(vec!["sex".into()], vec![Row::new()]);
        attach_from(&mut table, &path);
        assert!(!table.has_column("job"));
    }
}
