//! Raw-to-semantic normalization of the survey table.
//!
//! The raw extract uses questionnaire item codes for column names and
//! reserved sentinel values for "no answer". Normalization renames the known
//! columns, recodes sentinels to `Null`, and derives `age` / `age_group`
//! from the birth year. It is a fixed sequence of steps, each tied to one
//! source column and skipped when that column is absent; a partial extract
//! normalizes as far as its columns allow, never erroring.

use super::model::{Table, Value};

/// Survey reference year anchoring the age computation.
pub const REFERENCE_YEAR: i64 = 2015;

/// Questionnaire item code → semantic column name.
pub const RENAME_MAP: &[(&str, &str)] = &[
    ("h10_g3", "sex"),
    ("h10_g4", "birth_year"),
    ("h10_g10", "marital_status"),
    ("h10_g11", "religion"),
    ("h10_eco9", "job_code"),
    ("p1002_8aq1", "income"),
    ("h10_reg7", "region_code"),
];

/// One recode/derive step: applies only when `source` is present.
struct Step {
    name: &'static str,
    source: &'static str,
    apply: fn(&mut Table),
}

/// Order matters: sentinel recoding must precede the derivations reading the
/// cleaned column (age reads birth_year; the codebook join reads job_code).
const STEPS: &[Step] = &[
    Step {
        name: "sex codes",
        source: "sex",
        apply: recode_sex,
    },
    Step {
        name: "income sentinels",
        source: "income",
        apply: recode_income,
    },
    Step {
        name: "age derivation",
        source: "birth_year",
        apply: recode_birth_year,
    },
    Step {
        name: "job code sentinel",
        source: "job_code",
        apply: recode_job_code,
    },
];

/// Run the renames and every applicable recode step, in order.
pub fn apply(table: &mut Table) {
    for (raw, semantic) in RENAME_MAP {
        table.rename_column(raw, semantic);
    }
    for step in STEPS {
        if !table.has_column(step.source) {
            log::debug!("skipping {} ('{}' column absent)", step.name, step.source);
            continue;
        }
        (step.apply)(table);
    }
}

/// 9 is the "no answer" sentinel; 1/2 are the only valid codes. Anything
/// else is treated as missing rather than guessed at.
fn recode_sex(table: &mut Table) {
    for row in &mut table.rows {
        if let Some(value) = row.get_mut("sex") {
            *value = match value.as_i64() {
                Some(1) => Value::Str("male".into()),
                Some(2) => Value::Str("female".into()),
                _ => Value::Null,
            };
        }
    }
}

/// 9999 is "no answer"; a literal 0 means no wage income was recorded and is
/// excluded from every income mean.
fn recode_income(table: &mut Table) {
    for row in &mut table.rows {
        if let Some(value) = row.get_mut("income") {
            if matches!(value.as_f64(), Some(x) if x == 9999.0 || x == 0.0) {
                *value = Value::Null;
            }
        }
    }
}

fn recode_birth_year(table: &mut Table) {
    for row in &mut table.rows {
        let age = match row.get_mut("birth_year") {
            Some(value) => {
                if value.as_i64() == Some(9999) {
                    *value = Value::Null;
                }
                value.as_i64().map(|birth_year| REFERENCE_YEAR - birth_year + 1)
            }
            None => None,
        };
        row.insert("age".into(), age.map_or(Value::Null, Value::Int));
        row.insert(
            "age_group".into(),
            age.map_or(Value::Null, |a| Value::Str(age_group(a).into())),
        );
    }
    table.push_column("age");
    table.push_column("age_group");
}

fn recode_job_code(table: &mut Table) {
    for row in &mut table.rows {
        if let Some(value) = row.get_mut("job_code") {
            if value.as_i64() == Some(9999) {
                *value = Value::Null;
            }
        }
    }
}

/// Three-way cohort split, strict thresholds at 30 and 60.
pub fn age_group(age: i64) -> &'static str {
    if age >= 60 {
        "old"
    } else if age >= 30 {
        "middle"
    } else {
        "young"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn table_of(columns: &[&str], cells: &[&[Value]]) -> Table {
        let rows = cells
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(row.iter())
                    .map(|(c, v)| (c.to_string(), v.clone()))
                    .collect::<Row>()
            })
            .collect();
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn sex_codes_map_and_everything_else_goes_missing() {
        let mut table = table_of(
            &["h10_g3"],
            &[
                &[Value::Int(1)],
                &[Value::Int(2)],
                &[Value::Int(9)],
                &[Value::Int(7)],
                &[Value::Null],
            ],
        );
        apply(&mut table);

        let sexes: Vec<&Value> = table.rows.iter().map(|r| &r["sex"]).collect();
        assert_eq!(
            sexes,
            vec![
                &Value::Str("male".into()),
                &Value::Str("female".into()),
                &Value::Null,
                &Value::Null,
                &Value::Null,
            ]
        );
    }

    #[test]
    fn income_sentinels_and_zero_go_missing() {
        let mut table = table_of(
            &["p1002_8aq1"],
            &[
                &[Value::Int(9999)],
                &[Value::Int(0)],
                &[Value::Float(0.0)],
                &[Value::Float(150.5)],
                &[Value::Int(200)],
            ],
        );
        apply(&mut table);

        let incomes: Vec<&Value> = table.rows.iter().map(|r| &r["income"]).collect();
        assert_eq!(
            incomes,
            vec![
                &Value::Null,
                &Value::Null,
                &Value::Null,
                &Value::Float(150.5),
                &Value::Int(200),
            ]
        );
    }

    #[test]
    fn age_is_reference_year_minus_birth_year_plus_one() {
        let mut table = table_of(
            &["h10_g4"],
            &[&[Value::Int(1980)], &[Value::Int(9999)], &[Value::Null]],
        );
        apply(&mut table);

        assert_eq!(table.rows[0]["age"], Value::Int(36));
        assert_eq!(table.rows[0]["age_group"], Value::Str("middle".into()));
        assert_eq!(table.rows[1]["age"], Value::Null);
        assert_eq!(table.rows[1]["age_group"], Value::Null);
        assert_eq!(table.rows[2]["age"], Value::Null);
        assert!(table.has_column("age"));
        assert!(table.has_column("age_group"));
    }

    #[test]
    fn age_group_thresholds_are_strict_at_30_and_60() {
        // Birth years chosen to land exactly on the cohort boundaries.
        let by = |age: i64| Value::Int(REFERENCE_YEAR - age + 1);
        let mut table = table_of(&["h10_g4"], &[&[by(29)], &[by(30)], &[by(59)], &[by(60)]]);
        apply(&mut table);

        let groups: Vec<&Value> = table.rows.iter().map(|r| &r["age_group"]).collect();
        assert_eq!(
            groups,
            vec![
                &Value::Str("young".into()),
                &Value::Str("middle".into()),
                &Value::Str("middle".into()),
                &Value::Str("old".into()),
            ]
        );
    }

    #[test]
    fn job_code_sentinel_goes_missing() {
        let mut table = table_of(&["h10_eco9"], &[&[Value::Int(9999)], &[Value::Int(314)]]);
        apply(&mut table);

        assert_eq!(table.rows[0]["job_code"], Value::Null);
        assert_eq!(table.rows[1]["job_code"], Value::Int(314));
    }

    #[test]
    fn steps_skip_when_their_column_is_absent() {
        let mut table = table_of(&["unrelated"], &[&[Value::Int(5)]]);
        let before = table.clone();
        apply(&mut table);
        assert_eq!(table, before);
    }

    #[test]
    fn unmapped_columns_pass_through_untouched() {
        let mut table = table_of(
            &["h10_g3", "custom_note"],
            &[&[Value::Int(1), Value::Str("keep me".into())]],
        );
        apply(&mut table);

        assert!(table.has_column("custom_note"));
        assert_eq!(table.rows[0]["custom_note"], Value::Str("keep me".into()));
    }
}
