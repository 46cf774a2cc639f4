//! The three income summaries behind the dashboard panels.
//!
//! All of them are pure functions of the normalized table plus the active
//! restrictions. A row participates in a summary only when both its group
//! key and its income are present; missing values are excluded, never
//! zero-filled. Zero participating rows produce an empty output; that is
//! the expected "no data" state, not an error.

use std::collections::{BTreeMap, BTreeSet};

use super::model::{Table, Value};

/// Mean income of one group (a sex, or a job).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub label: String,
    pub mean_income: f64,
}

/// Mean income at one exact age.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeMean {
    pub age: i64,
    pub mean_income: f64,
}

/// Mean income by sex, optionally restricted to one sex. Output in
/// deterministic (alphabetical) group order, one entry per sex present
/// after filtering.
pub fn mean_income_by_sex(table: &Table, sex: Option<&str>) -> Vec<GroupMean> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for row in &table.rows {
        let Some(label) = row.get("sex").and_then(Value::as_str) else {
            continue;
        };
        if let Some(wanted) = sex {
            if label != wanted {
                continue;
            }
        }
        let Some(income) = row.get("income").and_then(Value::as_f64) else {
            continue;
        };
        let entry = acc.entry(label).or_insert((0.0, 0));
        entry.0 += income;
        entry.1 += 1;
    }

    acc.into_iter()
        .map(|(label, (sum, n))| GroupMean {
            label: label.to_string(),
            mean_income: sum / n as f64,
        })
        .collect()
}

/// Mean income per exact age, ascending. Unfiltered: the age panel always
/// shows the whole population. Consumers may truncate for display.
pub fn mean_income_by_age(table: &Table) -> Vec<AgeMean> {
    let mut acc: BTreeMap<i64, (f64, usize)> = BTreeMap::new();

    for row in &table.rows {
        let Some(age) = row.get("age").and_then(Value::as_i64) else {
            continue;
        };
        let Some(income) = row.get("income").and_then(Value::as_f64) else {
            continue;
        };
        let entry = acc.entry(age).or_insert((0.0, 0));
        entry.0 += income;
        entry.1 += 1;
    }

    acc.into_iter()
        .map(|(age, (sum, n))| AgeMean {
            age,
            mean_income: sum / n as f64,
        })
        .collect()
}

/// Mean income per job, highest first, cut to `limit` entries. `jobs`
/// restricts to the given names when present. Ties on the mean are broken
/// by label so the cut is deterministic.
pub fn top_jobs_by_mean_income(
    table: &Table,
    jobs: Option<&BTreeSet<String>>,
    limit: usize,
) -> Vec<GroupMean> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for row in &table.rows {
        let Some(label) = row.get("job").and_then(Value::as_str) else {
            continue;
        };
        if let Some(selected) = jobs {
            if !selected.contains(label) {
                continue;
            }
        }
        let Some(income) = row.get("income").and_then(Value::as_f64) else {
            continue;
        };
        let entry = acc.entry(label).or_insert((0.0, 0));
        entry.0 += income;
        entry.1 += 1;
    }

    let mut means: Vec<GroupMean> = acc
        .into_iter()
        .map(|(label, (sum, n))| GroupMean {
            label: label.to_string(),
            mean_income: sum / n as f64,
        })
        .collect();

    means.sort_by(|a, b| {
        b.mean_income
            .total_cmp(&a.mean_income)
            .then_with(|| a.label.cmp(&b.label))
    });
    means.truncate(limit);
    means
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn income_table(column: &str, entries: &[(Value, Value)]) -> Table {
        let rows = entries
            .iter()
            .map(|(key, income)| {
                row(&[(column, key.clone()), ("income", income.clone())])
            })
            .collect();
        Table::new(vec![column.to_string(), "income".to_string()], rows)
    }

    #[test]
    fn mean_income_by_sex_averages_per_group() {
        let table = income_table(
            "sex",
            &[
                (Value::Str("male".into()), Value::Float(100.0)),
                (Value::Str("male".into()), Value::Float(300.0)),
                (Value::Str("female".into()), Value::Float(200.0)),
            ],
        );
        let means = mean_income_by_sex(&table, None);
        assert_eq!(
            means,
            vec![
                GroupMean {
                    label: "female".into(),
                    mean_income: 200.0
                },
                GroupMean {
                    label: "male".into(),
                    mean_income: 200.0
                },
            ]
        );
    }

    #[test]
    fn sex_restriction_keeps_only_that_group() {
        let table = income_table(
            "sex",
            &[
                (Value::Str("male".into()), Value::Float(100.0)),
                (Value::Str("female".into()), Value::Float(200.0)),
            ],
        );
        let means = mean_income_by_sex(&table, Some("female"));
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].label, "female");
    }

    #[test]
    fn rows_with_missing_key_or_income_are_excluded() {
        let table = income_table(
            "sex",
            &[
                (Value::Str("male".into()), Value::Float(100.0)),
                (Value::Null, Value::Float(900.0)),
                (Value::Str("male".into()), Value::Null),
                (Value::Str("female".into()), Value::Null),
            ],
        );
        let means = mean_income_by_sex(&table, None);
        // Only the first row participates; female vanishes entirely rather
        // than appearing as zero.
        assert_eq!(
            means,
            vec![GroupMean {
                label: "male".into(),
                mean_income: 100.0
            }]
        );
    }

    #[test]
    fn missing_columns_mean_empty_summaries() {
        let table = Table::new(vec!["other".into()], vec![row(&[("other", Value::Int(1))])]);
        assert!(mean_income_by_sex(&table, None).is_empty());
        assert!(mean_income_by_age(&table).is_empty());
        assert!(top_jobs_by_mean_income(&table, None, 10).is_empty());
    }

    #[test]
    fn age_means_come_out_ascending() {
        let table = income_table(
            "age",
            &[
                (Value::Int(42), Value::Float(300.0)),
                (Value::Int(23), Value::Float(100.0)),
                (Value::Int(42), Value::Float(100.0)),
                (Value::Int(61), Value::Float(150.0)),
            ],
        );
        let means = mean_income_by_age(&table);
        assert_eq!(
            means,
            vec![
                AgeMean {
                    age: 23,
                    mean_income: 100.0
                },
                AgeMean {
                    age: 42,
                    mean_income: 200.0
                },
                AgeMean {
                    age: 61,
                    mean_income: 150.0
                },
            ]
        );
    }

    #[test]
    fn top_jobs_keeps_the_ten_highest_means_descending() {
        // 15 jobs with means 10, 20, ..., 150.
        let entries: Vec<(Value, Value)> = (1..=15)
            .map(|i| {
                (
                    Value::Str(format!("job{i:02}")),
                    Value::Float(f64::from(i) * 10.0),
                )
            })
            .collect();
        let table = income_table("job", &entries);

        let top = top_jobs_by_mean_income(&table, None, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].label, "job15");
        assert_eq!(top[0].mean_income, 150.0);
        assert_eq!(top[9].label, "job06");
        for pair in top.windows(2) {
            assert!(pair[0].mean_income > pair[1].mean_income);
        }
    }

    #[test]
    fn equal_means_are_ordered_by_label() {
        let table = income_table(
            "job",
            &[
                (Value::Str("Zebra keeper".into()), Value::Float(100.0)),
                (Value::Str("Apiarist".into()), Value::Float(100.0)),
            ],
        );
        let top = top_jobs_by_mean_income(&table, None, 10);
        assert_eq!(top[0].label, "Apiarist");
        assert_eq!(top[1].label, "Zebra keeper");
    }

    #[test]
    fn disjoint_job_restriction_yields_empty_not_error() {
        let table = income_table(
            "job",
            &[(Value::Str("Clerk".into()), Value::Float(100.0))],
        );
        let selected: BTreeSet<String> = BTreeSet::from(["Astronaut".to_string()]);
        assert!(top_jobs_by_mean_income(&table, Some(&selected), 10).is_empty());
    }

    #[test]
    fn job_restriction_keeps_only_selected_jobs() {
        let table = income_table(
            "job",
            &[
                (Value::Str("Clerk".into()), Value::Float(100.0)),
                (Value::Str("Baker".into()), Value::Float(300.0)),
                (Value::Str("Farmer".into()), Value::Float(200.0)),
            ],
        );
        let selected: BTreeSet<String> =
            BTreeSet::from(["Clerk".to_string(), "Farmer".to_string()]);
        let top = top_jobs_by_mean_income(&table, Some(&selected), 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "Farmer");
        assert_eq!(top[1].label, "Clerk");
    }
}
