use std::collections::BTreeSet;

use super::model::Table;

// ---------------------------------------------------------------------------
// Filter selections driving the summaries
// ---------------------------------------------------------------------------

/// The sentinel entry heading every multi-select list: selecting it (or
/// selecting nothing at all) means "no restriction".
pub const ALL: &str = "All";

/// Single-value sex selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SexFilter {
    #[default]
    All,
    Male,
    Female,
}

impl SexFilter {
    pub const VARIANTS: [SexFilter; 3] = [SexFilter::All, SexFilter::Male, SexFilter::Female];

    /// The label to match against the `sex` column, or `None` for no
    /// restriction.
    pub fn restriction(self) -> Option<&'static str> {
        match self {
            SexFilter::All => None,
            SexFilter::Male => Some("male"),
            SexFilter::Female => Some("female"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SexFilter::All => ALL,
            SexFilter::Male => "male",
            SexFilter::Female => "female",
        }
    }
}

/// Multi-value selector over the distinct values of one column, headed by
/// the [`ALL`] sentinel. A selection restricts only when it is non-empty and
/// does not include the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelect {
    options: Vec<String>,
    selected: BTreeSet<String>,
}

impl MultiSelect {
    /// Build from the sorted distinct values of a column; the default
    /// selection is the sentinel alone (show everything).
    pub fn from_values(values: Vec<String>) -> Self {
        let mut options = vec![ALL.to_string()];
        options.extend(values);
        MultiSelect {
            options,
            selected: BTreeSet::from([ALL.to_string()]),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.selected.contains(option)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn toggle(&mut self, option: &str) {
        if !self.selected.remove(option) {
            self.selected.insert(option.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.options.iter().cloned().collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// The set to restrict to, or `None` when the selection places no
    /// constraint (empty, or the sentinel is selected).
    pub fn restriction(&self) -> Option<&BTreeSet<String>> {
        if self.selected.is_empty() || self.selected.contains(ALL) {
            None
        } else {
            Some(&self.selected)
        }
    }
}

/// All sidebar selections. The multi-selects exist only when their column
/// does (a file without a codebook has no job filter, a file without birth
/// years no age-group filter).
///
/// The age-group selector is currently a control surface only: none of the
/// summaries consume it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    pub sex: SexFilter,
    pub age_groups: Option<MultiSelect>,
    pub jobs: Option<MultiSelect>,
}

impl Filters {
    /// Rebuild the selection state for a freshly loaded table.
    pub fn from_table(table: &Table) -> Self {
        Filters {
            sex: SexFilter::All,
            age_groups: table
                .has_column("age_group")
                .then(|| MultiSelect::from_values(table.unique_strings("age_group"))),
            jobs: table
                .has_column("job")
                .then(|| MultiSelect::from_values(table.unique_strings("job"))),
        }
    }

    pub fn job_restriction(&self) -> Option<&BTreeSet<String>> {
        self.jobs.as_ref().and_then(MultiSelect::restriction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(ms: &mut MultiSelect, options: &[&str]) {
        ms.select_none();
        for option in options {
            ms.toggle(option);
        }
    }

    #[test]
    fn default_selection_restricts_nothing() {
        let ms = MultiSelect::from_values(vec!["middle".into(), "old".into(), "young".into()]);
        assert!(ms.is_selected(ALL));
        assert_eq!(ms.restriction(), None);
    }

    #[test]
    fn empty_selection_restricts_nothing() {
        let mut ms = MultiSelect::from_values(vec!["a".into(), "b".into()]);
        ms.select_none();
        assert_eq!(ms.restriction(), None);
    }

    #[test]
    fn sentinel_overrides_specific_picks() {
        let mut ms = MultiSelect::from_values(vec!["a".into(), "b".into()]);
        select(&mut ms, &["a", ALL]);
        assert_eq!(ms.restriction(), None);
    }

    #[test]
    fn specific_selection_restricts_to_exactly_those_values() {
        let mut ms = MultiSelect::from_values(vec!["a".into(), "b".into(), "c".into()]);
        select(&mut ms, &["a", "c"]);
        let restriction = ms.restriction().expect("should restrict");
        assert!(restriction.contains("a"));
        assert!(restriction.contains("c"));
        assert_eq!(restriction.len(), 2);
    }

    #[test]
    fn select_all_includes_the_sentinel_and_restricts_nothing() {
        let mut ms = MultiSelect::from_values(vec!["a".into()]);
        ms.select_none();
        ms.select_all();
        assert_eq!(ms.selected_count(), 2);
        assert_eq!(ms.restriction(), None);
    }

    #[test]
    fn sex_filter_maps_to_labels() {
        assert_eq!(SexFilter::All.restriction(), None);
        assert_eq!(SexFilter::Male.restriction(), Some("male"));
        assert_eq!(SexFilter::Female.restriction(), Some("female"));
    }

    #[test]
    fn filters_follow_the_table_columns() {
        use crate::data::model::{Row, Value};

        let mut row = Row::new();
        row.insert("age_group".into(), Value::Str("young".into()));
        let table = Table::new(vec!["age_group".into()], vec![row]);

        let filters = Filters::from_table(&table);
        assert!(filters.age_groups.is_some());
        assert!(filters.jobs.is_none());
        assert_eq!(filters.job_restriction(), None);
    }
}
