mod category_filter;
mod employee_filter;
mod search_filter;
mod week_range_filter;

pub use category_filter::CategoryFilter;
pub use employee_filter::EmployeeFilter;
pub use search_filter::SearchFilter;
pub use week_range_filter::WeekRangeFilter;

use serde::Deserialize;

use super::{CategoryIndex, TimeEntryRow};

/// Universal "no restriction" sentinel accepted in every filter field.
pub const ALL: &str = "all";

pub trait RowFilter {
    fn matches(&self, row: &TimeEntryRow) -> bool;
}

pub(crate) fn is_all(field: &Option<String>) -> bool {
    match field {
        None => true,
        Some(value) => value.is_empty() || value.eq_ignore_ascii_case(ALL),
    }
}

/// The full filter selection of the dashboard. Each field independently
/// defaults to the unrestricted sentinel; `apply` is a pure function of
/// `(rows, state)` and can be re-invoked on every UI change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterState {
    pub from_week: Option<String>,
    pub to_week: Option<String>,
    pub employee: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl FilterState {
    pub fn is_unrestricted(&self) -> bool {
        is_all(&self.from_week)
            && is_all(&self.to_week)
            && is_all(&self.employee)
            && is_all(&self.search)
            && is_all(&self.category)
    }

    /// AND-composes week range, employee, free-text and category
    /// predicates in one pass. Predicates whose field is unrestricted are
    /// not built at all, so the sentinel never reaches the comparator.
    pub fn apply<'r>(
        &self,
        rows: &'r [TimeEntryRow],
        index: &CategoryIndex,
        default_year: i32,
    ) -> Vec<&'r TimeEntryRow> {
        let mut filters: Vec<Box<dyn RowFilter + '_>> = Vec::new();

        if !(is_all(&self.from_week) && is_all(&self.to_week)) {
            filters.push(Box::new(WeekRangeFilter::new(
                self.from_week.as_deref().filter(|_| !is_all(&self.from_week)),
                self.to_week.as_deref().filter(|_| !is_all(&self.to_week)),
                default_year,
            )));
        }
        if !is_all(&self.employee) {
            filters.push(Box::new(EmployeeFilter::new(
                self.employee.as_deref().unwrap_or_default(),
            )));
        }
        if !is_all(&self.search) {
            filters.push(Box::new(SearchFilter::new(
                self.search.as_deref().unwrap_or_default(),
            )));
        }
        if !is_all(&self.category) {
            filters.push(Box::new(CategoryFilter::new(
                self.category.as_deref().unwrap_or_default(),
                index,
            )));
        }

        rows.iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryDefinition;

    fn rows() -> Vec<TimeEntryRow> {
        let make = |user: &str, week: &str, task: &str, hours: &str| {
            TimeEntryRow::from_columns(&[
                ("User".to_string(), user.to_string()),
                ("Week Range".to_string(), week.to_string()),
                (task.to_string(), hours.to_string()),
            ])
            .unwrap()
        };
        vec![
            make("kyle@x.com", "Mar 10 – Mar 15 (2025)", "BD - Research", "2"),
            make("maria@x.com", "Mar 17 – Mar 22 (2025)", "Payroll", "4"),
            make("kyle@x.com", "Mar 24 – Mar 29 (2025)", "Payroll", "1"),
        ]
    }

    fn index() -> CategoryIndex {
        CategoryIndex::new(
            &[
                CategoryDefinition {
                    name: "Business Development".to_string(),
                    color: "#1a73e8".to_string(),
                    tasks: vec!["BD - Research".to_string()],
                },
                CategoryDefinition {
                    name: "Operations".to_string(),
                    color: "#34a853".to_string(),
                    tasks: vec!["Payroll".to_string()],
                },
            ],
            &[],
        )
    }

    #[test]
    fn unrestricted_state_is_identity() {
        let rows = rows();
        let state = FilterState::default();
        assert!(state.is_unrestricted());
        assert_eq!(state.apply(&rows, &index(), 2025).len(), rows.len());

        let all_sentinels = FilterState {
            from_week: Some("all".to_string()),
            to_week: Some("ALL".to_string()),
            employee: Some(String::new()),
            search: None,
            category: Some("all".to_string()),
        };
        assert!(all_sentinels.is_unrestricted());
        assert_eq!(all_sentinels.apply(&rows, &index(), 2025).len(), rows.len());
    }

    #[test]
    fn reapplying_is_idempotent() {
        let rows = rows();
        let state = FilterState {
            employee: Some("kyle".to_string()),
            ..Default::default()
        };
        let first: Vec<String> = state
            .apply(&rows, &index(), 2025)
            .iter()
            .map(|r| r.week_range.clone())
            .collect();
        let second: Vec<String> = state
            .apply(&rows, &index(), 2025)
            .iter()
            .map(|r| r.week_range.clone())
            .collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn predicates_are_anded() {
        let rows = rows();
        let state = FilterState {
            employee: Some("kyle".to_string()),
            category: Some("Operations".to_string()),
            ..Default::default()
        };
        let filtered = state.apply(&rows, &index(), 2025);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].week_range, "Mar 24 – Mar 29 (2025)");
    }

    #[test]
    fn week_bounds_restrict_the_window() {
        let rows = rows();
        let state = FilterState {
            from_week: Some("Mar 17 – Mar 22 (2025)".to_string()),
            to_week: Some("Mar 24 – Mar 29 (2025)".to_string()),
            ..Default::default()
        };
        let filtered = state.apply(&rows, &index(), 2025);
        assert_eq!(filtered.len(), 2);

        let open_ended = FilterState {
            from_week: Some("Mar 17 – Mar 22 (2025)".to_string()),
            to_week: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(open_ended.apply(&rows, &index(), 2025).len(), 2);
    }
}
