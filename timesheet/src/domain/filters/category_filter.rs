use super::RowFilter;
use crate::domain::{CategoryIndex, TimeEntryRow};

/// Keeps rows that spent time on at least one task of the selected
/// category.
pub struct CategoryFilter<'a> {
    category: String,
    index: &'a CategoryIndex,
}

impl<'a> CategoryFilter<'a> {
    pub fn new(category: &str, index: &'a CategoryIndex) -> Self {
        Self {
            category: category.to_string(),
            index,
        }
    }
}

impl RowFilter for CategoryFilter<'_> {
    fn matches(&self, row: &TimeEntryRow) -> bool {
        row.tasks()
            .any(|(task, hours)| hours > 0.0 && self.index.category_of(task) == self.category)
    }
}
