use super::RowFilter;
use crate::domain::TimeEntryRow;

/// Case-insensitive free-text search across every string-valued field of
/// the row.
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }
}

impl RowFilter for SearchFilter {
    fn matches(&self, row: &TimeEntryRow) -> bool {
        row.text_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}
