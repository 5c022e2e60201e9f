use super::RowFilter;
use crate::domain::{TimeEntryRow, WeekKey};

/// Inclusive week-range window. Bounds left `None` are unbounded; the
/// `"all"` sentinel is resolved by the pipeline before construction.
pub struct WeekRangeFilter {
    from: Option<WeekKey>,
    to: Option<WeekKey>,
    default_year: i32,
}

impl WeekRangeFilter {
    pub fn new(from: Option<&str>, to: Option<&str>, default_year: i32) -> Self {
        Self {
            from: from.map(|label| WeekKey::parse_or_epoch(label, default_year)),
            to: to.map(|label| WeekKey::parse_or_epoch(label, default_year)),
            default_year,
        }
    }
}

impl RowFilter for WeekRangeFilter {
    fn matches(&self, row: &TimeEntryRow) -> bool {
        let key = WeekKey::parse_or_epoch(&row.week_range, self.default_year);
        if let Some(from) = self.from {
            if key < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if key > to {
                return false;
            }
        }
        true
    }
}
