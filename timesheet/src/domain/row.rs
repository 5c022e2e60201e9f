use chrono::NaiveDate;
use serde::Serialize;

use crate::TimesheetError;

pub const DATE_COLUMN: &str = "Date";
pub const USER_COLUMN: &str = "User";
pub const WEEK_RANGE_COLUMN: &str = "Week Range";

/// One normalized record: one employee, one reporting week. The known
/// columns are typed fields; every other column is carried as an hours
/// value in encounter order.
#[derive(Debug, Clone, Serialize)]
pub struct TimeEntryRow {
    pub date: Option<NaiveDate>,
    /// Raw identifier as it appeared in the sheet, kept for substring
    /// matching in the employee filter.
    pub user: String,
    pub employee_key: String,
    pub week_range: String,
    tasks: Vec<(String, f64)>,
}

impl TimeEntryRow {
    /// Build a row from ordered `(header, value)` pairs as produced by the
    /// CSV ingest. A missing or blank `User` value is a validation error;
    /// everything else degrades permissively.
    pub fn from_columns(columns: &[(String, String)]) -> Result<Self, TimesheetError> {
        let mut date = None;
        let mut user: Option<String> = None;
        let mut week_range = String::new();
        let mut tasks = Vec::new();

        for (name, value) in columns {
            match name.as_str() {
                DATE_COLUMN => date = parse_date(value),
                USER_COLUMN => user = Some(value.trim().to_string()),
                WEEK_RANGE_COLUMN => week_range = value.trim().to_string(),
                _ => tasks.push((name.clone(), parse_hours(value))),
            }
        }

        let user = user
            .filter(|u| !u.is_empty())
            .ok_or_else(|| TimesheetError::Validation("row has no User value".to_string()))?;
        let employee_key = employee_key(&user);

        Ok(Self {
            date,
            user,
            employee_key,
            week_range,
            tasks,
        })
    }

    /// Task columns in encounter order, including zero-hour entries.
    pub fn tasks(&self) -> impl Iterator<Item = (&str, f64)> {
        self.tasks.iter().map(|(name, hours)| (name.as_str(), *hours))
    }

    pub fn hours_for(&self, task: &str) -> f64 {
        self.tasks
            .iter()
            .find(|(name, _)| name == task)
            .map(|(_, hours)| *hours)
            .unwrap_or(0.0)
    }

    /// All string-valued fields of the row, for free-text search.
    pub fn text_fields(&self) -> Vec<String> {
        let mut fields = vec![self.user.clone(), self.week_range.clone()];
        if let Some(date) = self.date {
            fields.push(date.format("%Y-%m-%d").to_string());
        }
        fields
    }
}

/// Lowercased local-part of an email-like identifier; the whole lowercased
/// string when no `@` is present.
pub fn employee_key(user: &str) -> String {
    let lowered = user.trim().to_lowercase();
    match lowered.split_once('@') {
        Some((local, _)) => local.to_string(),
        None => lowered,
    }
}

/// Blank and non-numeric cells coerce to zero; spreadsheet exports leave
/// untouched cells empty.
fn parse_hours(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|hours| *hours >= 0.0)
        .unwrap_or(0.0)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn derives_employee_key_from_email() {
        assert_eq!(employee_key("Kyle@Example.com"), "kyle");
        assert_eq!(employee_key("  MARIA@x.io "), "maria");
    }

    #[test]
    fn falls_back_to_whole_identifier_without_at() {
        assert_eq!(employee_key("Kyle Smith"), "kyle smith");
    }

    #[test]
    fn normalizes_a_full_row() {
        let row = TimeEntryRow::from_columns(&columns(&[
            ("Date", "2025-03-10"),
            ("User", "kyle@x.com"),
            ("Week Range", "Mar 10 – Mar 15 (2025)"),
            ("BD - Research", "2"),
            ("BD - Outreach", ""),
        ]))
        .unwrap();

        assert_eq!(row.employee_key, "kyle");
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2025, 3, 10));
        assert_eq!(row.hours_for("BD - Research"), 2.0);
        assert_eq!(row.hours_for("BD - Outreach"), 0.0);
    }

    #[test]
    fn missing_user_is_a_validation_error() {
        let err = TimeEntryRow::from_columns(&columns(&[
            ("Date", "2025-03-10"),
            ("Week Range", "Mar 10 – Mar 15 (2025)"),
        ]))
        .unwrap_err();
        assert!(matches!(err, TimesheetError::Validation(_)));

        let err = TimeEntryRow::from_columns(&columns(&[("User", "   ")])).unwrap_err();
        assert!(matches!(err, TimesheetError::Validation(_)));
    }

    #[test]
    fn coerces_bad_hours_to_zero() {
        let row = TimeEntryRow::from_columns(&columns(&[
            ("User", "kyle@x.com"),
            ("Planning", "abc"),
            ("Review", "-3"),
            ("Calls", "1.5"),
        ]))
        .unwrap();
        assert_eq!(row.hours_for("Planning"), 0.0);
        assert_eq!(row.hours_for("Review"), 0.0);
        assert_eq!(row.hours_for("Calls"), 1.5);
    }

    #[test]
    fn unknown_date_formats_become_none() {
        let row = TimeEntryRow::from_columns(&columns(&[
            ("Date", "10th of March"),
            ("User", "kyle@x.com"),
        ]))
        .unwrap();
        assert_eq!(row.date, None);

        let row = TimeEntryRow::from_columns(&columns(&[
            ("Date", "03/10/2025"),
            ("User", "kyle@x.com"),
        ]))
        .unwrap();
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2025, 3, 10));
    }
}
