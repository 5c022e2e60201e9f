use crate::domain::{TimeEntryRow, WeekKey, USER_COLUMN};
use crate::TimesheetError;

/// The committed row set of one acquisition cycle (remote export or
/// uploaded file). Consumers snapshot the whole dataset; there is no
/// partial mutation.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<TimeEntryRow>,
}

impl Dataset {
    /// Parse a CSV export with a header row. Rows that fail normalization
    /// are skipped with a warning; only structural problems (no `User`
    /// column, nothing parseable at all) surface as errors.
    pub fn from_csv(text: &str) -> Result<Self, TimesheetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        if !headers.iter().any(|header| header == USER_COLUMN) {
            return Err(TimesheetError::MissingColumn(USER_COLUMN));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!("skipping malformed csv record: {}", err);
                    continue;
                }
            };
            let columns: Vec<(String, String)> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect();
            match TimeEntryRow::from_columns(&columns) {
                Ok(row) => rows.push(row),
                Err(err) => tracing::warn!("skipping row: {}", err),
            }
        }

        if rows.is_empty() {
            return Err(TimesheetError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct week-range labels in chronological order.
    pub fn week_labels(&self, default_year: i32) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for row in &self.rows {
            if !labels.contains(&row.week_range) {
                labels.push(row.week_range.clone());
            }
        }
        labels.sort_by_key(|label| WeekKey::parse_or_epoch(label, default_year));
        labels
    }

    /// Distinct employee keys in first-encounter order.
    pub fn employee_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for row in &self.rows {
            if !keys.contains(&row.employee_key) {
                keys.push(row.employee_key.clone());
            }
        }
        keys
    }
}
