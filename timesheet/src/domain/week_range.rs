use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

/// Sortable key derived from a human-readable week-range label such as
/// `"Mar 10 – Mar 15 (2025)"`. Only the first month/day pair matters; a
/// parenthesized 4-digit year overrides the default year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeekKey(NaiveDate);

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl WeekKey {
    pub fn parse(label: &str, default_year: i32) -> Option<Self> {
        let mut tokens = label.split_whitespace();
        let (month, day_token) = loop {
            let token = tokens.next()?;
            if let Some(month) = month_number(token) {
                break (month, tokens.next()?);
            }
        };

        let day: u32 = day_token
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok()?;

        let year = parenthesized_year(label).unwrap_or(default_year);
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Malformed labels key to the epoch so one bad row sorts first
    /// instead of breaking ordering for everything else.
    pub fn parse_or_epoch(label: &str, default_year: i32) -> Self {
        Self::parse(label, default_year).unwrap_or_else(Self::epoch)
    }

    pub fn epoch() -> Self {
        Self(NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date"))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Three-way ordering of two non-sentinel week-range labels. The `"all"`
/// sentinel is short-circuited upstream by the filter pipeline and never
/// reaches this comparison.
pub fn compare_week_labels(a: &str, b: &str, default_year: i32) -> Ordering {
    WeekKey::parse_or_epoch(a, default_year).cmp(&WeekKey::parse_or_epoch(b, default_year))
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn month_number(token: &str) -> Option<u32> {
    // Case-sensitive three-letter abbreviation, possibly with trailing
    // punctuation ("Mar," in some exports).
    let prefix = token.get(..3)?;
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|idx| idx as u32 + 1)
}

fn parenthesized_year(label: &str) -> Option<i32> {
    let start = label.find('(')?;
    let rest = &label[start + 1..];
    let end = rest.find(')')?;
    let inner = rest[..end].trim();
    if inner.len() == 4 && inner.chars().all(|c| c.is_ascii_digit()) {
        inner.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_labels_within_a_year() {
        assert_eq!(
            compare_week_labels("Mar 10 – Mar 15 (2025)", "Mar 17 – Mar 22 (2025)", 2024),
            Ordering::Less
        );
        assert_eq!(
            compare_week_labels("Dec 29 – Jan 3 (2025)", "Mar 3 – Mar 8 (2025)", 2024),
            Ordering::Greater
        );
    }

    #[test]
    fn substitutes_default_year_when_missing() {
        let key = WeekKey::parse("Mar 10 – Mar 15", 2023).unwrap();
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(2023, 3, 10).unwrap());
    }

    #[test]
    fn parenthesized_year_wins_over_default() {
        let key = WeekKey::parse("Mar 10 – Mar 15 (2025)", 2023).unwrap();
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn month_abbreviation_is_case_sensitive() {
        assert!(WeekKey::parse("mar 10 (2025)", 2025).is_none());
        assert!(WeekKey::parse("MAR 10 (2025)", 2025).is_none());
        assert!(WeekKey::parse("Mar 10 (2025)", 2025).is_some());
    }

    #[test]
    fn malformed_labels_sort_first() {
        assert_eq!(
            WeekKey::parse_or_epoch("week of whenever", 2025),
            WeekKey::epoch()
        );
        assert_eq!(
            compare_week_labels("not a week", "Jan 6 – Jan 11 (2025)", 2025),
            Ordering::Less
        );
    }

    #[test]
    fn invalid_calendar_dates_fail_parse() {
        assert!(WeekKey::parse("Feb 30 – Mar 5 (2025)", 2025).is_none());
        assert!(WeekKey::parse("Mar (2025)", 2025).is_none());
    }

    #[test]
    fn tolerates_trailing_punctuation_on_tokens() {
        let key = WeekKey::parse("Mar 10, 2025 week", 2024).unwrap();
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }
}
