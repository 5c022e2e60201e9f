use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{CategoryIndex, ColorCache, RateTable, TimeEntryRow, WeekKey, NO_CATEGORY};

/// Aggregation granularity: individual tasks or their categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Task,
    Category,
}

/// Whether values are presented as hours or as computed cost. Ranking is
/// unaffected by this; it always goes by hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Hours,
    Cost,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSlice {
    pub employee: String,
    pub hours: f64,
    pub cost: f64,
}

/// Aggregated totals for one grouping key. Cost is accumulated per
/// contributing row, since employees with different rates can land in the
/// same bucket.
#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
    pub name: String,
    pub total_hours: f64,
    pub total_cost: f64,
    pub by_employee: Vec<EmployeeSlice>,
}

impl Bucket {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            total_hours: 0.0,
            total_cost: 0.0,
            by_employee: Vec::new(),
        }
    }

    fn add(&mut self, hours: f64, cost: f64) {
        self.total_hours += hours;
        self.total_cost += cost;
    }

    fn add_for(&mut self, employee: &str, hours: f64, cost: f64) {
        self.add(hours, cost);
        match self
            .by_employee
            .iter_mut()
            .find(|slice| slice.employee == employee)
        {
            Some(slice) => {
                slice.hours += hours;
                slice.cost += cost;
            }
            None => self.by_employee.push(EmployeeSlice {
                employee: employee.to_string(),
                hours,
                cost,
            }),
        }
    }

    fn merge(&mut self, other: &Bucket) {
        for slice in &other.by_employee {
            self.add_for(&slice.employee, slice.hours, slice.cost);
        }
    }
}

/// Buckets addressable by name, kept in first-encounter order.
#[derive(Default)]
struct OrderedBuckets {
    positions: HashMap<String, usize>,
    buckets: Vec<Bucket>,
}

impl OrderedBuckets {
    fn entry(&mut self, name: &str) -> &mut Bucket {
        if let Some(&position) = self.positions.get(name) {
            &mut self.buckets[position]
        } else {
            self.positions.insert(name.to_string(), self.buckets.len());
            self.buckets.push(Bucket::new(name));
            self.buckets.last_mut().expect("just pushed")
        }
    }

    fn into_vec(self) -> Vec<Bucket> {
        self.buckets
    }
}

/// Chart-ready record for bar/pie rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub hours: f64,
    pub cost: f64,
    pub kind: Grouping,
    pub percent: f64,
    pub fill: String,
    pub border: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendSeries {
    pub label: String,
    pub data: Vec<f64>,
}

/// Weekly trend datasets. Empty when the filtered set spans fewer than two
/// distinct weeks; callers show a "not enough data" state instead of a
/// one-point line.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendReport {
    pub weeks: Vec<String>,
    pub series: Vec<TrendSeries>,
}

impl TrendReport {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Full fold of a filtered row set: per-task, per-category, per-employee
/// and per-week buckets plus team totals. Recomputed from scratch on every
/// filter change; the datasets in play are small.
#[derive(Debug)]
pub struct Aggregation {
    tasks: Vec<Bucket>,
    categories: Vec<Bucket>,
    employees: Vec<Bucket>,
    weeks: Vec<Bucket>,
    pub total_hours: f64,
    pub total_cost: f64,
}

impl Aggregation {
    pub fn new(
        rows: &[&TimeEntryRow],
        index: &CategoryIndex,
        rates: &RateTable,
        default_year: i32,
    ) -> Self {
        let mut tasks = OrderedBuckets::default();
        let mut employees = OrderedBuckets::default();
        let mut weeks = OrderedBuckets::default();
        let mut total_hours = 0.0;
        let mut total_cost = 0.0;

        for row in rows {
            let rate = rates.rate_for(&row.employee_key);
            for (task, hours) in row.tasks() {
                // Columns outside the configured vocabulary are ignored,
                // not rejected.
                if hours <= 0.0 || !index.is_known_task(task) {
                    continue;
                }
                let cost = hours * rate;
                tasks.entry(task).add_for(&row.employee_key, hours, cost);
                employees.entry(&row.employee_key).add(hours, cost);
                weeks.entry(&row.week_range).add(hours, cost);
                total_hours += hours;
                total_cost += cost;
            }
        }

        // Category buckets are derived from the task buckets. Seeding in
        // configuration order fixes the ordinal ordering; uncategorized
        // tasks contribute to no category bucket.
        let mut categories = OrderedBuckets::default();
        for name in index.categories() {
            categories.entry(name);
        }
        for bucket in &tasks.buckets {
            let category = index.category_of(&bucket.name);
            if category != NO_CATEGORY {
                categories.entry(category).merge(bucket);
            }
        }

        let mut weeks = weeks.into_vec();
        weeks.sort_by_key(|bucket| WeekKey::parse_or_epoch(&bucket.name, default_year));

        Self {
            tasks: tasks.into_vec(),
            categories: categories.into_vec(),
            employees: employees.into_vec(),
            weeks,
            total_hours,
            total_cost,
        }
    }

    /// Task buckets in first-encounter order.
    pub fn tasks(&self) -> &[Bucket] {
        &self.tasks
    }

    /// Category buckets in configuration ordinal order, zero buckets
    /// included.
    pub fn categories(&self) -> &[Bucket] {
        &self.categories
    }

    pub fn employees(&self) -> &[Bucket] {
        &self.employees
    }

    /// Per-week totals in chronological order.
    pub fn weeks(&self) -> &[Bucket] {
        &self.weeks
    }

    pub fn buckets(&self, grouping: Grouping) -> &[Bucket] {
        match grouping {
            Grouping::Task => &self.tasks,
            Grouping::Category => &self.categories,
        }
    }

    /// The most time-consuming bucket. Always ranked by hours, even when
    /// the dashboard displays cost; ties go to the first-encountered
    /// bucket.
    pub fn top_activity(&self, grouping: Grouping) -> Option<&Bucket> {
        let mut best: Option<&Bucket> = None;
        for bucket in self.buckets(grouping) {
            if bucket.total_hours <= 0.0 {
                continue;
            }
            match best {
                Some(current) if bucket.total_hours <= current.total_hours => {}
                _ => best = Some(bucket),
            }
        }
        best
    }

    /// Chart-ready entries for the active grouping and display mode.
    /// Zero-hour buckets are dropped, and a grouping whose displayed total
    /// is zero produces no entries at all rather than dividing by zero.
    pub fn breakdown(
        &self,
        grouping: Grouping,
        display: DisplayMode,
        colors: &ColorCache,
    ) -> Vec<BreakdownEntry> {
        let value = |bucket: &Bucket| match display {
            DisplayMode::Hours => bucket.total_hours,
            DisplayMode::Cost => bucket.total_cost,
        };

        let visible: Vec<&Bucket> = self
            .buckets(grouping)
            .iter()
            .filter(|bucket| bucket.total_hours > 0.0)
            .collect();
        let group_total: f64 = visible.iter().map(|bucket| value(bucket)).sum::<f64>();
        if group_total <= 0.0 {
            return Vec::new();
        }

        visible
            .into_iter()
            .map(|bucket| {
                let color = match grouping {
                    Grouping::Task => colors.task_color(&bucket.name),
                    Grouping::Category => colors.category_color(&bucket.name),
                };
                BreakdownEntry {
                    name: bucket.name.clone(),
                    hours: bucket.total_hours,
                    cost: bucket.total_cost,
                    kind: grouping,
                    percent: round1(value(bucket) / group_total * 100.0),
                    fill: color.fill.clone(),
                    border: color.border.clone(),
                }
            })
            .collect()
    }
}

/// Weekly series for the top-3 buckets by hours plus a synthetic `Total`,
/// one point per distinct week in chronological order.
pub fn trend(
    rows: &[&TimeEntryRow],
    index: &CategoryIndex,
    rates: &RateTable,
    grouping: Grouping,
    display: DisplayMode,
    default_year: i32,
) -> TrendReport {
    let mut weeks: Vec<String> = Vec::new();
    for row in rows {
        if !weeks.contains(&row.week_range) {
            weeks.push(row.week_range.clone());
        }
    }
    if weeks.len() < 2 {
        return TrendReport::default();
    }
    weeks.sort_by_key(|label| WeekKey::parse_or_epoch(label, default_year));

    let week_positions: HashMap<&str, usize> = weeks
        .iter()
        .enumerate()
        .map(|(position, label)| (label.as_str(), position))
        .collect();

    // One scan builds the group × week matrix and the per-week totals.
    let mut matrix: Vec<(String, Vec<f64>)> = Vec::new();
    let mut totals = vec![0.0; weeks.len()];
    for row in rows {
        let rate = rates.rate_for(&row.employee_key);
        let position = week_positions[row.week_range.as_str()];
        for (task, hours) in row.tasks() {
            if hours <= 0.0 || !index.is_known_task(task) {
                continue;
            }
            let value = match display {
                DisplayMode::Hours => hours,
                DisplayMode::Cost => hours * rate,
            };
            totals[position] += value;

            let group = match grouping {
                Grouping::Task => task,
                Grouping::Category => index.category_of(task),
            };
            if group == NO_CATEGORY && grouping == Grouping::Category {
                continue;
            }
            let slot = match matrix.iter().position(|(name, _)| name == group) {
                Some(slot) => slot,
                None => {
                    matrix.push((group.to_string(), vec![0.0; weeks.len()]));
                    matrix.len() - 1
                }
            };
            matrix[slot].1[position] += value;
        }
    }

    // Top 3 by total hours; stable sort keeps first-encounter order on
    // ties. Hour ranking is recomputed here because the matrix holds
    // display values.
    let aggregation = Aggregation::new(rows, index, rates, default_year);
    let mut ranked: Vec<&Bucket> = aggregation
        .buckets(grouping)
        .iter()
        .filter(|bucket| bucket.total_hours > 0.0)
        .collect();
    ranked.sort_by(|a, b| {
        b.total_hours
            .partial_cmp(&a.total_hours)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut series: Vec<TrendSeries> = ranked
        .iter()
        .take(3)
        .filter_map(|bucket| {
            matrix
                .iter()
                .find(|(name, _)| *name == bucket.name)
                .map(|(name, data)| TrendSeries {
                    label: name.clone(),
                    data: data.clone(),
                })
        })
        .collect();
    series.push(TrendSeries {
        label: "Total".to_string(),
        data: totals,
    });

    TrendReport { weeks, series }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
