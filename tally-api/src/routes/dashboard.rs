use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use timesheet::domain::{
    current_year, trend, Aggregation, BreakdownEntry, DisplayMode, FilterState, Grouping,
    TrendReport,
};

use crate::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/overview", get(overview))
        .route("/trend", get(trend_report))
        .route("/employees", get(employees))
        .route("/weeks", get(weeks))
}

/// Query shared by the chart endpoints: grouping/display modes plus the
/// filter fields, each defaulting to the unrestricted sentinel.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    grouping: Grouping,
    display: DisplayMode,
    from_week: Option<String>,
    to_week: Option<String>,
    employee: Option<String>,
    search: Option<String>,
    category: Option<String>,
}

impl DashboardQuery {
    fn filter_state(&self) -> FilterState {
        FilterState {
            from_week: self.from_week.clone(),
            to_week: self.to_week.clone(),
            employee: self.employee.clone(),
            search: self.search.clone(),
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    total_hours: f64,
    total_cost: f64,
    row_count: usize,
    filtered_row_count: usize,
    top_activity: Option<TopActivity>,
    breakdown: Vec<BreakdownEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopActivity {
    name: String,
    hours: f64,
    cost: f64,
}

#[instrument(name = "get_overview", skip(state))]
pub async fn overview(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<OverviewResponse> {
    let dataset = state.dataset().await;
    let org = state.org();
    let year = current_year();

    let rows = query.filter_state().apply(&dataset.rows, &org.index, year);
    let aggregation = Aggregation::new(&rows, &org.index, &org.rates, year);

    let top_activity = aggregation.top_activity(query.grouping).map(|bucket| TopActivity {
        name: bucket.name.clone(),
        hours: bucket.total_hours,
        cost: bucket.total_cost,
    });

    Json(OverviewResponse {
        total_hours: aggregation.total_hours,
        total_cost: aggregation.total_cost,
        row_count: dataset.len(),
        filtered_row_count: rows.len(),
        top_activity,
        breakdown: aggregation.breakdown(query.grouping, query.display, &org.colors),
    })
}

#[instrument(name = "get_trend", skip(state))]
pub async fn trend_report(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<TrendReport> {
    let dataset = state.dataset().await;
    let org = state.org();
    let year = current_year();

    let rows = query.filter_state().apply(&dataset.rows, &org.index, year);
    Json(trend(
        &rows,
        &org.index,
        &org.rates,
        query.grouping,
        query.display,
        year,
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    employee: String,
    hours: f64,
    cost: f64,
    percent: f64,
}

#[instrument(name = "get_employees", skip(state))]
pub async fn employees(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<Vec<EmployeeSummary>> {
    let dataset = state.dataset().await;
    let org = state.org();
    let year = current_year();

    let rows = query.filter_state().apply(&dataset.rows, &org.index, year);
    let aggregation = Aggregation::new(&rows, &org.index, &org.rates, year);

    let team_hours = aggregation.total_hours;
    if team_hours <= 0.0 {
        return Json(Vec::new());
    }

    let summaries = aggregation
        .employees()
        .iter()
        .filter(|bucket| bucket.total_hours > 0.0)
        .sorted_by(|a, b| {
            b.total_hours
                .partial_cmp(&a.total_hours)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        })
        .map(|bucket| EmployeeSummary {
            employee: bucket.name.clone(),
            hours: bucket.total_hours,
            cost: bucket.total_cost,
            percent: (bucket.total_hours / team_hours * 1000.0).round() / 10.0,
        })
        .collect();

    Json(summaries)
}

#[instrument(name = "get_weeks", skip(state))]
pub async fn weeks(State(state): State<AppState>) -> Json<Vec<String>> {
    let dataset = state.dataset().await;
    Json(dataset.week_labels(current_year()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    rows: usize,
    last_refresh: Option<DateTime<Utc>>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let dataset = state.dataset().await;
    Json(HealthResponse {
        status: "ok",
        rows: dataset.len(),
        last_refresh: state.last_refresh().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use timesheet::domain::CategoryDefinition;
    use timesheet::Dataset;

    use crate::app_state::OrgContext;
    use crate::config::OrgConfig;
    use crate::services::sheet_source::DataService;

    const SHEET: &str = "\
Date,User,Week Range,BD - Research,Payroll
2025-03-10,kyle@x.com,Mar 10 – Mar 15 (2025),2,
2025-03-17,kyle@x.com,Mar 17 – Mar 22 (2025),1,1
2025-03-17,maria@x.com,Mar 17 – Mar 22 (2025),,4
";

    fn org_config() -> OrgConfig {
        OrgConfig {
            default_rate: 10.0,
            rates: HashMap::from([("kyle".to_string(), 20.0), ("maria".to_string(), 30.0)]),
            task_order: Vec::new(),
            categories: vec![
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
        }
    }

    async fn state_with_sheet() -> AppState {
        let org = OrgContext::from(&org_config());
        let state = AppState::new(
            org,
            DataService::new(None, Duration::from_secs(60)),
            Duration::from_millis(250),
        );
        let dataset = Dataset::from_csv(SHEET).unwrap();
        state.commit(Arc::new(dataset)).await;
        state
    }

    #[tokio::test]
    async fn overview_reports_totals_and_top_activity() {
        let state = state_with_sheet().await;
        let Json(response) = overview(
            State(state),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(response.row_count, 3);
        assert_eq!(response.filtered_row_count, 3);
        assert_eq!(response.total_hours, 8.0);
        // 3h research × 20 + 1h payroll × 20 + 4h payroll × 30
        assert_eq!(response.total_cost, 200.0);
        assert_eq!(response.top_activity.unwrap().name, "Payroll");
        assert_eq!(response.breakdown.len(), 2);
    }

    #[tokio::test]
    async fn employee_filter_narrows_the_overview() {
        let state = state_with_sheet().await;
        let query = DashboardQuery {
            employee: Some("maria".to_string()),
            ..Default::default()
        };
        let Json(response) = overview(State(state), Query(query)).await;

        assert_eq!(response.filtered_row_count, 1);
        assert_eq!(response.total_hours, 4.0);
        assert_eq!(response.total_cost, 120.0);
    }

    #[tokio::test]
    async fn trend_spans_both_weeks() {
        let state = state_with_sheet().await;
        let Json(report) = trend_report(
            State(state),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(report.weeks.len(), 2);
        let total = report.series.iter().find(|s| s.label == "Total").unwrap();
        assert_eq!(total.data, [2.0, 6.0]);
    }

    #[tokio::test]
    async fn employees_are_ranked_with_percentages() {
        let state = state_with_sheet().await;
        let Json(summaries) = employees(
            State(state),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].employee, "kyle");
        assert_eq!(summaries[0].percent, 50.0);
        assert_eq!(summaries[1].employee, "maria");
    }

    #[tokio::test]
    async fn empty_dataset_degrades_to_empty_payloads() {
        let org = OrgContext::from(&org_config());
        let state = AppState::new(
            org,
            DataService::new(None, Duration::from_secs(60)),
            Duration::from_millis(250),
        );

        let Json(response) = overview(
            State(state.clone()),
            Query(DashboardQuery::default()),
        )
        .await;
        assert_eq!(response.total_hours, 0.0);
        assert!(response.top_activity.is_none());
        assert!(response.breakdown.is_empty());

        let Json(summaries) = employees(
            State(state),
            Query(DashboardQuery::default()),
        )
        .await;
        assert!(summaries.is_empty());
    }
}
