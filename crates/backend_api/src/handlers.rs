use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use models::{DateRange, FinancialRecord, MonthSelection, RecordKind, Settings};
use overview_engine::OverviewRequest;

use crate::{error::ApiError, repository::RecordRepository, Result};

pub type RecordRepositoryState = Arc<dyn RecordRepository>;
pub type SettingsState = Arc<Settings>;

/// Query parameters accepted by the overview endpoint
#[derive(Debug, Default, Deserialize)]
pub struct OverviewParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub account: Option<String>,
    pub year: Option<i32>,
    /// Comma-separated `"YYYY-M"` keys, e.g. `months=2025-1,2025-2`
    pub months: Option<String>,
}

/// Query parameters accepted by the drill-down endpoint
#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub kind: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub account: Option<String>,
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dashboard-api"
    }))
}

/// GET /api/config
/// Defaults the overview UI needs before its first recompute
pub async fn get_client_config(State(settings): State<SettingsState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "debounce_ms": settings.debounce_ms,
        "default_chart_year": settings.default_chart_year,
    }))
}

/// GET /api/overview
/// Recomputes the full financial overview for the requested filters
pub async fn get_overview(
    State(repo): State<RecordRepositoryState>,
    Query(params): Query<OverviewParams>,
) -> Result<impl IntoResponse> {
    let request = overview_request(&params)?;
    let (expenses, earnings) = load_normalized_records(&repo).await?;

    let overview = overview_engine::compute_overview(&expenses, &earnings, &request);
    Ok(Json(overview))
}

/// GET /api/overview/categories/:category/details
/// Returns the detail rows behind one category slice
pub async fn get_category_details(
    State(repo): State<RecordRepositoryState>,
    Path(category): Path<String>,
    Query(params): Query<DetailParams>,
) -> Result<impl IntoResponse> {
    let kind = RecordKind::from_str(&params.kind).map_err(ApiError::BadRequest)?;
    let date_range = parse_date_range(params.start.as_deref(), params.end.as_deref())?;

    let (expenses, earnings) = load_normalized_records(&repo).await?;
    let filtered_expenses =
        overview_engine::filter_records(&expenses, date_range.as_ref(), params.account.as_deref());
    let filtered_earnings =
        overview_engine::filter_records(&earnings, date_range.as_ref(), params.account.as_deref());

    let rows =
        overview_engine::category_details(&category, kind, &filtered_expenses, &filtered_earnings);
    Ok(Json(rows))
}

/// The two sequences are fetched concurrently and joined before
/// normalization; either failure aborts the whole load into a single
/// error, so one dataset is never displayed without the other.
async fn load_normalized_records(
    repo: &RecordRepositoryState,
) -> Result<(Vec<FinancialRecord>, Vec<FinancialRecord>)> {
    let (raw_expenses, raw_earnings) =
        tokio::try_join!(repo.fetch_expenses(), repo.fetch_earnings())
            .map_err(|e| ApiError::LoadFailure(e.to_string()))?;

    Ok((
        overview_engine::normalize_records(&raw_expenses),
        overview_engine::normalize_records(&raw_earnings),
    ))
}

fn overview_request(params: &OverviewParams) -> Result<OverviewRequest> {
    let date_range = parse_date_range(params.start.as_deref(), params.end.as_deref())?;
    let months = params
        .months
        .as_deref()
        .map(parse_month_keys)
        .unwrap_or_default();

    Ok(OverviewRequest {
        date_range,
        account_id: params.account.clone(),
        chart_year: params.year.unwrap_or_else(|| Local::now().year()),
        months,
    })
}

fn parse_month_keys(raw: &str) -> MonthSelection {
    MonthSelection::from_keys(
        raw.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string),
    )
}

/// A range needs both bounds: one bound alone is incomplete and `start`
/// after `end` is invalid. Both cases are rejected so the previous filter
/// state stays in effect.
fn parse_date_range(start: Option<&str>, end: Option<&str>) -> Result<Option<DateRange>> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => {
            let start = parse_query_date(start)?;
            let end = parse_query_date(end)?;
            let range =
                DateRange::new(start, end).map_err(|e| ApiError::BadRequest(e.to_string()))?;
            Ok(Some(range))
        }
        _ => Err(ApiError::BadRequest(
            "both 'start' and 'end' are required for a date range".to_string(),
        )),
    }
}

fn parse_query_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start: Option<&str>, end: Option<&str>) -> OverviewParams {
        OverviewParams {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
            ..OverviewParams::default()
        }
    }

    #[test]
    fn absent_bounds_mean_no_date_filter() {
        let request = overview_request(&params(None, None)).unwrap();
        assert_eq!(request.date_range, None);
    }

    #[test]
    fn a_valid_range_is_parsed_inclusively() {
        let request = overview_request(&params(Some("2025-01-01"), Some("2025-03-31"))).unwrap();
        let range = request.date_range.unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
    }

    #[test]
    fn start_after_end_is_rejected_not_swapped() {
        let result = overview_request(&params(Some("2025-03-31"), Some("2025-01-01")));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn a_single_bound_is_an_incomplete_range() {
        assert!(matches!(
            overview_request(&params(Some("2025-01-01"), None)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            overview_request(&params(None, Some("2025-01-01"))),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn unparseable_dates_are_rejected() {
        let result = overview_request(&params(Some("January 1st"), Some("2025-03-31")));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn month_keys_parse_into_a_selection() {
        let selection = parse_month_keys("2025-1, 2025-2,,");
        assert_eq!(selection.selected_count(), 2);
        assert!(selection.contains(2025, 1));
        assert!(selection.contains(2025, 2));
        assert!(!selection.contains(2025, 3));
    }
}
