use std::collections::BTreeSet;

use chrono::Datelike;
use models::{BarChartViewModel, DateRange, FinancialOverview, FinancialRecord, MonthSelection};

use crate::{aggregate, filter, runway};

/// Immutable filter state for one overview recompute. Each user action
/// produces a new value and every view model is re-derived from it;
/// nothing is patched incrementally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewRequest {
    pub date_range: Option<DateRange>,
    pub account_id: Option<String>,
    pub chart_year: i32,
    pub months: MonthSelection,
}

/// Derives the whole financial overview from the two normalized base
/// sequences. The runway inputs go through the month filter over the
/// unfiltered base sets; everything else reads the date/account-filtered
/// subsets.
pub fn compute_overview(
    expenses: &[FinancialRecord],
    earnings: &[FinancialRecord],
    request: &OverviewRequest,
) -> FinancialOverview {
    let filtered_expenses = filter::filter_records(
        expenses,
        request.date_range.as_ref(),
        request.account_id.as_deref(),
    );
    let filtered_earnings = filter::filter_records(
        earnings,
        request.date_range.as_ref(),
        request.account_id.as_deref(),
    );

    let expenses_by_category =
        aggregate::to_chart_view_model(&aggregate::aggregate_by_category(&filtered_expenses));
    let earnings_by_category =
        aggregate::to_chart_view_model(&aggregate::aggregate_by_category(&filtered_earnings));

    let total_expenses = expenses_by_category.total;
    let total_earnings = earnings_by_category.total;

    let monthly = BarChartViewModel {
        labels: aggregate::month_labels(),
        datasets: vec![
            aggregate::monthly_series(
                "Expenses",
                aggregate::aggregate_by_month(&filtered_expenses, request.chart_year),
            ),
            aggregate::monthly_series(
                "Earnings",
                aggregate::aggregate_by_month(&filtered_earnings, request.chart_year),
            ),
        ],
    };

    let runway_expenses = filter::filter_by_months(expenses, &request.months);
    let runway_earnings = filter::filter_by_months(earnings, &request.months);
    let runway = runway::project_runway(&runway_expenses, &runway_earnings, &request.months);

    FinancialOverview {
        total_expenses,
        total_earnings,
        profit_loss: total_earnings - total_expenses,
        expenses_by_category,
        earnings_by_category,
        chart_year: request.chart_year,
        monthly,
        runway,
        account_ids: distinct_account_ids(expenses, earnings),
        years: distinct_years(expenses, earnings),
    }
}

// The only place the two sequences are walked together: populating the
// account and year pickers.
fn distinct_account_ids(
    expenses: &[FinancialRecord],
    earnings: &[FinancialRecord],
) -> Vec<String> {
    let mut ids = BTreeSet::new();
    for record in expenses.iter().chain(earnings) {
        if let Some(id) = &record.account_id {
            ids.insert(id.clone());
        }
    }
    ids.into_iter().collect()
}

fn distinct_years(expenses: &[FinancialRecord], earnings: &[FinancialRecord]) -> Vec<i32> {
    let mut years = BTreeSet::new();
    for record in expenses.iter().chain(earnings) {
        if let Some(date) = record.date {
            years.insert(date.year());
        }
    }
    years.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, amount: f64, category: &str, account: Option<&str>) -> FinancialRecord {
        FinancialRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            amount,
            category: category.to_string(),
            account_id: account.map(|a| a.to_string()),
            description: "No description".to_string(),
        }
    }

    fn request_for(year: i32) -> OverviewRequest {
        OverviewRequest {
            chart_year: year,
            ..OverviewRequest::default()
        }
    }

    #[test]
    fn totals_and_profit_loss_follow_the_filtered_sets() {
        let expenses = vec![
            record("2025-01-10", 10.0, "Office", None),
            record("2025-01-12", 20.0, "Travel", None),
        ];
        let earnings = vec![record("2025-01-15", 50.0, "Consulting", None)];

        let overview = compute_overview(&expenses, &earnings, &request_for(2025));

        assert_eq!(overview.total_expenses, 30.0);
        assert_eq!(overview.total_earnings, 50.0);
        assert_eq!(overview.profit_loss, 20.0);
    }

    #[test]
    fn runway_reads_the_unfiltered_base_through_the_month_filter() {
        let expenses = vec![
            record("2025-01-10", 100.0, "Office", Some("ACC_A")),
            record("2025-02-10", 900.0, "Office", Some("ACC_B")),
        ];
        let earnings = vec![record("2025-01-15", 1200.0, "Consulting", Some("ACC_A"))];

        // Account filter narrows the charts but must not narrow the runway.
        let mut request = request_for(2025);
        request.account_id = Some("ACC_A".to_string());
        request.months.set(2025, 1, true);
        request.months.set(2025, 2, true);

        let overview = compute_overview(&expenses, &earnings, &request);

        assert_eq!(overview.total_expenses, 100.0);
        assert_eq!(overview.runway.total_expenses, 1000.0);
        assert_eq!(overview.runway.total_earnings, 1200.0);
        assert_eq!(overview.runway.month_count, 2);
    }

    #[test]
    fn monthly_datasets_cover_expenses_and_earnings_for_the_chart_year() {
        let expenses = vec![
            record("2025-01-10", 100.0, "Office", None),
            record("2024-01-10", 999.0, "Office", None),
        ];
        let earnings = vec![record("2025-03-01", 300.0, "Consulting", None)];

        let overview = compute_overview(&expenses, &earnings, &request_for(2025));

        assert_eq!(overview.monthly.labels.len(), 12);
        assert_eq!(overview.monthly.datasets[0].label, "Expenses");
        assert_eq!(overview.monthly.datasets[0].data[0], 100.0);
        assert_eq!(overview.monthly.datasets[1].label, "Earnings");
        assert_eq!(overview.monthly.datasets[1].data[2], 300.0);
    }

    #[test]
    fn pickers_enumerate_both_sequences() {
        let expenses = vec![record("2024-06-01", 10.0, "Office", Some("ACC_B"))];
        let earnings = vec![
            record("2025-01-15", 50.0, "Consulting", Some("ACC_A")),
            record("2025-02-15", 50.0, "Consulting", Some("ACC_A")),
        ];

        let overview = compute_overview(&expenses, &earnings, &request_for(2025));

        assert_eq!(overview.account_ids, vec!["ACC_A", "ACC_B"]);
        assert_eq!(overview.years, vec![2024, 2025]);
    }
}
