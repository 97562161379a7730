use models::{BarSeries, CategoryTotals, ChartSlice, ChartViewModel, FinancialRecord};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sums amounts grouped by category. A record with an unseen category
/// opens its bucket at that record's amount.
pub fn aggregate_by_category(records: &[FinancialRecord]) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for record in records {
        totals.add(&record.category, record.amount);
    }
    totals
}

/// Converts category totals into the pie-chart pair sequence. Slices come
/// out in first-occurrence order, not sorted; the total is the reduction
/// of all slice values.
pub fn to_chart_view_model(totals: &CategoryTotals) -> ChartViewModel {
    let slices = totals
        .iter()
        .map(|(name, value)| ChartSlice {
            name: name.to_string(),
            value,
        })
        .collect();

    ChartViewModel {
        slices,
        total: totals.total(),
    }
}

/// Sums amounts into twelve buckets for one calendar year. Records outside
/// that year, or without a usable date, contribute nothing.
pub fn aggregate_by_month(records: &[FinancialRecord], year: i32) -> [f64; 12] {
    let mut buckets = [0.0; 12];
    for record in records {
        if let Some((y, month)) = record.year_month() {
            if y == year {
                buckets[(month - 1) as usize] += record.amount;
            }
        }
    }
    buckets
}

pub fn month_labels() -> Vec<String> {
    MONTH_LABELS.iter().map(|label| label.to_string()).collect()
}

pub fn monthly_series(label: &str, buckets: [f64; 12]) -> BarSeries {
    BarSeries {
        label: label.to_string(),
        data: buckets.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(category: &str, amount: f64, date: &str) -> FinancialRecord {
        FinancialRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            amount,
            category: category.to_string(),
            account_id: None,
            description: "No description".to_string(),
        }
    }

    #[test]
    fn category_sums_open_buckets_at_first_amount() {
        let records = vec![
            record("Rent", 800.0, "2025-01-01"),
            record("Food", 120.0, "2025-01-02"),
            record("Rent", 800.0, "2025-02-01"),
        ];

        let totals = aggregate_by_category(&records);

        assert_eq!(totals.get("Rent"), Some(1600.0));
        assert_eq!(totals.get("Food"), Some(120.0));
        assert_eq!(totals.get("Travel"), None);
    }

    #[test]
    fn chart_total_conserves_the_input_sum() {
        let records = vec![
            record("Rent", 800.0, "2025-01-01"),
            record("Food", 120.0, "2025-01-02"),
            record("Food", 30.0, "2025-01-03"),
            record("Travel", 250.0, "2025-01-04"),
        ];
        let input_sum: f64 = records.iter().map(|r| r.amount).sum();

        let chart = to_chart_view_model(&aggregate_by_category(&records));

        let slice_sum: f64 = chart.slices.iter().map(|s| s.value).sum();
        assert_eq!(slice_sum, input_sum);
        assert_eq!(chart.total, input_sum);
    }

    #[test]
    fn slices_keep_first_occurrence_order() {
        let records = vec![
            record("Zeta", 1.0, "2025-01-01"),
            record("Alpha", 2.0, "2025-01-02"),
            record("Zeta", 3.0, "2025-01-03"),
            record("Mid", 4.0, "2025-01-04"),
        ];

        let chart = to_chart_view_model(&aggregate_by_category(&records));

        let names: Vec<&str> = chart.slices.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn monthly_buckets_match_month_and_year() {
        let records = vec![
            record("Rent", 800.0, "2025-01-05"),
            record("Rent", 800.0, "2025-01-25"),
            record("Food", 90.0, "2025-03-10"),
            record("Rent", 800.0, "2024-01-05"),
        ];

        let buckets = aggregate_by_month(&records, 2025);

        assert_eq!(buckets[0], 1600.0);
        assert_eq!(buckets[2], 90.0);
        assert_eq!(buckets.iter().sum::<f64>(), 1690.0);
    }

    #[test]
    fn records_outside_the_target_year_contribute_nothing() {
        let records = vec![
            record("Rent", 800.0, "2023-06-05"),
            FinancialRecord {
                date: None,
                amount: 50.0,
                category: "Food".to_string(),
                account_id: None,
                description: "No description".to_string(),
            },
        ];

        let buckets = aggregate_by_month(&records, 2025);

        assert!(buckets.iter().all(|&total| total == 0.0));
    }
}
