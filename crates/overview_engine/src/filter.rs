use models::{DateRange, FinancialRecord, MonthSelection};

/// Applies the date-range predicate (inclusive on both bounds) and the
/// account-equality predicate. Both are conjunctive, so application order
/// does not matter. Returns a new sequence; the input is never mutated.
///
/// A record whose date failed to parse is excluded by a date filter but
/// passes when no date filter is applied.
pub fn filter_records(
    records: &[FinancialRecord],
    date_range: Option<&DateRange>,
    account_id: Option<&str>,
) -> Vec<FinancialRecord> {
    records
        .iter()
        .filter(|record| match date_range {
            Some(range) => record.date.map(|d| range.contains(d)).unwrap_or(false),
            None => true,
        })
        .filter(|record| match account_id {
            Some(account) => record.account_id.as_deref() == Some(account),
            None => true,
        })
        .cloned()
        .collect()
}

/// Month filter feeding the runway projection. It runs over the
/// *unfiltered* base record set, not the date/account-filtered one; an
/// empty selection keeps every record.
pub fn filter_by_months(
    records: &[FinancialRecord],
    months: &MonthSelection,
) -> Vec<FinancialRecord> {
    if months.is_unconstrained() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            record
                .year_month()
                .map(|(year, month)| months.contains(year, month))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: Option<&str>, account_id: Option<&str>) -> FinancialRecord {
        FinancialRecord {
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            amount: 10.0,
            category: "Office".to_string(),
            account_id: account_id.map(|a| a.to_string()),
            description: "No description".to_string(),
        }
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(
            NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn date_range_is_inclusive_on_both_bounds() {
        let records = vec![
            record(Some("2025-01-01"), None),
            record(Some("2025-01-15"), None),
            record(Some("2025-01-31"), None),
            record(Some("2025-02-01"), None),
        ];

        let filtered = filter_records(&records, Some(&range("2025-01-01", "2025-01-31")), None);

        assert_eq!(filtered.len(), 3);
        let bounds = range("2025-01-01", "2025-01-31");
        assert!(filtered.iter().all(|r| bounds.contains(r.date.unwrap())));
    }

    #[test]
    fn account_filter_keeps_only_matching_records() {
        let records = vec![
            record(Some("2025-01-10"), Some("ACC_MAIN")),
            record(Some("2025-01-11"), Some("ACC_SAVINGS")),
            record(Some("2025-01-12"), None),
        ];

        let filtered = filter_records(&records, None, Some("ACC_MAIN"));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].account_id.as_deref(), Some("ACC_MAIN"));
    }

    #[test]
    fn record_without_date_fails_date_filter_but_passes_otherwise() {
        let records = vec![record(None, Some("ACC_MAIN")), record(Some("2025-01-10"), None)];

        let with_range = filter_records(&records, Some(&range("2025-01-01", "2025-12-31")), None);
        assert_eq!(with_range.len(), 1);

        let without_range = filter_records(&records, None, None);
        assert_eq!(without_range.len(), 2);
    }

    #[test]
    fn predicates_are_conjunctive() {
        let records = vec![
            record(Some("2025-01-10"), Some("ACC_MAIN")),
            record(Some("2025-06-10"), Some("ACC_MAIN")),
            record(Some("2025-01-20"), Some("ACC_SAVINGS")),
        ];

        let filtered = filter_records(
            &records,
            Some(&range("2025-01-01", "2025-01-31")),
            Some("ACC_MAIN"),
        );

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, NaiveDate::from_ymd_opt(2025, 1, 10));
    }

    #[test]
    fn input_is_left_untouched() {
        let records = vec![record(Some("2025-01-10"), None)];
        let before = records.clone();

        let _ = filter_records(&records, Some(&range("2030-01-01", "2030-12-31")), None);

        assert_eq!(records, before);
    }

    #[test]
    fn empty_month_selection_returns_input_unchanged() {
        let records = vec![
            record(Some("2025-01-10"), None),
            record(None, None),
            record(Some("2024-12-31"), None),
        ];

        let filtered = filter_by_months(&records, &MonthSelection::new());

        assert_eq!(filtered, records);
    }

    #[test]
    fn month_selection_matches_year_and_month_pairs() {
        let records = vec![
            record(Some("2025-01-10"), None),
            record(Some("2025-02-10"), None),
            record(Some("2024-01-10"), None),
            record(None, None),
        ];

        let mut months = MonthSelection::new();
        months.set(2025, 1, true);
        months.set(2025, 3, false);

        let filtered = filter_by_months(&records, &months);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, NaiveDate::from_ymd_opt(2025, 1, 10));
    }
}
