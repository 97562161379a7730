use models::{DetailRow, FinancialRecord, RecordKind, MISSING_ACCOUNT_LABEL};
use tracing::warn;

/// Rebuilds the detail rows behind one category slice, from the already
/// filtered record sets. A record that cannot be formatted is logged and
/// dropped on its own; the remaining rows are always returned.
pub fn category_details(
    category: &str,
    kind: RecordKind,
    filtered_expenses: &[FinancialRecord],
    filtered_earnings: &[FinancialRecord],
) -> Vec<DetailRow> {
    let records = match kind {
        RecordKind::Expense => filtered_expenses,
        RecordKind::Earning => filtered_earnings,
    };

    records
        .iter()
        .filter(|record| record.category == category)
        .filter_map(|record| match detail_row(record, kind) {
            Ok(row) => Some(row),
            Err(reason) => {
                warn!(category, reason, "dropping record from category details");
                None
            }
        })
        .collect()
}

fn detail_row(record: &FinancialRecord, kind: RecordKind) -> Result<DetailRow, &'static str> {
    let date = record
        .date
        .map(|d| d.format("%-d %b %Y").to_string())
        .ok_or("record date is not displayable")?;

    Ok(DetailRow {
        kind,
        category: record.category.clone(),
        date,
        amount: record.amount,
        account: record
            .account_id
            .clone()
            .unwrap_or_else(|| MISSING_ACCOUNT_LABEL.to_string()),
        description: record.description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(category: &str, amount: f64, date: Option<&str>) -> FinancialRecord {
        FinancialRecord {
            date: date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            amount,
            category: category.to_string(),
            account_id: Some("ACC_MAIN".to_string()),
            description: "Quarterly invoice".to_string(),
        }
    }

    #[test]
    fn rows_come_from_the_set_matching_the_kind() {
        let expenses = vec![record("Office", 120.0, Some("2025-02-03"))];
        let earnings = vec![record("Office", 900.0, Some("2025-02-04"))];

        let rows = category_details("Office", RecordKind::Earning, &expenses, &earnings);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, RecordKind::Earning);
        assert_eq!(rows[0].amount, 900.0);
        assert_eq!(rows[0].date, "4 Feb 2025");
    }

    #[test]
    fn only_the_requested_category_is_included() {
        let expenses = vec![
            record("Office", 120.0, Some("2025-02-03")),
            record("Travel", 80.0, Some("2025-02-05")),
        ];

        let rows = category_details("Office", RecordKind::Expense, &expenses, &[]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Office");
    }

    #[test]
    fn unformattable_record_is_skipped_without_losing_siblings() {
        let expenses = vec![
            record("Office", 120.0, Some("2025-02-03")),
            record("Office", 60.0, None),
            record("Office", 45.0, Some("2025-02-10")),
        ];

        let rows = category_details("Office", RecordKind::Expense, &expenses, &[]);

        assert_eq!(rows.len(), 2);
        let amounts: Vec<f64> = rows.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![120.0, 45.0]);
    }

    #[test]
    fn missing_account_renders_as_not_available() {
        let mut orphan = record("Office", 15.0, Some("2025-02-03"));
        orphan.account_id = None;

        let rows = category_details("Office", RecordKind::Expense, &[orphan], &[]);

        assert_eq!(rows[0].account, "N/A");
    }
}
