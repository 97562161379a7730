use chrono::{DateTime, NaiveDate};
use models::{FinancialRecord, RawRecord, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION};
use serde_json::Value;

/// Normalizes a whole raw sequence. One output record per input record;
/// nothing is filtered at this stage.
pub fn normalize_records(raw: &[RawRecord]) -> Vec<FinancialRecord> {
    raw.iter().map(normalize_record).collect()
}

pub fn normalize_record(raw: &RawRecord) -> FinancialRecord {
    FinancialRecord {
        date: coerce_date(&raw.date),
        amount: coerce_amount(&raw.amount),
        category: coerce_text(&raw.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        account_id: coerce_text(&raw.account_id),
        description: coerce_text(&raw.description)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
    }
}

/// Amounts coerce to a non-negative finite number; anything non-numeric
/// becomes 0.
fn coerce_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed.max(0.0)
    } else {
        0.0
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// Dates arrive as ISO-ish strings or epoch seconds. An unparseable date
/// is kept as `None` on the record and simply fails every range
/// comparison downstream.
fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
