use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// A rejected spreadsheet row. Row numbers are 1-based to match what the
/// person staring at the sheet sees.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RowValidation {
    pub valid: Vec<Value>,
    pub rejected: Vec<RowError>,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Validates client rows ahead of a merge. Invalid rows are collected with
/// their reason instead of aborting the batch; valid rows come out
/// normalized (trimmed fields, derived id when the sheet carries none).
pub fn validate_client_rows(rows: &[Value]) -> RowValidation {
    let mut report = RowValidation::default();

    for (idx, row) in rows.iter().enumerate() {
        match validate_client_row(row) {
            Ok(normalized) => report.valid.push(normalized),
            Err(message) => report.rejected.push(RowError {
                row: idx + 1,
                message,
            }),
        }
    }

    report
}

fn validate_client_row(row: &Value) -> Result<Value, String> {
    let obj = row
        .as_object()
        .ok_or_else(|| "row is not an object".to_string())?;

    let name = non_blank(obj, "name").ok_or_else(|| "missing required field 'name'".to_string())?;

    let email = non_blank(obj, "email");
    if let Some(email) = &email {
        if !email_regex().is_match(email) {
            return Err(format!("invalid email '{}'", email));
        }
    }

    let company = non_blank(obj, "company");
    let client_id = non_blank(obj, "client_id").unwrap_or_else(|| derive_client_id(&name));

    let mut normalized = Map::new();
    normalized.insert("client_id".to_string(), Value::String(client_id));
    normalized.insert("name".to_string(), Value::String(name));
    if let Some(email) = email {
        normalized.insert("email".to_string(), Value::String(email));
    }
    if let Some(company) = company {
        normalized.insert("company".to_string(), Value::String(company));
    }

    Ok(Value::Object(normalized))
}

fn non_blank(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Derived ids follow the CLIENT_NAME convention used across the store.
pub fn derive_client_id(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("CLIENT_{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_rows_are_normalized() {
        let rows = vec![json!({
            "name": "  Acme Corp ",
            "email": "billing@acme.example",
            "company": "Acme Holdings"
        })];

        let report = validate_client_rows(&rows);

        assert!(report.rejected.is_empty());
        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.valid[0]["name"], "Acme Corp");
        assert_eq!(report.valid[0]["client_id"], "CLIENT_ACME_CORP");
    }

    #[test]
    fn explicit_ids_are_kept() {
        let rows = vec![json!({"name": "Acme", "client_id": "CLIENT_42"})];

        let report = validate_client_rows(&rows);

        assert_eq!(report.valid[0]["client_id"], "CLIENT_42");
    }

    #[test]
    fn rows_without_a_name_are_rejected_with_their_position() {
        let rows = vec![
            json!({"name": "Acme"}),
            json!({"email": "no-name@example.com"}),
            json!({"name": "   "}),
        ];

        let report = validate_client_rows(&rows);

        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].row, 2);
        assert_eq!(report.rejected[1].row, 3);
    }

    #[test]
    fn malformed_emails_are_rejected() {
        let rows = vec![json!({"name": "Acme", "email": "not-an-email"})];

        let report = validate_client_rows(&rows);

        assert!(report.valid.is_empty());
        assert!(report.rejected[0].message.contains("invalid email"));
    }

    #[test]
    fn a_bad_row_does_not_abort_the_batch() {
        let rows = vec![
            json!("just a string"),
            json!({"name": "Globex"}),
        ];

        let report = validate_client_rows(&rows);

        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].row, 1);
    }
}
