use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

pub const IMPORTER_NAME: &str = "client_list";

/// Parses a client-list workbook into raw JSON rows ready for validation.
/// The first sheet carrying a recognizable header row is used; a Name
/// column is required, Email / Company / Client ID are optional.
pub fn parse_client_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Cannot open {}", path.display()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    for sheet_name in sheet_names {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(r) => r,
            Err(_) => continue,
        };

        let Some((header_row_idx, columns)) = find_header_row(&range) else {
            continue;
        };

        return Ok(collect_rows(&range, header_row_idx, &columns));
    }

    Err(anyhow!(
        "No sheet in {} carries a client table (a 'Name' column is required)",
        path.display()
    ))
}

/// Locates the header row within the first few rows of a sheet and maps
/// known column titles to their indices.
fn find_header_row(range: &Range<Data>) -> Option<(usize, HashMap<String, usize>)> {
    for (row_idx, row) in range.rows().enumerate().take(10) {
        let mut columns = HashMap::new();
        for (col_idx, cell) in row.iter().enumerate() {
            let Data::String(title) = cell else {
                continue;
            };
            let field = match title.trim().to_lowercase().as_str() {
                "name" | "client" | "client name" => "name",
                "email" | "e-mail" => "email",
                "company" | "organisation" | "organization" => "company",
                "id" | "client id" | "client_id" => "client_id",
                _ => continue,
            };
            columns.entry(field.to_string()).or_insert(col_idx);
        }

        if columns.contains_key("name") {
            return Some((row_idx, columns));
        }
    }
    None
}

fn collect_rows(
    range: &Range<Data>,
    header_row_idx: usize,
    columns: &HashMap<String, usize>,
) -> Vec<Value> {
    let mut rows = Vec::new();

    for row in range.rows().skip(header_row_idx + 1) {
        let mut out = Map::new();
        for (field, &col_idx) in columns {
            if let Some(text) = row.get(col_idx).and_then(cell_text) {
                out.insert(field.clone(), Value::String(text));
            }
        }

        // Fully empty rows are layout noise; partially filled ones go
        // through so validation can report them by position.
        if !out.is_empty() {
            rows.push(Value::Object(out));
        }
    }

    rows
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
