use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashSet;

use crate::database::collection_mut;
use crate::records::MergeStats;

/// Merges new directory rows (accounts, clients, projects) into their
/// collection with duplicate detection on the collection's id field. Rows
/// missing the id field are rejected rather than merged blindly.
///
/// # Example
/// ```no_run
/// use utils::merge_directory_rows;
/// use serde_json::json;
///
/// let database = json!({"clients": []});
/// let rows = vec![json!({"client_id": "CLIENT_ACME", "name": "Acme"})];
/// let (merged, stats) = merge_directory_rows(database, "clients", "client_id", rows).unwrap();
/// println!("Added: {}, Skipped: {}", stats.added, stats.skipped);
/// ```
pub fn merge_directory_rows(
    mut database: Value,
    collection: &str,
    id_field: &str,
    new_rows: Vec<Value>,
) -> Result<(Value, MergeStats)> {
    let arr = collection_mut(&mut database, collection)?;

    let mut existing_ids: HashSet<String> = arr
        .iter()
        .filter_map(|row| {
            row.get(id_field)
                .and_then(|id| id.as_str())
                .map(|s| s.to_string())
        })
        .collect();

    let mut stats = MergeStats {
        added: 0,
        skipped: 0,
        total: new_rows.len(),
    };

    for row in new_rows {
        let id = row
            .get(id_field)
            .and_then(|id| id.as_str())
            .ok_or_else(|| anyhow!("directory row missing '{}' field", id_field))?;

        if existing_ids.contains(id) {
            stats.skipped += 1;
        } else {
            existing_ids.insert(id.to_string());
            arr.push(row);
            stats.added += 1;
        }
    }

    Ok((database, stats))
}

/// Merges new clients into the `clients` collection, deduplicated on
/// `client_id`.
pub fn merge_clients_with_deduplication(
    database: Value,
    new_clients: Vec<Value>,
) -> Result<(Value, MergeStats)> {
    merge_directory_rows(database, "clients", "client_id", new_clients)
}

/// Returns the subset of `ids` that already exist in a collection; useful
/// for reporting which rows were duplicates.
pub fn find_duplicate_ids(
    database: &Value,
    collection: &str,
    id_field: &str,
    ids: &[String],
) -> Result<Vec<String>> {
    let arr = database
        .get(collection)
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("database.json missing '{}' array", collection))?;

    let existing_ids: HashSet<&str> = arr
        .iter()
        .filter_map(|row| row.get(id_field).and_then(|id| id.as_str()))
        .collect();

    Ok(ids
        .iter()
        .filter(|id| existing_ids.contains(id.as_str()))
        .cloned()
        .collect())
}
