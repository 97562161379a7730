use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::database::collection_mut;

/// Statistics about a merge operation
#[derive(Debug, Clone, Serialize)]
pub struct MergeStats {
    pub added: usize,
    pub skipped: usize,
    pub total: usize,
}

impl MergeStats {
    pub fn has_duplicates(&self) -> bool {
        self.skipped > 0
    }
}

/// Sort one record collection in-place by `date` ascending.
///
/// Sorting is stable. Records with a missing/non-string `date` are placed
/// at the end, preserving their relative order.
pub fn sort_records_by_date(database: &mut Value, collection: &str) -> Result<()> {
    let arr = collection_mut(database, collection)?;

    arr.sort_by(|a, b| {
        let da = a.get("date").and_then(|v| v.as_str());
        let db = b.get("date").and_then(|v| v.as_str());

        match (da, db) {
            (Some(left), Some(right)) => left.cmp(right),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });

    Ok(())
}

/// Merges new expense/earning records into a record collection with
/// duplicate detection. The store's records carry no id, so duplicates are
/// matched on a strict signature of key fields: `date`, `amount`,
/// `category`, `accountId`, `description`. A record whose signature cannot
/// be built is treated as unique and kept.
///
/// # Returns
/// * `Result<(Value, MergeStats)>` - The merged database and statistics about the merge
pub fn merge_records_with_deduplication(
    mut database: Value,
    collection: &str,
    new_records: Vec<Value>,
) -> Result<(Value, MergeStats)> {
    let arr = collection_mut(&mut database, collection)?;

    let existing: HashSet<String> = arr.iter().filter_map(build_signature).collect();

    let mut stats = MergeStats {
        added: 0,
        skipped: 0,
        total: new_records.len(),
    };

    let mut seen_new: HashSet<String> = HashSet::new();
    for record in new_records {
        let duplicate = match build_signature(&record) {
            Some(sig) => existing.contains(&sig) || !seen_new.insert(sig),
            None => false,
        };

        if duplicate {
            stats.skipped += 1;
        } else {
            arr.push(record);
            stats.added += 1;
        }
    }

    Ok((database, stats))
}

fn build_signature(record: &Value) -> Option<String> {
    let obj = record.as_object()?;
    let date = obj.get("date")?.as_str()?;
    let amount = obj.get("amount")?.to_string();
    let category = obj.get("category")?.as_str()?;
    let account = obj
        .get("accountId")
        .map(|v| v.to_string())
        .unwrap_or_else(|| "null".to_string());
    let description = obj.get("description")?.as_str()?;
    Some(format!(
        "{}|{}|{}|{}|{}",
        date, amount, category, account, description
    ))
}
