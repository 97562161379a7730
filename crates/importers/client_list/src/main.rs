use anyhow::{Context, Result};
use std::path::PathBuf;
use std::{env, fs};

use client_list_importer::parse_client_workbook;

fn main() -> Result<()> {
    // Usage:
    //   client_list_importer clients.xlsx other.xlsx ... [database_path]
    //
    // If no .xlsx files are provided, it will try to parse files matching
    // "clients*.xlsx" in cwd.
    //
    // Defaults:
    //   database_path: ../../../database

    let args: Vec<String> = env::args().skip(1).collect();

    let mut xlsx_paths: Vec<String> = args
        .iter()
        .filter(|a| a.to_lowercase().ends_with(".xlsx"))
        .cloned()
        .collect();

    // Default database path should be usable no matter what the current
    // working directory is.
    let default_database_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../../database")
        .to_string_lossy()
        .to_string();

    let database_path = args
        .iter()
        .find(|a| !a.to_lowercase().ends_with(".xlsx"))
        .cloned()
        .unwrap_or(default_database_path);

    if xlsx_paths.is_empty() {
        for entry in fs::read_dir(".").context("Cannot read current directory")? {
            let path = entry?.path();
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                let low = name.to_lowercase();
                if low.starts_with("clients") && low.ends_with(".xlsx") {
                    xlsx_paths.push(name.to_string());
                }
            }
        }
        xlsx_paths.sort();
    }

    if xlsx_paths.is_empty() {
        println!("No .xlsx input files found (expected clients*.xlsx or explicit paths).");
        return Ok(());
    }

    let mut all_rows = Vec::new();
    for path in &xlsx_paths {
        println!("Parsing {}", path);
        let rows = parse_client_workbook(path)?;
        println!("  {} row(s)", rows.len());
        all_rows.extend(rows);
    }

    let report = utils::validate_client_rows(&all_rows);
    for rejected in &report.rejected {
        eprintln!("Row {} rejected: {}", rejected.row, rejected.message);
    }

    let db_path = utils::ensure_database_exists(&database_path)?;
    let database = utils::read_database(&db_path)?;
    let (merged, stats) = utils::merge_clients_with_deduplication(database, report.valid)?;
    utils::write_database(&db_path, &merged)?;

    println!(
        "Added: {}, Skipped: {}, Rejected: {} (parsed {} row(s) total)",
        stats.added,
        stats.skipped,
        report.rejected.len(),
        all_rows.len()
    );

    Ok(())
}
