use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// Collections every database.json carries.
pub const COLLECTIONS: [&str; 5] = ["accounts", "clients", "projects", "expenses", "earnings"];

/// Ensures that database.json exists at the specified path.
/// If it doesn't exist or is invalid JSON, it is initialized with empty
/// collections.
///
/// # Arguments
/// * `database_path` - Path to the database.json file (can be a file path or directory)
///
/// # Returns
/// * `Result<PathBuf>` - The resolved path to the database.json file
pub fn ensure_database_exists<P: AsRef<Path>>(database_path: P) -> Result<PathBuf> {
    let path = database_path.as_ref();

    // Resolve to database.json if a directory was provided
    let db_path =
        if path.is_dir() || (!path.exists() && !path.to_string_lossy().ends_with(".json")) {
            path.join("database.json")
        } else {
            path.to_path_buf()
        };

    // Check if database.json exists and is valid
    let needs_initialization = match File::open(&db_path) {
        Ok(mut file) => {
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            serde_json::from_str::<Value>(&contents).is_err()
        }
        Err(_) => true,
    };

    if needs_initialization {
        initialize_empty(&db_path)?;
    }

    Ok(db_path)
}

/// Writes a fresh database.json holding every collection as an empty array.
fn initialize_empty(db_path: &Path) -> Result<()> {
    let mut db = serde_json::Map::new();
    for name in COLLECTIONS {
        db.insert(name.to_string(), Value::Array(vec![]));
    }

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut db_file = File::create(db_path)
        .with_context(|| format!("Cannot create database file at {:?}", db_path))?;
    let formatted = serde_json::to_string_pretty(&Value::Object(db))?;
    db_file.write_all(formatted.as_bytes())?;

    Ok(())
}

/// Reads the database.json file and returns it as a serde_json::Value.
/// Ensures the database exists before reading.
pub fn read_database<P: AsRef<Path>>(database_path: P) -> Result<Value> {
    let db_path = ensure_database_exists(database_path)?;

    let mut file =
        File::open(&db_path).with_context(|| format!("Cannot open database at {:?}", db_path))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Database at {:?} is not valid JSON", db_path))
}

/// Writes a serde_json::Value to the database.json file.
pub fn write_database<P: AsRef<Path>>(database_path: P, database: &Value) -> Result<()> {
    let path = database_path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Cannot create database file at {:?}", path))?;
    let formatted = serde_json::to_string_pretty(database)?;
    file.write_all(formatted.as_bytes())?;

    Ok(())
}

/// Borrows one collection array mutably, failing when the collection is
/// missing or not an array.
pub fn collection_mut<'a>(database: &'a mut Value, name: &str) -> Result<&'a mut Vec<Value>> {
    database
        .get_mut(name)
        .and_then(|v| v.as_array_mut())
        .ok_or_else(|| anyhow!("database.json missing '{}' array", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_mut_rejects_missing_collections() {
        let mut db = json!({"clients": []});

        assert!(collection_mut(&mut db, "clients").is_ok());
        assert!(collection_mut(&mut db, "projects").is_err());
    }

    #[test]
    fn collection_mut_rejects_non_array_collections() {
        let mut db = json!({"clients": {"oops": true}});

        assert!(collection_mut(&mut db, "clients").is_err());
    }
}
