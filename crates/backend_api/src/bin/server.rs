use std::sync::Arc;
use std::{env, path::PathBuf};

use backend_api::{run_server, FileDocumentRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // settings.json first, then environment variables on top
    let settings_path = env::var("SETTINGS_PATH").ok().map(PathBuf::from);
    let mut settings = settings_loader::load_settings_with_fallback(settings_path.as_ref())?;

    if let Ok(host) = env::var("HOST") {
        settings.host = host;
    }
    if let Ok(port) = env::var("PORT") {
        settings.port = port.parse().unwrap_or(settings.port);
    }
    if let Ok(path) = env::var("DATABASE_PATH") {
        settings.database_path = path;
    }

    // Resolve the document store, creating an empty one on first run
    let database_path = utils::ensure_database_exists(&settings.database_path)?;

    println!("Dashboard API Server");
    println!("====================");
    println!("Database path: {}", database_path.display());
    println!("Listening on: {}:{}", settings.host, settings.port);
    println!(
        "Environment overrides: SETTINGS_PATH, HOST, PORT, DATABASE_PATH"
    );
    println!();

    // One file-backed repository serves both the record source and the
    // directory CRUD
    let repository = Arc::new(FileDocumentRepository::new(database_path));

    run_server(repository.clone(), repository, Arc::new(settings)).await?;

    Ok(())
}
