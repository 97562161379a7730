use std::net::SocketAddr;
use std::sync::Arc;

use models::Settings;

use crate::{
    repository::{DirectoryRepository, RecordRepository},
    router::create_router,
};

/// Run the API server
pub async fn run_server(
    record_repo: Arc<dyn RecordRepository>,
    directory_repo: Arc<dyn DirectoryRepository>,
    settings: Arc<Settings>,
) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend_api=debug,tower_http=debug,axum=trace".into()),
        )
        .init();

    let addr = format!("{}:{}", settings.host, settings.port).parse::<SocketAddr>()?;
    let app = create_router(record_repo, directory_repo, settings);

    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
