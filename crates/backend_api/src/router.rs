use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use models::Settings;

use crate::{
    directory_handlers, handlers,
    repository::{DirectoryRepository, RecordRepository},
};

/// Create the main application router with all API endpoints
pub fn create_router(
    record_repo: Arc<dyn RecordRepository>,
    directory_repo: Arc<dyn DirectoryRepository>,
    settings: Arc<Settings>,
) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Financial overview endpoints
        .route("/api/overview", get(handlers::get_overview))
        .route(
            "/api/overview/categories/:category/details",
            get(handlers::get_category_details),
        )
        // Add shared state for the record source
        .with_state(record_repo)
        // Client-facing configuration
        .route("/api/config", get(handlers::get_client_config))
        .with_state(settings)
        // Account management endpoints
        .route("/api/accounts", get(directory_handlers::list_accounts))
        .route("/api/accounts", post(directory_handlers::create_account))
        .route("/api/accounts/:account_id", get(directory_handlers::get_account))
        .route("/api/accounts/:account_id", put(directory_handlers::update_account))
        .route(
            "/api/accounts/:account_id",
            delete(directory_handlers::delete_account),
        )
        // Client management endpoints
        .route("/api/clients", get(directory_handlers::list_clients))
        .route("/api/clients", post(directory_handlers::create_client))
        .route("/api/clients/import", post(directory_handlers::import_clients))
        .route("/api/clients/:client_id", get(directory_handlers::get_client))
        .route("/api/clients/:client_id", put(directory_handlers::update_client))
        .route(
            "/api/clients/:client_id",
            delete(directory_handlers::delete_client),
        )
        // Project management endpoints
        .route("/api/projects", get(directory_handlers::list_projects))
        .route("/api/projects", post(directory_handlers::create_project))
        .route("/api/projects/:project_id", get(directory_handlers::get_project))
        .route("/api/projects/:project_id", put(directory_handlers::update_project))
        .route(
            "/api/projects/:project_id",
            delete(directory_handlers::delete_project),
        )
        // Add shared state for the directory
        .with_state(directory_repo)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
