use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use models::{Account, Client, Project};
use utils::import::RowError;

use crate::{
    error::ApiError,
    repository::{DirectoryCollection, DirectoryRepository},
    Result,
};

pub type DirectoryRepositoryState = Arc<dyn DirectoryRepository>;

fn stamp_new(id: &mut String, created_at: &mut Option<String>, updated_at: &mut Option<String>) {
    if id.trim().is_empty() {
        *id = Uuid::new_v4().to_string();
    }
    let now = Utc::now().to_rfc3339();
    *created_at = Some(now.clone());
    *updated_at = Some(now);
}

// ---- Accounts ----

/// GET /api/accounts
pub async fn list_accounts(
    State(repo): State<DirectoryRepositoryState>,
) -> Result<impl IntoResponse> {
    Ok(Json(repo.list(DirectoryCollection::Accounts).await?))
}

/// GET /api/accounts/:account_id
pub async fn get_account(
    State(repo): State<DirectoryRepositoryState>,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse> {
    let row = repo
        .get(DirectoryCollection::Accounts, &account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Account {} not found", account_id)))?;
    Ok(Json(row))
}

/// POST /api/accounts
pub async fn create_account(
    State(repo): State<DirectoryRepositoryState>,
    Json(mut account): Json<Account>,
) -> Result<impl IntoResponse> {
    stamp_new(
        &mut account.account_id,
        &mut account.created_at,
        &mut account.updated_at,
    );
    repo.create(DirectoryCollection::Accounts, serde_json::to_value(&account)?)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// PUT /api/accounts/:account_id
pub async fn update_account(
    State(repo): State<DirectoryRepositoryState>,
    Path(account_id): Path<String>,
    Json(mut account): Json<Account>,
) -> Result<impl IntoResponse> {
    if account.account_id != account_id {
        return Err(ApiError::BadRequest(
            "Account ID in path does not match account ID in body".to_string(),
        ));
    }

    account.updated_at = Some(Utc::now().to_rfc3339());
    repo.update(DirectoryCollection::Accounts, serde_json::to_value(&account)?)
        .await?;
    Ok(Json(account))
}

/// DELETE /api/accounts/:account_id
pub async fn delete_account(
    State(repo): State<DirectoryRepositoryState>,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse> {
    repo.delete(DirectoryCollection::Accounts, &account_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Clients ----

/// GET /api/clients
pub async fn list_clients(
    State(repo): State<DirectoryRepositoryState>,
) -> Result<impl IntoResponse> {
    Ok(Json(repo.list(DirectoryCollection::Clients).await?))
}

/// GET /api/clients/:client_id
pub async fn get_client(
    State(repo): State<DirectoryRepositoryState>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse> {
    let row = repo
        .get(DirectoryCollection::Clients, &client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Client {} not found", client_id)))?;
    Ok(Json(row))
}

/// POST /api/clients
pub async fn create_client(
    State(repo): State<DirectoryRepositoryState>,
    Json(mut client): Json<Client>,
) -> Result<impl IntoResponse> {
    stamp_new(
        &mut client.client_id,
        &mut client.created_at,
        &mut client.updated_at,
    );
    repo.create(DirectoryCollection::Clients, serde_json::to_value(&client)?)
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /api/clients/:client_id
pub async fn update_client(
    State(repo): State<DirectoryRepositoryState>,
    Path(client_id): Path<String>,
    Json(mut client): Json<Client>,
) -> Result<impl IntoResponse> {
    if client.client_id != client_id {
        return Err(ApiError::BadRequest(
            "Client ID in path does not match client ID in body".to_string(),
        ));
    }

    client.updated_at = Some(Utc::now().to_rfc3339());
    repo.update(DirectoryCollection::Clients, serde_json::to_value(&client)?)
        .await?;
    Ok(Json(client))
}

/// DELETE /api/clients/:client_id
pub async fn delete_client(
    State(repo): State<DirectoryRepositoryState>,
    Path(client_id): Path<String>,
) -> Result<impl IntoResponse> {
    repo.delete(DirectoryCollection::Clients, &client_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/clients/import
/// Validates spreadsheet rows and merges the valid ones. Bad rows are
/// reported per-row; they never abort the batch.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub added: usize,
    pub skipped: usize,
    pub total_rows: usize,
    pub rejected: Vec<RowError>,
}

pub async fn import_clients(
    State(repo): State<DirectoryRepositoryState>,
    Json(rows): Json<Vec<Value>>,
) -> Result<impl IntoResponse> {
    let report = utils::validate_client_rows(&rows);
    let stats = repo.merge(DirectoryCollection::Clients, report.valid).await?;

    Ok(Json(ImportResponse {
        added: stats.added,
        skipped: stats.skipped,
        total_rows: rows.len(),
        rejected: report.rejected,
    }))
}

// ---- Projects ----

/// GET /api/projects
pub async fn list_projects(
    State(repo): State<DirectoryRepositoryState>,
) -> Result<impl IntoResponse> {
    Ok(Json(repo.list(DirectoryCollection::Projects).await?))
}

/// GET /api/projects/:project_id
pub async fn get_project(
    State(repo): State<DirectoryRepositoryState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse> {
    let row = repo
        .get(DirectoryCollection::Projects, &project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", project_id)))?;
    Ok(Json(row))
}

/// POST /api/projects
pub async fn create_project(
    State(repo): State<DirectoryRepositoryState>,
    Json(mut project): Json<Project>,
) -> Result<impl IntoResponse> {
    stamp_new(
        &mut project.project_id,
        &mut project.created_at,
        &mut project.updated_at,
    );
    repo.create(DirectoryCollection::Projects, serde_json::to_value(&project)?)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/:project_id
pub async fn update_project(
    State(repo): State<DirectoryRepositoryState>,
    Path(project_id): Path<String>,
    Json(mut project): Json<Project>,
) -> Result<impl IntoResponse> {
    if project.project_id != project_id {
        return Err(ApiError::BadRequest(
            "Project ID in path does not match project ID in body".to_string(),
        ));
    }

    project.updated_at = Some(Utc::now().to_rfc3339());
    repo.update(DirectoryCollection::Projects, serde_json::to_value(&project)?)
        .await?;
    Ok(Json(project))
}

/// DELETE /api/projects/:project_id
pub async fn delete_project(
    State(repo): State<DirectoryRepositoryState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse> {
    repo.delete(DirectoryCollection::Projects, &project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
