use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use models::RawRecord;
use utils::records::MergeStats;

use crate::error::{ApiError, Result};

/// Read side of the record source. The two operations return the raw
/// expense/earning sequences exactly as stored; typing them is the
/// normalizer's job, not the repository's.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn fetch_expenses(&self) -> Result<Vec<RawRecord>>;
    async fn fetch_earnings(&self) -> Result<Vec<RawRecord>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryCollection {
    Accounts,
    Clients,
    Projects,
}

impl DirectoryCollection {
    pub fn key(&self) -> &'static str {
        match self {
            DirectoryCollection::Accounts => "accounts",
            DirectoryCollection::Clients => "clients",
            DirectoryCollection::Projects => "projects",
        }
    }

    pub fn id_field(&self) -> &'static str {
        match self {
            DirectoryCollection::Accounts => "account_id",
            DirectoryCollection::Clients => "client_id",
            DirectoryCollection::Projects => "project_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DirectoryCollection::Accounts => "Account",
            DirectoryCollection::Clients => "Client",
            DirectoryCollection::Projects => "Project",
        }
    }
}

/// Repository for the directory entities behind the CRUD screens
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn list(&self, collection: DirectoryCollection) -> Result<Vec<Value>>;
    async fn get(&self, collection: DirectoryCollection, id: &str) -> Result<Option<Value>>;
    async fn create(&self, collection: DirectoryCollection, row: Value) -> Result<()>;
    async fn update(&self, collection: DirectoryCollection, row: Value) -> Result<()>;
    async fn delete(&self, collection: DirectoryCollection, id: &str) -> Result<()>;
    async fn merge(&self, collection: DirectoryCollection, rows: Vec<Value>)
        -> Result<MergeStats>;
}

/// File-based implementation that reads/writes database.json
pub struct FileDocumentRepository {
    database_path: PathBuf,
}

impl FileDocumentRepository {
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
        }
    }

    async fn load_database(&self) -> Result<Value> {
        let content = tokio::fs::read_to_string(&self.database_path).await?;
        let database: Value = serde_json::from_str(&content)?;
        Ok(database)
    }

    async fn save_database(&self, database: Value) -> Result<()> {
        let content = serde_json::to_string_pretty(&database)?;
        tokio::fs::write(&self.database_path, content).await?;
        Ok(())
    }

    async fn load_records(&self, collection: &str) -> Result<Vec<RawRecord>> {
        let database = self.load_database().await?;
        let records = database
            .get(collection)
            .and_then(|r| r.as_array())
            .ok_or_else(|| ApiError::Internal(format!("{} array not found", collection)))?;

        // One raw record per stored entry; a non-object entry degrades to an
        // all-null record instead of being dropped.
        Ok(records
            .iter()
            .map(|r| serde_json::from_value(r.clone()).unwrap_or_default())
            .collect())
    }

    fn row_id<'a>(collection: DirectoryCollection, row: &'a Value) -> Option<&'a str> {
        row.get(collection.id_field()).and_then(|id| id.as_str())
    }
}

#[async_trait]
impl RecordRepository for FileDocumentRepository {
    async fn fetch_expenses(&self) -> Result<Vec<RawRecord>> {
        self.load_records("expenses").await
    }

    async fn fetch_earnings(&self) -> Result<Vec<RawRecord>> {
        self.load_records("earnings").await
    }
}

#[async_trait]
impl DirectoryRepository for FileDocumentRepository {
    async fn list(&self, collection: DirectoryCollection) -> Result<Vec<Value>> {
        let database = self.load_database().await?;
        let rows = database
            .get(collection.key())
            .and_then(|r| r.as_array())
            .ok_or_else(|| ApiError::Internal(format!("{} array not found", collection.key())))?;
        Ok(rows.clone())
    }

    async fn get(&self, collection: DirectoryCollection, id: &str) -> Result<Option<Value>> {
        let rows = self.list(collection).await?;
        Ok(rows
            .into_iter()
            .find(|row| Self::row_id(collection, row) == Some(id)))
    }

    async fn create(&self, collection: DirectoryCollection, row: Value) -> Result<()> {
        let mut database = self.load_database().await?;
        let arr = utils::collection_mut(&mut database, collection.key())?;

        let id = Self::row_id(collection, &row)
            .ok_or_else(|| {
                ApiError::BadRequest(format!("{} is missing its id", collection.label()))
            })?
            .to_string();

        if arr
            .iter()
            .any(|existing| Self::row_id(collection, existing) == Some(id.as_str()))
        {
            return Err(ApiError::BadRequest(format!(
                "{} with ID {} already exists",
                collection.label(),
                id
            )));
        }

        arr.push(row);
        self.save_database(database).await
    }

    async fn update(&self, collection: DirectoryCollection, row: Value) -> Result<()> {
        let mut database = self.load_database().await?;
        let arr = utils::collection_mut(&mut database, collection.key())?;

        let id = Self::row_id(collection, &row)
            .ok_or_else(|| {
                ApiError::BadRequest(format!("{} is missing its id", collection.label()))
            })?
            .to_string();

        let index = arr
            .iter()
            .position(|existing| Self::row_id(collection, existing) == Some(id.as_str()))
            .ok_or_else(|| {
                ApiError::NotFound(format!("{} {} not found", collection.label(), id))
            })?;

        arr[index] = row;
        self.save_database(database).await
    }

    async fn delete(&self, collection: DirectoryCollection, id: &str) -> Result<()> {
        let mut database = self.load_database().await?;
        let arr = utils::collection_mut(&mut database, collection.key())?;

        let index = arr
            .iter()
            .position(|existing| Self::row_id(collection, existing) == Some(id))
            .ok_or_else(|| {
                ApiError::NotFound(format!("{} {} not found", collection.label(), id))
            })?;

        arr.remove(index);
        self.save_database(database).await
    }

    async fn merge(
        &self,
        collection: DirectoryCollection,
        rows: Vec<Value>,
    ) -> Result<MergeStats> {
        let database = self.load_database().await?;
        let (merged, stats) =
            utils::merge_directory_rows(database, collection.key(), collection.id_field(), rows)?;
        self.save_database(merged).await?;
        Ok(stats)
    }
}
