pub mod file;
pub mod sql;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::store::file::FileWordStore;
use crate::store::sql::SqlWordStore;

/// One dictionary entry as stored: the word itself is the key and lives
/// outside the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub meaning: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
}

impl WordRecord {
    pub fn new(meaning: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            meaning: meaning.into(),
            image_url: image_url.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("dictionary file is corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Durable mapping from word to meaning/image record.
///
/// Both backends satisfy the same contract so callers stay storage-agnostic.
/// Known divergence: `get_all` on the file backend preserves insertion order
/// while the SQL backend returns lexicographic order by word.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Full mapping, in backend-specific order. No pagination.
    async fn get_all(&self) -> Result<Vec<(String, WordRecord)>, StoreError>;

    /// Exact-match lookup on the trimmed input. An empty word is "not found",
    /// never an error; rejecting empty input belongs to the caller.
    async fn get_one(&self, word: &str) -> Result<Option<WordRecord>, StoreError>;

    /// Inserts if absent, fully overwrites if present. Callers must have
    /// validated that `word` and `meaning` are non-empty after trimming.
    async fn upsert(&self, word: &str, meaning: &str, image_url: &str) -> Result<(), StoreError>;

    /// Partial update; omitted fields keep their prior values. Updating an
    /// absent word is an idempotent no-op.
    async fn update(
        &self,
        word: &str,
        meaning: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Removes the entry if present; no error when absent.
    async fn delete(&self, word: &str) -> Result<(), StoreError>;

    /// Cheap liveness check used by the health endpoint.
    async fn probe(&self) -> Result<(), StoreError>;
}

/// Selects the backend once at startup: a configured `DATABASE_URL` picks
/// Postgres, otherwise the JSON file at `DB_PATH`. There is no runtime
/// fallback between the two.
pub async fn from_config(config: &Config) -> Result<Arc<dyn WordStore>, StoreError> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = SqlWordStore::connect(url, config.database_ssl).await?;
            tracing::info!("word store backed by Postgres");
            Ok(Arc::new(store))
        }
        None => {
            let store = FileWordStore::new(config.db_path.clone());
            tracing::info!(path = %config.db_path.display(), "word store backed by JSON file");
            Ok(Arc::new(store))
        }
    }
}
