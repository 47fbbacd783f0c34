use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Row};

use crate::store::{StoreError, WordRecord, WordStore};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS words (\
    word TEXT PRIMARY KEY, \
    meaning TEXT NOT NULL, \
    image_url TEXT NOT NULL DEFAULT '')";

/// Postgres-backed word store. The table is created idempotently on connect;
/// a failure there aborts startup.
pub struct SqlWordStore {
    pool: PgPool,
}

impl SqlWordStore {
    pub async fn connect(url: &str, require_ssl: bool) -> Result<Self, StoreError> {
        let mut options = PgConnectOptions::from_str(url)?;
        if require_ssl {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WordStore for SqlWordStore {
    async fn get_all(&self) -> Result<Vec<(String, WordRecord)>, StoreError> {
        let rows =
            sqlx::query("SELECT word, meaning, image_url FROM words ORDER BY word ASC")
                .fetch_all(&self.pool)
                .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let word: String = row.try_get("word")?;
            let meaning: String = row.try_get("meaning")?;
            let image_url: String = row.try_get("image_url")?;
            entries.push((word, WordRecord::new(meaning, image_url)));
        }
        Ok(entries)
    }

    async fn get_one(&self, word: &str) -> Result<Option<WordRecord>, StoreError> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query("SELECT meaning, image_url FROM words WHERE word = $1")
            .bind(word)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let meaning: String = row.try_get("meaning")?;
        let image_url: String = row.try_get("image_url")?;
        Ok(Some(WordRecord::new(meaning, image_url)))
    }

    async fn upsert(&self, word: &str, meaning: &str, image_url: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO words (word, meaning, image_url) VALUES ($1, $2, $3) \
             ON CONFLICT (word) DO UPDATE \
             SET meaning = EXCLUDED.meaning, image_url = EXCLUDED.image_url",
        )
        .bind(word.trim())
        .bind(meaning.trim())
        .bind(image_url.trim())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        word: &str,
        meaning: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<(), StoreError> {
        // COALESCE keeps the stored value for omitted fields; an absent word
        // matches no row and the statement is a no-op.
        sqlx::query(
            "UPDATE words \
             SET meaning = COALESCE($2, meaning), image_url = COALESCE($3, image_url) \
             WHERE word = $1",
        )
        .bind(word.trim())
        .bind(meaning.map(str::trim))
        .bind(image_url.map(str::trim))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, word: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM words WHERE word = $1")
            .bind(word.trim())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn probe(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
