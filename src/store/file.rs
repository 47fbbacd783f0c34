use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::store::{StoreError, WordRecord, WordStore};

/// JSON-file-backed word store.
///
/// The on-disk layout is a single object whose keys are words. Values are
/// either a legacy bare string (meaning only) or `{"meaning", "imageUrl"}`;
/// both forms are normalized on load. Every write replaces the whole file,
/// so two processes writing concurrently race and the last full write wins.
/// Writes within this process are serialized by a mutex.
pub struct FileWordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileWordStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the whole file, creating an empty `{}` on first access.
    /// A file that no longer parses as a JSON object is a hard error.
    async fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
                tokio::fs::write(&self.path, "{}").await?;
                return Ok(Map::new());
            }
            Err(err) => return Err(err.into()),
        };

        let map: Map<String, Value> = serde_json::from_str(&raw)?;
        Ok(map)
    }

    async fn persist(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        let pretty = serde_json::to_string_pretty(map)?;
        tokio::fs::write(&self.path, pretty).await?;
        Ok(())
    }
}

fn normalize(value: &Value) -> WordRecord {
    match value {
        Value::String(meaning) => WordRecord::new(meaning.clone(), ""),
        Value::Object(fields) => WordRecord::new(
            fields
                .get("meaning")
                .and_then(Value::as_str)
                .unwrap_or_default(),
            fields
                .get("imageUrl")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        ),
        _ => WordRecord::new("", ""),
    }
}

fn encode(record: &WordRecord) -> Value {
    serde_json::json!({
        "meaning": record.meaning,
        "imageUrl": record.image_url,
    })
}

#[async_trait]
impl WordStore for FileWordStore {
    async fn get_all(&self) -> Result<Vec<(String, WordRecord)>, StoreError> {
        let map = self.load().await?;
        Ok(map
            .iter()
            .map(|(word, value)| (word.clone(), normalize(value)))
            .collect())
    }

    async fn get_one(&self, word: &str) -> Result<Option<WordRecord>, StoreError> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(None);
        }

        let map = self.load().await?;
        Ok(map.get(word).map(normalize))
    }

    async fn upsert(&self, word: &str, meaning: &str, image_url: &str) -> Result<(), StoreError> {
        let record = WordRecord::new(meaning.trim(), image_url.trim());

        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        map.insert(word.trim().to_string(), encode(&record));
        self.persist(&map).await
    }

    async fn update(
        &self,
        word: &str,
        meaning: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<(), StoreError> {
        let word = word.trim();

        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        let Some(existing) = map.get(word).map(normalize) else {
            return Ok(());
        };

        let merged = WordRecord::new(
            meaning.map(str::trim).unwrap_or(&existing.meaning),
            image_url.map(str::trim).unwrap_or(&existing.image_url),
        );
        map.insert(word.to_string(), encode(&merged));
        self.persist(&map).await
    }

    async fn delete(&self, word: &str) -> Result<(), StoreError> {
        let word = word.trim();

        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        if map.remove(word).is_none() {
            return Ok(());
        }
        self.persist(&map).await
    }

    async fn probe(&self) -> Result<(), StoreError> {
        self.load().await.map(|_| ())
    }
}
