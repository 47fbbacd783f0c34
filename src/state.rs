use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::services::image_provider::ImageProvider;
use crate::store::WordStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    store: Arc<dyn WordStore>,
    images: Arc<ImageProvider>,
    upload_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn WordStore>, images: Arc<ImageProvider>, config: &Config) -> Self {
        Self {
            started_at: Instant::now(),
            store,
            images,
            upload_dir: config.upload_dir.clone(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn store(&self) -> Arc<dyn WordStore> {
        Arc::clone(&self.store)
    }

    pub fn images(&self) -> Arc<ImageProvider> {
        Arc::clone(&self.images)
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }
}
