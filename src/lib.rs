pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::services::image_provider::ImageProvider;
use crate::state::AppState;
use crate::store::StoreError;

/// Builds the full application router. The word store backend is selected
/// once here and injected into the handlers through [`AppState`].
pub async fn create_app(config: &Config) -> Result<axum::Router, StoreError> {
    let store = store::from_config(config).await?;
    let images = Arc::new(ImageProvider::from_env());
    let state = AppState::new(store, images, config);

    Ok(routes::router(state, config)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
