mod health;
mod images;
mod words;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::state::AppState;

pub fn router(state: AppState, config: &Config) -> Router {
    let public = ServeDir::new(&config.public_dir).append_index_html_on_directories(true);
    let uploads = ServeDir::new(&config.upload_dir);

    Router::new()
        .route("/api/words", get(words::search).post(words::create))
        .route("/api/words/all", get(words::all))
        .route("/api/words/:word", put(words::update).delete(words::remove))
        .route("/api/images/generate", post(images::generate))
        .route("/health", get(health::health))
        .nest_service("/uploads", uploads)
        .fallback_service(public)
        .with_state(state)
}
