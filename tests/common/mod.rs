#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use axum::Router;
use qamus_backend::config::Config;

pub fn test_config(dir: &Path) -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_level: "info".to_string(),
        database_url: None,
        database_ssl: false,
        db_path: dir.join("db.json"),
        upload_dir: dir.join("uploads"),
        public_dir: dir.join("public"),
    }
}

pub async fn create_test_app(dir: &Path) -> Router {
    qamus_backend::create_app(&test_config(dir))
        .await
        .expect("failed to build test app")
}
