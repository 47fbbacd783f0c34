use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// When set, the SQL backend is selected for the whole process lifetime.
    pub database_url: Option<String>,
    /// Require TLS on the Postgres connection (`DATABASE_SSL=true`).
    pub database_ssl: bool,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let database_ssl = std::env::var("DATABASE_SSL")
            .map(|value| value == "true" || value == "1")
            .unwrap_or(false);

        let db_path = env_path("DB_PATH").unwrap_or_else(|| PathBuf::from("db.json"));
        let upload_dir = env_path("UPLOAD_DIR").unwrap_or_else(|| PathBuf::from("uploads"));
        let public_dir = env_path("PUBLIC_DIR").unwrap_or_else(|| PathBuf::from("public"));

        Self {
            host,
            port,
            log_level,
            database_url,
            database_ssl,
            db_path,
            upload_dir,
            public_dir,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
