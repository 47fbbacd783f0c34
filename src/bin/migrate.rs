//! One-shot, best-effort migration of the JSON dictionary file into the
//! Postgres `words` table. Legacy bare-string entries are normalized and
//! entries without a usable word or meaning are skipped.

use qamus_backend::config::Config;
use qamus_backend::logging;
use qamus_backend::store::file::FileWordStore;
use qamus_backend::store::sql::SqlWordStore;
use qamus_backend::store::WordStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let Some(url) = config.database_url.clone() else {
        tracing::error!("missing DATABASE_URL; set it before running the migration");
        std::process::exit(1);
    };

    if !config.db_path.exists() {
        tracing::error!(path = %config.db_path.display(), "dictionary file not found");
        std::process::exit(1);
    }

    let file_store = FileWordStore::new(config.db_path.clone());
    let entries = match file_store.get_all().await {
        Ok(entries) => entries,
        Err(err) => {
            tracing::error!(error = %err, "failed to read dictionary file");
            std::process::exit(1);
        }
    };

    if entries.is_empty() {
        tracing::info!("no entries found in the dictionary file");
        return;
    }

    let sql_store = match SqlWordStore::connect(&url, config.database_ssl).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to Postgres");
            std::process::exit(1);
        }
    };

    let mut migrated = 0usize;
    for (word, record) in entries {
        let word = word.trim();
        let meaning = record.meaning.trim();
        if word.is_empty() || meaning.is_empty() {
            continue;
        }

        if let Err(err) = sql_store
            .upsert(word, meaning, record.image_url.trim())
            .await
        {
            tracing::error!(error = %err, word, "migration failed");
            std::process::exit(1);
        }
        migrated += 1;
    }

    tracing::info!(migrated, "migrated words into Postgres");
}
