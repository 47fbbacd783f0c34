use qamus_backend::store::file::FileWordStore;
use qamus_backend::store::{StoreError, WordStore};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> FileWordStore {
    FileWordStore::new(dir.path().join("db.json"))
}

#[tokio::test]
async fn creates_empty_file_on_first_read() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let entries = store.get_all().await.unwrap();
    assert!(entries.is_empty());

    let raw = std::fs::read_to_string(dir.path().join("db.json")).unwrap();
    assert_eq!(raw, "{}");
}

#[tokio::test]
async fn upsert_then_get_one() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.upsert("قلم", "pen", "").await.unwrap();

    let record = store.get_one("قلم").await.unwrap().unwrap();
    assert_eq!(record.meaning, "pen");
    assert_eq!(record.image_url, "");
}

#[tokio::test]
async fn upsert_trims_and_fully_overwrites() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store
        .upsert(" قلم ", " pen ", " https://example.com/pen.png ")
        .await
        .unwrap();
    let record = store.get_one("قلم").await.unwrap().unwrap();
    assert_eq!(record.meaning, "pen");
    assert_eq!(record.image_url, "https://example.com/pen.png");

    // Full overwrite, no merge of the prior image.
    store.upsert("قلم", "a pen", "").await.unwrap();
    let record = store.get_one("قلم").await.unwrap().unwrap();
    assert_eq!(record.meaning, "a pen");
    assert_eq!(record.image_url, "");
}

#[tokio::test]
async fn get_one_empty_word_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(store.get_one("").await.unwrap().is_none());
    assert!(store.get_one("   ").await.unwrap().is_none());
}

#[tokio::test]
async fn lookup_is_case_sensitive_exact_match() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.upsert("Pen", "قلم", "").await.unwrap();
    assert!(store.get_one("pen").await.unwrap().is_none());
    assert!(store.get_one("Pen").await.unwrap().is_some());
}

#[tokio::test]
async fn update_merges_partial_fields() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store
        .upsert("شمس", "sun", "/uploads/sun.png")
        .await
        .unwrap();

    store.update("شمس", Some("the sun"), None).await.unwrap();
    let record = store.get_one("شمس").await.unwrap().unwrap();
    assert_eq!(record.meaning, "the sun");
    assert_eq!(record.image_url, "/uploads/sun.png");

    store.update("شمس", None, Some("")).await.unwrap();
    let record = store.get_one("شمس").await.unwrap().unwrap();
    assert_eq!(record.meaning, "the sun");
    assert_eq!(record.image_url, "");
}

#[tokio::test]
async fn update_on_absent_word_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.update("ghost", Some("boo"), None).await.unwrap();
    assert!(store.get_one("ghost").await.unwrap().is_none());
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.upsert("قلم", "pen", "").await.unwrap();
    store.delete("قلم").await.unwrap();
    assert!(store.get_one("قلم").await.unwrap().is_none());

    store.delete("قلم").await.unwrap();
    store.delete("never-existed").await.unwrap();
}

#[tokio::test]
async fn get_all_preserves_insertion_order() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.upsert("قلم", "pen", "").await.unwrap();
    store.upsert("باب", "door", "").await.unwrap();
    store.upsert("كتاب", "book", "").await.unwrap();

    let words: Vec<String> = store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|(word, _)| word)
        .collect();
    assert_eq!(words, vec!["قلم", "باب", "كتاب"]);
}

#[tokio::test]
async fn legacy_bare_string_values_normalize() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("db.json"), r#"{"كتاب": "book"}"#).unwrap();
    let store = store_in(&dir);

    let record = store.get_one("كتاب").await.unwrap().unwrap();
    assert_eq!(record.meaning, "book");
    assert_eq!(record.image_url, "");
}

#[tokio::test]
async fn corrupted_file_surfaces_a_storage_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("db.json"), "not json at all").unwrap();
    let store = store_in(&dir);

    let err = store.get_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));

    let err = store.probe().await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[tokio::test]
async fn persisted_file_keeps_object_layout() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store
        .upsert("شمس", "sun", "/uploads/sun.png")
        .await
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("db.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["شمس"]["meaning"], "sun");
    assert_eq!(parsed["شمس"]["imageUrl"], "/uploads/sun.png");
}
