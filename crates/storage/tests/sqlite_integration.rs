use std::sync::Arc;

use compass_core::model::{CourseId, CourseStatus, LessonId, ResourceId, TrainingProgress};
use compass_core::time::fixed_now;
use storage::repository::KeyValueStore;
use storage::sqlite::SqliteRepository;
use storage::{PROGRESS_STORAGE_KEY, ProgressStore, Storage};

#[tokio::test]
async fn sqlite_key_value_round_trip() {
    let repo = SqliteRepository::open("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_item("missing").await.unwrap(), None);

    repo.set_item("k", "first").await.unwrap();
    repo.set_item("k", "second").await.unwrap();
    assert_eq!(repo.get_item("k").await.unwrap().as_deref(), Some("second"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM local_storage WHERE key = 'k'")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::open("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn progress_document_survives_sqlite_round_trip() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("storage");
    let store = ProgressStore::new(Arc::clone(&storage.local));

    let course = CourseId::new("course-ai-accessible-resources");
    let mut progress = TrainingProgress::new();
    progress.start_course(&course, fixed_now());
    progress.complete_lesson(&course, &LessonId::new("lesson-1-why-accessible"), fixed_now());
    progress.mark_resource_viewed(&ResourceId::new("resource-alt-text-guide"));
    assert!(store.save(&progress).await);

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, progress);
    assert_eq!(
        loaded.course(&course).map(|c| c.status()),
        Some(CourseStatus::InProgress)
    );
}

#[tokio::test]
async fn corrupted_sqlite_value_loads_empty() {
    let storage = Storage::sqlite("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .local
        .set_item(PROGRESS_STORAGE_KEY, "\u{0}\u{1}garbage")
        .await
        .unwrap();

    let store = ProgressStore::new(Arc::clone(&storage.local));
    assert_eq!(store.load().await.unwrap(), TrainingProgress::new());
}
