//! Integration tests for the file-backed state store.

use chapter_sync_core::{Database, SeriesRecord, Store, WatchUpsert};
use tempfile::TempDir;

async fn open(temp_dir: &TempDir) -> Store {
    let db = Database::new(&temp_dir.path().join("chapters.db"))
        .await
        .unwrap();
    Store::new(db)
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = open(&temp_dir).await;
        let record = SeriesRecord::from_title(100, "Some Series");
        store.upsert_series(&record).await.unwrap();
        let id = store.upsert_watch(&record).await.unwrap().id();
        assert!(store.record_download(id, 100, "1").await.unwrap());
        assert!(store.record_download(id, 100, "2").await.unwrap());
    }

    let store = open(&temp_dir).await;
    let series = store.get_series(100).await.unwrap().unwrap();
    assert_eq!(series.slug, "some-series");
    let watch = store.get_watch_by_series(100).await.unwrap().unwrap();
    assert_eq!(
        store.downloaded_labels(watch.id, 100).await.unwrap(),
        vec!["1", "2"]
    );
}

#[tokio::test]
async fn test_wal_mode_on_file_database() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("chapters.db"))
        .await
        .unwrap();
    assert!(db.is_wal_enabled().await.unwrap());
}

#[tokio::test]
async fn test_watch_upsert_keeps_one_row_per_series() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    let first = store
        .upsert_watch(&SeriesRecord::from_title(7, "Old Title"))
        .await
        .unwrap();
    let second = store
        .upsert_watch(&SeriesRecord::from_title(7, "New Title"))
        .await
        .unwrap();

    assert!(matches!(first, WatchUpsert::Inserted(_)));
    assert_eq!(second, WatchUpsert::Updated(first.id()));
    let all = store.list_watch(&[]).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "New Title");
    assert_eq!(all[0].slug, "new-title");
}

#[tokio::test]
async fn test_list_watch_filters_by_series_ids() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    for (id, title) in [(1, "A"), (2, "B"), (3, "C")] {
        store
            .upsert_watch(&SeriesRecord::from_title(id, title))
            .await
            .unwrap();
    }

    let filtered = store.list_watch(&[3, 1, 42]).await.unwrap();

    let ids: Vec<i64> = filtered.iter().map(|e| e.series_id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_watch_summaries_count_ledger_rows() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    let a = store
        .upsert_watch(&SeriesRecord::from_title(1, "A"))
        .await
        .unwrap()
        .id();
    store
        .upsert_watch(&SeriesRecord::from_title(2, "B"))
        .await
        .unwrap();
    store.record_download(a, 1, "1").await.unwrap();
    store.record_download(a, 1, "2").await.unwrap();
    assert!(!store.record_download(a, 1, "2").await.unwrap());

    let summaries = store.list_watch_summaries().await.unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].downloaded, 2);
    assert_eq!(summaries[1].downloaded, 0);
}

#[tokio::test]
async fn test_max_series_id_tracks_known_series() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;
    assert_eq!(store.max_series_id().await.unwrap(), None);

    for id in [5, 40, 12] {
        store
            .upsert_series(&SeriesRecord::from_title(id, "x"))
            .await
            .unwrap();
    }

    assert_eq!(store.max_series_id().await.unwrap(), Some(40));
    for id in [5, 40, 12] {
        assert!(store.get_series(id).await.unwrap().is_some());
    }
}

#[tokio::test]
async fn test_ledger_rejects_unknown_watch_id() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir).await;

    let err = store.record_download(999, 1, "1").await.unwrap_err();

    assert!(err.is_constraint_violation());
}
