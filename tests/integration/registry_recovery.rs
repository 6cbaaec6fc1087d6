//! Recovery of monitoring jobs from the durable registry
//!
//! These tests verify that:
//! - A fresh process respawns jobs recorded by the previous one
//! - Registry entries without a matching target are dropped
//! - Deleting a target leaves nothing behind to recover

use std::{sync::Arc, time::Duration};

use sitewatch::{
    probe::HttpProber,
    scheduler::SchedulerHandle,
    storage::{JobRegistry, SqliteStore, TargetStore},
};
use tempfile::tempdir;
use tokio::sync::broadcast;

use crate::helpers::seed_target;

fn spawn_sqlite_scheduler(store: Arc<SqliteStore>) -> SchedulerHandle {
    let (event_tx, _) = broadcast::channel(16);
    SchedulerHandle::spawn(
        store.clone(),
        store,
        Arc::new(HttpProber::new(Duration::from_secs(2))),
        None,
        event_tx,
        Duration::from_secs(3600),
    )
}

#[tokio::test]
async fn test_monitoring_survives_a_restart() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("recovery.db");

    // First process: register a target and start monitoring it.
    let id = {
        let store = Arc::new(SqliteStore::new(&db_path).await.unwrap());
        let scheduler = spawn_sqlite_scheduler(store.clone());
        let id = seed_target(store.as_ref(), "http://one.example", 200).await;
        scheduler.start_monitoring(&id).await.unwrap();
        scheduler.shutdown().await;
        store.close().await.unwrap();
        id
    };

    // Second process: the registry alone brings the job back.
    let store = Arc::new(SqliteStore::new(&db_path).await.unwrap());
    let scheduler = spawn_sqlite_scheduler(store.clone());
    let recovered = scheduler.recover().await.unwrap();
    assert_eq!(recovered, 1);
    assert_eq!(scheduler.active_jobs().await.unwrap(), vec![id.clone()]);

    let target = store.find_by_id(&id).await.unwrap().unwrap();
    assert!(target.monitoring_enabled);
}

#[tokio::test]
async fn test_recover_drops_entries_without_a_target() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("dangling.db");

    let store = Arc::new(SqliteStore::new(&db_path).await.unwrap());
    // Crash artifact: a registered id with no target row.
    JobRegistry::add(store.as_ref(), "orphan").await.unwrap();

    let scheduler = spawn_sqlite_scheduler(store.clone());
    assert_eq!(scheduler.recover().await.unwrap(), 0);
    assert!(scheduler.active_jobs().await.unwrap().is_empty());
    assert!(
        JobRegistry::list_all(store.as_ref())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_delete_leaves_nothing_to_recover() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("delete.db");

    let store = Arc::new(SqliteStore::new(&db_path).await.unwrap());
    let scheduler = spawn_sqlite_scheduler(store.clone());
    let id = seed_target(store.as_ref(), "http://two.example", 200).await;

    scheduler.start_monitoring(&id).await.unwrap();
    scheduler.delete_target(&id).await.unwrap();

    // A fresh scheduler over the same database finds nothing.
    let scheduler = spawn_sqlite_scheduler(store.clone());
    assert_eq!(scheduler.recover().await.unwrap(), 0);
    assert!(store.find_by_id(&id).await.unwrap().is_none());
}
