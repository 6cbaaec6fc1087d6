//! Integration tests for the scheduler lifecycle
//!
//! These tests verify that:
//! - Recurring checks actually fire on their ticker
//! - Stopping halts all further ticks
//! - The monitored flag tracks the live job table

use std::{sync::Arc, time::Duration};

use sitewatch::storage::{MemoryStore, TargetStore};

use crate::helpers::*;

#[tokio::test]
async fn test_recurring_checks_accumulate_history() {
    let site = mock_site(200).await;
    let store = Arc::new(MemoryStore::new());
    let (scheduler, _events) = spawn_test_scheduler(store.clone(), Duration::from_millis(50), None);

    let id = seed_target(store.as_ref(), &site.uri(), 200).await;
    scheduler.start_monitoring(&id).await.unwrap();

    // Several 50ms ticks.
    tokio::time::sleep(Duration::from_millis(400)).await;

    let target = store.find_by_id(&id).await.unwrap().unwrap();
    assert!(
        target.history.len() >= 3,
        "expected several samples, got {}",
        target.history.len()
    );
    assert_eq!(target.latest_status, Some(200));
    assert!(target.monitoring_enabled);
}

#[tokio::test]
async fn test_stop_halts_recurring_checks() {
    let site = mock_site(200).await;
    let store = Arc::new(MemoryStore::new());
    let (scheduler, _events) = spawn_test_scheduler(store.clone(), Duration::from_millis(50), None);

    let id = seed_target(store.as_ref(), &site.uri(), 200).await;
    scheduler.start_monitoring(&id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    scheduler.stop_monitoring(&id).await.unwrap();
    let len_after_stop = store.find_by_id(&id).await.unwrap().unwrap().history.len();

    // No tick may land once stop has returned.
    tokio::time::sleep(Duration::from_millis(250)).await;
    let target = store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(target.history.len(), len_after_stop);
    assert!(!target.monitoring_enabled);
}

#[tokio::test]
async fn test_flag_tracks_the_live_job_table() {
    let site = mock_site(200).await;
    let store = Arc::new(MemoryStore::new());
    let (scheduler, _events) =
        spawn_test_scheduler(store.clone(), Duration::from_secs(3600), None);

    let id = seed_target(store.as_ref(), &site.uri(), 200).await;

    // Start, stop, start again: flag and job table move together.
    scheduler.start_monitoring(&id).await.unwrap();
    assert!(store.find_by_id(&id).await.unwrap().unwrap().monitoring_enabled);
    assert_eq!(scheduler.active_jobs().await.unwrap().len(), 1);

    scheduler.stop_monitoring(&id).await.unwrap();
    assert!(!store.find_by_id(&id).await.unwrap().unwrap().monitoring_enabled);
    assert!(scheduler.active_jobs().await.unwrap().is_empty());

    scheduler.start_monitoring(&id).await.unwrap();
    assert!(store.find_by_id(&id).await.unwrap().unwrap().monitoring_enabled);
    assert_eq!(scheduler.active_jobs().await.unwrap().len(), 1);
}
