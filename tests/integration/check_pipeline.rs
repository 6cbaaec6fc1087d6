//! Integration tests for the check pipeline
//!
//! These tests verify that:
//! - Every check appends exactly one sample and syncs the latest status
//! - Unreachable targets record the sentinel code instead of failing
//! - Alerts go out only for unhealthy checks with a contact on file

use std::{sync::Arc, time::Duration};

use sitewatch::{
    MonitoredTarget,
    config::MailConfig,
    notify::EmailNotifier,
    probe::UNREACHABLE,
    storage::{MemoryStore, TargetStore},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::helpers::*;

fn test_notifier(mail: &MockServer) -> EmailNotifier {
    EmailNotifier::from_config(&MailConfig {
        endpoint: mail.uri(),
        from: "alerts@example.com".to_string(),
        api_key: Some("test-key".to_string()),
    })
    .expect("mail config with an api key always yields a notifier")
}

#[tokio::test]
async fn test_unreachable_target_without_contact_never_alerts() {
    // The site exists while the target is registered, then goes away.
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&site)
        .await;
    let url = site.uri();

    let mail = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&mail)
        .await;

    let store = Arc::new(MemoryStore::new());
    let (scheduler, _events) = spawn_test_scheduler(
        store.clone(),
        Duration::from_secs(3600),
        Some(Arc::new(test_notifier(&mail))),
    );

    let id = seed_target(store.as_ref(), &url, 200).await;
    assert_eq!(store.find_by_id(&id).await.unwrap().unwrap().history.len(), 1);

    // Starting returns the stored status without probing the site.
    let sample = scheduler.start_monitoring(&id).await.unwrap();
    assert_eq!(sample.status_code, 200);
    assert_eq!(store.find_by_id(&id).await.unwrap().unwrap().history.len(), 1);

    // Site gone: the next check records the unreachable sentinel and,
    // with no contact on file, sends no mail.
    drop(site);
    let sample = scheduler.run_check(&id).await.unwrap();
    assert_eq!(sample.status_code, UNREACHABLE);

    let target = store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(target.history.len(), 2);
    assert_eq!(target.latest_status, Some(UNREACHABLE));

    let stopped = scheduler.stop_monitoring(&id).await.unwrap();
    assert!(!stopped.monitoring_enabled);
}

#[tokio::test]
async fn test_healthy_checks_never_alert_even_with_contact() {
    let site = mock_site(200).await;

    let mail = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&mail)
        .await;

    let store = Arc::new(MemoryStore::new());
    let (scheduler, _events) = spawn_test_scheduler(
        store.clone(),
        Duration::from_secs(3600),
        Some(Arc::new(test_notifier(&mail))),
    );

    // Target with a contact address and no history yet.
    let target = MonitoredTarget {
        id: "target-b".to_string(),
        url: site.uri(),
        title: None,
        contact_email: Some("ops@example.com".to_string()),
        monitoring_enabled: false,
        latest_status: None,
        history: Vec::new(),
    };
    store.create(&target).await.unwrap();

    for _ in 0..3 {
        let sample = scheduler.run_check("target-b").await.unwrap();
        assert_eq!(sample.status_code, 200);
    }

    let stored = store.find_by_id("target-b").await.unwrap().unwrap();
    assert_eq!(stored.history.len(), 3);
    assert_eq!(stored.latest_status, Some(200));
}

#[tokio::test]
async fn test_down_target_with_contact_is_alerted() {
    let site = mock_site(503).await;

    let mail = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(2)
        .mount(&mail)
        .await;

    let store = Arc::new(MemoryStore::new());
    let (scheduler, mut events) = spawn_test_scheduler(
        store.clone(),
        Duration::from_secs(3600),
        Some(Arc::new(test_notifier(&mail))),
    );

    let target = MonitoredTarget {
        id: "target-down".to_string(),
        url: site.uri(),
        title: Some("Fails a lot".to_string()),
        contact_email: Some("oncall@example.com".to_string()),
        monitoring_enabled: false,
        latest_status: None,
        history: Vec::new(),
    };
    store.create(&target).await.unwrap();

    scheduler.run_check("target-down").await.unwrap();
    scheduler.run_check("target-down").await.unwrap();

    // Both events carry the alert flag.
    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();
    assert!(first.notified);
    assert!(second.notified);
    assert_eq!(second.sample.status_code, 503);
}
