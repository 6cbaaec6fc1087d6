//! Helper functions for integration tests

use std::{sync::Arc, time::Duration};

use sitewatch::{
    MonitoredTarget,
    notify::Notifier,
    probe::HttpProber,
    scheduler::{CheckEvent, SchedulerHandle},
    storage::{MemoryStore, TargetStore},
};
use tokio::sync::broadcast;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

/// Scheduler over in-memory storage with the given check period.
pub fn spawn_test_scheduler(
    store: Arc<MemoryStore>,
    period: Duration,
    notifier: Option<Arc<dyn Notifier>>,
) -> (SchedulerHandle, broadcast::Receiver<CheckEvent>) {
    let (event_tx, event_rx) = broadcast::channel(64);
    let handle = SchedulerHandle::spawn(
        store.clone(),
        store,
        Arc::new(HttpProber::new(Duration::from_secs(2))),
        notifier,
        event_tx,
        period,
    );
    (handle, event_rx)
}

/// Mock site answering every GET with the given status code.
pub async fn mock_site(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

/// Store a target the way creation would leave it: one seed sample,
/// monitoring off.
pub async fn seed_target(store: &dyn TargetStore, url: &str, initial_status: u16) -> String {
    let target = MonitoredTarget::new(url, None, None, initial_status);
    store.create(&target).await.unwrap();
    target.id
}
