//! In-memory store (no persistence)
//!
//! Backs `backend = "none"` deployments and most of the test suite.
//! All data is lost on restart. Within the process lifetime the job
//! registry behaves exactly like the durable one, so recovery logic can
//! be exercised against it.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::{StoreError, StoreResult};
use super::store::{JobRegistry, TargetStore};
use crate::MonitoredTarget;

#[derive(Default)]
pub struct MemoryStore {
    targets: RwLock<HashMap<String, MonitoredTarget>>,
    jobs: RwLock<BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TargetStore for MemoryStore {
    async fn create(&self, target: &MonitoredTarget) -> StoreResult<()> {
        let mut targets = self.targets.write().await;
        if targets.values().any(|t| t.url == target.url) {
            return Err(StoreError::Duplicate(format!("targets.url: {}", target.url)));
        }
        targets.insert(target.id.clone(), target.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<MonitoredTarget>> {
        Ok(self.targets.read().await.get(id).cloned())
    }

    async fn find_by_url(&self, url: &str) -> StoreResult<Option<MonitoredTarget>> {
        Ok(self
            .targets
            .read()
            .await
            .values()
            .find(|t| t.url == url)
            .cloned())
    }

    async fn save(&self, target: &MonitoredTarget) -> StoreResult<()> {
        let mut targets = self.targets.write().await;
        // mirror the sqlite UPDATE: a deleted target is not resurrected
        if let Some(existing) = targets.get_mut(&target.id) {
            *existing = target.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.targets.write().await.remove(id);
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<MonitoredTarget>> {
        let mut targets: Vec<MonitoredTarget> =
            self.targets.read().await.values().cloned().collect();
        targets.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(targets)
    }

    async fn close(&self) -> StoreResult<()> {
        debug!("closing in-memory store (no-op)");
        Ok(())
    }
}

#[async_trait]
impl JobRegistry for MemoryStore {
    async fn add(&self, target_id: &str) -> StoreResult<()> {
        self.jobs.write().await.insert(target_id.to_string());
        Ok(())
    }

    async fn remove(&self, target_id: &str) -> StoreResult<()> {
        self.jobs.write().await.remove(target_id);
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<String>> {
        Ok(self.jobs.read().await.iter().cloned().collect())
    }
}
