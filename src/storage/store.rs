//! Store trait definitions
//!
//! Two seams split persistence duties: `TargetStore` owns the durable
//! per-target records, `JobRegistry` owns the crash-recoverable set of
//! actively monitored target ids.

use async_trait::async_trait;

use super::error::StoreResult;
use crate::MonitoredTarget;

/// Durable record per monitored target.
///
/// The scheduler core is the sole mutator of persisted status fields and
/// never bypasses this trait. Implementations must be `Send + Sync`; they
/// are shared across async tasks behind an `Arc`.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Insert a new target. Fails with [`super::StoreError::Duplicate`]
    /// when the (normalized) URL is already present.
    async fn create(&self, target: &MonitoredTarget) -> StoreResult<()>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<MonitoredTarget>>;

    async fn find_by_url(&self, url: &str) -> StoreResult<Option<MonitoredTarget>>;

    /// Persist the current state of an existing target (status fields,
    /// monitoring flag, history).
    async fn save(&self, target: &MonitoredTarget) -> StoreResult<()>;

    /// Remove a target record. Removing an absent id is a no-op.
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// All targets, ordered by URL.
    async fn list_all(&self) -> StoreResult<Vec<MonitoredTarget>>;

    /// Close the backing store and release resources.
    async fn close(&self) -> StoreResult<()>;
}

/// Durable set of target ids with an active recurring check.
///
/// Read wholesale by recovery at startup. Mutations must be atomic:
/// concurrent adds/removes for different ids must never lose each
/// other's effect.
#[async_trait]
pub trait JobRegistry: Send + Sync {
    /// Add an id to the registry. Adding an existing id is a no-op.
    async fn add(&self, target_id: &str) -> StoreResult<()>;

    /// Remove an id from the registry. Removing an absent id is a no-op.
    async fn remove(&self, target_id: &str) -> StoreResult<()>;

    /// Every registered target id.
    async fn list_all(&self) -> StoreResult<Vec<String>>;
}
