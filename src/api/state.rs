//! API shared state

use std::sync::Arc;
use std::time::Instant;

use crate::{probe::HttpProber, scheduler::SchedulerHandle, storage::TargetStore};

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Handle to the scheduler actor for lifecycle changes and checks
    pub scheduler: SchedulerHandle,

    /// Target store for plain reads that do not go through the scheduler
    pub store: Arc<dyn TargetStore>,

    /// Prober used to seed the first sample when a target is created
    pub prober: Arc<HttpProber>,

    /// When this state was built, for the health endpoint's uptime
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(
        scheduler: SchedulerHandle,
        store: Arc<dyn TargetStore>,
        prober: Arc<HttpProber>,
    ) -> Self {
        Self {
            scheduler,
            store,
            prober,
            started_at: Instant::now(),
        }
    }
}
