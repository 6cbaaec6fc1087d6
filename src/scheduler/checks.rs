//! The check pipeline
//!
//! [`CheckRunner`] executes a single check against one target: probe the
//! URL, update the stored record, alert the contact when the result is
//! unhealthy, and publish the outcome. Scheduled ticks and on-demand
//! checks both go through this one code path, so they cannot drift apart.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use crate::{
    StatusSample,
    error::{MonitorError, MonitorResult},
    notify::Notifier,
    probe::{self, HttpProber},
    scheduler::messages::CheckEvent,
    storage::TargetStore,
};

/// Shared pipeline for running one check against one target.
#[derive(Clone)]
pub struct CheckRunner {
    store: Arc<dyn TargetStore>,
    prober: Arc<HttpProber>,
    notifier: Option<Arc<dyn Notifier>>,
    event_tx: broadcast::Sender<CheckEvent>,
}

impl CheckRunner {
    pub fn new(
        store: Arc<dyn TargetStore>,
        prober: Arc<HttpProber>,
        notifier: Option<Arc<dyn Notifier>>,
        event_tx: broadcast::Sender<CheckEvent>,
    ) -> Self {
        Self {
            store,
            prober,
            notifier,
            event_tx,
        }
    }

    /// Run one check and persist its outcome.
    ///
    /// Probes the URL, records the result as the latest status, alerts the
    /// contact when the target is unhealthy and an address is on file, and
    /// prepends the new sample to the history before saving.
    #[instrument(skip(self))]
    pub async fn run_check(&self, target_id: &str) -> MonitorResult<StatusSample> {
        let Some(mut target) = self.store.find_by_id(target_id).await? else {
            return Err(MonitorError::NotFound(format!(
                "no target with id {target_id}"
            )));
        };

        let code = self.prober.check(&target.url).await;
        target.latest_status = Some(code);

        let mut notified = false;
        if code != probe::HEALTHY {
            if let Some(email) = target.contact_email.clone() {
                match &self.notifier {
                    Some(notifier) => {
                        notified = true;
                        if !notifier.notify(&target.url, &email).await {
                            warn!("alert for {} could not be delivered", target.url);
                        }
                    }
                    None => {
                        debug!("no notifier configured, skipping alert for {}", target.url);
                    }
                }
            }
        }

        let sample = StatusSample::now(code);
        target.history.insert(0, sample.clone());
        self.store.save(&target).await?;

        // It's OK if there are no subscribers.
        let _ = self.event_tx.send(CheckEvent {
            target_id: target.id.clone(),
            url: target.url.clone(),
            sample: sample.clone(),
            notified,
        });

        Ok(sample)
    }
}
