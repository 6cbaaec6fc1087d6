//! The scheduler actor and its handle
//!
//! The actor owns the table of live worker tasks and handles commands
//! strictly one at a time, so concurrent starts, stops and deletes for
//! the same target cannot interleave. [`SchedulerHandle`] is the
//! cloneable front door the API layer and binaries talk to.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    MonitoredTarget, StatusSample,
    error::{MonitorError, MonitorResult},
    notify::Notifier,
    probe::HttpProber,
    scheduler::{
        checks::CheckRunner,
        messages::{CheckEvent, SchedulerCommand, WorkerCommand},
        worker::TargetWorker,
    },
    storage::{JobRegistry, TargetStore},
};

/// A live worker task for one target
struct ActiveJob {
    command_tx: mpsc::Sender<WorkerCommand>,
    task: JoinHandle<()>,
}

/// Actor that owns all recurring checks
struct SchedulerActor {
    command_rx: mpsc::Receiver<SchedulerCommand>,
    jobs: HashMap<String, ActiveJob>,
    runner: CheckRunner,
    store: Arc<dyn TargetStore>,
    registry: Arc<dyn JobRegistry>,
    period: Duration,
}

impl SchedulerActor {
    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command arrives or the command channel is
    /// closed. All workers are aborted on the way out.
    async fn run(mut self) {
        debug!("starting scheduler actor");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                SchedulerCommand::Start {
                    target_id,
                    respond_to,
                } => {
                    let result = self.start_monitoring(&target_id).await;
                    let _ = respond_to.send(result);
                }

                SchedulerCommand::Stop {
                    target_id,
                    respond_to,
                } => {
                    let result = self.stop_monitoring(&target_id).await;
                    let _ = respond_to.send(result);
                }

                SchedulerCommand::RunCheck {
                    target_id,
                    respond_to,
                } => {
                    self.dispatch_check(target_id, respond_to).await;
                }

                SchedulerCommand::Delete {
                    target_id,
                    respond_to,
                } => {
                    let result = self.delete_target(&target_id).await;
                    let _ = respond_to.send(result);
                }

                SchedulerCommand::Recover { respond_to } => {
                    let result = self.recover().await;
                    let _ = respond_to.send(result);
                }

                SchedulerCommand::ActiveJobs { respond_to } => {
                    let mut ids: Vec<String> = self.jobs.keys().cloned().collect();
                    ids.sort();
                    let _ = respond_to.send(ids);
                }

                SchedulerCommand::Shutdown => {
                    debug!("received shutdown command");
                    break;
                }
            }
        }

        self.cancel_all();
        debug!("scheduler actor stopped");
    }

    #[instrument(skip(self))]
    async fn start_monitoring(&mut self, target_id: &str) -> MonitorResult<StatusSample> {
        let Some(mut target) = self.store.find_by_id(target_id).await? else {
            return Err(MonitorError::NotFound(format!(
                "no target with id {target_id}"
            )));
        };

        if self.jobs.contains_key(target_id) {
            debug!("target is already monitored");
            return latest_known(&target);
        }

        let job = self.spawn_worker(target_id);

        if let Err(e) = self.registry.add(target_id).await {
            job.task.abort();
            return Err(e.into());
        }
        self.jobs.insert(target_id.to_string(), job);

        target.monitoring_enabled = true;
        if let Err(e) = self.store.save(&target).await {
            if let Some(job) = self.jobs.remove(target_id) {
                job.task.abort();
            }
            // Best effort: a leftover entry is replayed into a working
            // job at the next startup anyway.
            let _ = self.registry.remove(target_id).await;
            return Err(e.into());
        }

        info!("monitoring started for {}", target.url);
        latest_known(&target)
    }

    #[instrument(skip(self))]
    async fn stop_monitoring(&mut self, target_id: &str) -> MonitorResult<MonitoredTarget> {
        let Some(mut target) = self.store.find_by_id(target_id).await? else {
            return Err(MonitorError::NotFound(format!(
                "no target with id {target_id}"
            )));
        };

        // Abort, not graceful: no tick may fire once this call returns.
        if let Some(job) = self.jobs.remove(target_id) {
            job.task.abort();
        }

        self.registry.remove(target_id).await?;

        target.monitoring_enabled = false;
        self.store.save(&target).await?;

        info!("monitoring stopped for {}", target.url);
        Ok(target)
    }

    /// Run an on-demand check
    ///
    /// For a monitored target the check is forwarded to its worker, so
    /// all checks for one target run on a single task. Everything else
    /// runs inline on the actor.
    async fn dispatch_check(
        &mut self,
        target_id: String,
        respond_to: oneshot::Sender<MonitorResult<StatusSample>>,
    ) {
        let respond_to = match self.jobs.get(&target_id) {
            Some(job) => {
                match job
                    .command_tx
                    .send(WorkerCommand::CheckNow { respond_to })
                    .await
                {
                    Ok(()) => return,
                    // Worker already gone; reclaim the sender and run inline.
                    Err(mpsc::error::SendError(WorkerCommand::CheckNow { respond_to })) => {
                        respond_to
                    }
                }
            }
            None => respond_to,
        };

        let result = self.runner.run_check(&target_id).await;
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self))]
    async fn delete_target(&mut self, target_id: &str) -> MonitorResult<String> {
        let Some(target) = self.store.find_by_id(target_id).await? else {
            return Err(MonitorError::NotFound(format!(
                "no target with id {target_id}"
            )));
        };

        // Stop first: a firing timer must never write through a deleted
        // record.
        if let Some(job) = self.jobs.remove(target_id) {
            job.task.abort();
        }

        // Unconditional: a crash can leave a registry entry behind with
        // no in-memory job.
        self.registry.remove(target_id).await?;
        self.store.delete(target_id).await?;

        info!("deleted {}", target.url);
        Ok(format!("{} has been successfully deleted", target.url))
    }

    /// Respawn a worker for every target recorded in the job registry
    #[instrument(skip(self))]
    async fn recover(&mut self) -> MonitorResult<usize> {
        let ids = self.registry.list_all().await?;

        let mut recovered = 0;
        for target_id in ids {
            if self.jobs.contains_key(&target_id) {
                continue;
            }

            let Some(mut target) = self.store.find_by_id(&target_id).await? else {
                warn!("dropping registry entry for missing target {target_id}");
                self.registry.remove(&target_id).await?;
                continue;
            };

            let job = self.spawn_worker(&target_id);
            self.jobs.insert(target_id.clone(), job);

            if !target.monitoring_enabled {
                // Registry and record drifted apart; the registry wins.
                target.monitoring_enabled = true;
                self.store.save(&target).await?;
            }

            recovered += 1;
            info!("recovered monitoring for {}", target.url);
        }

        Ok(recovered)
    }

    fn spawn_worker(&self, target_id: &str) -> ActiveJob {
        let (command_tx, command_rx) = mpsc::channel(32);
        let worker = TargetWorker::new(
            target_id.to_string(),
            self.runner.clone(),
            command_rx,
            self.period,
        );
        let task = tokio::spawn(worker.run());
        ActiveJob { command_tx, task }
    }

    fn cancel_all(&mut self) {
        for (_, job) in self.jobs.drain() {
            job.task.abort();
        }
    }
}

fn latest_known(target: &MonitoredTarget) -> MonitorResult<StatusSample> {
    target
        .latest_sample()
        .cloned()
        .ok_or_else(|| MonitorError::NotFound(format!("no status recorded yet for {}", target.url)))
}

/// Cloneable handle for talking to the scheduler actor
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Spawn a scheduler actor and return a handle to it
    pub fn spawn(
        store: Arc<dyn TargetStore>,
        registry: Arc<dyn JobRegistry>,
        prober: Arc<HttpProber>,
        notifier: Option<Arc<dyn Notifier>>,
        event_tx: broadcast::Sender<CheckEvent>,
        period: Duration,
    ) -> Self {
        let (sender, command_rx) = mpsc::channel(32);
        let runner = CheckRunner::new(store.clone(), prober, notifier, event_tx);
        let actor = SchedulerActor {
            command_rx,
            jobs: HashMap::new(),
            runner,
            store,
            registry,
            period,
        };
        tokio::spawn(actor.run());
        Self { sender }
    }

    /// Begin recurring checks for the target and mark it as monitored.
    /// Returns the last known status sample.
    pub async fn start_monitoring(&self, target_id: &str) -> MonitorResult<StatusSample> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::Start {
                target_id: target_id.to_string(),
                respond_to: tx,
            })
            .await
            .map_err(|_| unavailable())?;
        rx.await.map_err(|_| unavailable())?
    }

    /// Cancel recurring checks for the target and return its updated record.
    pub async fn stop_monitoring(&self, target_id: &str) -> MonitorResult<MonitoredTarget> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::Stop {
                target_id: target_id.to_string(),
                respond_to: tx,
            })
            .await
            .map_err(|_| unavailable())?;
        rx.await.map_err(|_| unavailable())?
    }

    /// Run a single check right now, monitored or not.
    pub async fn run_check(&self, target_id: &str) -> MonitorResult<StatusSample> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::RunCheck {
                target_id: target_id.to_string(),
                respond_to: tx,
            })
            .await
            .map_err(|_| unavailable())?;
        rx.await.map_err(|_| unavailable())?
    }

    /// Stop monitoring (if active) and remove the target entirely.
    /// Returns a human-readable confirmation.
    pub async fn delete_target(&self, target_id: &str) -> MonitorResult<String> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::Delete {
                target_id: target_id.to_string(),
                respond_to: tx,
            })
            .await
            .map_err(|_| unavailable())?;
        rx.await.map_err(|_| unavailable())?
    }

    /// Respawn workers for everything the job registry says was monitored.
    /// Returns how many targets came back.
    pub async fn recover(&self) -> MonitorResult<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::Recover { respond_to: tx })
            .await
            .map_err(|_| unavailable())?;
        rx.await.map_err(|_| unavailable())?
    }

    /// List the ids of all targets with a live worker.
    pub async fn active_jobs(&self) -> MonitorResult<Vec<String>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::ActiveJobs { respond_to: tx })
            .await
            .map_err(|_| unavailable())?;
        rx.await.map_err(|_| unavailable())
    }

    /// Ask the actor to stop all workers and exit.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(SchedulerCommand::Shutdown).await;
    }
}

fn unavailable() -> MonitorError {
    MonitorError::Unavailable("scheduler is not running".to_string())
}
