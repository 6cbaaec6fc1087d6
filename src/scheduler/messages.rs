//! Message types for scheduler communication
//!
//! Defines the commands accepted by the scheduler actor and its per-target
//! workers, plus the event type broadcast after every completed check.

use tokio::sync::oneshot;

use crate::{MonitoredTarget, StatusSample, error::MonitorResult};

/// Commands accepted by the scheduler actor.
///
/// Every command that has an observable result carries a oneshot sender;
/// the actor answers on it once the command has fully taken effect.
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Begin recurring checks for a target and mark it as monitored.
    Start {
        target_id: String,
        respond_to: oneshot::Sender<MonitorResult<StatusSample>>,
    },
    /// Cancel recurring checks for a target and clear its monitored flag.
    Stop {
        target_id: String,
        respond_to: oneshot::Sender<MonitorResult<MonitoredTarget>>,
    },
    /// Run a single check immediately, whether or not the target is monitored.
    RunCheck {
        target_id: String,
        respond_to: oneshot::Sender<MonitorResult<StatusSample>>,
    },
    /// Stop monitoring (if active) and remove the target entirely.
    Delete {
        target_id: String,
        respond_to: oneshot::Sender<MonitorResult<String>>,
    },
    /// Respawn workers for every target recorded in the job registry.
    Recover {
        respond_to: oneshot::Sender<MonitorResult<usize>>,
    },
    /// List the ids of all targets with a live worker.
    ActiveJobs {
        respond_to: oneshot::Sender<Vec<String>>,
    },
    /// Stop all workers and exit the actor loop.
    Shutdown,
}

/// Commands accepted by an individual target worker.
///
/// There is no stop variant: the scheduler cancels a worker by aborting
/// its task, which is the only way to guarantee no further tick fires.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Run one check now, outside the regular cadence.
    CheckNow {
        respond_to: oneshot::Sender<MonitorResult<StatusSample>>,
    },
}

/// Broadcast after every completed check, scheduled or on-demand.
#[derive(Debug, Clone)]
pub struct CheckEvent {
    pub target_id: String,
    pub url: String,
    pub sample: StatusSample,
    /// Whether an alert was actually handed to the notifier for this check.
    pub notified: bool,
}
