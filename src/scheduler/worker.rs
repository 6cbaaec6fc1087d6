//! Per-target check worker
//!
//! One [`TargetWorker`] runs per actively monitored target. It owns the
//! target's ticker and executes the shared check pipeline on every tick.
//! On-demand checks for a monitored target are forwarded here over the
//! command channel so they run on the same task as the scheduled ones.
//!
//! Workers have no stop command. The scheduler aborts the task instead,
//! which guarantees that no tick fires after monitoring was stopped.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{Instant, interval_at},
};
use tracing::{debug, error, instrument, warn};

use crate::scheduler::{checks::CheckRunner, messages::WorkerCommand};

/// Recurring check loop for a single target
pub struct TargetWorker {
    target_id: String,
    runner: CheckRunner,
    command_rx: mpsc::Receiver<WorkerCommand>,
    period: Duration,
}

impl TargetWorker {
    pub fn new(
        target_id: String,
        runner: CheckRunner,
        command_rx: mpsc::Receiver<WorkerCommand>,
        period: Duration,
    ) -> Self {
        Self {
            target_id,
            runner,
            command_rx,
            period,
        }
    }

    /// Run the worker's main loop
    ///
    /// Runs until the scheduler aborts the task or the command channel
    /// is closed.
    #[instrument(skip(self), fields(target_id = %self.target_id))]
    pub async fn run(mut self) {
        debug!("starting target worker");

        // First tick one full period from now. Activation already
        // recorded a sample, so an immediate tick would double it.
        let mut ticker = interval_at(Instant::now() + self.period, self.period);

        loop {
            tokio::select! {
                // Timer tick - run the scheduled check
                _ = ticker.tick() => {
                    if let Err(e) = self.runner.run_check(&self.target_id).await {
                        error!("scheduled check failed: {e}");
                    }
                }

                // Handle commands
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        WorkerCommand::CheckNow { respond_to } => {
                            debug!("received CheckNow command");
                            let result = self.runner.run_check(&self.target_id).await;
                            let _ = respond_to.send(result);
                        }
                    }
                }

                // Command channel closed - exit
                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("target worker stopped");
    }
}
