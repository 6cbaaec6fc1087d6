//! The monitoring scheduler
//!
//! One actor owns the table of active recurring checks and serializes
//! every lifecycle change; one worker task per monitored target runs the
//! actual checks on its own ticker.
//!
//! ## Architecture Overview
//!
//! ```text
//! SchedulerHandle (cloneable)
//!     | mpsc commands (Start, Stop, RunCheck, Delete, Recover, ...)
//!     v
//! SchedulerActor -- owns target_id -> ActiveJob, spawns/aborts workers,
//!     |              mutates the durable JobRegistry
//!     v
//! TargetWorker (one per target, own ticker)
//!     | every tick
//!     v
//! CheckRunner: probe -> update latest status -> maybe notify
//!              -> prepend sample -> save -> publish CheckEvent
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: mpsc channels with oneshot `respond_to` senders
//! 2. **Events**: every completed check is broadcast as a [`CheckEvent`]
//! 3. **Cancellation**: stopping a target aborts its worker task, so no
//!    further tick fires once the stop call returns
//!
//! Because Start/Stop/Recover/Delete all flow through the one command
//! loop, two racing starts cannot double-spawn a worker and a delete
//! cannot interleave with a start for the same target.

pub mod checks;
pub mod core;
pub mod messages;
pub mod worker;

pub use checks::CheckRunner;
pub use core::SchedulerHandle;
pub use messages::{CheckEvent, SchedulerCommand, WorkerCommand};
