//! Durable state for monitored targets and the job registry
//!
//! This module provides trait-based persistence for the two kinds of
//! durable state the scheduler relies on:
//!
//! - **Target records** ([`TargetStore`]): identity, normalized URL,
//!   contact info, status history, monitoring flag
//! - **Job registry** ([`JobRegistry`]): the set of target ids with an
//!   active recurring check, replayed at startup
//!
//! ## Design
//!
//! - **Trait-based**: backends are swappable behind `Arc<dyn ...>`
//! - **Async**: all operations are async for compatibility with Tokio
//! - **Atomic registry mutations**: adds/removes are single statements,
//!   never read-modify-write over the whole set
//!
//! ## Backends
//!
//! - **SQLite** (default): embedded database in WAL mode
//! - **In-memory**: no persistence, for tests and `backend = "none"`
//!
//! ## Usage
//!
//! ```no_run
//! use sitewatch::storage::{TargetStore, sqlite::SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteStore::new("./sitewatch.db").await?;
//!     let targets = store.list_all().await?;
//!     println!("{} targets", targets.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{JobRegistry, TargetStore};
