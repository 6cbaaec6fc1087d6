//! API route handlers

pub mod health;
pub mod monitor;
pub mod stats;
pub mod targets;
