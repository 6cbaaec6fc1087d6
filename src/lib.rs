pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod probe;
pub mod scheduler;
pub mod storage;
pub mod util;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredTarget {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub contact_email: Option<String>,
    pub monitoring_enabled: bool,
    pub latest_status: Option<u16>,
    /// Newest first. The scheduler prepends, nothing ever truncates.
    pub history: Vec<StatusSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSample {
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
}

impl MonitoredTarget {
    /// Builds a fresh target seeded with the result of its first check.
    pub fn new(
        url: impl Into<String>,
        title: Option<String>,
        contact_email: Option<String>,
        initial_status: u16,
    ) -> Self {
        let sample = StatusSample::now(initial_status);
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            title,
            contact_email,
            monitoring_enabled: false,
            latest_status: Some(sample.status_code),
            history: vec![sample],
        }
    }

    pub fn latest_sample(&self) -> Option<&StatusSample> {
        self.history.first()
    }
}

impl StatusSample {
    pub fn now(status_code: u16) -> Self {
        Self {
            status_code,
            timestamp: Utc::now(),
        }
    }
}
