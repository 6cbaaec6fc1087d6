//! Reachability probing
//!
//! One outbound GET per check. Every failure mode is swallowed into the
//! [`UNREACHABLE`] sentinel so callers never branch on transport errors,
//! only on status codes.

use std::time::Duration;

use tracing::{instrument, trace, warn};

/// Sentinel status recorded when no valid response came back.
pub const UNREACHABLE: u16 = 0;

/// The one status that counts as "up". Anything else makes a target with
/// a contact address eligible for notification.
pub const HEALTHY: u16 = 200;

/// Issues reachability checks against target URLs.
///
/// The HTTP client is built once and reused across checks. Redirects are
/// followed per client defaults, so a `301` onto a healthy page reads `200`.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Check a single URL.
    ///
    /// Timeouts, DNS failures, refused connections and all other
    /// transport problems map to [`UNREACHABLE`]; a real response maps to
    /// its status code. Never returns an error.
    #[instrument(skip(self))]
    pub async fn check(&self, url: &str) -> u16 {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                trace!("{url} answered with {status}");
                status
            }
            Err(e) => {
                warn!("cannot reach {url}: {e}");
                UNREACHABLE
            }
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}
