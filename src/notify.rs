//! Down alerts for monitored targets
//!
//! A target that answers anything but 200 while carrying a contact
//! address gets one best-effort email per check. Delivery goes through a
//! SendGrid-compatible mail API; every failure mode is reported as
//! `false` and logged, never propagated.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};

use crate::config::MailConfig;
use crate::util;

/// Best-effort alert delivery.
///
/// The boolean is the entire result: `true` means the provider accepted
/// the message, `false` means "logged, moved on". Callers never retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, url: &str, contact_email: &str) -> bool;
}

/// Sends down alerts through a SendGrid-compatible mail API.
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl EmailNotifier {
    /// Build a notifier from the mail section of the config.
    ///
    /// Returns `None` when no API key is available, neither in the config
    /// nor via `SENDGRID_API_KEY`.
    pub fn from_config(config: &MailConfig) -> Option<Self> {
        let Some(api_key) = config.api_key.clone().or_else(util::get_mail_api_key) else {
            warn!("mail is configured but no API key is available, notifications disabled");
            return None;
        };

        Some(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            from: config.from.clone(),
        })
    }

    fn build_message(&self, url: &str, contact_email: &str) -> Value {
        json!({
            "personalizations": [{ "to": [{ "email": contact_email }] }],
            "from": { "email": self.from },
            "subject": "The website is down",
            "content": [
                { "type": "text/plain", "value": format!("{url} is down!") },
                { "type": "text/html", "value": format!("<strong>{url} is down!</strong>") }
            ]
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    #[instrument(skip(self, contact_email))]
    async fn notify(&self, url: &str, contact_email: &str) -> bool {
        let payload = self.build_message(url, contact_email);
        let mail_url = format!("{}/v3/mail/send", self.endpoint);

        match self
            .client
            .post(&mail_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!("alert email sent for {url}");
                true
            }
            Ok(response) => {
                error!("mail provider rejected alert for {url}: {}", response.status());
                false
            }
            Err(e) => {
                error!("failed to send alert for {url}: {e}");
                false
            }
        }
    }
}
