// src/services/notifier.rs

//! Transition notifier.
//!
//! Pushes an alert when a product goes from out of stock to in stock. The
//! delivery channel is any service that accepts a POST with the message as
//! body and `Title`, `Click` and `Priority` headers (ntfy by default).

use async_trait::async_trait;
use reqwest::{Client, Request};
use url::Url;

use crate::error::Result;
use crate::models::Config;

/// A push notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub click_url: String,
    pub priority: String,
}

/// Delivery channel for notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification. Any non-2xx response is an error.
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Notifier that publishes to an ntfy-compatible topic URL.
pub struct NtfyNotifier {
    client: Client,
    endpoint: Url,
}

impl NtfyNotifier {
    pub fn new(config: &Config, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: config.notify.endpoint()?,
        })
    }

    fn build_request(&self, notification: &Notification) -> reqwest::Result<Request> {
        self.client
            .post(self.endpoint.clone())
            .header("Title", notification.title.as_str())
            .header("Click", notification.click_url.as_str())
            .header("Priority", notification.priority.as_str())
            .body(notification.message.clone().into_bytes())
            .build()
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let request = self.build_request(notification)?;
        self.client.execute(request).await?.error_for_status()?;
        log::info!("Notification sent to {}", self.endpoint);
        Ok(())
    }
}

/// Whether a change from `prev` to `now` should raise an alert.
///
/// Only an observed `false` followed by `true` qualifies. A first run
/// (`prev == None`) never alerts.
pub fn should_notify(prev: Option<bool>, now: bool) -> bool {
    prev == Some(false) && now
}

/// Decides on and sends availability alerts.
pub struct TransitionNotifier<'a> {
    notifier: &'a dyn Notifier,
    title: String,
    priority: String,
    click_url: String,
}

impl<'a> TransitionNotifier<'a> {
    pub fn new(notifier: &'a dyn Notifier, config: &Config) -> Result<Self> {
        Ok(Self {
            notifier,
            title: config.notify.title.clone(),
            priority: config.notify.priority.clone(),
            click_url: config.product.page_url()?.to_string(),
        })
    }

    /// Alert text for the given availability label.
    pub fn alert(&self, availability: &str) -> Notification {
        Notification {
            title: self.title.clone(),
            message: format!("Availability detected! Status: {availability}"),
            click_url: self.click_url.clone(),
            priority: self.priority.clone(),
        }
    }

    /// Send an alert if `prev -> now` is a false-to-true transition.
    ///
    /// Returns whether a notification was sent. `availability` only affects
    /// the message text, never the decision.
    pub async fn maybe_notify(
        &self,
        prev: Option<bool>,
        now: bool,
        availability: &str,
    ) -> Result<bool> {
        if !should_notify(prev, now) {
            log::debug!("No transition to report (prev: {:?}, now: {})", prev, now);
            return Ok(false);
        }

        log::info!("Stock transition detected: {}", availability);
        self.notifier.send(&self.alert(availability)).await?;
        Ok(true)
    }
}
