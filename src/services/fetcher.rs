// src/services/fetcher.rs

//! Availability fetcher service.
//!
//! Calls the product page's internal variation endpoint the same way the page
//! itself does and extracts the availability label from the analytics events
//! embedded in the response.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Request};
use serde_json::{Value, json};
use url::Url;

use crate::error::Result;
use crate::models::{AvailabilityReading, Config, RequestMode};
use crate::utils::http::ajax_headers;

/// Analytics event that carries the product detail.
pub const VIEW_ITEM_EVENT: &str = "view_item";

/// Source of the current availability reading.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Fetch the current reading.
    ///
    /// Transport failures are errors; unexpected response shapes are not and
    /// yield [`AvailabilityReading::unknown`].
    async fn fetch(&self) -> Result<AvailabilityReading>;
}

/// Fetches availability from the product variation endpoint over HTTP.
pub struct AvailabilityFetcher {
    client: Client,
    endpoint: Url,
    headers: HeaderMap,
    mode: RequestMode,
    params: BTreeMap<String, String>,
}

impl AvailabilityFetcher {
    /// Create a fetcher for the configured product.
    pub fn new(config: &Config, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: Url::parse(&config.product.endpoint_url)?,
            headers: ajax_headers(&config.product.page_url()?)?,
            mode: config.product.request_mode,
            params: config.product.params.clone(),
        })
    }

    /// Variant parameters as an `application/x-www-form-urlencoded` string.
    pub fn encoded_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.params)
            .finish()
    }

    /// Build the outbound request for the configured mode.
    fn build_request(&self) -> reqwest::Result<Request> {
        let builder = match self.mode {
            RequestMode::Query => self.client.get(self.endpoint.clone()).query(&self.params),
            RequestMode::Json => self
                .client
                .post(self.endpoint.clone())
                .json(&json!({ "query": self.encoded_query() })),
        };
        builder.headers(self.headers.clone()).build()
    }
}

#[async_trait]
impl AvailabilitySource for AvailabilityFetcher {
    async fn fetch(&self) -> Result<AvailabilityReading> {
        let request = self.build_request()?;
        log::debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request).await?.error_for_status()?;
        let body = response.text().await?;
        Ok(parse_availability(&body))
    }
}

/// Parse a response body into a reading, degrading to `unknown`.
pub fn parse_availability(body: &str) -> AvailabilityReading {
    let data: Value = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Product response is not JSON: {}", e);
            return AvailabilityReading::unknown();
        }
    };

    match extract_availability(&data) {
        Some(label) => AvailabilityReading::new(label),
        None => {
            log::warn!("No {} availability in product response", VIEW_ITEM_EVENT);
            AvailabilityReading::unknown()
        }
    }
}

/// Locate `gtmModel[event=view_item].ecommerce.items[0].item_availability`.
pub fn extract_availability(data: &Value) -> Option<&str> {
    let events = data.get("gtmModel")?.as_array()?;
    let view_item = events
        .iter()
        .find(|e| e.get("event").and_then(Value::as_str) == Some(VIEW_ITEM_EVENT))?;

    let items = view_item.get("ecommerce")?.get("items")?;
    log::debug!("{} items: {}", VIEW_ITEM_EVENT, items);

    items.get(0)?.get("item_availability")?.as_str()
}
