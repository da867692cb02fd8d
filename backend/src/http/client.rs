use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::retry::{fetch_with_retry, RetryPolicy};
use crate::config::settings::{HttpSettings, RetrySettings};
use crate::errors::with_source_context;

/// Shared HTTP client for data source adapters
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn new(settings: &HttpSettings, retry: &RetrySettings) -> Result<Self> {
        let client = Self::build_client(&settings.user_agent, settings.timeout_secs)?;
        Ok(Self {
            client,
            policy: RetryPolicy::from(retry),
        })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// GET a JSON document with the retry policy applied.
    /// A body that fails to decode is reported like any other source failure.
    pub async fn get_json<T: DeserializeOwned>(&self, source: &str, operation: &str, url: &str) -> Result<T> {
        let response = fetch_with_retry(&self.policy, source, operation, || self.get(url)).await?;
        let decoded = response
            .json::<T>()
            .await
            .with_context(|| format!("Invalid JSON from {}", url));
        with_source_context(decoded, source, operation)
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}
