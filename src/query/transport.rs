use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::QueryDescriptor;
use crate::error::TransportError;

/// Europe PMC REST base URL
pub const DEFAULT_ENDPOINT: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/";

/// Runs a single query and parses the body as JSON.
/// Any error means "try again next round".
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, query: &QueryDescriptor) -> Result<Value, TransportError>;
}

/// reqwest-backed transport against a REST endpoint
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport; `timeout` bounds every request when set
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: normalize_endpoint(endpoint),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url_for(&self, query: &QueryDescriptor) -> String {
        format!("{}{}", self.endpoint, query.path())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, query: &QueryDescriptor) -> Result<Value, TransportError> {
        let url = self.url_for(query);
        let response = self
            .client
            .get(&url)
            .query(&query.query_params())
            .send()
            .await?;

        // Error payloads arrive as JSON too, so the status is not checked here
        match response.json::<Value>().await {
            Ok(value) => Ok(value),
            Err(e) => {
                debug!("Unparseable response for {}: {}", url, e);
                Err(TransportError::Request(e))
            }
        }
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    format!("{}/", endpoint.trim_end_matches('/'))
}
