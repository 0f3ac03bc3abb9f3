//! Microlink metadata API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{MetadataFetcher, OgpError};

/// Public Microlink endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.microlink.io/";

/// Client for a Microlink-compatible metadata endpoint.
#[derive(Debug, Clone)]
pub struct MicrolinkClient {
    client: Client,
    endpoint: String,
}

/// The part of the response we read: `{ data: { image: { url } } }`.
#[derive(Debug, Deserialize)]
struct MetadataResponse {
    data: Option<MetadataData>,
}

#[derive(Debug, Deserialize)]
struct MetadataData {
    image: Option<MetadataImage>,
}

#[derive(Debug, Deserialize)]
struct MetadataImage {
    url: Option<String>,
}

impl MetadataResponse {
    fn image_url(self) -> Option<String> {
        self.data
            .and_then(|d| d.image)
            .and_then(|i| i.url)
            .filter(|u| !u.is_empty())
    }
}

impl MicrolinkClient {
    /// Create a client for `endpoint`.
    ///
    /// No timeout is applied unless one is given.
    pub fn new(
        endpoint: impl Into<String>,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, OgpError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    /// Build the lookup URL for `target_url`.
    pub fn request_url(&self, target_url: &str) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}url={}&meta=true",
            self.endpoint,
            sep,
            urlencoding::encode(target_url)
        )
    }
}

#[async_trait]
impl MetadataFetcher for MicrolinkClient {
    async fn fetch_image(&self, target_url: &str) -> Result<String, OgpError> {
        let request_url = self.request_url(target_url);
        debug!("Querying metadata API: {}", request_url);

        let response = self.client.get(&request_url).send().await?;
        if !response.status().is_success() {
            return Err(OgpError::Status(response.status()));
        }

        let body: MetadataResponse = response.json().await?;
        body.image_url().ok_or(OgpError::MissingImage)
    }
}
