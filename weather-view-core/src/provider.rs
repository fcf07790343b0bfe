use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single network primitive the controller depends on.
///
/// Swapped for a stub by the verification harness.
#[async_trait]
pub trait Fetch: Send + Sync + Debug {
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// Real HTTP transport.
///
/// Errors carry no request URL, since the URL holds the API key.
#[derive(Debug, Clone, Default)]
pub struct HttpFetch {
    http: Client,
}

impl HttpFetch {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to OpenWeather")?;

        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read OpenWeather response body")?;

        tracing::debug!(status, bytes = body.len(), "fetch completed");
        Ok(FetchResponse { status, body })
    }
}
