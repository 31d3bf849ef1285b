//! HTTP access to the site under evaluation

use std::time::Duration;
use reqwest::redirect::Policy;
use tracing::debug;

use siteeval_common::{Failure, FailureKind};

use crate::error::HarnessResult;

/// Response as seen by evaluators
#[derive(Debug, Clone)]
pub struct Fetched {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Thin wrapper over a reqwest client bound to a base URL
#[derive(Debug, Clone)]
pub struct SiteClient {
    client: reqwest::Client,
    base_url: String,
}

impl SiteClient {
    pub fn new(base_url: &str, timeout: Duration) -> HarnessResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; anything else is appended to the base URL.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.to_ascii_lowercase().starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint)
        }
    }

    pub async fn get(&self, endpoint: &str) -> Result<Fetched, Failure> {
        let url = self.resolve(endpoint);
        debug!("GET {}", url);
        let request = self.client.get(&url);
        Self::send(request, url).await
    }

    pub async fn post(&self, endpoint: &str, body: &serde_json::Value) -> Result<Fetched, Failure> {
        let url = self.resolve(endpoint);
        debug!("POST {}", url);
        let request = self.client.post(&url).json(body);
        Self::send(request, url).await
    }

    async fn send(request: reqwest::RequestBuilder, url: String) -> Result<Fetched, Failure> {
        let response = request.send().await.map_err(transport_failure)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_failure)?;

        Ok(Fetched { url, status, body })
    }
}

fn transport_failure(e: reqwest::Error) -> Failure {
    if e.is_timeout() {
        Failure::timeout()
    } else {
        Failure::new(FailureKind::Transport, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_paths_and_urls() {
        let client = SiteClient::new("https://example.test/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(client.resolve("/sales-portal"), "https://example.test/sales-portal");
        assert_eq!(
            client.resolve("HTTPS://other.test/regulations"),
            "HTTPS://other.test/regulations"
        );
    }
}
